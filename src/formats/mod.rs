// File format handlers
pub mod metadata;
pub mod rdt;

pub use metadata::Metadata;
pub use rdt::{load_rdt, save_rdt, RdtError};
