// Configuration data model: the object graph the codec encodes/decodes

pub mod channel;
pub mod config;
pub mod contact;
pub mod lists;
pub mod power;
pub mod signaling;
pub mod systems;
pub mod userdb;

pub use channel::{Channel, ChannelMode};
pub use config::Config;
pub use contact::Contact;
pub use lists::{ChannelRef, RxGroupList, ScanList, TxChannel, Zone};
pub use power::Power;
pub use signaling::Code;
pub use systems::{GpsSystem, RadioId, RoamingZone};
pub use userdb::{User, UserDatabase};
