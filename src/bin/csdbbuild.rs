//! Callsign database build utility
//! Reads a JSON user list (an array of {id, call, name} records, e.g. a
//! RadioID export) and writes the binary callsign database image

use dmrplug::device::uv390_callsign::{CallsignDb, CALLSIGN_CAPACITY};
use dmrplug::core::userdb::{User, UserDatabase};
use std::env;
use std::fs::File;
use std::io::Write;
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    let format_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <users.json> <out.bin>", args[0]);
        eprintln!("Example: {} user.json callsigns.bin", args[0]);
        eprintln!(
            "\nThe image holds at most {} entries; longer lists are cut.",
            CALLSIGN_CAPACITY
        );
        std::process::exit(1);
    }

    let input = &args[1];
    let output = &args[2];

    println!("Reading user list: {}", input);
    let users: Vec<User> = serde_json::from_reader(File::open(input)?)?;
    println!("  {} users", users.len());

    let db = UserDatabase::new(users);
    let (csdb, warnings) = CallsignDb::from_user_db(&db, CALLSIGN_CAPACITY);

    for warning in &warnings {
        eprintln!("warning: {}", warning);
    }

    println!(
        "Writing {} entries ({} bytes) to {}",
        csdb.len(),
        csdb.image().len(),
        output
    );
    File::create(output)?.write_all(csdb.image().as_bytes())?;

    Ok(())
}
