//! Codeplug dump utility
//! Loads a .rdt codeplug file, decodes it and prints the configuration
//! summary together with every warning the decoder accumulated

use dmrplug::device::DeviceCodec;
use dmrplug::formats::load_rdt;
use dmrplug::Uv390Codeplug;
use std::env;
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
    if args.len() < 2 {
        eprintln!("Usage: {} <file.rdt> [channels|contacts]", args[0]);
        eprintln!("\nExamples:");
        eprintln!("  {} radio.rdt             # Summary of every table", args[0]);
        eprintln!("  {} radio.rdt channels    # List every channel", args[0]);
        eprintln!("  {} radio.rdt contacts    # List every contact", args[0]);
        std::process::exit(1);
    }

    let rdt_file = &args[1];
    let listing = args.get(2).map(|s| s.as_str());

    println!("Loading codeplug file: {}", rdt_file);
    let (mmap, metadata) = load_rdt(rdt_file)?;
    if !metadata.vendor.is_empty() {
        println!("Radio: {} {}", metadata.vendor, metadata.model);
    }
    println!("Image size: {} bytes\n", mmap.len());

    let codec = Uv390Codeplug::new();
    let result = codec.decode(&mmap)?;
    let config = &result.config;

    println!("=== {} configuration ===", codec.name());
    println!("  Channels:            {}", config.channels().len());
    println!("  Contacts:            {}", config.contacts().len());
    println!("  Zones:               {}", config.zones().len());
    println!("  Scan lists:          {}", config.scan_lists().len());
    println!("  RX group lists:      {}", config.group_lists().len());
    println!("  Positioning systems: {}", config.positioning().len());
    println!("  Roaming zones:       {}", config.roaming().len());
    println!("  Radio IDs:           {}", config.radio_ids().len());

    match listing {
        Some("channels") => {
            println!("\n=== Channels ===");
            for (i, (_, channel)) in config.channels().iter().enumerate() {
                println!("{:4}: {}", i + 1, channel);
            }
        }
        Some("contacts") => {
            println!("\n=== Contacts ===");
            for (i, (_, contact)) in config.contacts().iter().enumerate() {
                println!("{:4}: {}", i + 1, contact);
            }
        }
        Some(other) => {
            eprintln!("Unknown listing \"{}\"", other);
        }
        None => {}
    }

    if !result.warnings.is_empty() {
        println!("\n=== Warnings ===");
        for warning in &result.warnings {
            println!("  {}", warning);
        }
    }

    Ok(())
}
