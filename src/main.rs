use std::sync::atomic::AtomicBool;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use dhcpstarve::cli::Args;
use dhcpstarve::{
    EthernetFrame, Flooder, build_discover_template, open_raw_socket, resolve_interface,
};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    println!(
        "{}",
        "ONLY USE THIS ON NETWORKS YOU ARE AUTHORIZED TO TEST".red().bold()
    );

    let interface = resolve_interface(&args.interface)
        .with_context(|| format!("resolving interface '{}'", args.interface))?;
    let socket = open_raw_socket(&interface)
        .with_context(|| format!("opening raw socket on '{}'", interface.name))?;

    println!("Interface: {}", interface.name.green().bold());
    println!("Interface ID: {}", interface.index.to_string().green());
    println!("Interface MAC: {}", interface.mac.to_string().green());
    println!("Frame size: {} bytes", EthernetFrame::LEN.to_string().yellow());

    let template = build_discover_template(interface.mac);
    let mut flooder = Flooder::new(template, socket, args.flood_config());

    // Nothing sets this; the flood ends on --count, a send error, or a kill.
    let cancel = AtomicBool::new(false);
    let stats = flooder
        .run(&cancel)
        .with_context(|| format!("flooding on '{}'", interface.name))?;

    println!(
        "Sent {} DISCOVERs in {:.2?} ({:.0} frames/s)",
        stats.frames_sent.to_string().green().bold(),
        stats.elapsed,
        stats.pps()
    );
    Ok(())
}
