//! gropack - world dependency scanner and GRO packer
//!
//! Scans classic Serious Engine world files for the resources they
//! transitively reference, filters out everything the base installation
//! already ships, and packs the remainder into a distributable .gro
//! archive.

use clap::Parser;

mod archive;
mod cli;
mod commands;
mod context;
mod detect;
mod error;
mod paths;
mod progress;
mod resolver;
mod scan;
mod stream;
mod texture;
mod world;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = commands::pack::run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
