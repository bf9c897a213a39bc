//! CLI definitions using clap derive API

use clap::Parser;
use clap::builder::{Styles, styling::AnsiColor};
use std::path::PathBuf;

/// gropack - world dependency scanner and GRO packer
///
/// Scan classic Serious Engine worlds for the resources they pull in and
/// pack everything the base game doesn't already ship into a .gro archive.
#[derive(Parser, Debug)]
#[command(
    name = "gropack",
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Dependency scanner and GRO packer for classic Serious Engine worlds",
    long_about = "gropack reads the resource dictionaries of .wld files, resolves every \
                  texture, model, sound and sidecar they reference, skips what the base \
                  game already ships, and packs the rest into a distributable .gro archive.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  gropack ~/games/serioussam/Levels/MyLevel.wld\n    \
                  gropack -r ~/games/serioussam -o MyLevel.gro -w Levels/MyLevel.wld --auto-detect\n    \
                  gropack -r ~/games/serioussam -w Levels/MyLevel.wld -d SE1_00.gro --list-deps\n    \
                  gropack -r ~/games/serioussam -o Pack.gro -w Levels/A.wld -w Levels/B.wld -s ogg -s mp3"
)]
pub struct Cli {
    /// World file to scan interactively; root, base archives and output are
    /// inferred from its location
    #[arg(value_name = "WORLD", conflicts_with = "root")]
    pub world_path: Option<PathBuf>,

    /// Root directory of the game installation
    #[arg(long, short = 'r', value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Output .gro archive, absolute or relative to the root
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// World file to scan, relative to the root (repeatable)
    #[arg(long = "world", short = 'w', value_name = "PATH")]
    pub worlds: Vec<String>,

    /// Extra file to scan for embedded filenames, relative to the root
    /// (repeatable)
    #[arg(long, value_name = "PATH")]
    pub scan: Vec<String>,

    /// Pack files with this extension uncompressed (repeatable)
    #[arg(long, short = 's', value_name = "EXT")]
    pub store: Vec<String>,

    /// Resource or .gro archive to treat as already present (repeatable)
    #[arg(long, short = 'd', value_name = "PATH")]
    pub exclude: Vec<String>,

    /// Treat worlds as Revolution ones (also detected automatically while
    /// parsing)
    #[arg(long)]
    pub revolution: bool,

    /// Include .ini configs alongside their .mdl models
    #[arg(long)]
    pub include_configs: bool,

    /// Check for .ogg files where .mp3 files are referenced
    #[arg(long)]
    pub ogg_fallback: bool,

    /// List dependencies without packing anything
    #[arg(long)]
    pub list_deps: bool,

    /// Detect the base game's .gro archives instead of naming them via -d
    #[arg(long)]
    pub auto_detect: bool,

    /// Mod directory the scanned worlds belong to
    #[arg(long, value_name = "DIR")]
    pub mod_dir: Option<String>,

    /// Record paths with the mod directory prefix removed
    #[arg(long, requires = "mod_dir")]
    pub strip_mod_dir: bool,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
