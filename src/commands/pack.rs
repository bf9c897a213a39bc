//! Pack command implementation
//!
//! Turns the command line (or an interactive session started from a bare
//! world path) into a scanning plan, runs every world and extra source
//! through the scanners, then either packs the collected list into the
//! output archive or just checks it against the disk.

use std::fs;
use std::path::{Path, PathBuf};

use console::Style;

use crate::archive;
use crate::cli::Cli;
use crate::context::ScanContext;
use crate::detect::{self, GameProfile};
use crate::error::{PackError, Result, invalid_arguments};
use crate::paths;
use crate::progress::PackProgress;
use crate::resolver;
use crate::scan;
use crate::stream::Stream;
use crate::world;

/// Everything decided before scanning starts.
struct PackPlan {
    ctx: ScanContext,
    worlds: Vec<String>,
    extra_sources: Vec<String>,
    store_exts: Vec<String>,
    /// None in list-only mode.
    output: Option<PathBuf>,
    list_only: bool,
}

/// Run the pack command
pub fn run(cli: Cli) -> Result<()> {
    let mut plan = match cli.world_path {
        Some(ref world_path) => plan_from_world_path(world_path)?,
        None => plan_from_flags(&cli)?,
    };

    println!();
    println!("Standard dependencies: {}", plan.ctx.known.len());

    plan.ctx.set_counting(true);

    let worlds = plan.worlds.clone();
    for world_file in &worlds {
        announce_source(world_file);
        report_new_files(&mut plan.ctx, |ctx| world::scan_world(ctx, world_file))?;
    }

    let sources = plan.extra_sources.clone();
    for source in &sources {
        announce_source(source);
        report_new_files(&mut plan.ctx, |ctx| scan_extra_source(ctx, source))?;
    }

    if plan.list_only {
        check_files_exist(&plan.ctx);
        Ok(())
    } else if let Some(output) = plan.output.take() {
        pack_files(&plan.ctx, &output, &plan.store_exts)
    } else {
        Err(invalid_arguments(
            "Output archive has not been set; use --output <file.gro> or --list-deps",
        ))
    }
}

/// Build the plan from explicit command line flags.
fn plan_from_flags(cli: &Cli) -> Result<PackPlan> {
    let root = cli.root.clone().ok_or_else(|| {
        invalid_arguments("Game folder path has not been set; use --root <game folder>")
    })?;
    if !cli.list_deps && cli.output.is_none() {
        return Err(invalid_arguments(
            "Output archive has not been set; use --output <file.gro> or --list-deps",
        ));
    }

    let mut ctx = ScanContext::new(root);
    ctx.flags.revolution = cli.revolution;
    ctx.flags.model_configs = cli.include_configs;
    ctx.flags.ogg_fallback = cli.ogg_fallback;
    ctx.flags.strip_mod_dir = cli.strip_mod_dir;
    ctx.mod_dir = cli
        .mod_dir
        .as_deref()
        .map(|dir| paths::fix_filename(dir).0);

    if cli.auto_detect {
        let profile = detect_or_fail(&ctx.root)?;
        // explicit flag mode: archives only, no edition hints
        ingest_profile(&mut ctx, profile, cli.verbose)?;
    }
    ingest_exclusions(&mut ctx, &cli.exclude, cli.verbose)?;

    // the worlds themselves always travel in the archive
    let mut worlds = Vec::new();
    for raw in &cli.worlds {
        let world_file = raw.replace('\\', "/");
        resolver::add_direct(&mut ctx, &world_file);
        worlds.push(world_file);
    }

    let output = cli.output.as_ref().map(|out| resolve_output(&ctx.root, out));

    Ok(PackPlan {
        ctx,
        worlds,
        extra_sources: cli.scan.iter().map(|s| s.replace('\\', "/")).collect(),
        store_exts: cli.store.iter().map(|e| normalize_store_ext(e)).collect(),
        output,
        list_only: cli.list_deps,
    })
}

/// Build the plan interactively from a bare world path: infer the root from
/// the Levels directory, auto-detect the base game and ask about the output.
fn plan_from_world_path(world_path: &Path) -> Result<PackPlan> {
    let path_str = world_path.to_string_lossy().replace('\\', "/");

    // make sure it really is a world before asking anything
    let data = fs::read(world_path).map_err(|e| PackError::FileReadFailed {
        path: path_str.clone(),
        reason: e.to_string(),
    })?;
    world::verify_world_header(&mut Stream::new(&data), &path_str)?;
    drop(data);

    let (root, relative) = split_at_levels(&path_str).ok_or(PackError::WorldOutsideLevels {
        path: path_str.clone(),
    })?;
    let mut ctx = ScanContext::new(PathBuf::from(root));

    let list_only = inquire::Confirm::new("Show world dependencies instead of packing?")
        .with_default(false)
        .prompt()?;

    let mut output = None;
    let mut store_exts = Vec::new();
    if !list_only {
        let custom = inquire::Text::new("Output GRO file (blank for automatic):").prompt()?;
        let name = if custom.trim().is_empty() {
            let stem = relative.rsplit('/').next().unwrap_or(&relative);
            format!("gropack_{}.gro", paths::strip_ext(stem))
        } else {
            let mut name = custom.trim().to_string();
            if !paths::has_ext(&name, ".gro") {
                name.push_str(".gro");
            }
            name
        };
        output = Some(ctx.root.join(name));

        if inquire::Confirm::new("Pack uncompressed music files?")
            .with_default(true)
            .prompt()?
        {
            store_exts.push(".ogg".to_string());
            store_exts.push(".mp3".to_string());
        }
        if inquire::Confirm::new("Pack uncompressed world file?")
            .with_default(false)
            .prompt()?
        {
            store_exts.push(".wld".to_string());
        }
    }

    // started from a world: the detected edition also decides variant flags
    let profile = detect_or_fail(&ctx.root)?;
    ctx.flags.revolution = profile.revolution;
    ctx.flags.ogg_fallback = profile.ogg_fallback;
    ingest_profile(&mut ctx, profile, false)?;

    resolver::add_direct(&mut ctx, &relative);

    Ok(PackPlan {
        ctx,
        worlds: vec![relative],
        extra_sources: Vec::new(),
        store_exts,
        output,
        list_only,
    })
}

/// Split a world path at its innermost `Levels` component.
fn split_at_levels(path: &str) -> Option<(String, String)> {
    let segments: Vec<&str> = path.split('/').collect();
    let at = segments
        .iter()
        .rposition(|segment| segment.eq_ignore_ascii_case("Levels"))?;

    let root = if at == 0 {
        ".".to_string()
    } else {
        segments[..at].join("/")
    };
    Some((root, segments[at..].join("/")))
}

fn detect_or_fail(root: &Path) -> Result<&'static GameProfile> {
    let profile = detect::detect_game(root).ok_or_else(|| PackError::UnknownGameDirectory {
        root: root.display().to_string(),
    })?;
    println!(
        "Detected archives from {}...",
        Style::new().bold().apply_to(profile.name)
    );
    Ok(profile)
}

/// Load every archive of a detected edition into the known set.
fn ingest_profile(ctx: &mut ScanContext, profile: &GameProfile, verbose: bool) -> Result<()> {
    for gro in profile.archives {
        ingest_gro(ctx, gro, verbose)?;
    }
    Ok(())
}

/// Load one archive's entries into the known set. A missing archive is
/// reported and skipped; an unreadable one aborts.
fn ingest_gro(ctx: &mut ScanContext, gro: &str, verbose: bool) -> Result<()> {
    let full = ctx.root.join(gro);
    if !full.is_file() {
        println!("\"{gro}\" does not exist!");
        return Ok(());
    }
    let added = archive::ingest_known_archive(&full, &mut ctx.known)?;
    if verbose {
        println!("Ignoring {added} resources from \"{gro}\"");
    }
    Ok(())
}

/// Register explicit exclusions: whole archives or single resources.
fn ingest_exclusions(ctx: &mut ScanContext, excludes: &[String], verbose: bool) -> Result<()> {
    for raw in excludes {
        let (fixed, _) = paths::fix_filename(raw);

        if paths::has_ext(&fixed, ".gro") {
            ingest_gro(ctx, &fixed, verbose)?;
            continue;
        }

        if !ctx.root.join(&fixed).is_file() {
            println!("\"{fixed}\" does not exist!");
            continue;
        }
        ctx.known.insert(&fixed.to_lowercase());
    }
    Ok(())
}

fn announce_source(source: &str) {
    println!();
    println!(
        "Extra dependencies for '{}':",
        Style::new().bold().yellow().apply_to(source)
    );
}

/// Run one scan step and print what it contributed to the output list.
fn report_new_files(
    ctx: &mut ScanContext,
    scan_step: impl FnOnce(&mut ScanContext) -> Result<()>,
) -> Result<()> {
    let before = ctx.files().len();
    scan_step(ctx)?;

    let added = &ctx.files()[before..];
    if added.is_empty() {
        println!("No dependencies");
        return Ok(());
    }
    for file in added {
        match file.seq {
            Some(seq) => println!("{seq}. {}", file.path),
            None => println!("- {}", file.path),
        }
    }
    Ok(())
}

/// Heuristic scan over one extra source file.
fn scan_extra_source(ctx: &mut ScanContext, source: &str) -> Result<()> {
    let full = ctx.root.join(source);
    let data = fs::read(&full).map_err(|e| PackError::FileReadFailed {
        path: full.display().to_string(),
        reason: e.to_string(),
    })?;

    let start = if paths::has_ext(source, ".dll") {
        scan::native_scan_start(&data)
    } else {
        0
    };
    for name in scan::scan_bytes(&data[start..]) {
        resolver::resolve(ctx, &name);
    }
    Ok(())
}

/// List-only mode: confirm every recorded file actually exists.
fn check_files_exist(ctx: &ScanContext) {
    println!();
    println!("Checking for physical existence of files...");

    let missing: Vec<&str> = ctx
        .files()
        .iter()
        .filter(|file| archive::locate(ctx, &file.path).is_none())
        .map(|file| file.path.as_str())
        .collect();

    if missing.is_empty() {
        println!("All files exist!");
        return;
    }
    println!();
    println!("Files that aren't on disk:");
    for path in missing {
        println!("- {path}");
    }
}

/// Write the archive and report what couldn't be packed.
fn pack_files(ctx: &ScanContext, output: &Path, store_exts: &[String]) -> Result<()> {
    println!();
    println!("Packing files...");

    let progress = PackProgress::new(ctx.files().len() as u64);
    let outcome = match archive::write_archive(ctx, output, store_exts, &progress) {
        Ok(outcome) => {
            progress.finish();
            outcome
        }
        Err(e) => {
            progress.abandon();
            return Err(e);
        }
    };

    if !outcome.failed.is_empty() {
        println!();
        println!("Couldn't pack these files:");
        for path in &outcome.failed {
            println!("- {path}");
        }
    }

    println!();
    println!(
        "\"{}\" is ready! ({} files)",
        Style::new().bold().green().apply_to(output.display()),
        outcome.written
    );
    Ok(())
}

fn resolve_output(root: &Path, output: &Path) -> PathBuf {
    if output.is_absolute() {
        output.to_path_buf()
    } else {
        root.join(output)
    }
}

fn normalize_store_ext(raw: &str) -> String {
    let trimmed = raw.trim().to_lowercase();
    if trimmed.starts_with('.') {
        trimmed
    } else {
        format!(".{trimmed}")
    }
}
