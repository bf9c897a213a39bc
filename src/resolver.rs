//! Dependency resolution
//!
//! Every filename reference, wherever it was discovered, funnels through
//! [`resolve`]: normalize, decide new-vs-known against the base
//! installation, dedup against the files already recorded this run, and on
//! acceptance chase the sidecars the file implies (a config for a model, a
//! base texture for an effect texture). The fallback chain mirrors how the
//! two game editions actually alias resources: a missing .mp3 may be
//! satisfied by its .ogg, Revolution renamed the multiplayer directories and
//! swapped spaces for underscores.

use std::fs;

use crate::context::ScanContext;
use crate::paths;
use crate::texture;

/// Outcome of resolving one raw filename reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Already satisfied by the base installation or an exclusion.
    Known,
    /// Empty reference, or already recorded earlier this run.
    Skipped,
    /// Newly recorded in the output list.
    Added { path: String, seq: Option<u32> },
}

/// Resolve one raw filename against the run state.
pub fn resolve(ctx: &mut ScanContext, raw: &str) -> Resolution {
    let (mut fixed, layout_hint) = paths::fix_filename(raw);
    if layout_hint {
        ctx.flags.revolution = true;
    }
    if fixed.is_empty() {
        return Resolution::Skipped;
    }

    if ctx.flags.strip_mod_dir {
        if let Some(stripped) = strip_mod_prefix(ctx, &fixed) {
            fixed = stripped;
        }
    }

    // the comparison key mutates through the fallback chain; first hit wins
    let mut check = fixed.to_lowercase();
    if ctx.known.contains(&check) {
        return Resolution::Known;
    }

    if ctx.flags.ogg_fallback && paths::has_ext(&check, ".mp3") {
        check = paths::replace_ext(&check, ".ogg");
        if ctx.known.contains(&check) {
            return Resolution::Known;
        }
    }

    if ctx.flags.revolution {
        check = paths::collapse_mp_directory(&check);
        if ctx.known.contains(&check) {
            return Resolution::Known;
        }
        check = paths::spaces_to_underscores(&check);
        if ctx.known.contains(&check) {
            return Resolution::Known;
        }
    }

    if ctx.contains_file(&fixed) {
        return Resolution::Skipped;
    }

    let listed = ctx.push_file(fixed.clone());
    let seq = listed.seq;

    // sidecar follow-ups re-enter resolution and obey the same rules;
    // neither kind can trigger further follow-ups of its own
    if paths::has_ext(&check, ".mdl") {
        if ctx.flags.model_configs {
            let config = paths::replace_ext(&fixed, ".ini");
            resolve(ctx, &config);
        }
    } else if paths::has_ext(&check, ".tex") {
        if let Some(base) = read_base_texture(ctx, &fixed) {
            resolve(ctx, &base);
        }
    }

    Resolution::Added { path: fixed, seq }
}

/// Record a conventionally-named sidecar, bypassing the known set.
///
/// Thumbnails and visibility data belong to the world being packed and are
/// never part of the base installation, so only the duplicate check applies.
pub fn add_direct(ctx: &mut ScanContext, path: &str) -> Resolution {
    if ctx.contains_file(path) {
        return Resolution::Skipped;
    }
    let listed = ctx.push_file(path.to_string());
    Resolution::Added {
        path: listed.path.clone(),
        seq: listed.seq,
    }
}

fn strip_mod_prefix(ctx: &ScanContext, fixed: &str) -> Option<String> {
    let dir = ctx.mod_dir.as_deref()?;
    let prefix = format!("{}/", dir.trim_end_matches('/'));
    if paths::starts_with_ignore_case(fixed, &prefix) {
        Some(fixed[prefix.len()..].to_string())
    } else {
        None
    }
}

/// Probe the texture on disk for an embedded base-texture reference.
///
/// Unreadable textures are not an error here; the missing file shows up at
/// packing time. When the direct path is absent, Revolution installations
/// get the same renamed-directory retry the packer uses.
fn read_base_texture(ctx: &ScanContext, listed: &str) -> Option<String> {
    let direct = ctx.root.join(listed);
    let data = match fs::read(&direct) {
        Ok(data) => data,
        Err(_) if ctx.flags.revolution => {
            fs::read(ctx.root.join(paths::collapse_mp_directory(listed))).ok()?
        }
        Err(_) => return None,
    };
    texture::base_texture_path(&data)
}
