//! Run state: variant flags, the known-dependency set and the output list
//!
//! One [`ScanContext`] exists per run and is threaded explicitly through
//! parsing and resolution; nothing here is ambient. The known set answers
//! "is this resource already shipped with the game", the file list is the
//! ordered packing output.

use std::collections::HashSet;
use std::path::PathBuf;

/// Fixed-width identity of a normalized path's comparison key.
///
/// Hash equality is treated as path identity; keys are only required to be
/// stable within a single run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DependencyKey([u8; 32]);

impl DependencyKey {
    /// Key for a lowercase comparison string.
    pub fn of(comparison_key: &str) -> Self {
        Self(*blake3::hash(comparison_key.as_bytes()).as_bytes())
    }
}

/// Resources already satisfied by the base installation or by explicit
/// exclusions. Populated before scanning begins; only grows.
#[derive(Default)]
pub struct KnownSet {
    keys: HashSet<DependencyKey>,
}

impl KnownSet {
    pub fn contains(&self, comparison_key: &str) -> bool {
        self.keys.contains(&DependencyKey::of(comparison_key))
    }

    /// Returns true when the key was not present before.
    pub fn insert(&mut self, comparison_key: &str) -> bool {
        self.keys.insert(DependencyKey::of(comparison_key))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Independent behavior toggles, set from the command line or inferred from
/// world content while parsing.
#[derive(Clone, Copy, Debug, Default)]
pub struct VariantFlags {
    /// The world comes from Revolution: renamed multiplayer directories,
    /// extra preamble chunks, underscore spellings.
    pub revolution: bool,
    /// Record .ini configs alongside their .mdl models.
    pub model_configs: bool,
    /// Treat an .ogg as satisfying a reference to a missing .mp3.
    pub ogg_fallback: bool,
    /// Erase the mod directory prefix from recorded paths.
    pub strip_mod_dir: bool,
}

/// One entry of the packing output: the original-case relative path and the
/// sequence number it was discovered at. Setup-time entries (the worlds
/// themselves) carry no number.
#[derive(Clone, Debug)]
pub struct ListedFile {
    pub path: String,
    pub seq: Option<u32>,
}

/// The mutable state of one scanning run.
pub struct ScanContext {
    pub root: PathBuf,
    pub mod_dir: Option<String>,
    pub flags: VariantFlags,
    pub known: KnownSet,
    files: Vec<ListedFile>,
    counting: bool,
    next_seq: u32,
}

impl ScanContext {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            mod_dir: None,
            flags: VariantFlags::default(),
            known: KnownSet::default(),
            files: Vec::new(),
            counting: false,
            next_seq: 1,
        }
    }

    /// The ordered packing output.
    pub fn files(&self) -> &[ListedFile] {
        &self.files
    }

    /// Sequence numbers are only handed out while counting is active, so
    /// setup-time additions stay unnumbered.
    pub fn set_counting(&mut self, counting: bool) {
        self.counting = counting;
    }

    /// Case-insensitive membership test against the recorded paths.
    pub fn contains_file(&self, path: &str) -> bool {
        self.files.iter().any(|f| f.path.eq_ignore_ascii_case(path))
    }

    /// Append a file the resolver accepted. Callers guarantee the path is
    /// not already listed.
    pub(crate) fn push_file(&mut self, path: String) -> &ListedFile {
        let seq = if self.counting {
            let seq = self.next_seq;
            self.next_seq += 1;
            Some(seq)
        } else {
            None
        };
        self.files.push(ListedFile { path, seq });
        // just pushed, the list is non-empty
        &self.files[self.files.len() - 1]
    }
}
