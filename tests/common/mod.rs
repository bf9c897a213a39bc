//! Common test utilities for gropack integration tests

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// A synthetic game installation for integration tests
#[allow(dead_code)]
pub struct GameDir {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to the game root
    pub root: PathBuf,
}

#[allow(dead_code)]
impl GameDir {
    /// Create an empty game root
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { temp, root }
    }

    /// Absolute path of a root-relative file
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write a file under the root, creating parent directories
    pub fn write_file(&self, relative: &str, contents: &[u8]) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, contents).expect("Failed to write file");
    }

    /// Write a synthetic world file with two resource dictionaries
    pub fn write_world(&self, relative: &str, surfaces: &[&str], resources: &[&str]) {
        self.write_file(relative, &world_bytes(surfaces, resources));
    }

    /// Write a .gro archive holding the given entry names
    pub fn write_gro(&self, relative: &str, entries: &[&str]) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        let file = File::create(&path).expect("Failed to create archive");
        let mut writer = ZipWriter::new(file);
        for entry in entries {
            writer
                .start_file(*entry, SimpleFileOptions::default())
                .expect("Failed to start archive entry");
            writer
                .write_all(b"resource bytes")
                .expect("Failed to write archive entry");
        }
        writer.finish().expect("Failed to finish archive");
    }
}

fn push_str(v: &mut Vec<u8>, s: &str) {
    v.extend_from_slice(&(s.len() as u32).to_le_bytes());
    v.extend_from_slice(s.as_bytes());
}

/// Bytes of a minimal valid world file with the given dictionary entries
#[allow(dead_code)]
pub fn world_bytes(surfaces: &[&str], resources: &[&str]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(b"BUIV");
    v.extend_from_slice(&10000u32.to_le_bytes());
    v.extend_from_slice(b"WRLD");
    v.extend_from_slice(b"WLIF");
    push_str(&mut v, "Test Level");
    v.extend_from_slice(&0u32.to_le_bytes()); // spawn flags
    push_str(&mut v, "a description");

    // sector data the dictionary position scan steps over
    v.extend_from_slice(b"opaque sector bytes the scanner skips");

    v.extend_from_slice(b"DPOS");
    let first_slot = v.len();
    v.extend_from_slice(&0u32.to_le_bytes());

    let first_dict = v.len() as u32;
    write_dictionary(&mut v, surfaces);

    v.extend_from_slice(b"DPOS");
    let second_slot = v.len();
    v.extend_from_slice(&0u32.to_le_bytes());

    let second_dict = v.len() as u32;
    write_dictionary(&mut v, resources);

    v[first_slot..first_slot + 4].copy_from_slice(&first_dict.to_le_bytes());
    v[second_slot..second_slot + 4].copy_from_slice(&second_dict.to_le_bytes());
    v
}

fn write_dictionary(v: &mut Vec<u8>, entries: &[&str]) {
    v.extend_from_slice(b"DICT");
    v.extend_from_slice(&(entries.len() as u32).to_le_bytes());
    for entry in entries {
        v.extend_from_slice(b"DFNM");
        push_str(v, entry);
    }
    v.extend_from_slice(b"DEND");
}

/// Bytes of an effect texture whose tail references a base texture
#[allow(dead_code)]
pub fn fx_texture_bytes(base_texture: &str) -> Vec<u8> {
    let mut v = vec![0xAB; 36];
    v.extend_from_slice(b"FXDT");
    v.extend_from_slice(&[0x77; 30]);
    v.push(0);
    v.extend_from_slice(base_texture.as_bytes());
    v
}
