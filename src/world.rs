//! World file parsing
//!
//! A world file carries two resource dictionaries, one for brush surface
//! textures and one for entity resources. Neither sits at a fixed offset:
//! a position chunk found by forward scan points at the first, a second
//! position chunk directly after it points at the next. The preamble between
//! the header and the scan start doubles as edition evidence, since several
//! of its optional chunks only exist in Revolution worlds.

use std::fs;

use crate::context::ScanContext;
use crate::error::{PackError, Result};
use crate::paths;
use crate::resolver;
use crate::stream::Stream;

const BUILD_VERSION: &[u8; 4] = b"BUIV";
const WORLD: &[u8; 4] = b"WRLD";
const WORLD_INFO: &[u8; 4] = b"WLIF";
const TRANSLATION: &[u8; 4] = b"DTRS";
const LEADERBOARDS: &[u8; 4] = b"LDRB";
const LEVEL_MARKER: &[u8; 4] = b"Plv0";
const GAME_MODE: &[u8; 4] = b"SpGM";
const DICT_POSITION: &[u8; 4] = b"DPOS";
const DICT_START: &[u8; 4] = b"DICT";
const DICT_FILENAME: &[u8; 4] = b"DFNM";
const DICT_END: &[u8; 4] = b"DEND";

/// Check the fixed header that opens every world file.
pub fn verify_world_header(stream: &mut Stream<'_>, path: &str) -> Result<()> {
    if !stream.peek_tag(BUILD_VERSION) {
        return Err(PackError::NotAWorldFile {
            path: path.to_string(),
        });
    }
    stream.skip(4)?;
    let _build_version = stream.read_u32()?;
    if !stream.peek_tag(WORLD) {
        return Err(PackError::NotAWorldFile {
            path: path.to_string(),
        });
    }
    stream.skip(4)?;
    Ok(())
}

/// Scan one world's dictionaries, recording dependencies on the context.
///
/// `world` is the root-relative path with forward slashes. Any format
/// surprise aborts with an error; nothing recorded by earlier worlds is
/// rolled back.
pub fn scan_world(ctx: &mut ScanContext, world: &str) -> Result<()> {
    let full = ctx.root.join(world);
    let data = fs::read(&full).map_err(|e| PackError::FileReadFailed {
        path: full.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut stream = Stream::new(&data);
    verify_world_header(&mut stream, world)?;
    skip_world_info(&mut stream, ctx)?;

    add_conventional_sidecars(ctx, world);

    // the first dictionary position is found by forward scan, the second
    // sits directly after the first dictionary
    find_dictionary_position(&mut stream)?;
    let position = stream.read_u32()? as usize;
    stream.seek(position)?;
    stream.expect_tag(DICT_START)?;
    scan_dictionary(&mut stream, ctx)?;

    stream.expect_tag(DICT_POSITION)?;
    let position = stream.read_u32()? as usize;
    stream.seek(position)?;
    stream.expect_tag(DICT_START)?;
    scan_dictionary(&mut stream, ctx)?;

    Ok(())
}

/// Skip the framed info chunks between the header and the spawn data.
/// Leaderboards, the level marker block and the special game mode chunk only
/// exist in Revolution worlds; meeting any of them flips the flag for the
/// rest of the run.
fn skip_world_info(stream: &mut Stream<'_>, ctx: &mut ScanContext) -> Result<()> {
    stream.expect_tag(WORLD_INFO)?;

    if stream.peek_tag(TRANSLATION) {
        stream.skip(4)?;
    }

    if stream.peek_tag(LEADERBOARDS) {
        stream.skip(4)?;
        let _leaderboard = stream.read_string()?;
        ctx.flags.revolution = true;
    }

    if stream.peek_tag(LEVEL_MARKER) {
        stream.skip(16)?;
        ctx.flags.revolution = true;
    }

    let _world_name = stream.read_string()?;
    stream.skip(4)?; // spawn flags

    if stream.peek_tag(GAME_MODE) {
        stream.skip(4)?;
        ctx.flags.revolution = true;
    }

    let _description = stream.read_string()?;
    Ok(())
}

/// Thumbnail and visibility data are addressed by naming convention, not by
/// dictionary content; whichever exists next to the world gets packed.
fn add_conventional_sidecars(ctx: &mut ScanContext, world: &str) {
    let base = paths::strip_ext(world);

    let mut thumbnail = format!("{base}Tbn.tex");
    if !ctx.root.join(&thumbnail).is_file() {
        thumbnail = format!("{base}.tbn");
    }
    if ctx.root.join(&thumbnail).is_file() {
        resolver::add_direct(ctx, &thumbnail);
    }

    let visibility = format!("{base}.vis");
    if ctx.root.join(&visibility).is_file() {
        resolver::add_direct(ctx, &visibility);
    }
}

/// Advance byte-by-byte until a dictionary position chunk starts at the
/// cursor, then consume its tag.
fn find_dictionary_position(stream: &mut Stream<'_>) -> Result<()> {
    while !stream.at_end() {
        if stream.peek_tag(DICT_POSITION) {
            return stream.skip(4);
        }
        stream.skip(1)?;
    }
    Err(PackError::TruncatedRead {
        offset: stream.len(),
    })
}

/// One dictionary body: a count, then one filename record per entry. Empty
/// names are valid padding and are skipped outright.
fn scan_dictionary(stream: &mut Stream<'_>, ctx: &mut ScanContext) -> Result<()> {
    let count = stream.read_u32()?;

    for _ in 0..count {
        stream.expect_tag(DICT_FILENAME)?;
        let name = stream.read_string()?;
        if name.is_empty() {
            continue;
        }
        resolver::resolve(ctx, &name);
    }

    stream.expect_tag(DICT_END)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn push_str(v: &mut Vec<u8>, s: &str) {
        v.extend_from_slice(&(s.len() as u32).to_le_bytes());
        v.extend_from_slice(s.as_bytes());
    }

    struct WorldBuilder {
        first: Vec<&'static str>,
        second: Vec<&'static str>,
        translation: bool,
        leaderboards: bool,
        level_marker: bool,
        game_mode: bool,
    }

    impl WorldBuilder {
        fn new(first: Vec<&'static str>, second: Vec<&'static str>) -> Self {
            Self {
                first,
                second,
                translation: false,
                leaderboards: false,
                level_marker: false,
                game_mode: false,
            }
        }

        fn build(&self) -> Vec<u8> {
            let (first, second) = (&self.first, &self.second);
            let mut v = Vec::new();
            v.extend_from_slice(b"BUIV");
            v.extend_from_slice(&10000u32.to_le_bytes());
            v.extend_from_slice(b"WRLD");
            v.extend_from_slice(b"WLIF");
            if self.translation {
                v.extend_from_slice(b"DTRS");
            }
            if self.leaderboards {
                v.extend_from_slice(b"LDRB");
                push_str(&mut v, "boards");
            }
            if self.level_marker {
                v.extend_from_slice(b"Plv0");
                v.extend_from_slice(&[0u8; 12]);
            }
            push_str(&mut v, "Test Level");
            v.extend_from_slice(&0u32.to_le_bytes()); // spawn flags
            if self.game_mode {
                v.extend_from_slice(b"SpGM");
            }
            push_str(&mut v, "a description");

            // entity data the position scan has to step over
            v.extend_from_slice(b"lots of opaque sector bytes");

            v.extend_from_slice(b"DPOS");
            let first_slot = v.len();
            v.extend_from_slice(&0u32.to_le_bytes());

            let first_dict = v.len() as u32;
            v.extend_from_slice(b"DICT");
            v.extend_from_slice(&(first.len() as u32).to_le_bytes());
            for name in first {
                v.extend_from_slice(b"DFNM");
                push_str(&mut v, name);
            }
            v.extend_from_slice(b"DEND");

            v.extend_from_slice(b"DPOS");
            let second_slot = v.len();
            v.extend_from_slice(&0u32.to_le_bytes());

            let second_dict = v.len() as u32;
            v.extend_from_slice(b"DICT");
            v.extend_from_slice(&(second.len() as u32).to_le_bytes());
            for name in second {
                v.extend_from_slice(b"DFNM");
                push_str(&mut v, name);
            }
            v.extend_from_slice(b"DEND");

            v[first_slot..first_slot + 4].copy_from_slice(&first_dict.to_le_bytes());
            v[second_slot..second_slot + 4].copy_from_slice(&second_dict.to_le_bytes());
            v
        }
    }

    fn scan_fixture(builder: &WorldBuilder) -> ScanContext {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("Levels")).unwrap();
        std::fs::write(temp.path().join("Levels/Test.wld"), builder.build()).unwrap();

        let mut ctx = ScanContext::new(temp.path().to_path_buf());
        ctx.set_counting(true);
        scan_world(&mut ctx, "Levels/Test.wld").unwrap();
        ctx
    }

    #[test]
    fn test_scan_world_collects_both_dictionaries() {
        let ctx = scan_fixture(&WorldBuilder::new(
            vec!["Textures\\Wall.tex", "Textures\\Floor.tex"],
            vec!["Models\\Walker.mdl", "Sounds\\Boom.wav"],
        ));
        let recorded: Vec<&str> = ctx.files().iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            recorded,
            vec![
                "Textures/Wall.tex",
                "Textures/Floor.tex",
                "Models/Walker.mdl",
                "Sounds/Boom.wav",
            ]
        );
        assert_eq!(ctx.files()[3].seq, Some(4));
    }

    #[test]
    fn test_empty_entries_skipped() {
        let ctx = scan_fixture(&WorldBuilder::new(
            vec!["Textures\\Wall.tex", ""],
            vec![],
        ));
        assert_eq!(ctx.files().len(), 1);
        assert_eq!(ctx.files()[0].seq, Some(1));
    }

    #[test]
    fn test_revolution_chunks_flip_flag() {
        let mut builder = WorldBuilder::new(vec![], vec![]);
        builder.leaderboards = true;
        builder.game_mode = true;
        let ctx = scan_fixture(&builder);
        assert!(ctx.flags.revolution);
    }

    #[test]
    fn test_level_marker_block_flips_flag() {
        let mut builder = WorldBuilder::new(vec!["Textures\\Wall.tex"], vec![]);
        builder.level_marker = true;
        let ctx = scan_fixture(&builder);
        assert!(ctx.flags.revolution);
        assert_eq!(ctx.files().len(), 1);
    }

    #[test]
    fn test_translation_chunk_is_skipped_without_flag() {
        let mut builder = WorldBuilder::new(vec!["Textures\\Wall.tex"], vec![]);
        builder.translation = true;
        let ctx = scan_fixture(&builder);
        assert!(!ctx.flags.revolution);
        assert_eq!(ctx.files().len(), 1);
    }

    #[test]
    fn test_plain_world_does_not_flip_flag() {
        let ctx = scan_fixture(&WorldBuilder::new(vec!["Textures\\Wall.tex"], vec![]));
        assert!(!ctx.flags.revolution);
    }

    #[test]
    fn test_bad_header_is_fatal() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("nope.wld"), b"not a world at all").unwrap();
        let mut ctx = ScanContext::new(temp.path().to_path_buf());
        assert!(matches!(
            scan_world(&mut ctx, "nope.wld"),
            Err(PackError::NotAWorldFile { .. })
        ));
    }

    #[test]
    fn test_missing_world_is_fatal() {
        let mut ctx = ScanContext::new(PathBuf::from("/nonexistent"));
        assert!(matches!(
            scan_world(&mut ctx, "Levels/Gone.wld"),
            Err(PackError::FileReadFailed { .. })
        ));
    }

    #[test]
    fn test_corrupt_dictionary_is_fatal() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut bytes = WorldBuilder::new(vec!["Textures\\Wall.tex"], vec![]).build();
        // clobber the first DEND so the dictionary never terminates
        let at = bytes
            .windows(4)
            .position(|w| w == b"DEND")
            .unwrap();
        bytes[at..at + 4].copy_from_slice(b"XXXX");
        std::fs::write(temp.path().join("broken.wld"), bytes).unwrap();

        let mut ctx = ScanContext::new(temp.path().to_path_buf());
        assert!(matches!(
            scan_world(&mut ctx, "broken.wld"),
            Err(PackError::UnexpectedChunk { .. })
        ));
    }

    #[test]
    fn test_conventional_sidecars_added_when_present() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("Levels")).unwrap();
        let builder = WorldBuilder::new(vec!["Textures\\Wall.tex"], vec![]);
        std::fs::write(temp.path().join("Levels/Test.wld"), builder.build()).unwrap();
        std::fs::write(temp.path().join("Levels/TestTbn.tex"), b"thumb").unwrap();
        std::fs::write(temp.path().join("Levels/Test.vis"), b"vis").unwrap();

        let mut ctx = ScanContext::new(temp.path().to_path_buf());
        ctx.set_counting(true);
        scan_world(&mut ctx, "Levels/Test.wld").unwrap();

        let recorded: Vec<&str> = ctx.files().iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            recorded,
            vec![
                "Levels/TestTbn.tex",
                "Levels/Test.vis",
                "Textures/Wall.tex",
            ]
        );
    }

    #[test]
    fn test_tbn_fallback_when_no_thumbnail_texture() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("Levels")).unwrap();
        let builder = WorldBuilder::new(vec![], vec![]);
        std::fs::write(temp.path().join("Levels/Test.wld"), builder.build()).unwrap();
        std::fs::write(temp.path().join("Levels/Test.tbn"), b"thumb").unwrap();

        let mut ctx = ScanContext::new(temp.path().to_path_buf());
        ctx.set_counting(true);
        scan_world(&mut ctx, "Levels/Test.wld").unwrap();

        assert_eq!(ctx.files()[0].path, "Levels/Test.tbn");
    }
}
