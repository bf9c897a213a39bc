//! Filename normalization for resource paths
//!
//! Every filename pulled out of a world dictionary or scanned file goes
//! through [`fix_filename`] before it touches the resolver. The remaining
//! helpers cover the alternate spellings Revolution introduced (renamed
//! multiplayer directories, underscores for spaces) and the extension
//! handling the resolver and packer lean on.

/// Directories that exist in both a shared and a Revolution-specific
/// variant. Each entry is the prefix to match and the offset of the "MP"
/// infix to remove.
const MP_DIRECTORIES: &[(&str, usize)] = &[
    ("modelsmp", 6),
    ("soundsmp", 6),
    ("musicmp", 5),
    ("datamp", 4),
    ("texturesmp", 8),
    ("animationsmp", 10),
];

/// Case-insensitive ASCII prefix check that never splits a char boundary.
pub fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Bring a raw dictionary filename into canonical form.
///
/// Backslashes become forward slashes, doubled separators collapse and a
/// single leading separator is stripped. Doubled and leading separators only
/// ever appear in Revolution worlds, so either one is reported back as an
/// alternate-layout hint instead of being flipped on some shared state.
/// Idempotent: fixing an already-fixed name changes nothing.
pub fn fix_filename(raw: &str) -> (String, bool) {
    let unified = raw.replace('\\', "/");

    let mut fixed = String::with_capacity(unified.len());
    let mut alternate = false;
    let mut prev_slash = false;

    for c in unified.chars() {
        if c == '/' && prev_slash {
            alternate = true;
            continue;
        }
        prev_slash = c == '/';
        fixed.push(c);
    }

    if let Some(stripped) = fixed.strip_prefix('/') {
        fixed = stripped.to_string();
        alternate = true;
    }

    (fixed, alternate)
}

/// Remove the "MP" infix from the renamed multiplayer directories.
///
/// No-op unless the path starts with one of the six known directory names.
/// Case of the remaining characters is preserved.
pub fn collapse_mp_directory(path: &str) -> String {
    for &(prefix, infix) in MP_DIRECTORIES {
        if starts_with_ignore_case(path, prefix) {
            let mut collapsed = String::with_capacity(path.len() - 2);
            collapsed.push_str(&path[..infix]);
            collapsed.push_str(&path[infix + 2..]);
            return collapsed;
        }
    }
    path.to_string()
}

/// Last-resort alias check for names that swapped spaces for underscores.
pub fn spaces_to_underscores(path: &str) -> String {
    path.replace(' ', "_")
}

/// The extension of the final path component, including the dot.
///
/// Empty when the component has no dot. Original case is preserved;
/// compare with [`has_ext`] when case must not matter.
pub fn file_ext(path: &str) -> &str {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(dot) => &path[name_start + dot..],
        None => "",
    }
}

/// Case-insensitive extension comparison; `ext` carries the leading dot.
pub fn has_ext(path: &str, ext: &str) -> bool {
    file_ext(path).eq_ignore_ascii_case(ext)
}

/// Everything before the extension, verbatim.
pub fn strip_ext(path: &str) -> &str {
    let ext_len = file_ext(path).len();
    &path[..path.len() - ext_len]
}

/// Swap the extension; `ext` carries the leading dot.
pub fn replace_ext(path: &str, ext: &str) -> String {
    format!("{}{}", strip_ext(path), ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_filename_backslashes() {
        let (fixed, alternate) = fix_filename("Models\\Enemies\\Walker.mdl");
        assert_eq!(fixed, "Models/Enemies/Walker.mdl");
        assert!(!alternate, "plain backslashes are not layout evidence");
    }

    #[test]
    fn test_fix_filename_doubled_separator() {
        let (fixed, alternate) = fix_filename("Textures//Wall.tex");
        assert_eq!(fixed, "Textures/Wall.tex");
        assert!(alternate);
    }

    #[test]
    fn test_fix_filename_doubled_backslashes() {
        let (fixed, alternate) = fix_filename("Textures\\\\Wall.tex");
        assert_eq!(fixed, "Textures/Wall.tex");
        assert!(alternate);
    }

    #[test]
    fn test_fix_filename_leading_separator() {
        let (fixed, alternate) = fix_filename("/Sounds/Boom.wav");
        assert_eq!(fixed, "Sounds/Boom.wav");
        assert!(alternate);
    }

    #[test]
    fn test_fix_filename_idempotent() {
        for raw in [
            "Models\\Enemies\\Walker.mdl",
            "//Textures//Stone  Wall.tex",
            "/Music/Theme.mp3",
            "already/fixed.tex",
            "",
        ] {
            let (once, _) = fix_filename(raw);
            let (twice, hint) = fix_filename(&once);
            assert_eq!(once, twice, "fix_filename must be idempotent for {raw:?}");
            assert!(!hint, "second pass must not re-report evidence for {raw:?}");
        }
    }

    #[test]
    fn test_collapse_mp_directories() {
        assert_eq!(
            collapse_mp_directory("ModelsMP/Player/Kamikaze.mdl"),
            "Models/Player/Kamikaze.mdl"
        );
        assert_eq!(
            collapse_mp_directory("texturesmp/Rock.tex"),
            "textures/Rock.tex"
        );
        assert_eq!(collapse_mp_directory("MusicMP/Boss.ogg"), "Music/Boss.ogg");
        assert_eq!(collapse_mp_directory("DataMP/Table.dat"), "Data/Table.dat");
        assert_eq!(
            collapse_mp_directory("AnimationsMP/Idle.ani"),
            "Animations/Idle.ani"
        );
        assert_eq!(
            collapse_mp_directory("SoundsMP/Shout.wav"),
            "Sounds/Shout.wav"
        );
    }

    #[test]
    fn test_collapse_mp_directory_no_match() {
        assert_eq!(
            collapse_mp_directory("Models/Player/Kamikaze.mdl"),
            "Models/Player/Kamikaze.mdl"
        );
        // only a prefix match counts
        assert_eq!(
            collapse_mp_directory("Extra/ModelsMP/Thing.mdl"),
            "Extra/ModelsMP/Thing.mdl"
        );
    }

    #[test]
    fn test_spaces_to_underscores() {
        assert_eq!(
            spaces_to_underscores("Textures/Stone Wall 01.tex"),
            "Textures/Stone_Wall_01.tex"
        );
    }

    #[test]
    fn test_file_ext() {
        assert_eq!(file_ext("Models/Walker.mdl"), ".mdl");
        assert_eq!(file_ext("Music/Theme.MP3"), ".MP3");
        assert_eq!(file_ext("NoExtension"), "");
        assert_eq!(file_ext("dir.v2/plain"), "");
        assert_eq!(file_ext("archive.tar.gz"), ".gz");
    }

    #[test]
    fn test_has_ext_case_insensitive() {
        assert!(has_ext("Music/Theme.MP3", ".mp3"));
        assert!(has_ext("Models/walker.MDL", ".mdl"));
        assert!(!has_ext("Models/walker.mdl", ".tex"));
    }

    #[test]
    fn test_strip_and_replace_ext() {
        assert_eq!(strip_ext("Levels/Valley.wld"), "Levels/Valley");
        assert_eq!(strip_ext("NoExtension"), "NoExtension");
        assert_eq!(
            replace_ext("Models/Walker.mdl", ".ini"),
            "Models/Walker.ini"
        );
        assert_eq!(replace_ext("Music/Theme.mp3", ".ogg"), "Music/Theme.ogg");
    }
}
