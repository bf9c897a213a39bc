//! Base-game detection
//!
//! Each supported game ships a characteristic set of .gro archives in its
//! root. Finding one of the probe files pins down the edition, which tells
//! us both which archives hold the standard dependencies and which variant
//! behaviors apply when the scan was started from a bare world path.

use std::path::Path;

/// One detectable game edition.
pub struct GameProfile {
    pub name: &'static str,
    /// Files that must all exist in the root for this profile to match.
    probe: &'static [&'static str],
    /// Archives whose contents count as standard dependencies.
    pub archives: &'static [&'static str],
    /// Worlds from this edition use the Revolution layout.
    pub revolution: bool,
    /// This edition ships .ogg music where others reference .mp3.
    pub ogg_fallback: bool,
}

/// Detection order matters: an engine 1.10 install also contains the older
/// archives, so the most specific probes come first.
pub const GAME_PROFILES: &[GameProfile] = &[
    GameProfile {
        name: "Serious Engine 1.10",
        probe: &["SE1_10.gro"],
        archives: &["SE1_10.gro"],
        revolution: false,
        ogg_fallback: false,
    },
    GameProfile {
        name: "The Second Encounter",
        probe: &["SE1_00.gro"],
        archives: &[
            "SE1_00.gro",
            "SE1_00_Extra.gro",
            "SE1_00_ExtraTools.gro",
            "SE1_00_Music.gro",
            "1_04_patch.gro",
            "1_07_tools.gro",
        ],
        revolution: false,
        ogg_fallback: false,
    },
    GameProfile {
        name: "Revolution",
        probe: &["All_01.gro", "All_02.gro"],
        archives: &["All_01.gro", "All_02.gro"],
        revolution: true,
        ogg_fallback: false,
    },
    GameProfile {
        name: "The First Encounter",
        probe: &["1_00c.gro"],
        archives: &[
            "1_00_ExtraTools.gro",
            "1_00_music.gro",
            "1_00c.gro",
            "1_00c_scripts.gro",
            "1_04_patch.gro",
        ],
        revolution: false,
        ogg_fallback: true,
    },
];

/// Probe the root for a known base-archive set.
pub fn detect_game(root: &Path) -> Option<&'static GameProfile> {
    GAME_PROFILES
        .iter()
        .find(|profile| profile.probe.iter().all(|gro| root.join(gro).is_file()))
}
