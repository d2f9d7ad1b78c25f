//! Device models — identity and preset capacity per product ID.
//!
//! The preset count sizes the name list at the head of a load response.
//! Unknown product IDs get `None` from [`lookup_model`]; callers fall back
//! to the frame-count heuristic in [`crate::serializer::preset_frame_cap`].

use std::fmt;

use serde::Serialize;

use crate::protocol::{
    BIG_AMPS_PID, BIG_AMPS_V2_PID, FLOOR_PID, MINI_PID, SMALL_AMPS_PID, SMALL_AMPS_V2_PID,
};

/// Protocol generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    MustangV1,
    MustangV2,
    /// Reserved for the third generation; nothing in the table uses it yet.
    MustangV3,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::MustangV1 => "Mustang v1",
            Category::MustangV2 => "Mustang v2",
            Category::MustangV3 => "Mustang v3",
        };
        f.write_str(s)
    }
}

/// Identity of an attached amp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceModel {
    pub name: &'static str,
    pub category: Category,
    /// Stored presets; 0 when unknown.
    pub number_of_presets: usize,
}

impl DeviceModel {
    /// Name frames at the head of a load response (names are interleaved
    /// with a filler frame). `None` when the preset count is unknown.
    pub fn preset_frame_count(&self) -> Option<usize> {
        (self.number_of_presets > 0).then_some(self.number_of_presets * 2)
    }
}

static MUSTANG_I_II: DeviceModel = DeviceModel {
    name: "Mustang I/II",
    category: Category::MustangV1,
    number_of_presets: 24,
};

static MUSTANG_III_IV_V: DeviceModel = DeviceModel {
    name: "Mustang III/IV/V",
    category: Category::MustangV1,
    number_of_presets: 100,
};

static MUSTANG_MINI: DeviceModel = DeviceModel {
    name: "Mustang Mini",
    category: Category::MustangV1,
    number_of_presets: 24,
};

static MUSTANG_FLOOR: DeviceModel = DeviceModel {
    name: "Mustang Floor",
    category: Category::MustangV1,
    number_of_presets: 100,
};

static MUSTANG_I_II_V2: DeviceModel = DeviceModel {
    name: "Mustang I/II v2",
    category: Category::MustangV2,
    number_of_presets: 24,
};

static MUSTANG_III_IV_V_V2: DeviceModel = DeviceModel {
    name: "Mustang III/IV/V v2",
    category: Category::MustangV2,
    number_of_presets: 100,
};

/// Model for a Fender product ID in control mode.
pub fn lookup_model(pid: u16) -> Option<&'static DeviceModel> {
    match pid {
        SMALL_AMPS_PID => Some(&MUSTANG_I_II),
        BIG_AMPS_PID => Some(&MUSTANG_III_IV_V),
        MINI_PID => Some(&MUSTANG_MINI),
        FLOOR_PID => Some(&MUSTANG_FLOOR),
        SMALL_AMPS_V2_PID => Some(&MUSTANG_I_II_V2),
        BIG_AMPS_V2_PID => Some(&MUSTANG_III_IV_V_V2),
        _ => None,
    }
}

/// Product IDs with a model entry, in lookup order.
pub const KNOWN_PIDS: [u16; 6] = [
    SMALL_AMPS_PID,
    BIG_AMPS_PID,
    MINI_PID,
    FLOOR_PID,
    SMALL_AMPS_V2_PID,
    BIG_AMPS_V2_PID,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{BIG_PRESET_FRAMES, SMALL_PRESET_FRAMES, UPDATE_MODE_PIDS};

    #[test]
    fn every_known_pid_has_a_model() {
        for pid in KNOWN_PIDS {
            assert!(lookup_model(pid).is_some(), "PID 0x{pid:04x}");
        }
    }

    #[test]
    fn update_mode_pids_have_no_model() {
        for pid in UPDATE_MODE_PIDS {
            assert!(lookup_model(pid).is_none(), "PID 0x{pid:04x}");
        }
    }

    #[test]
    fn unknown_pid_returns_none() {
        assert!(lookup_model(0xbeef).is_none());
    }

    #[test]
    fn preset_counts() {
        assert_eq!(lookup_model(SMALL_AMPS_PID).unwrap().number_of_presets, 24);
        assert_eq!(lookup_model(BIG_AMPS_PID).unwrap().number_of_presets, 100);
        assert_eq!(lookup_model(MINI_PID).unwrap().number_of_presets, 24);
        assert_eq!(lookup_model(FLOOR_PID).unwrap().number_of_presets, 100);
    }

    #[test]
    fn v2_models_use_v2_category() {
        assert_eq!(
            lookup_model(SMALL_AMPS_V2_PID).unwrap().category,
            Category::MustangV2
        );
        assert_eq!(
            lookup_model(BIG_AMPS_V2_PID).unwrap().category,
            Category::MustangV2
        );
        assert_eq!(
            lookup_model(SMALL_AMPS_PID).unwrap().category,
            Category::MustangV1
        );
    }

    #[test]
    fn preset_frames_match_heuristic_sizes() {
        let small = lookup_model(SMALL_AMPS_PID).unwrap();
        let big = lookup_model(BIG_AMPS_PID).unwrap();
        assert_eq!(small.preset_frame_count(), Some(SMALL_PRESET_FRAMES));
        assert_eq!(big.preset_frame_count(), Some(BIG_PRESET_FRAMES));
    }

    #[test]
    fn unknown_preset_count_has_no_frame_count() {
        let model = DeviceModel {
            name: "test",
            category: Category::MustangV3,
            number_of_presets: 0,
        };
        assert_eq!(model.preset_frame_count(), None);
    }
}
