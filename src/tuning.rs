use crate::error::TabError;

/// Number of strings on the instrument
pub const STRING_COUNT: usize = 6;

/// Open-string pitches of a six-string guitar.
///
/// `open_pitches[0]` is string 1 (highest), `open_pitches[5]` is string 6 (lowest).
/// Pitches strictly decrease as the string number increases.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    name: String,
    open_pitches: [i32; STRING_COUNT],
}

impl Default for Tuning {
    fn default() -> Self {
        Self::standard()
    }
}

impl Tuning {
    /// E A D G B E: MIDI 40 45 50 55 59 64
    pub fn standard() -> Self {
        Self {
            name: "E_standard".to_string(),
            open_pitches: [64, 59, 55, 50, 45, 40],
        }
    }

    /// Standard with the low E dropped a whole step to D
    pub fn drop_d() -> Self {
        Self {
            name: "Drop_D".to_string(),
            open_pitches: [64, 59, 55, 50, 45, 38],
        }
    }

    /// Every string a half step down
    pub fn eb_standard() -> Self {
        Self {
            name: "Eb_standard".to_string(),
            open_pitches: [63, 58, 54, 49, 44, 39],
        }
    }

    /// Every string a whole step down
    pub fn d_standard() -> Self {
        Self {
            name: "D_standard".to_string(),
            open_pitches: [62, 57, 53, 48, 43, 38],
        }
    }

    /// Look up a preset by name.
    /// Accepts the canonical names ("E_standard", "Drop_D", ...) and a few common aliases.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim() {
            "E_standard" | "standard" | "E" => Some(Self::standard()),
            "Drop_D" | "drop_d" | "DropD" => Some(Self::drop_d()),
            "Eb_standard" | "Eb" | "D#_standard" => Some(Self::eb_standard()),
            "D_standard" | "D" => Some(Self::d_standard()),
            _ => None,
        }
    }

    /// Build a custom tuning from open pitches listed string 1 first.
    pub fn from_pitches(name: &str, pitches: &[i32]) -> Result<Self, TabError> {
        if pitches.len() != STRING_COUNT {
            return Err(TabError::ConfigError(format!(
                "Tuning '{}' must list {} open-string pitches, got {}",
                name,
                STRING_COUNT,
                pitches.len()
            )));
        }

        if let Some(w) = pitches.windows(2).find(|w| w[1] >= w[0]) {
            return Err(TabError::ConfigError(format!(
                "Tuning '{}' must descend from string 1 to string 6 ({} is followed by {})",
                name, w[0], w[1]
            )));
        }

        if let Some(p) = pitches.iter().find(|p| !(0..=127).contains(*p)) {
            return Err(TabError::ConfigError(format!(
                "Tuning '{}' has an open pitch outside MIDI range: {}",
                name, p
            )));
        }

        let mut open_pitches = [0; STRING_COUNT];
        open_pitches.copy_from_slice(pitches);
        Ok(Self {
            name: name.to_string(),
            open_pitches,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Open pitch of `string` (1-6)
    pub fn open_pitch(&self, string: u8) -> Option<i32> {
        let index = (string as usize).checked_sub(1)?;
        self.open_pitches.get(index).copied()
    }

    /// Sounding pitch of a fretted position
    pub fn pitch_at(&self, string: u8, fret: u8) -> Option<i32> {
        self.open_pitch(string).map(|open| open + fret as i32)
    }

    /// `(string, open_pitch)` pairs from string 6 down to string 1.
    ///
    /// This is the fixed enumeration order the fingering optimizer relies on.
    pub fn strings_low_to_high(&self) -> impl Iterator<Item = (u8, i32)> + '_ {
        (1..=STRING_COUNT as u8)
            .rev()
            .map(move |s| (s, self.open_pitches[s as usize - 1]))
    }
}
