//! Duration codes (`4n`, `8n.`, ...) and their ABC lengths and real-time lengths.

/// Default playback tempo in quarter-note beats per minute
pub const DEFAULT_TEMPO: u32 = 120;

/// Note duration codes recognized in melody files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationCode {
    Whole,           // 1n
    Half,            // 2n
    DottedHalf,      // 2n.
    Quarter,         // 4n
    DottedQuarter,   // 4n.
    Eighth,          // 8n
    DottedEighth,    // 8n.
    Sixteenth,       // 16n
    DottedSixteenth, // 16n.
}

impl DurationCode {
    pub const ALL: [DurationCode; 9] = [
        DurationCode::Whole,
        DurationCode::Half,
        DurationCode::DottedHalf,
        DurationCode::Quarter,
        DurationCode::DottedQuarter,
        DurationCode::Eighth,
        DurationCode::DottedEighth,
        DurationCode::Sixteenth,
        DurationCode::DottedSixteenth,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1n" => Some(DurationCode::Whole),
            "2n" => Some(DurationCode::Half),
            "2n." => Some(DurationCode::DottedHalf),
            "4n" => Some(DurationCode::Quarter),
            "4n." => Some(DurationCode::DottedQuarter),
            "8n" => Some(DurationCode::Eighth),
            "8n." => Some(DurationCode::DottedEighth),
            "16n" => Some(DurationCode::Sixteenth),
            "16n." => Some(DurationCode::DottedSixteenth),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            DurationCode::Whole => "1n",
            DurationCode::Half => "2n",
            DurationCode::DottedHalf => "2n.",
            DurationCode::Quarter => "4n",
            DurationCode::DottedQuarter => "4n.",
            DurationCode::Eighth => "8n",
            DurationCode::DottedEighth => "8n.",
            DurationCode::Sixteenth => "16n",
            DurationCode::DottedSixteenth => "16n.",
        }
    }

    /// Length relative to a quarter note, as (numerator, denominator)
    pub fn quarters(&self) -> (u32, u32) {
        match self {
            DurationCode::Whole => (4, 1),
            DurationCode::Half => (2, 1),
            DurationCode::DottedHalf => (3, 1),
            DurationCode::Quarter => (1, 1),
            DurationCode::DottedQuarter => (3, 2),
            DurationCode::Eighth => (1, 2),
            DurationCode::DottedEighth => (3, 4),
            DurationCode::Sixteenth => (1, 4),
            DurationCode::DottedSixteenth => (3, 8),
        }
    }

    /// ABC length suffix under `L:1/4`. The quarter note needs no suffix.
    pub fn abc_length(&self) -> &'static str {
        match self {
            DurationCode::Whole => "4",
            DurationCode::Half => "2",
            DurationCode::DottedHalf => "3",
            DurationCode::Quarter => "",
            DurationCode::DottedQuarter => "3/2",
            DurationCode::Eighth => "/2",
            DurationCode::DottedEighth => "3/4",
            DurationCode::Sixteenth => "/4",
            DurationCode::DottedSixteenth => "3/8",
        }
    }

    /// Real-time length in milliseconds at `tempo` quarter notes per minute.
    ///
    /// ```
    /// use pianola::duration::DurationCode;
    ///
    /// assert_eq!(DurationCode::Quarter.millis(120), 500);
    /// assert_eq!(DurationCode::DottedEighth.millis(120), 375);
    /// ```
    pub fn millis(&self, tempo: u32) -> u64 {
        let tempo = u64::from(tempo.max(1));
        let (num, den) = self.quarters();
        60_000 * u64::from(num) / (tempo * u64::from(den))
    }
}

/// ABC length suffix for a duration code; unknown codes give `""` (quarter).
pub fn to_notation_duration(code: &str) -> &'static str {
    DurationCode::from_code(code).map_or("", |d| d.abc_length())
}

/// Milliseconds for a duration code at `tempo`; unknown codes play as a quarter.
pub fn duration_millis(code: &str, tempo: u32) -> u64 {
    DurationCode::from_code(code)
        .unwrap_or(DurationCode::Quarter)
        .millis(tempo)
}
