use crate::model::KeyLabel;

pub const PITCH_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// MIDI number of C1, the first key of the layout.
pub const KEY_LAYOUT_FIRST_PITCH: u8 = 24;

/// Keyboard layout from C1 through C#6, one key per semitone.
pub const KEY_LAYOUT: [char; 62] = [
    '1', '!', '2', '@', '3', '4', '$', '5', '%', '6', '^', '7', // C1
    '8', '*', '9', '(', '0', 'q', 'Q', 'w', 'W', 'e', 'E', 'r', // C2
    't', 'T', 'y', 'Y', 'u', 'i', 'I', 'o', 'O', 'p', 'P', 'a', // C3
    's', 'S', 'd', 'D', 'f', 'g', 'G', 'h', 'H', 'j', 'J', 'k', // C4
    'l', 'L', 'z', 'Z', 'x', 'c', 'C', 'v', 'V', 'b', 'B', 'n', // C5
    'm', 'M', // C6
];

/// Scientific pitch name with C4 = 60.
pub fn pitch_name(pitch: u8) -> String {
    let name = PITCH_NAMES[(pitch % 12) as usize];
    let octave = (pitch / 12) as i32 - 1;
    format!("{name}{octave}")
}

pub fn key_label(pitch: u8) -> KeyLabel {
    pitch
        .checked_sub(KEY_LAYOUT_FIRST_PITCH)
        .and_then(|idx| KEY_LAYOUT.get(idx as usize))
        .map(|c| KeyLabel::Key(*c))
        .unwrap_or(KeyLabel::Unmapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_c_is_c4() {
        assert_eq!(pitch_name(60), "C4");
        assert_eq!(pitch_name(0), "C-1");
        assert_eq!(pitch_name(127), "G9");
        assert_eq!(pitch_name(61), "C#4");
    }

    #[test]
    fn layout_edges() {
        assert_eq!(key_label(23), KeyLabel::Unmapped);
        assert_eq!(key_label(24), KeyLabel::Key('1'));
        assert_eq!(key_label(60), KeyLabel::Key('s'));
        assert_eq!(key_label(85), KeyLabel::Key('M'));
        assert_eq!(key_label(86), KeyLabel::Unmapped);
        assert_eq!(key_label(0), KeyLabel::Unmapped);
    }

    #[test]
    fn unmapped_renders_as_question_mark() {
        assert_eq!(KeyLabel::Unmapped.to_string(), "?");
        assert_eq!(key_label(61).to_string(), "S");
    }
}
