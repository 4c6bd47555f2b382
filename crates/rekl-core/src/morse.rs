//! International Morse code table and PARIS timing.

use std::time::Duration;

use crate::engine::Alphabet;

/// Milliseconds per unit at 1 WPM (PARIS standard: 50 units per word).
const PARIS_MS_PER_WPM: u64 = 1200;

/// Units a dit is keyed.
pub const DIT_UNITS: u32 = 1;
/// Units a dah is keyed.
pub const DAH_UNITS: u32 = 3;
/// Gap between elements of the same character.
pub const ELEMENT_GAP_UNITS: u32 = 1;
/// Gap between characters of the same word.
pub const CHAR_GAP_UNITS: u32 = 3;
/// Gap between words.
pub const WORD_GAP_UNITS: u32 = 7;

/// Returns the dot/dash pattern for a character, or `None` if it can't be keyed.
///
/// Lowercase letters map to their uppercase code. The space is keyable but has
/// no pattern; callers treat it as a word gap.
pub fn code_for(c: char) -> Option<&'static str> {
    let code = match c.to_ascii_uppercase() {
        'A' => ".-",
        'B' => "-...",
        'C' => "-.-.",
        'D' => "-..",
        'E' => ".",
        'F' => "..-.",
        'G' => "--.",
        'H' => "....",
        'I' => "..",
        'J' => ".---",
        'K' => "-.-",
        'L' => ".-..",
        'M' => "--",
        'N' => "-.",
        'O' => "---",
        'P' => ".--.",
        'Q' => "--.-",
        'R' => ".-.",
        'S' => "...",
        'T' => "-",
        'U' => "..-",
        'V' => "...-",
        'W' => ".--",
        'X' => "-..-",
        'Y' => "-.--",
        'Z' => "--..",
        '0' => "-----",
        '1' => ".----",
        '2' => "..---",
        '3' => "...--",
        '4' => "....-",
        '5' => ".....",
        '6' => "-....",
        '7' => "--...",
        '8' => "---..",
        '9' => "----.",
        '.' => ".-.-.-",
        ',' => "--..--",
        '?' => "..--..",
        '/' => "-..-.",
        '=' => "-...-",
        '+' => ".-.-.",
        '-' => "-....-",
        '\'' => ".----.",
        '"' => ".-..-.",
        '(' => "-.--.",
        ')' => "-.--.-",
        ':' => "---...",
        ';' => "-.-.-.",
        _ => return None,
    };
    Some(code)
}

/// Returns true if the character can be sent.
pub fn is_keyable(c: char) -> bool {
    c == ' ' || code_for(c).is_some()
}

/// Returns the first character in `text` that can't be sent.
pub fn first_unkeyable(alphabet: &dyn Alphabet, text: &str) -> Option<char> {
    text.chars().find(|&c| !alphabet.is_keyable(c))
}

/// Duration of one timing unit at the given speed.
///
/// Speeds below 1 WPM are treated as 1 WPM.
pub fn unit_duration(wpm: i32) -> Duration {
    let wpm = u64::try_from(wpm.max(1)).unwrap_or(1);
    Duration::from_millis(PARIS_MS_PER_WPM / wpm)
}

/// The standard Morse alphabet.
#[derive(Debug, Clone, Copy, Default)]
pub struct MorseAlphabet;

impl Alphabet for MorseAlphabet {
    fn is_keyable(&self, c: char) -> bool {
        is_keyable(c)
    }
}
