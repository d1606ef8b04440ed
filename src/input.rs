use crate::types::Side;

pub const RIGHT_KEY: char = '0';
pub const LEFT_KEY: char = '1';

/// Which bottom slot a key press claims the top icon matches.
/// Anything other than the two answer keys claims nothing.
pub fn claimed_side(key: char) -> Option<Side> {
    match key {
        RIGHT_KEY => Some(Side::Right),
        LEFT_KEY => Some(Side::Left),
        _ => None,
    }
}

#[cfg(feature = "bevy")]
pub use keyboard::answer_key;

#[cfg(feature = "bevy")]
mod keyboard {
    use bevy::prelude::KeyCode;

    use super::{LEFT_KEY, RIGHT_KEY};

    /// Top-row digits and the numpad both count.
    pub fn answer_key(code: KeyCode) -> Option<char> {
        match code {
            KeyCode::Digit0 | KeyCode::Numpad0 => Some(RIGHT_KEY),
            KeyCode::Digit1 | KeyCode::Numpad1 => Some(LEFT_KEY),
            _ => None,
        }
    }
}
