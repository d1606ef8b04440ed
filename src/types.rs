use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IconTag { A, B }

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Icon {
    pub tag: IconTag,
    /// Asset path, relative to the asset root.
    pub image: &'static str,
}

pub const ICONS: [Icon; 2] = [
    Icon { tag: IconTag::A, image: "icons/0m.png" },
    Icon { tag: IconTag::B, image: "icons/1m.png" },
];

pub fn icon_for(tag: IconTag) -> Icon {
    match tag {
        IconTag::A => ICONS[0],
        IconTag::B => ICONS[1],
    }
}

/// Bottom row, left slot first.
pub type BottomPair = [Icon; 2];

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Side { Left, Right }

impl Side {
    pub fn slot(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RoundPhase {
    #[default]
    Idle,
    BottomHidden,
    BottomShown,
    TopShown,
    Resolved,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Resolution { Correct, Miss, TooLate }

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub resolution: Resolution,
    pub points: i32,
    /// Floored and clamped reaction time; `None` for a timeout.
    pub elapsed_ms: Option<u64>,
}

impl fmt::Display for IconTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IconTag::A => "A",
            IconTag::B => "B",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Side::Left => "LEFT",
            Side::Right => "RIGHT",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Resolution::Correct => "correct",
            Resolution::Miss => "missed",
            Resolution::TooLate => "too late",
        };
        write!(f, "{}", s)
    }
}
