//! Tracked property categories

use serde::{Serialize, Serializer};
use std::fmt;

/// A property size/type tracked on the board.
///
/// The column label in the source sheet must match [`Category::label`]
/// exactly (surrounding whitespace is ignored).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Marla05,
    Marla08,
    Marla10,
    Kanal01,
    Kanal02,
    Commercial04,
    Commercial08,
}

impl Category {
    /// Number of tracked categories
    pub const COUNT: usize = 7;

    /// Every category, in display order
    pub const ALL: [Category; Self::COUNT] = [
        Category::Marla05,
        Category::Marla08,
        Category::Marla10,
        Category::Kanal01,
        Category::Kanal02,
        Category::Commercial04,
        Category::Commercial08,
    ];

    /// Categories charted when the user has not picked any
    pub const DEFAULT_CHART: [Category; 2] = [Category::Marla05, Category::Kanal01];

    /// Column label in the source sheet
    pub fn label(self) -> &'static str {
        match self {
            Category::Marla05 => "05 Marla",
            Category::Marla08 => "08 Marla",
            Category::Marla10 => "10 Marla",
            Category::Kanal01 => "01 Kanal",
            Category::Kanal02 => "02 Kanal",
            Category::Commercial04 => "04 Marla Commercial",
            Category::Commercial08 => "08 Marla Commercial",
        }
    }

    /// Look up a category by its column label
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Position in [`Category::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
