use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// One of the five gem colors. Gold is not a color, see [`Tokens::gold`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Color {
    White,
    Blue,
    Green,
    Red,
    Black,
}

pub const COLORS: [Color; 5] = [
    Color::White,
    Color::Blue,
    Color::Green,
    Color::Red,
    Color::Black,
];

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Color::White => "white",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Red => "red",
            Color::Black => "black",
        };
        write!(f, "{}", name)
    }
}

/// A count per gem color.
///
/// Used for card costs, noble requirements and player bonuses. Missing colors
/// deserialize as zero, so `{"red": 4, "green": 4}` is a valid value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Gems {
    pub white: u8,
    pub blue: u8,
    pub green: u8,
    pub red: u8,
    pub black: u8,
}

impl Gems {
    pub fn new() -> Self {
        Self::default()
    }

    /// The same count for every color.
    pub fn splat(count: u8) -> Self {
        Self {
            white: count,
            blue: count,
            green: count,
            red: count,
            black: count,
        }
    }

    /// Builds a value from `(color, count)` pairs. Later pairs overwrite earlier ones.
    pub fn from_pairs<I: IntoIterator<Item = (Color, u8)>>(pairs: I) -> Self {
        let mut gems = Self::new();
        for (color, count) in pairs {
            gems[color] = count;
        }
        gems
    }

    pub fn total(&self) -> u32 {
        COLORS.iter().map(|&c| u32::from(self[c])).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Color, u8)> + '_ {
        COLORS.iter().map(move |&c| (c, self[c]))
    }

    /// True if every color is at least the one in `other`.
    pub fn dominates(&self, other: &Gems) -> bool {
        COLORS.iter().all(|&c| self[c] >= other[c])
    }
}

impl Index<Color> for Gems {
    type Output = u8;

    fn index(&self, color: Color) -> &u8 {
        match color {
            Color::White => &self.white,
            Color::Blue => &self.blue,
            Color::Green => &self.green,
            Color::Red => &self.red,
            Color::Black => &self.black,
        }
    }
}

impl IndexMut<Color> for Gems {
    fn index_mut(&mut self, color: Color) -> &mut u8 {
        match color {
            Color::White => &mut self.white,
            Color::Blue => &mut self.blue,
            Color::Green => &mut self.green,
            Color::Red => &mut self.red,
            Color::Black => &mut self.black,
        }
    }
}

/// A resource pool: gems plus gold.
///
/// The bank and every player each own one. Serialized flat, e.g.
/// `{"white": 1, "blue": 0, ..., "gold": 2}`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tokens {
    #[serde(flatten)]
    pub gems: Gems,
    #[serde(default)]
    pub gold: u8,
}

impl Tokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_gems(gems: Gems) -> Self {
        Self { gems, gold: 0 }
    }

    /// All tokens, gold included.
    pub fn total(&self) -> u32 {
        self.gems.total() + u32::from(self.gold)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Adds `other` to `self`, component-wise.
    pub fn deposit(&mut self, other: &Tokens) {
        for color in COLORS {
            self.gems[color] += other.gems[color];
        }
        self.gold += other.gold;
    }

    /// Subtracts `other` from `self`, component-wise.
    ///
    /// Returns `false` and leaves `self` untouched if any component would go negative.
    #[must_use]
    pub fn withdraw(&mut self, other: &Tokens) -> bool {
        let fits = self.gems.dominates(&other.gems) && self.gold >= other.gold;
        if fits {
            for color in COLORS {
                self.gems[color] -= other.gems[color];
            }
            self.gold -= other.gold;
        }
        fits
    }

    /// Expands the pool into one entry per token, gold as `None`.
    pub fn flatten(&self) -> Vec<Option<Color>> {
        let mut flat = Vec::with_capacity(self.total() as usize);
        for (color, count) in self.gems.iter() {
            flat.extend(std::iter::repeat(Some(color)).take(count as usize));
        }
        flat.extend(std::iter::repeat(None).take(self.gold as usize));
        flat
    }

    /// Inverse of [`Self::flatten()`].
    pub fn from_flat<'a, I: IntoIterator<Item = &'a Option<Color>>>(flat: I) -> Self {
        let mut tokens = Self::new();
        for token in flat {
            match token {
                Some(color) => tokens.gems[*color] += 1,
                None => tokens.gold += 1,
            }
        }
        tokens
    }
}

impl Index<Color> for Tokens {
    type Output = u8;

    fn index(&self, color: Color) -> &u8 {
        &self.gems[color]
    }
}

impl IndexMut<Color> for Tokens {
    fn index_mut(&mut self, color: Color) -> &mut u8 {
        &mut self.gems[color]
    }
}

impl std::fmt::Display for Tokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "W{} U{} G{} R{} K{} *{}",
            self.gems.white, self.gems.blue, self.gems.green, self.gems.red, self.gems.black, self.gold
        )
    }
}
