use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fill of the highlighted slice.
pub const HIGHLIGHT: Rgb = Rgb::new(29, 78, 216);

/// An opaque 24-bit color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from the low 24 bits of `value` (`0xRRGGBB`).
    #[must_use]
    pub const fn from_u24(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Returns the `#rrggbb` form.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Assigns display colors to categories during one aggregation pass.
///
/// `aggregate` asks exactly once per distinct category per pass.
pub trait ColorSource {
    fn color_for(&mut self, category: &str) -> Rgb;
}

impl<C: ColorSource + ?Sized> ColorSource for &mut C {
    fn color_for(&mut self, category: &str) -> Rgb {
        (**self).color_for(category)
    }
}

impl<C: ColorSource + ?Sized> ColorSource for Box<C> {
    fn color_for(&mut self, category: &str) -> Rgb {
        (**self).color_for(category)
    }
}

/// How categories get their colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Stable color derived from the category name.
    #[default]
    Hashed,
    /// Fresh random color on every recomputation.
    Random,
}

impl ColorMode {
    /// Builds the matching color source. `seed` only applies to `Random`.
    pub fn source(self, seed: Option<u64>) -> Box<dyn ColorSource + Send> {
        match self {
            Self::Hashed => Box::new(HashedPalette::default()),
            Self::Random => Box::new(match seed {
                Some(seed) => RandomColors::seeded(seed),
                None => RandomColors::from_entropy(),
            }),
        }
    }
}

const PALETTE: [Rgb; 10] = [
    Rgb::new(0x88, 0x84, 0xd8),
    Rgb::new(0x82, 0xca, 0x9d),
    Rgb::new(0xff, 0xc6, 0x58),
    Rgb::new(0xff, 0x80, 0x42),
    Rgb::new(0x00, 0xc4, 0x9f),
    Rgb::new(0xe0, 0x6c, 0x75),
    Rgb::new(0x56, 0xb6, 0xc2),
    Rgb::new(0xc6, 0x78, 0xdd),
    Rgb::new(0xd1, 0x9a, 0x66),
    Rgb::new(0x98, 0xc3, 0x79),
];

/// Deterministic colors: the category name is hashed (FNV-1a) into a fixed
/// palette, so a category keeps its color across recomputations.
#[derive(Clone, Debug)]
pub struct HashedPalette {
    palette: Vec<Rgb>,
}

impl HashedPalette {
    /// Uses a custom palette. An empty palette falls back to the default one.
    pub fn with_palette(palette: Vec<Rgb>) -> Self {
        if palette.is_empty() {
            return Self::default();
        }
        Self { palette }
    }
}

impl Default for HashedPalette {
    fn default() -> Self {
        Self {
            palette: PALETTE.to_vec(),
        }
    }
}

impl ColorSource for HashedPalette {
    fn color_for(&mut self, category: &str) -> Rgb {
        let index = (fnv1a(category.as_bytes()) % self.palette.len() as u64) as usize;
        self.palette[index]
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(PRIME))
}

/// Random colors from an explicit SplitMix64 generator.
///
/// Every call draws a new color, so a category is recolored on each pass.
/// Seed it with [`RandomColors::seeded`] for reproducible output.
#[derive(Clone, Debug)]
pub struct RandomColors {
    state: u64,
}

impl RandomColors {
    pub fn seeded(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn from_entropy() -> Self {
        let (high, low) = Uuid::new_v4().as_u64_pair();
        Self::seeded(high ^ low)
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}

impl ColorSource for RandomColors {
    fn color_for(&mut self, _category: &str) -> Rgb {
        Rgb::from_u24((self.next_u64() >> 40) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_zero_padded() {
        assert_eq!(Rgb::new(1, 2, 3).to_hex(), "#010203");
        assert_eq!(HIGHLIGHT.to_hex(), "#1d4ed8");
        assert_eq!(Rgb::from_u24(0x00ff10), Rgb::new(0, 255, 16));
    }

    #[test]
    fn hashed_palette_is_stable() {
        let mut a = HashedPalette::default();
        let mut b = HashedPalette::default();
        assert_eq!(a.color_for("Office"), b.color_for("Office"));
        assert_eq!(a.color_for("Office"), a.color_for("Office"));
    }

    #[test]
    fn empty_palette_falls_back_to_default() {
        let mut palette = HashedPalette::with_palette(Vec::new());
        assert!(PALETTE.contains(&palette.color_for("Salaries")));
    }

    #[test]
    fn seeded_random_colors_are_reproducible() {
        let mut a = RandomColors::seeded(42);
        let mut b = RandomColors::seeded(42);
        let first: Vec<_> = (0..4).map(|_| a.color_for("Office")).collect();
        let second: Vec<_> = (0..4).map(|_| b.color_for("Office")).collect();
        assert_eq!(first, second);
        assert_ne!(first[0], first[1]);
    }

    #[test]
    fn color_mode_builds_matching_source() {
        assert_eq!(ColorMode::default(), ColorMode::Hashed);
        let mut source = ColorMode::Random.source(Some(7));
        let mut reference = RandomColors::seeded(7);
        assert_eq!(source.color_for("x"), reference.color_for("x"));
    }
}
