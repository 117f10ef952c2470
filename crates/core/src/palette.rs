//! Palette module - the set of colors a session draws from
//!
//! A [`Palette`] is always valid once constructed: at least [`MIN_PALETTE_SIZE`] colors and
//! no duplicates. Every draw therefore has a color to return and the generator always has
//! a color that does not complete a run.

use arrayvec::ArrayVec;

use crate::error::ConfigError;
use crate::rng::SimpleRng;
use crate::types::{Color, MIN_PALETTE_SIZE, PALETTE_SIZE};

/// Ordered, duplicate-free set of 3 to 6 colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: ArrayVec<Color, PALETTE_SIZE>,
}

impl Palette {
    /// Build a palette from a list of colors, keeping their order
    pub fn new(colors: &[Color]) -> Result<Self, ConfigError> {
        let mut out = ArrayVec::<Color, PALETTE_SIZE>::new();
        for &color in colors {
            if out.contains(&color) {
                return Err(ConfigError::DuplicateColor(color));
            }
            // Six distinct colors exist, so a duplicate is hit before capacity is.
            out.push(color);
        }

        if out.len() < MIN_PALETTE_SIZE {
            return Err(ConfigError::PaletteTooSmall {
                len: out.len(),
                min: MIN_PALETTE_SIZE,
            });
        }

        Ok(Self { colors: out })
    }

    /// All six colors
    pub fn full() -> Self {
        Self {
            colors: ArrayVec::from(Color::ALL),
        }
    }

    /// Parse a comma-separated list of color names, e.g. `"red,blue,green"`
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let mut colors = Vec::new();
        for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let color = Color::from_str(name).ok_or_else(|| ConfigError::UnknownColor {
                name: name.to_string(),
            })?;
            colors.push(color);
        }
        Self::new(&colors)
    }

    /// Draw a uniformly random color
    pub fn draw(&self, rng: &mut SimpleRng) -> Color {
        self.colors[rng.next_index(self.colors.len())]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn contains(&self, color: Color) -> bool {
        self.colors.contains(&color)
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.colors
    }

    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        self.colors.iter().copied()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_palette() {
        let palette = Palette::full();
        assert_eq!(palette.len(), PALETTE_SIZE);
        assert_eq!(palette.as_slice(), &Color::ALL);
    }

    #[test]
    fn test_rejects_small_palette() {
        assert_eq!(
            Palette::new(&[Color::Red, Color::Blue]),
            Err(ConfigError::PaletteTooSmall { len: 2, min: 3 })
        );
    }

    #[test]
    fn test_rejects_duplicates() {
        assert_eq!(
            Palette::new(&[Color::Red, Color::Blue, Color::Red]),
            Err(ConfigError::DuplicateColor(Color::Red))
        );
    }

    #[test]
    fn test_parse() {
        let palette = Palette::parse(" red, Blue ,green").unwrap();
        assert_eq!(palette.as_slice(), &[Color::Red, Color::Blue, Color::Green]);

        assert!(matches!(
            Palette::parse("red,blue,teal"),
            Err(ConfigError::UnknownColor { .. })
        ));
    }

    #[test]
    fn test_draw_only_returns_members() {
        let palette = Palette::new(&[Color::Amber, Color::Pink, Color::Green]).unwrap();
        let mut rng = SimpleRng::new(3);
        for _ in 0..200 {
            assert!(palette.contains(palette.draw(&mut rng)));
        }
    }
}
