//! Small fixed color palettes cycled by particle index.
//!
//! Lattice particles take `palette.cycle(i)` for their i-th slot, so a
//! palette of n colors repeats every n particles in row-major order.

use crate::color::Srgb;
use crate::error::FieldError;

/// Names accepted by [`Palette::from_name`].
const PALETTE_NAMES: &[&str] = &["dusk", "ember", "aurora", "mono"];

/// An ordered, non-empty list of colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Srgb>,
}

impl Palette {
    /// Creates a palette from a vector of colors. Requires at least one color.
    pub fn new(colors: Vec<Srgb>) -> Result<Self, FieldError> {
        if colors.is_empty() {
            return Err(FieldError::InvalidPalette(
                "palette requires at least 1 color".to_string(),
            ));
        }
        Ok(Self { colors })
    }

    /// Creates a palette by parsing hex color strings.
    pub fn from_hex(hexes: &[&str]) -> Result<Self, FieldError> {
        let colors = hexes
            .iter()
            .map(|h| Srgb::from_hex(h))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    /// Looks up a built-in palette by name.
    pub fn from_name(name: &str) -> Result<Self, FieldError> {
        match name {
            "dusk" => Ok(Self::dusk()),
            "ember" => Ok(Self::ember()),
            "aurora" => Ok(Self::aurora()),
            "mono" => Ok(Self::mono()),
            other => Err(FieldError::InvalidPalette(format!(
                "unknown palette '{other}', expected one of: {}",
                PALETTE_NAMES.join(", ")
            ))),
        }
    }

    /// Names of all built-in palettes.
    pub fn list_names() -> &'static [&'static str] {
        PALETTE_NAMES
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Srgb] {
        &self.colors
    }

    /// Color for slot `index`, wrapping around the palette.
    pub fn cycle(&self, index: usize) -> Srgb {
        self.colors[index % self.colors.len()]
    }

    // -- Built-in palettes --

    /// Muted slate and indigo points, the default for the background grid.
    pub fn dusk() -> Self {
        Self::from_hex(&["#3b4a6b", "#55608f", "#6f6aa8", "#8a86c2"])
            .expect("dusk palette hex values are valid")
    }

    /// Warm oranges and golds.
    pub fn ember() -> Self {
        Self::from_hex(&["#ff6b35", "#f7931e", "#ffd166", "#ef476f"])
            .expect("ember palette hex values are valid")
    }

    /// Greens and cyans.
    pub fn aurora() -> Self {
        Self::from_hex(&["#06d6a0", "#1b9aaa", "#4cc9f0", "#7bf1a8"])
            .expect("aurora palette hex values are valid")
    }

    /// Grays.
    pub fn mono() -> Self {
        Self::from_hex(&["#5a5a5a", "#7a7a7a", "#9a9a9a"])
            .expect("mono palette hex values are valid")
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::dusk()
    }
}
