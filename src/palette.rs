use crate::error::Error;
use crate::options::MAX_PALETTE_SIZE;
use crate::quantize::Quantization;
use crate::rgb::{Rgb8, RgbPolicy};

/// Color palette
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    /// The number of colors in the palette
    pub count: u32,
    /// The palette colors
    pub entries: [Rgb8; MAX_PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            count: 0,
            entries: [Rgb8::default(); MAX_PALETTE_SIZE],
        }
    }
}

impl Palette {
    /// The colors in use, in slot order
    pub fn colors(&self) -> &[Rgb8] {
        &self.entries[..self.count as usize]
    }

    /// Flattened `r, g, b` triples of the colors in use
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.colors().iter().flat_map(Rgb8::to_array).collect()
    }
}

impl TryFrom<&Quantization<RgbPolicy>> for Palette {
    type Error = Error;

    /// Returns [`Error::InvalidConfiguration`] if there are more slots than
    /// a palette can hold
    fn try_from(quantization: &Quantization<RgbPolicy>) -> Result<Self, Error> {
        if quantization.len() > MAX_PALETTE_SIZE {
            return Err(Error::InvalidConfiguration);
        }

        let mut palette = Self::default();
        palette.count = quantization.len() as u32;

        for (entry, stats) in palette.entries.iter_mut().zip(quantization.statistics()) {
            *entry = stats.average();
        }

        Ok(palette)
    }
}
