//! Adaptive colour quantisation.
//!
//! Elements are binned by a [`QuantizationPolicy`]; whenever there are more
//! bins than allowed the binning is coarsened by doubling the quantisation
//! level. The resulting [`Quantization`] maps every input element to a slot.

mod error;
mod histogram;
mod image;
mod options;
mod palette;
mod policy;
mod quantize;
mod rgb;

pub use crate::error::Error;
pub use crate::histogram::Histogram;
pub use crate::image::{Image, IndexedImage};
pub use crate::options::{MAX_PALETTE_SIZE, Options};
pub use crate::palette::Palette;
pub use crate::policy::QuantizationPolicy;
pub use crate::quantize::{Quantization, Quantizer};
pub use crate::rgb::{Rgb8, RgbPolicy, RgbStatistics};
