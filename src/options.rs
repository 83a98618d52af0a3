use crate::error::Error;

/// The largest palette an indexed image can address with one byte per pixel.
pub const MAX_PALETTE_SIZE: usize = 256;

/// Quantisation options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    max_quanta: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_quanta: MAX_PALETTE_SIZE,
        }
    }
}

impl Options {
    /// Creates [`Options`] allowing at most `max_quanta` buckets.
    ///
    /// Returns [`Error::InvalidConfiguration`] if `max_quanta` is 0
    pub fn new(max_quanta: usize) -> Result<Self, Error> {
        let mut options = Self::default();
        options.set_max_quanta(max_quanta)?;

        Ok(options)
    }

    /// Sets the maximum number of buckets a quantisation may keep.
    ///
    /// Returns [`Error::InvalidConfiguration`] if `quanta` is 0
    pub fn set_max_quanta(&mut self, quanta: usize) -> Result<(), Error> {
        if quanta < 1 {
            return Err(Error::InvalidConfiguration);
        }

        self.max_quanta = quanta;

        Ok(())
    }

    pub fn max_quanta(&self) -> usize {
        self.max_quanta
    }
}
