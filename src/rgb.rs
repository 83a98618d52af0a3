use crate::policy::QuantizationPolicy;

/// RGB color, 8 bits per channel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self::grey(0);
    pub const WHITE: Self = Self::grey(255);
    pub const RED: Self = Self::red(255);
    pub const GREEN: Self = Self::green(255);
    pub const BLUE: Self = Self::blue(255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn grey(l: u8) -> Self {
        Self::new(l, l, l)
    }

    pub const fn red(l: u8) -> Self {
        Self::new(l, 0, 0)
    }

    pub const fn green(l: u8) -> Self {
        Self::new(0, l, 0)
    }

    pub const fn blue(l: u8) -> Self {
        Self::new(0, 0, l)
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

/// Running per-channel sums of every color in a bucket
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RgbStatistics {
    pub r: u64,
    pub g: u64,
    pub b: u64,
    pub count: u64,
}

impl RgbStatistics {
    /// Mean color of the bucket, each channel rounded half away from zero.
    ///
    /// An empty aggregate averages to black.
    pub fn average(&self) -> Rgb8 {
        if self.count == 0 {
            return Rgb8::BLACK;
        }

        Rgb8 {
            r: mean(self.r, self.count),
            g: mean(self.g, self.count),
            b: mean(self.b, self.count),
        }
    }
}

fn mean(sum: u64, count: u64) -> u8 {
    let (sum, count) = (sum as u128, count as u128);
    let rounded = (2 * sum + count) / (2 * count);

    rounded.min(u8::MAX as u128) as u8
}

/// Quantises [`Rgb8`] colours by flooring each channel to a multiple of the level
#[derive(Clone, Copy, Debug, Default)]
pub struct RgbPolicy;

fn floor_to(channel: u8, level: u32) -> u8 {
    let c = channel as u32;
    (c - c % level) as u8
}

impl QuantizationPolicy for RgbPolicy {
    type Element = Rgb8;
    type Statistics = RgbStatistics;

    fn quantize(&self, element: &Rgb8, level: u32) -> Rgb8 {
        Rgb8 {
            r: floor_to(element.r, level),
            g: floor_to(element.g, level),
            b: floor_to(element.b, level),
        }
    }

    fn statistics(&self, element: &Rgb8) -> RgbStatistics {
        RgbStatistics {
            r: element.r as u64,
            g: element.g as u64,
            b: element.b as u64,
            count: 1,
        }
    }

    fn combine(&self, l: &RgbStatistics, r: &RgbStatistics) -> RgbStatistics {
        RgbStatistics {
            r: l.r + r.r,
            g: l.g + r.g,
            b: l.b + r.b,
            count: l.count + r.count,
        }
    }
}
