use crate::error::Error;
use crate::options::{MAX_PALETTE_SIZE, Options};
use crate::palette::Palette;
use crate::quantize::{Quantization, Quantizer};
use crate::rgb::{Rgb8, RgbPolicy};

/// Image reference containing pixel data and dimensions info
pub struct Image<'data> {
    width: usize,
    height: usize,
    data: &'data [u8],
    bytes_per_pixel: usize,
}

impl<'data> Image<'data> {
    /// Creates an [`Image`] from a slice of packed RGB pixels.
    ///
    /// Returns [`Error::BufferTooSmall`] if the provided slice length is less
    /// than `width * height * 3`
    pub fn new(data: &'data [u8], width: usize, height: usize) -> Result<Self, Error> {
        Self::with_stride(data, width, height, 3)
    }

    /// Creates an [`Image`] from a slice of RGBA pixels. The alpha byte is
    /// ignored.
    ///
    /// Returns [`Error::BufferTooSmall`] if the provided slice length is less
    /// than `width * height * 4`
    pub fn new_rgba(data: &'data [u8], width: usize, height: usize) -> Result<Self, Error> {
        Self::with_stride(data, width, height, 4)
    }

    fn with_stride(
        data: &'data [u8],
        width: usize,
        height: usize,
        bytes_per_pixel: usize,
    ) -> Result<Self, Error> {
        let image = Self {
            data,
            width,
            height,
            bytes_per_pixel,
        };
        image.check_size()?;

        Ok(image)
    }

    /// `data` must hold `width * height` whole pixels.
    fn check_size(&self) -> Result<usize, Error> {
        let pixel_count = self.width.checked_mul(self.height).ok_or(Error::BufferTooSmall)?;

        if self.data.len() / self.bytes_per_pixel < pixel_count {
            return Err(Error::BufferTooSmall);
        }

        Ok(pixel_count)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &'data [u8] {
        self.data
    }

    pub fn pixel_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    pub fn pixels(&self) -> impl Iterator<Item = Rgb8> + '_ {
        self.data
            .chunks_exact(self.bytes_per_pixel)
            .take(self.pixel_count())
            .map(|pix| Rgb8::from([pix[0], pix[1], pix[2]]))
    }
}

impl Quantization<RgbPolicy> {
    /// Returns the [`Palette`] of slot averages
    pub fn palette(&self) -> Result<Palette, Error> {
        Palette::try_from(self)
    }

    /// Remaps the provided [`Image`] to a slice of palette indexes.
    ///
    /// Returns [`Error::BufferTooSmall`] if the provided buffer is smaller
    /// than `image.width() * image.height()`, [`Error::InvalidConfiguration`] if
    /// there are more slots than a byte can index, and [`Error::UnknownColor`]
    /// if a pixel has no slot
    pub fn remap_image(&self, image: &Image, buf: &mut [u8]) -> Result<(), Error> {
        if buf.len() < image.check_size()? {
            return Err(Error::BufferTooSmall);
        }

        if self.len() > MAX_PALETTE_SIZE {
            return Err(Error::InvalidConfiguration);
        }

        for (ind, pix) in buf.iter_mut().zip(image.pixels()) {
            let slot = self.query(&pix).ok_or(Error::UnknownColor)?;
            *ind = slot as u8;
        }

        Ok(())
    }
}

/// 8-bit palette image: a color table and one index per pixel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedImage {
    pub width: usize,
    pub height: usize,
    pub palette: Palette,
    pub indexes: Vec<u8>,
}

impl IndexedImage {
    /// Quantizes `image` and remaps every pixel onto the resulting palette.
    ///
    /// Returns [`Error::InvalidConfiguration`] if `options` allow more colors
    /// than a palette can hold
    pub fn new(image: &Image, options: &Options) -> Result<Self, Error> {
        if options.max_quanta() > MAX_PALETTE_SIZE {
            return Err(Error::InvalidConfiguration);
        }

        let quantization = Quantizer::new(options, RgbPolicy).quantize(image.pixels())?;

        Self::from_quantization(image, &quantization)
    }

    /// Like [`IndexedImage::new`] but accumulates the pixels in parallel
    #[cfg(feature = "parallel")]
    pub fn new_par(image: &Image, options: &Options) -> Result<Self, Error> {
        if options.max_quanta() > MAX_PALETTE_SIZE {
            return Err(Error::InvalidConfiguration);
        }

        let pixels: Vec<Rgb8> = image.pixels().collect();
        let quantization = Quantizer::new(options, RgbPolicy).quantize_par(&pixels)?;

        Self::from_quantization(image, &quantization)
    }

    fn from_quantization(
        image: &Image,
        quantization: &Quantization<RgbPolicy>,
    ) -> Result<Self, Error> {
        let pixel_count = image.check_size()?;
        let palette = quantization.palette()?;

        let mut indexes = vec![0u8; pixel_count];
        quantization.remap_image(image, &mut indexes)?;

        log::debug!(
            "indexed {}x{} image: {} colors at level {}",
            image.width(),
            image.height(),
            palette.count,
            quantization.level()
        );

        Ok(Self {
            width: image.width(),
            height: image.height(),
            palette,
            indexes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_buffers_are_rejected() {
        assert!(matches!(Image::new(&[0; 11], 2, 2), Err(Error::BufferTooSmall)));
        assert!(matches!(Image::new_rgba(&[0; 12], 2, 2), Err(Error::BufferTooSmall)));
        assert!(Image::new(&[0; 12], 2, 2).is_ok());
    }

    #[test]
    fn rgba_alpha_is_skipped() {
        let data = [1, 2, 3, 200, 4, 5, 6, 0];
        let image = Image::new_rgba(&data, 2, 1).unwrap();
        let pixels: Vec<Rgb8> = image.pixels().collect();
        assert_eq!(pixels, vec![Rgb8::new(1, 2, 3), Rgb8::new(4, 5, 6)]);
    }

    #[test]
    fn trailing_bytes_are_not_pixels() {
        let data = [9u8; 10];
        let image = Image::new(&data, 3, 1).unwrap();
        assert_eq!(image.pixels().count(), 3);
    }

    #[test]
    fn remap_needs_room_for_every_pixel() {
        let data = [0u8, 0, 0, 255, 255, 255];
        let image = Image::new(&data, 2, 1).unwrap();
        let q = Quantizer::new(&Options::default(), RgbPolicy).quantize(image.pixels()).unwrap();

        let mut buf = [0u8; 1];
        assert_eq!(q.remap_image(&image, &mut buf), Err(Error::BufferTooSmall));
    }

    #[test]
    fn remap_refuses_pixels_missing_from_data() {
        let data = [255u8, 0, 0, 0, 0, 255];
        let mut image = Image::new(&data, 2, 1).unwrap();
        let q = Quantizer::new(&Options::default(), RgbPolicy).quantize(image.pixels()).unwrap();

        image.width = 4;
        let mut buf = [7u8; 4];
        assert_eq!(q.remap_image(&image, &mut buf), Err(Error::BufferTooSmall));
        assert_eq!(IndexedImage::new(&image, &Options::default()), Err(Error::BufferTooSmall));

        image.width = usize::MAX;
        assert_eq!(q.remap_image(&image, &mut buf), Err(Error::BufferTooSmall));
        assert_eq!(IndexedImage::new(&image, &Options::default()), Err(Error::BufferTooSmall));
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        assert!(matches!(Image::new(&[0; 3], usize::MAX, 2), Err(Error::BufferTooSmall)));
    }

    #[test]
    fn accessors_report_dimensions() {
        let data = [0u8; 24];
        let image = Image::new_rgba(&data, 3, 2).unwrap();
        assert_eq!((image.width(), image.height(), image.pixel_count()), (3, 2, 6));
        assert_eq!(image.data().len(), 24);
    }

    #[test]
    fn remap_reports_unknown_colors() {
        let q = Quantizer::new(&Options::default(), RgbPolicy).quantize([Rgb8::BLACK]).unwrap();

        let data = [255u8, 0, 0];
        let image = Image::new(&data, 1, 1).unwrap();
        let mut buf = [0u8; 1];
        assert_eq!(q.remap_image(&image, &mut buf), Err(Error::UnknownColor));
    }

    #[test]
    fn indexed_image_rejects_wide_palettes() {
        let data = [0u8; 3];
        let image = Image::new(&data, 1, 1).unwrap();
        let options = Options::new(MAX_PALETTE_SIZE + 1).unwrap();
        assert_eq!(IndexedImage::new(&image, &options), Err(Error::InvalidConfiguration));
    }
}
