//! Bitmap model and the PNG boundary codec
//!
//! Comparisons operate on flat RGB. Anything decoded at the store boundary
//! is flattened to 8-bit RGB (alpha dropped) so exact pixel equality is
//! well-defined no matter how a surface was captured. Everything written
//! back out is 8-bit RGB PNG; a lossy codec would manufacture pixel
//! differences under exact-equality comparison.

use image::RgbImage;

use crate::result::{CotejoError, CotejoResult};

/// Rectangular RGB pixel grid
///
/// Width and height are fixed at construction. Pixels are row-major RGB
/// triples; there is no alpha channel anywhere in the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    image: RgbImage,
}

impl Bitmap {
    /// Create a zero-filled (black) bitmap
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
        }
    }

    /// Create a bitmap filled with a single color
    #[must_use]
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, image::Rgb(rgb)),
        }
    }

    /// Build a bitmap from row-major RGB pixels
    ///
    /// # Errors
    ///
    /// Returns [`CotejoError::InvalidImage`] when the pixel count does not
    /// match `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: &[[u8; 3]]) -> CotejoResult<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(CotejoError::InvalidImage {
                message: format!(
                    "pixel buffer holds {} pixels, {width}x{height} needs {expected}",
                    pixels.len()
                ),
            });
        }
        let raw: Vec<u8> = pixels.iter().flatten().copied().collect();
        let image =
            RgbImage::from_raw(width, height, raw).ok_or_else(|| CotejoError::InvalidImage {
                message: format!("pixel buffer does not fit {width}x{height}"),
            })?;
        Ok(Self { image })
    }

    /// Decode a stored image, flattening any alpha channel to RGB
    ///
    /// # Errors
    ///
    /// Returns [`CotejoError::Storage`] when the bytes are not a decodable
    /// image. A stored-but-corrupt baseline surfaces as a storage failure,
    /// not as a missing baseline.
    pub fn from_png(bytes: &[u8]) -> CotejoResult<Self> {
        let decoded = image::load_from_memory(bytes).map_err(|e| CotejoError::Storage {
            message: format!("Failed to decode stored image: {e}"),
        })?;
        Ok(Self {
            image: decoded.to_rgb8(),
        })
    }

    /// Encode as 8-bit RGB PNG
    ///
    /// # Errors
    ///
    /// Returns [`CotejoError::Storage`] when encoding fails (zero-area
    /// bitmaps cannot be encoded).
    pub fn to_png(&self) -> CotejoResult<Vec<u8>> {
        let mut output = Vec::new();

        {
            let mut encoder = png::Encoder::new(&mut output, self.width(), self.height());
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);

            let mut writer = encoder.write_header().map_err(|e| CotejoError::Storage {
                message: format!("Failed to write PNG header: {e}"),
            })?;

            writer
                .write_image_data(self.image.as_raw())
                .map_err(|e| CotejoError::Storage {
                    message: format!("Failed to write PNG data: {e}"),
                })?;
        }

        Ok(output)
    }

    /// Width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// `(width, height)` pair
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Total number of pixels
    #[must_use]
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// RGB value at `(x, y)`
    ///
    /// # Panics
    ///
    /// Panics when `(x, y)` is outside the bitmap.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.image.get_pixel(x, y).0
    }

    /// Overwrite the RGB value at `(x, y)`
    ///
    /// # Panics
    ///
    /// Panics when `(x, y)` is outside the bitmap.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        self.image.put_pixel(x, y, image::Rgb(rgb));
    }
}
