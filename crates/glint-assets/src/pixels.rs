use std::borrow::Cow;

use image::{DynamicImage, GrayAlphaImage, GrayImage};

use crate::document::ImageDesc;
use crate::error::ImageError;

/// Alpha written for pixels whose source has no alpha channel.
pub const OPAQUE_ALPHA: u8 = 255;

/// An image normalized to tightly packed RGBA8.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Normalize a document image, taking ownership of its pixels.
    ///
    /// RGBA sources are moved rather than copied.
    pub fn from_desc(desc: ImageDesc) -> Result<Self, ImageError> {
        let ImageDesc {
            width,
            height,
            channels,
            mut pixels,
        } = desc;

        let converted = match normalize_pixels(width, height, channels, &pixels)? {
            Cow::Owned(rgba) => Some(rgba),
            Cow::Borrowed(_) => None,
        };
        let pixels = match converted {
            Some(rgba) => rgba,
            None => {
                pixels.truncate(width as usize * height as usize * 4);
                pixels
            }
        };

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Placeholder kept in the image table when decoding an image fails.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Convert `channels`-per-pixel data into a `width * height * 4` RGBA8 buffer.
///
/// Four-channel input is returned borrowed. Three-channel input gets
/// [`OPAQUE_ALPHA`]; one- and two-channel input is treated as luminance
/// (with alpha) and expanded to grey RGB.
pub fn normalize_pixels(
    width: u32,
    height: u32,
    channels: u8,
    pixels: &[u8],
) -> Result<Cow<'_, [u8]>, ImageError> {
    if !(1..=4).contains(&channels) {
        return Err(ImageError::UnsupportedChannels(channels));
    }

    let pixel_count = width as usize * height as usize;
    let expected = pixel_count * channels as usize;
    if pixels.len() < expected {
        return Err(ImageError::TruncatedPixels {
            width,
            height,
            channels,
            expected,
            actual: pixels.len(),
        });
    }
    let pixels = &pixels[..expected];

    let rgba = match channels {
        4 => return Ok(Cow::Borrowed(pixels)),
        3 => {
            let mut rgba = Vec::with_capacity(pixel_count * 4);
            for rgb in pixels.chunks_exact(3) {
                rgba.extend_from_slice(rgb);
                rgba.push(OPAQUE_ALPHA);
            }
            rgba
        }
        2 => GrayAlphaImage::from_raw(width, height, pixels.to_vec())
            .map(|img| DynamicImage::ImageLumaA8(img).to_rgba8().into_raw())
            .unwrap_or_default(),
        _ => GrayImage::from_raw(width, height, pixels.to_vec())
            .map(|img| DynamicImage::ImageLuma8(img).to_rgba8().into_raw())
            .unwrap_or_default(),
    };

    Ok(Cow::Owned(rgba))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_gains_opaque_alpha() {
        let (w, h) = (3u32, 2u32);
        let rgb: Vec<u8> = (0..(w * h * 3) as u8).collect();
        let rgba = normalize_pixels(w, h, 3, &rgb).unwrap();

        assert!(matches!(rgba, Cow::Owned(_)));
        assert_eq!(rgba.len(), (w * h * 4) as usize);
        for (src, dst) in rgb.chunks_exact(3).zip(rgba.chunks_exact(4)) {
            assert_eq!(&dst[..3], src);
            assert_eq!(dst[3], OPAQUE_ALPHA);
        }
    }

    #[test]
    fn rgba_is_borrowed_unchanged() {
        let rgba: Vec<u8> = (0..16).collect();
        let out = normalize_pixels(2, 2, 4, &rgba).unwrap();
        match out {
            Cow::Borrowed(bytes) => {
                assert_eq!(bytes, rgba.as_slice());
                assert_eq!(bytes.as_ptr(), rgba.as_ptr());
            }
            Cow::Owned(_) => panic!("RGBA input should not be copied"),
        }
    }

    #[test]
    fn luminance_expands_to_grey() {
        let out = normalize_pixels(2, 1, 1, &[10, 200]).unwrap();
        assert_eq!(out.as_ref(), &[10, 10, 10, 255, 200, 200, 200, 255]);

        let out = normalize_pixels(1, 1, 2, &[40, 128]).unwrap();
        assert_eq!(out.as_ref(), &[40, 40, 40, 128]);
    }

    #[test]
    fn unsupported_channel_counts() {
        assert_eq!(
            normalize_pixels(1, 1, 0, &[]).unwrap_err(),
            ImageError::UnsupportedChannels(0)
        );
        assert_eq!(
            normalize_pixels(1, 1, 5, &[0; 5]).unwrap_err(),
            ImageError::UnsupportedChannels(5)
        );
    }

    #[test]
    fn truncated_pixels() {
        let err = normalize_pixels(2, 2, 3, &[0; 11]).unwrap_err();
        assert_eq!(
            err,
            ImageError::TruncatedPixels {
                width: 2,
                height: 2,
                channels: 3,
                expected: 12,
                actual: 11,
            }
        );
    }

    #[test]
    fn from_desc_moves_rgba_and_trims_padding() {
        let desc = ImageDesc {
            width: 1,
            height: 1,
            channels: 4,
            pixels: vec![1, 2, 3, 4, 99],
        };
        let image = DecodedImage::from_desc(desc).unwrap();
        assert_eq!(image.pixels, vec![1, 2, 3, 4]);

        let desc = ImageDesc {
            width: 1,
            height: 2,
            channels: 3,
            pixels: vec![1, 2, 3, 4, 5, 6],
        };
        let image = DecodedImage::from_desc(desc).unwrap();
        assert_eq!(image.pixels, vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }
}
