use crate::refs::{ObjectReferences, RefType};
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};
use thiserror::Error;

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("image data is neither PNG nor JPEG")]
    UnsupportedSignature,

    #[error(transparent)]
    Decode(#[from] image::ImageError),
}

/// Raster formats an image can be embedded from
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Detect the format from the leading magic bytes, ignoring any file name or URL
    pub fn sniff(bytes: &[u8]) -> Option<ImageKind> {
        if bytes.starts_with(&PNG_SIGNATURE) {
            Some(ImageKind::Png)
        } else if bytes.starts_with(&JPEG_SIGNATURE) {
            Some(ImageKind::Jpeg)
        } else {
            None
        }
    }

    fn format(&self) -> ImageFormat {
        match self {
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Jpeg => ImageFormat::Jpeg,
        }
    }
}

enum RasterData {
    /// RGB JPEGs are embedded as-is and decoded by the viewer
    DirectlyEmbeddableJpeg(Vec<u8>),
    Decoded(DynamicImage),
}

impl std::fmt::Debug for RasterData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterData::DirectlyEmbeddableJpeg(bytes) => {
                write!(f, "DirectlyEmbeddableJpeg({} bytes)", bytes.len())
            }
            RasterData::Decoded(image) => write!(f, "Decoded({:?})", image.color()),
        }
    }
}

/// A decoded raster image, ready to be embedded into a document.
///
/// Width and height are in pixels; layout decides the size it is drawn at.
#[derive(Debug)]
pub struct Image {
    data: RasterData,
    pub kind: ImageKind,
    pub width: f32,
    pub height: f32,
}

struct EncodeOutput {
    filter: Filter,
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl Image {
    /// Sniff and decode image bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Image, ImageError> {
        let kind = ImageKind::sniff(&bytes).ok_or(ImageError::UnsupportedSignature)?;
        let image = image::load_from_memory_with_format(&bytes, kind.format())?;
        let (width, height) = image.dimensions();

        let data = match (kind, image.color()) {
            (ImageKind::Jpeg, ColorType::Rgb8) => RasterData::DirectlyEmbeddableJpeg(bytes),
            _ => RasterData::Decoded(image),
        };

        Ok(Image {
            data,
            kind,
            width: width as f32,
            height: height as f32,
        })
    }

    /// Height over width
    pub fn aspect_ratio(&self) -> f32 {
        if self.width > 0.0 {
            self.height / self.width
        } else {
            1.0
        }
    }

    fn encode(&self) -> EncodeOutput {
        match &self.data {
            RasterData::DirectlyEmbeddableJpeg(bytes) => EncodeOutput {
                filter: Filter::DctDecode,
                bytes: bytes.clone(),
                mask: None,
            },
            RasterData::Decoded(image) => {
                let level = CompressionLevel::DefaultLevel as u8;

                let mask = image.color().has_alpha().then(|| {
                    let alphas: Vec<u8> = image.to_rgba8().pixels().map(|p| p.0[3]).collect();
                    compress_to_vec_zlib(&alphas, level)
                });

                let bytes = compress_to_vec_zlib(image.to_rgb8().as_raw(), level);

                EncodeOutput {
                    filter: Filter::FlateDecode,
                    bytes,
                    mask,
                }
            }
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Image(image_index));
        let encoded = self.encode();

        let mask_id = encoded
            .mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));

        let mut image = writer.image_xobject(id, encoded.bytes.as_slice());
        image.filter(encoded.filter);
        image.width(self.width as i32);
        image.height(self.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        // transparency goes into a separate greyscale soft mask
        if let (Some(mask_id), Some(mask)) = (mask_id, encoded.mask.as_ref()) {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(self.width as i32);
            s_mask.height(self.height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageOutputFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 128]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .expect("can encode png");
        bytes
    }

    pub(crate) fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_pixel(width, height, Rgb([20, 120, 200]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Jpeg(85))
            .expect("can encode jpeg");
        bytes
    }

    #[test]
    fn sniffs_by_signature() {
        assert_eq!(ImageKind::sniff(&png_bytes(2, 2)), Some(ImageKind::Png));
        assert_eq!(ImageKind::sniff(&jpeg_bytes(2, 2)), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::sniff(b"GIF89a"), None);
        assert_eq!(ImageKind::sniff(&[0xFF, 0xD8]), None);
    }

    #[test]
    fn decodes_png_with_alpha() {
        let image = Image::from_bytes(png_bytes(40, 20)).expect("png decodes");
        assert_eq!(image.kind, ImageKind::Png);
        assert_eq!((image.width, image.height), (40.0, 20.0));
        assert_eq!(image.aspect_ratio(), 0.5);
        let encoded = image.encode();
        assert_eq!(encoded.filter, Filter::FlateDecode);
        assert!(encoded.mask.is_some());
    }

    #[test]
    fn rgb_jpegs_pass_through() {
        let bytes = jpeg_bytes(16, 32);
        let image = Image::from_bytes(bytes.clone()).expect("jpeg decodes");
        let encoded = image.encode();
        assert_eq!(encoded.filter, Filter::DctDecode);
        assert_eq!(encoded.bytes, bytes);
        assert!(encoded.mask.is_none());
    }

    #[test]
    fn rejects_unknown_data() {
        assert!(matches!(
            Image::from_bytes(b"<svg/>".to_vec()),
            Err(ImageError::UnsupportedSignature)
        ));
        let mut truncated = png_bytes(4, 4);
        truncated.truncate(12);
        assert!(matches!(
            Image::from_bytes(truncated),
            Err(ImageError::Decode(_))
        ));
    }
}
