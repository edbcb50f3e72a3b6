//! Deferred image encoding.
//!
//! An [`ImageExport`] only records which texture to encode and how. Pixels
//! are read and compressed later by [`ImageExport::encode`], once all
//! materials have been converted.

use std::io::Cursor;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};

use crate::config::ImageFormatSetting;
use crate::core::color::srgb_to_linear_lut;
use crate::core::texture::{ColorSpace, NormalLayout, SourceTexture, TextureId};

#[remain::sorted]
#[derive(Debug, thiserror::Error)]
pub enum Err {
    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),
    #[error("Texture {0} has no readable pixel data")]
    NotReadable(String),
}

/// How pixel values are interpreted before encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ImageKind {
    /// Colour data, written as stored (sRGB encoded).
    Color,
    /// Non-colour data such as occlusion/metallic/roughness. Never carries
    /// alpha.
    Linear,
    /// Tangent space normal map, always written as RGB.
    Normal,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }
}

/// Encoding policy of an image export. Two exports of the same texture with
/// equal policies produce the same bytes and share one output image.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct EncodingPolicy {
    pub kind: ImageKind,
    pub alpha: bool,
    pub format: ImageFormat,
}

impl EncodingPolicy {
    pub fn color(alpha: bool, setting: ImageFormatSetting) -> Self {
        let format = match setting {
            ImageFormatSetting::Auto if alpha => ImageFormat::Png,
            ImageFormatSetting::Auto | ImageFormatSetting::Jpeg => ImageFormat::Jpeg,
            ImageFormatSetting::Png => ImageFormat::Png,
        };
        Self { kind: ImageKind::Color, alpha, format }
    }

    pub fn linear(setting: ImageFormatSetting) -> Self {
        Self { kind: ImageKind::Linear, alpha: false, format: data_format(setting) }
    }

    pub fn normal(setting: ImageFormatSetting) -> Self {
        Self { kind: ImageKind::Normal, alpha: false, format: data_format(setting) }
    }
}

/// Data maps stay lossless unless JPEG is requested explicitly.
fn data_format(setting: ImageFormatSetting) -> ImageFormat {
    match setting {
        ImageFormatSetting::Jpeg => ImageFormat::Jpeg,
        ImageFormatSetting::Auto | ImageFormatSetting::Png => ImageFormat::Png,
    }
}

/// Key under which the writer deduplicates image exports.
pub type ImageKey = (TextureId, EncodingPolicy);

#[derive(Clone, Debug)]
pub struct ImageExport {
    texture: Arc<SourceTexture>,
    policy: EncodingPolicy,
}

impl ImageExport {
    pub fn new(texture: Arc<SourceTexture>, policy: EncodingPolicy) -> Self {
        Self { texture, policy }
    }

    pub fn texture(&self) -> &Arc<SourceTexture> {
        &self.texture
    }

    pub fn policy(&self) -> EncodingPolicy {
        self.policy
    }

    pub fn key(&self) -> ImageKey {
        (self.texture.id(), self.policy)
    }

    pub fn mime_type(&self) -> &'static str {
        self.policy.format.mime_type()
    }

    /// Name of the image file: the sanitised texture name, or `Texture<N>`
    /// when the texture is unnamed.
    pub fn file_name(&self, index: usize) -> String {
        let stem: String = self
            .texture
            .name()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        let stem = if stem.is_empty() { format!("Texture{}", index) } else { stem };
        match self.policy.kind {
            ImageKind::Linear => format!("{}_linear.{}", stem, self.policy.format.extension()),
            ImageKind::Color | ImageKind::Normal => format!("{}.{}", stem, self.policy.format.extension()),
        }
    }

    /// Reads the texture pixels, applies the policy's conversions and
    /// compresses the result.
    pub fn encode(&self, jpeg_quality: u8) -> Result<Vec<u8>, Err> {
        let pixels = self
            .texture
            .pixels()
            .filter(|_| self.texture.is_readable())
            .ok_or_else(|| Err::NotReadable(self.texture.name().to_string()))?;
        let prepared = self.prepare(pixels);

        let mut buffer = Cursor::new(Vec::new());
        match self.policy.format {
            ImageFormat::Png => prepared.write_to(&mut buffer, image::ImageFormat::Png)?,
            ImageFormat::Jpeg => {
                // JPEG has no alpha channel.
                let rgb = DynamicImage::ImageRgb8(prepared.to_rgb8());
                rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, jpeg_quality))?;
            }
        }
        Ok(buffer.into_inner())
    }

    fn prepare(&self, pixels: &DynamicImage) -> DynamicImage {
        match self.policy.kind {
            ImageKind::Color if self.policy.alpha => DynamicImage::ImageRgba8(pixels.to_rgba8()),
            ImageKind::Color => DynamicImage::ImageRgb8(pixels.to_rgb8()),
            ImageKind::Linear => DynamicImage::ImageRgb8(linearize(pixels, self.texture.color_space())),
            ImageKind::Normal => DynamicImage::ImageRgb8(unpack_normals(pixels, self.texture.normal_layout())),
        }
    }
}

/// Undoes the gamma curve of textures the engine samples as sRGB, so the
/// written values match what shaders read.
fn linearize(pixels: &DynamicImage, color_space: ColorSpace) -> RgbImage {
    let mut rgb = pixels.to_rgb8();
    if color_space == ColorSpace::Srgb {
        let lut = srgb_to_linear_lut();
        for p in rgb.pixels_mut() {
            for c in p.0.iter_mut() {
                *c = lut[*c as usize];
            }
        }
    }
    rgb
}

fn unpack_normals(pixels: &DynamicImage, layout: NormalLayout) -> RgbImage {
    match layout {
        NormalLayout::Rgb => pixels.to_rgb8(),
        NormalLayout::AgSwizzled => {
            let rgba = pixels.to_rgba8();
            RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
                let p = rgba.get_pixel(x, y).0;
                let nx = p[3] as f32 / 255.0 * 2.0 - 1.0;
                let ny = p[1] as f32 / 255.0 * 2.0 - 1.0;
                let nz = (1.0 - nx * nx - ny * ny).max(0.0).sqrt();
                image::Rgb([to_unorm8(nx), to_unorm8(ny), to_unorm8(nz)])
            })
        }
    }
}

fn to_unorm8(v: f32) -> u8 {
    ((v * 0.5 + 0.5) * 255.0).round().clamp(0.0, 255.0) as u8
}
