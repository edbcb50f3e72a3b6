use std::sync::Arc;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Opaque handle identifying an engine texture.
///
/// Two texture references denote the same texture iff their ids are equal.
/// Textures with identical pixel content but different ids are distinct.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureId(pub u64);

impl std::fmt::Display for TextureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureDimension {
    #[default]
    #[serde(rename = "2d")]
    Tex2D,
    #[serde(rename = "2d_array")]
    Tex2DArray,
    #[serde(rename = "3d")]
    Tex3D,
    Cube,
    RenderTarget,
}

/// Colour space the engine samples the texture in.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpace {
    #[default]
    Srgb,
    Linear,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    Point,
    #[default]
    Bilinear,
    Trilinear,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureWrapMode {
    #[default]
    Repeat,
    Clamp,
    Mirror,
    MirrorOnce,
}

/// Channel layout of normal map pixel data.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalLayout {
    /// X, Y and Z stored in R, G and B.
    #[default]
    Rgb,
    /// X stored in alpha and Y in green; Z has to be reconstructed.
    AgSwizzled,
}


/// An engine texture. Owned by the engine and shared with the exporter
/// through `Arc`.
#[derive(Clone, Debug)]
pub struct SourceTexture {
    id: TextureId,
    name: String,
    dimension: TextureDimension,
    color_space: ColorSpace,
    filter_mode: FilterMode,
    wrap_u: TextureWrapMode,
    wrap_v: TextureWrapMode,
    normal_layout: NormalLayout,
    pixels: Option<DynamicImage>,
}

impl SourceTexture {
    /// Creates an unreadable 2D texture with bilinear filtering and repeat
    /// wrapping.
    pub fn new(id: TextureId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            dimension: TextureDimension::Tex2D,
            color_space: ColorSpace::Srgb,
            filter_mode: FilterMode::Bilinear,
            wrap_u: TextureWrapMode::Repeat,
            wrap_v: TextureWrapMode::Repeat,
            normal_layout: NormalLayout::Rgb,
            pixels: None,
        }
    }

    pub fn with_pixels(mut self, pixels: DynamicImage) -> Self {
        self.pixels = Some(pixels);
        self
    }

    pub fn with_dimension(mut self, dimension: TextureDimension) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = color_space;
        self
    }

    pub fn with_filter_mode(mut self, filter_mode: FilterMode) -> Self {
        self.filter_mode = filter_mode;
        self
    }

    pub fn with_wrap_mode(mut self, wrap_u: TextureWrapMode, wrap_v: TextureWrapMode) -> Self {
        self.wrap_u = wrap_u;
        self.wrap_v = wrap_v;
        self
    }

    pub fn with_normal_layout(mut self, normal_layout: NormalLayout) -> Self {
        self.normal_layout = normal_layout;
        self
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn id(&self) -> TextureId { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn dimension(&self) -> TextureDimension { self.dimension }
    pub fn color_space(&self) -> ColorSpace { self.color_space }
    pub fn filter_mode(&self) -> FilterMode { self.filter_mode }
    pub fn wrap_u(&self) -> TextureWrapMode { self.wrap_u }
    pub fn wrap_v(&self) -> TextureWrapMode { self.wrap_v }
    pub fn normal_layout(&self) -> NormalLayout { self.normal_layout }
    pub fn pixels(&self) -> Option<&DynamicImage> { self.pixels.as_ref() }

    pub fn set_filter_mode(&mut self, filter_mode: FilterMode) { self.filter_mode = filter_mode }
    pub fn set_wrap_u(&mut self, wrap: TextureWrapMode) { self.wrap_u = wrap }
    pub fn set_wrap_v(&mut self, wrap: TextureWrapMode) { self.wrap_v = wrap }

    pub fn is_2d(&self) -> bool {
        self.dimension == TextureDimension::Tex2D
    }

    /// Returns true if a CPU copy of the pixels is available for encoding.
    pub fn is_readable(&self) -> bool {
        self.pixels
            .as_ref()
            .is_some_and(|p| p.width() > 0 && p.height() > 0)
    }
}


/// A texture binding point on a material together with its UV transform.
#[derive(Clone, Debug)]
pub struct TextureSlot {
    texture: Option<Arc<SourceTexture>>,
    offset: [f32; 2],
    scale: [f32; 2],
}

impl Default for TextureSlot {
    fn default() -> Self {
        Self::empty()
    }
}

impl TextureSlot {
    /// A slot that exists on the material but holds no texture.
    pub fn empty() -> Self {
        Self {
            texture: None,
            offset: [0.0, 0.0],
            scale: [1.0, 1.0],
        }
    }

    pub fn new(texture: Arc<SourceTexture>) -> Self {
        Self {
            texture: Some(texture),
            ..Self::empty()
        }
    }

    pub fn with_offset(mut self, offset: [f32; 2]) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_scale(mut self, scale: [f32; 2]) -> Self {
        self.scale = scale;
        self
    }

    pub fn texture(&self) -> Option<&Arc<SourceTexture>> { self.texture.as_ref() }
    pub fn offset(&self) -> [f32; 2] { self.offset }
    pub fn scale(&self) -> [f32; 2] { self.scale }
}
