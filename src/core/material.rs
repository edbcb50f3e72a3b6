use std::collections::{BTreeSet, HashMap};

use crate::core::color::Color;
use crate::core::texture::TextureSlot;

/// Property, keyword and tag names used by the engine's material shaders.
pub mod names {
    pub const BASE_COLOR: &str = "_BaseColor";
    pub const COLOR: &str = "_Color";
    pub const BASE_MAP: &str = "_BaseMap";
    pub const MAIN_TEX: &str = "_MainTex";
    pub const METALLIC: &str = "_Metallic";
    pub const ROUGHNESS: &str = "_Roughness";
    pub const SMOOTHNESS: &str = "_Smoothness";
    pub const GLOSSINESS: &str = "_Glossiness";
    pub const METALLIC_GLOSS_MAP: &str = "_MetallicGlossMap";
    pub const OCCLUSION_MAP: &str = "_OcclusionMap";
    pub const OCCLUSION_STRENGTH: &str = "_OcclusionStrength";
    pub const BUMP_MAP: &str = "_BumpMap";
    pub const NORMAL_MAP: &str = "_NormalMap";
    pub const BUMP_SCALE: &str = "_BumpScale";
    pub const EMISSION_COLOR: &str = "_EmissionColor";
    pub const EMISSION_MAP: &str = "_EmissionMap";
    pub const CUTOFF: &str = "_Cutoff";
    pub const CULL: &str = "_Cull";

    /// Suffix of the property holding the UV set index of a texture slot,
    /// e.g. `_MainTex_texCoord`.
    pub const TEX_COORD_SUFFIX: &str = "_texCoord";

    pub const KEYWORD_EMISSION: &str = "_EMISSION";
    pub const KEYWORD_NORMAL_MAP: &str = "_NORMALMAP";
    pub const KEYWORD_BUMP_MAP: &str = "_BUMPMAP";
    pub const KEYWORD_UNLIT: &str = "_UNLIT";

    pub const TAG_RENDER_TYPE: &str = "RenderType";
    pub const RENDER_TYPE_CUTOUT: &str = "TransparentCutout";
    pub const RENDER_TYPE_TRANSPARENT: &str = "Transparent";

    /// Suffix the engine appends to the names of instantiated materials.
    pub const INSTANCE_SUFFIX: &str = " (Instance)";
}

#[derive(Clone, Debug)]
pub enum MaterialProperty {
    Float(f32),
    Color(Color),
    Texture(TextureSlot),
}

/// Snapshot of an engine material. The exporter only reads from it.
#[derive(Clone, Debug, Default)]
pub struct SourceMaterial {
    name: String,
    shader: String,
    tags: HashMap<String, String>,
    keywords: BTreeSet<String>,
    properties: HashMap<String, MaterialProperty>,
}

impl SourceMaterial {
    pub fn new(name: impl Into<String>, shader: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shader: shader.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shader(&self) -> &str {
        &self.shader
    }

    pub fn set_property(&mut self, name: impl Into<String>, property: MaterialProperty) {
        self.properties.insert(name.into(), property);
    }

    pub fn set_float(&mut self, name: impl Into<String>, value: f32) {
        self.set_property(name, MaterialProperty::Float(value));
    }

    pub fn set_color(&mut self, name: impl Into<String>, value: Color) {
        self.set_property(name, MaterialProperty::Color(value));
    }

    pub fn set_texture(&mut self, name: impl Into<String>, slot: TextureSlot) {
        self.set_property(name, MaterialProperty::Texture(slot));
    }

    pub fn enable_keyword(&mut self, keyword: impl Into<String>) {
        self.keywords.insert(keyword.into());
    }

    pub fn disable_keyword(&mut self, keyword: &str) {
        self.keywords.remove(keyword);
    }

    pub fn set_tag(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(tag.into(), value.into());
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn property(&self, name: &str) -> Option<&MaterialProperty> {
        self.properties.get(name)
    }

    /// Returns the float property `name`. Returns `None` if the property is
    /// missing or holds a different type.
    pub fn float(&self, name: &str) -> Option<f32> {
        match self.properties.get(name) {
            Some(MaterialProperty::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn color(&self, name: &str) -> Option<Color> {
        match self.properties.get(name) {
            Some(MaterialProperty::Color(c)) => Some(*c),
            _ => None,
        }
    }

    pub fn texture_slot(&self, name: &str) -> Option<&TextureSlot> {
        match self.properties.get(name) {
            Some(MaterialProperty::Texture(slot)) => Some(slot),
            _ => None,
        }
    }

    pub fn is_keyword_enabled(&self, keyword: &str) -> bool {
        self.keywords.contains(keyword)
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn tag(&self, tag: &str) -> Option<&str> {
        self.tags.get(tag).map(String::as_str)
    }
}
