use std::sync::Arc;

use crate::core::color::Color;
use crate::core::material::{names, SourceMaterial};
use crate::core::texture::{SourceTexture, TextureSlot};

/// How the engine blends the material with what is behind it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum RenderMode {
    #[default]
    Opaque,
    Cutout,
    Transparent,
}

/// A populated texture slot: the texture, its UV transform and UV set.
#[derive(Clone, Debug)]
pub struct MapSlot {
    pub texture: Arc<SourceTexture>,
    pub offset: [f32; 2],
    pub scale: [f32; 2],
    pub uv_channel: u32,
}

#[derive(Clone, Debug, Default)]
pub struct Emission {
    pub color: Option<Color>,
    pub map: Option<MapSlot>,
}

#[derive(Clone, Debug)]
pub struct NormalMap {
    pub map: MapSlot,
    pub scale: f32,
}

/// Everything the converter reads from a [`SourceMaterial`], looked up once.
///
/// Colours are kept in the engine's (gamma) space; the converter decides
/// which conversions apply.
#[derive(Clone, Debug)]
pub struct MaterialDescriptor {
    pub name: String,
    pub unlit: bool,
    pub render_mode: RenderMode,
    pub alpha_cutoff: f32,
    pub double_sided: bool,
    pub base_color: Color,
    pub base_color_map: Option<MapSlot>,
    pub metallic: f32,
    pub roughness: f32,
    /// Present iff the emission keyword is enabled.
    pub emission: Option<Emission>,
    /// Present iff one of the normal map keywords is enabled and the slot
    /// holds a texture.
    pub normal: Option<NormalMap>,
    pub metallic_roughness_map: Option<MapSlot>,
    pub occlusion_map: Option<MapSlot>,
    pub occlusion_strength: f32,
}

/// Cull mode value meaning "render both faces".
const CULL_OFF: f32 = 0.0;
const DEFAULT_ALPHA_CUTOFF: f32 = 0.5;

impl MaterialDescriptor {
    pub fn resolve(source: &SourceMaterial) -> Self {
        let render_mode = match source.tag(names::TAG_RENDER_TYPE) {
            Some(names::RENDER_TYPE_CUTOUT) => RenderMode::Cutout,
            Some(names::RENDER_TYPE_TRANSPARENT) => RenderMode::Transparent,
            _ => RenderMode::Opaque,
        };

        let roughness = source
            .float(names::ROUGHNESS)
            .or_else(|| source.float(names::SMOOTHNESS).map(|s| 1.0 - s))
            .or_else(|| source.float(names::GLOSSINESS).map(|s| 1.0 - s))
            .unwrap_or(1.0);

        let emission = source
            .is_keyword_enabled(names::KEYWORD_EMISSION)
            .then(|| Emission {
                color: source.color(names::EMISSION_COLOR),
                map: map_slot(source, names::EMISSION_MAP),
            });

        let normal_enabled = source.is_keyword_enabled(names::KEYWORD_NORMAL_MAP)
            || source.is_keyword_enabled(names::KEYWORD_BUMP_MAP);
        let normal = if normal_enabled {
            first_map_slot(source, &[names::BUMP_MAP, names::NORMAL_MAP]).map(|map| NormalMap {
                map,
                scale: source.float(names::BUMP_SCALE).unwrap_or(1.0),
            })
        } else {
            None
        };

        Self {
            name: strip_instance_suffix(source.name()).to_string(),
            unlit: is_unlit(source),
            render_mode,
            alpha_cutoff: source.float(names::CUTOFF).unwrap_or(DEFAULT_ALPHA_CUTOFF),
            double_sided: source.float(names::CULL) == Some(CULL_OFF),
            base_color: source
                .color(names::BASE_COLOR)
                .or_else(|| source.color(names::COLOR))
                .unwrap_or(Color::WHITE),
            base_color_map: first_map_slot(source, &[names::BASE_MAP, names::MAIN_TEX]),
            metallic: source.float(names::METALLIC).unwrap_or(0.0),
            roughness,
            emission,
            normal,
            metallic_roughness_map: map_slot(source, names::METALLIC_GLOSS_MAP),
            occlusion_map: map_slot(source, names::OCCLUSION_MAP),
            occlusion_strength: source.float(names::OCCLUSION_STRENGTH).unwrap_or(1.0),
        }
    }
}

fn is_unlit(source: &SourceMaterial) -> bool {
    source.is_keyword_enabled(names::KEYWORD_UNLIT)
        || source.shader().rsplit('/').next().is_some_and(|s| s.ends_with("Unlit"))
}

/// Removes every trailing engine instance suffix from a material name.
pub fn strip_instance_suffix(name: &str) -> &str {
    let mut name = name;
    while let Some(stripped) = name.strip_suffix(names::INSTANCE_SUFFIX) {
        name = stripped;
    }
    name
}

fn map_slot(source: &SourceMaterial, property: &str) -> Option<MapSlot> {
    let slot: &TextureSlot = source.texture_slot(property)?;
    let texture = slot.texture()?.clone();
    let uv_channel = source
        .float(&format!("{}{}", property, names::TEX_COORD_SUFFIX))
        .map(|v| v.max(0.0).round() as u32)
        .unwrap_or(0);
    Some(MapSlot {
        texture,
        offset: slot.offset(),
        scale: slot.scale(),
        uv_channel,
    })
}

fn first_map_slot(source: &SourceMaterial, properties: &[&str]) -> Option<MapSlot> {
    properties.iter().find_map(|p| map_slot(source, p))
}
