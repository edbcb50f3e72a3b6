//! Helpers shared by material converters.

use std::sync::Arc;

use crate::core::descriptor::{MapSlot, MaterialDescriptor, RenderMode};
use crate::core::texture::SourceTexture;
use crate::export::transform::export_texture_transform;
use crate::export::writer::GltfWritable;
use crate::logging::{CodeLogger, LogCode};
use crate::schema::{AlphaMode, Material, TextureInfoLike};

/// Channel names reported to the logger.
pub mod channel {
    pub const BASE_COLOR: &str = "baseColor";
    pub const EMISSION: &str = "emission";
    pub const NORMAL: &str = "normal";
    pub const METALLIC_ROUGHNESS: &str = "metallicRoughness";
    pub const OCCLUSION: &str = "occlusion";
}

pub fn alpha_mode(render_mode: RenderMode) -> AlphaMode {
    match render_mode {
        RenderMode::Opaque => AlphaMode::Opaque,
        RenderMode::Cutout => AlphaMode::Mask,
        RenderMode::Transparent => AlphaMode::Blend,
    }
}

/// Sets alpha mode, alpha cutoff (mask mode only) and double sidedness.
pub fn set_alpha_mode_and_culling(material: &mut Material, descriptor: &MaterialDescriptor) {
    material.alpha_mode = alpha_mode(descriptor.render_mode);
    material.alpha_cutoff = (material.alpha_mode == AlphaMode::Mask).then_some(descriptor.alpha_cutoff);
    material.double_sided = descriptor.double_sided;
}

/// Exports one texture slot through `export`.
///
/// Returns the texture info, if any, and whether the slot is free of errors.
/// A non-2D texture is an error; an unreadable one only yields a warning and
/// no texture info.
pub fn export_map<T, F>(
    map: &MapSlot,
    channel: &str,
    material_name: &str,
    writer: &mut dyn GltfWritable,
    logger: &mut dyn CodeLogger,
    export: F,
) -> (Option<T>, bool)
where
    T: TextureInfoLike,
    F: FnOnce(&mut dyn GltfWritable, &Arc<SourceTexture>) -> Option<T>,
{
    if !map.texture.is_2d() {
        logger.error(LogCode::TextureInvalidType, channel, material_name);
        return (None, false);
    }
    let Some(mut info) = export(&mut *writer, &map.texture) else {
        logger.warning(LogCode::TextureNotReadable, channel, material_name);
        return (None, true);
    };
    apply_slot_mapping(&mut info, map, writer);
    (Some(info), true)
}

/// Copies the UV set and UV transform of `map` onto `info`.
pub fn apply_slot_mapping<T: TextureInfoLike + ?Sized>(
    info: &mut T,
    map: &MapSlot,
    writer: &mut dyn GltfWritable,
) {
    info.set_tex_coord(map.uv_channel);
    export_texture_transform(info, map.offset, map.scale, writer);
}
