use std::sync::Arc;

use crate::core::texture::SourceTexture;

/// How the occlusion map relates to the metallic-roughness map.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OcclusionPacking {
    /// No occlusion map.
    Absent,
    /// Occlusion lives in the red channel of the metallic-roughness image and
    /// reuses its texture reference.
    Packed,
    /// Occlusion is exported as an image of its own.
    Separate,
}

/// Two references denote the same texture iff their handles are equal.
/// Pixel content is never compared.
pub fn is_same_texture(a: &SourceTexture, b: &SourceTexture) -> bool {
    a.id() == b.id()
}

pub fn resolve_occlusion_packing(
    metallic_roughness: Option<&Arc<SourceTexture>>,
    occlusion: Option<&Arc<SourceTexture>>,
) -> OcclusionPacking {
    match (metallic_roughness, occlusion) {
        (_, None) => OcclusionPacking::Absent,
        (Some(mr), Some(occ)) if is_same_texture(mr, occ) => OcclusionPacking::Packed,
        (_, Some(_)) => OcclusionPacking::Separate,
    }
}
