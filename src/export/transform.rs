use crate::export::writer::GltfWritable;
use crate::schema::{Extension, TextureInfoLike, TextureTransform};

const IDENTITY_OFFSET: [f32; 2] = [0.0, 0.0];
const IDENTITY_SCALE: [f32; 2] = [1.0, 1.0];

/// Returns the `KHR_texture_transform` block for a UV offset and scale, or
/// `None` for the identity transform.
pub fn resolve_texture_transform(offset: [f32; 2], scale: [f32; 2]) -> Option<TextureTransform> {
    if offset == IDENTITY_OFFSET && scale == IDENTITY_SCALE {
        return None;
    }
    Some(TextureTransform {
        offset,
        scale,
        tex_coord: None,
    })
}

/// Attaches the transform to `info` and registers the extension on the
/// writer if the transform is not the identity. Returns true if a block was
/// attached.
pub fn export_texture_transform<T: TextureInfoLike + ?Sized>(
    info: &mut T,
    offset: [f32; 2],
    scale: [f32; 2],
    writer: &mut dyn GltfWritable,
) -> bool {
    let Some(transform) = resolve_texture_transform(offset, scale) else {
        return false;
    };
    writer.register_extension_usage(Extension::TextureTransform);
    info.extensions_mut()
        .get_or_insert_with(Default::default)
        .texture_transform = Some(transform);
    true
}
