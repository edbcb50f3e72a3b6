/// Helpers shared by material converters (alpha mode, culling, texture slot export).
pub mod common;

/// Deferred image encoding and encoding policies.
pub mod image;

/// Engine material to glTF material conversion.
pub mod material;

/// Occlusion / metallic-roughness channel packing.
pub mod packing;

/// `KHR_texture_transform` resolution.
pub mod transform;

/// The glTF writer: image, texture, sampler and extension registries.
pub mod writer;
