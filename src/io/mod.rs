/// Sampler import from glTF documents.
pub mod gltf;

/// JSON manifests describing engine materials and textures.
pub mod manifest;
