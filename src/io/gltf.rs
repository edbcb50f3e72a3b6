use std::path::Path;

use ::gltf::texture::{MagFilter, MinFilter, WrappingMode};

use crate::schema::{MagFilterMode, MinFilterMode, Sampler, WrapMode};

#[remain::sorted]
#[derive(Debug, thiserror::Error)]
pub enum Err {
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to load glTF: {0}")]
    LoadError(#[from] ::gltf::Error),
}

/// Reads the samplers declared by a glTF document (JSON or GLB).
///
/// Filters the document leaves unspecified come back as `None`, so that the
/// caller can substitute its own defaults with [`Sampler::apply`].
pub fn read_samplers(bytes: &[u8]) -> Result<Vec<Sampler>, Err> {
    let document = match ::gltf::Gltf::from_slice(bytes) {
        Ok(gltf) => gltf.document,
        Err(e) => {
            tracing::debug!(error = %e, "glTF validation failed, retrying without validation");
            load_without_validation(bytes)?
        }
    };
    Ok(document.samplers().map(|s| convert_sampler(&s)).collect())
}

pub fn read_samplers_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Sampler>, Err> {
    let bytes = std::fs::read(path)?;
    read_samplers(&bytes)
}

fn load_without_validation(bytes: &[u8]) -> Result<::gltf::Document, Err> {
    if bytes.len() >= 12 && &bytes[0..4] == b"glTF" {
        let glb = ::gltf::Glb::from_slice(bytes)?;
        Ok(::gltf::Gltf::from_slice_without_validation(&glb.json)?.document)
    } else {
        Ok(::gltf::Gltf::from_slice_without_validation(bytes)?.document)
    }
}

fn convert_sampler(sampler: &::gltf::texture::Sampler<'_>) -> Sampler {
    Sampler {
        mag_filter: match sampler.mag_filter() {
            None => MagFilterMode::None,
            Some(MagFilter::Nearest) => MagFilterMode::Nearest,
            Some(MagFilter::Linear) => MagFilterMode::Linear,
        },
        min_filter: match sampler.min_filter() {
            None => MinFilterMode::None,
            Some(MinFilter::Nearest) => MinFilterMode::Nearest,
            Some(MinFilter::Linear) => MinFilterMode::Linear,
            Some(MinFilter::NearestMipmapNearest) => MinFilterMode::NearestMipmapNearest,
            Some(MinFilter::LinearMipmapNearest) => MinFilterMode::LinearMipmapNearest,
            Some(MinFilter::NearestMipmapLinear) => MinFilterMode::NearestMipmapLinear,
            Some(MinFilter::LinearMipmapLinear) => MinFilterMode::LinearMipmapLinear,
        },
        wrap_s: convert_wrap(sampler.wrap_s()),
        wrap_t: convert_wrap(sampler.wrap_t()),
    }
}

fn convert_wrap(mode: WrappingMode) -> WrapMode {
    match mode {
        WrappingMode::ClampToEdge => WrapMode::ClampToEdge,
        WrappingMode::MirroredRepeat => WrapMode::MirroredRepeat,
        WrappingMode::Repeat => WrapMode::Repeat,
    }
}
