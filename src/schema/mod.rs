//! glTF 2.0 objects produced by the exporter. Fields equal to their glTF
//! default are omitted on serialization.

mod extension;
mod material;
mod root;
mod sampler;

pub use extension::Extension;
pub use material::{
    AlphaMode, EmissiveStrength, Material, MaterialExtensions, MaterialUnlit, NormalTextureInfo,
    OcclusionTextureInfo, PbrMetallicRoughness, TextureInfo, TextureInfoExtensions,
    TextureInfoLike, TextureTransform,
};
pub use root::{Asset, Buffer, BufferView, Image, Root, Texture};
pub use sampler::{MagFilterMode, MinFilterMode, Sampler, WrapMode};
