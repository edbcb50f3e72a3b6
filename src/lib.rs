// lib.rs

/// Contains the engine-side object model: source materials, source textures
/// and the typed descriptor resolved from them.
pub mod core;

/// Contains the glTF 2.0 schema objects produced by the exporter.
pub mod schema;

/// Contains the material conversion pipeline and the glTF writer.
pub mod export;

/// Contains readers for glTF files and material manifests.
pub mod io;

/// Structured, non-fatal reporting of conversion problems.
pub mod logging;

/// Export settings.
pub mod config;


/// Contains the most commonly used traits, types, and objects.
pub mod prelude {
    pub use crate::config::{ExportSettings, ImageDestination, ImageFormatSetting, JsonOutputMode};
    pub use crate::core::color::Color;
    pub use crate::core::material::{MaterialProperty, SourceMaterial};
    pub use crate::core::shared::ConfigType;
    pub use crate::core::texture::{
        ColorSpace, FilterMode, NormalLayout, SourceTexture, TextureDimension, TextureId,
        TextureSlot, TextureWrapMode,
    };
    pub use crate::export::material::{MaterialExport, MaterialExporter};
    pub use crate::export::writer::{GltfOutput, GltfWriter};
    pub use crate::logging::{CodeLogger, CollectLogger, LogCode, TracingLogger};
}
