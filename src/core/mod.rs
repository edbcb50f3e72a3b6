/// RGBA colours and colour-space conversion.
pub mod color;

/// Engine material snapshots: property bags keyed by name.
pub mod material;

/// Typed view of a source material, resolved once per conversion.
pub mod descriptor;

/// Engine textures and texture slots.
pub mod texture;

pub mod shared;
