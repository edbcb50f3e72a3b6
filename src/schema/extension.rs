use serde::{Serialize, Serializer};

/// glTF extensions the exporter may emit.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Extension {
    MaterialsEmissiveStrength,
    MaterialsUnlit,
    TextureTransform,
}

impl Extension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Extension::MaterialsEmissiveStrength => "KHR_materials_emissive_strength",
            Extension::MaterialsUnlit => "KHR_materials_unlit",
            Extension::TextureTransform => "KHR_texture_transform",
        }
    }

    /// Whether a loader has to support the extension to display the asset
    /// correctly. Extensions with a sensible fallback are only "used".
    pub fn is_required(&self) -> bool {
        match self {
            Extension::TextureTransform => true,
            Extension::MaterialsEmissiveStrength | Extension::MaterialsUnlit => false,
        }
    }
}

impl std::fmt::Display for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Extension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
