use std::path::Path;

use serde::Deserialize;

use crate::core::shared::ConfigType;

#[remain::sorted]
#[derive(Debug, thiserror::Error)]
pub enum Err {
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Settings parse error: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Image container format requested for exported images.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormatSetting {
    /// JPEG for opaque colour images, PNG for everything else.
    #[default]
    Auto,
    Png,
    Jpeg,
}

/// Where encoded image bytes end up in the output.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageDestination {
    /// Appended to the binary buffer and referenced through buffer views.
    #[default]
    BufferView,
    /// Embedded in the JSON as base64 data URIs.
    DataUri,
    /// Written as separate files next to the glTF file.
    External,
}

/// JSON output modes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonOutputMode {
    Compact,
    #[default]
    Readable,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub image_format: ImageFormatSetting,
    pub jpeg_quality: u8,
    pub image_destination: ImageDestination,
    /// Emit `KHR_materials_emissive_strength` for HDR emission instead of
    /// discarding the intensity lost by clamping.
    pub emissive_strength: bool,
    pub json_output_mode: JsonOutputMode,
    pub generator: String,
    pub copyright: Option<String>,
}

impl ConfigType for ExportSettings {
    fn default() -> Self {
        Self {
            image_format: ImageFormatSetting::Auto,
            jpeg_quality: 90,
            image_destination: ImageDestination::BufferView,
            emissive_strength: false,
            json_output_mode: JsonOutputMode::Readable,
            generator: concat!("gltf-material-bridge ", env!("CARGO_PKG_VERSION")).to_string(),
            copyright: None,
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        <Self as ConfigType>::default()
    }
}

impl ExportSettings {
    pub fn from_json_str(json: &str) -> Result<Self, Err> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Err> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), Err> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(Err::InvalidSettings(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}
