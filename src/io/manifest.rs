//! JSON description of engine materials and textures.
//!
//! A manifest lists textures (with the image file holding their pixels) and
//! materials whose texture properties refer to those textures by id:
//!
//! ```json
//! {
//!   "textures": [
//!     { "id": 1, "path": "rock_albedo.png" },
//!     { "id": 2, "path": "rock_orm.png", "color_space": "linear" }
//!   ],
//!   "materials": [
//!     {
//!       "name": "Rock",
//!       "shader": "Standard",
//!       "keywords": ["_EMISSION"],
//!       "properties": {
//!         "_Color": [1.0, 0.9, 0.8, 1.0],
//!         "_Metallic": 0.0,
//!         "_MainTex": { "texture": 1, "scale": [2.0, 2.0] },
//!         "_MetallicGlossMap": { "texture": 2 },
//!         "_OcclusionMap": { "texture": 2 }
//!       }
//!     }
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Deserialize;

use crate::core::color::Color;
use crate::core::material::{MaterialProperty, SourceMaterial};
use crate::core::texture::{
    ColorSpace, FilterMode, NormalLayout, SourceTexture, TextureDimension, TextureId, TextureSlot,
    TextureWrapMode,
};

#[remain::sorted]
#[derive(Debug, thiserror::Error)]
pub enum Err {
    #[error("Texture id {0} is declared more than once")]
    DuplicateTexture(u64),
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Manifest parse error: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Material \"{material}\" refers to unknown texture id {texture}")]
    UnknownTexture { material: String, texture: u64 },
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub textures: Vec<TextureEntry>,
    #[serde(default)]
    pub materials: Vec<MaterialEntry>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TextureEntry {
    pub id: u64,
    /// Defaults to the file stem of `path`.
    #[serde(default)]
    pub name: Option<String>,
    /// Image file, relative to the manifest. Without it the texture has no
    /// readable pixels.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub dimension: TextureDimension,
    #[serde(default)]
    pub color_space: ColorSpace,
    #[serde(default)]
    pub filter: FilterMode,
    #[serde(default)]
    pub wrap_u: TextureWrapMode,
    #[serde(default)]
    pub wrap_v: TextureWrapMode,
    #[serde(default)]
    pub normal_layout: NormalLayout,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MaterialEntry {
    pub name: String,
    #[serde(default)]
    pub shader: String,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyEntry>,
}

/// A material property: a number, an RGBA array or a texture reference.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum PropertyEntry {
    Float(f32),
    Color(Color),
    Texture(TextureRef),
}

#[derive(Clone, Debug, Deserialize)]
pub struct TextureRef {
    /// `None` leaves the slot empty.
    #[serde(default)]
    pub texture: Option<u64>,
    #[serde(default)]
    pub offset: [f32; 2],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 2],
}

fn unit_scale() -> [f32; 2] {
    [1.0, 1.0]
}

impl Manifest {
    pub fn from_json_str(json: &str) -> Result<Self, Err> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads the manifest at `path` and builds its materials, loading texture
    /// images relative to the manifest's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<SourceMaterial>, Err> {
        let path = path.as_ref();
        let manifest = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        manifest.into_materials(base_dir)
    }

    pub fn into_materials(self, base_dir: &Path) -> Result<Vec<SourceMaterial>, Err> {
        let textures = load_textures(&self.textures, base_dir)?;
        self.materials
            .into_iter()
            .map(|entry| build_material(entry, &textures))
            .collect()
    }
}

fn load_textures(
    entries: &[TextureEntry],
    base_dir: &Path,
) -> Result<HashMap<u64, Arc<SourceTexture>>, Err> {
    let loaded: Vec<(u64, Arc<SourceTexture>)> = entries
        .par_iter()
        .map(|entry| (entry.id, load_texture(entry, base_dir).into_shared()))
        .collect();

    let mut textures = HashMap::with_capacity(loaded.len());
    for (id, texture) in loaded {
        if textures.insert(id, texture).is_some() {
            return Err(Err::DuplicateTexture(id));
        }
    }
    Ok(textures)
}

fn load_texture(entry: &TextureEntry, base_dir: &Path) -> SourceTexture {
    let name = entry.name.clone().unwrap_or_else(|| {
        entry
            .path
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    });

    let mut texture = SourceTexture::new(TextureId(entry.id), name)
        .with_dimension(entry.dimension)
        .with_color_space(entry.color_space)
        .with_filter_mode(entry.filter)
        .with_wrap_mode(entry.wrap_u, entry.wrap_v)
        .with_normal_layout(entry.normal_layout);

    if let Some(path) = &entry.path {
        let full_path = base_dir.join(path);
        match image::open(&full_path) {
            Ok(pixels) => texture = texture.with_pixels(pixels),
            Err(e) => {
                tracing::warn!(texture = entry.id, path = %full_path.display(), error = %e, "failed to load texture image");
            }
        }
    }
    texture
}

fn build_material(
    entry: MaterialEntry,
    textures: &HashMap<u64, Arc<SourceTexture>>,
) -> Result<SourceMaterial, Err> {
    let mut material = SourceMaterial::new(entry.name, entry.shader);
    for (tag, value) in entry.tags {
        material.set_tag(tag, value);
    }
    for keyword in entry.keywords {
        material.enable_keyword(keyword);
    }
    for (name, property) in entry.properties {
        let property = match property {
            PropertyEntry::Float(v) => MaterialProperty::Float(v),
            PropertyEntry::Color(c) => MaterialProperty::Color(c),
            PropertyEntry::Texture(r) => {
                let slot = match r.texture {
                    Some(id) => {
                        let texture = textures.get(&id).ok_or_else(|| Err::UnknownTexture {
                            material: material.name().to_string(),
                            texture: id,
                        })?;
                        TextureSlot::new(texture.clone())
                    }
                    None => TextureSlot::empty(),
                };
                MaterialProperty::Texture(slot.with_offset(r.offset).with_scale(r.scale))
            }
        };
        material.set_property(name, property);
    }
    Ok(material)
}
