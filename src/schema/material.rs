use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlphaMode {
    #[default]
    Opaque,
    Mask,
    Blend,
}

impl AlphaMode {
    fn is_opaque(&self) -> bool {
        *self == AlphaMode::Opaque
    }
}

/// glTF material. Created fresh per conversion and owned by the caller.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Material {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pbr_metallic_roughness: Option<PbrMetallicRoughness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal_texture: Option<NormalTextureInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occlusion_texture: Option<OcclusionTextureInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissive_texture: Option<TextureInfo>,
    #[serde(skip_serializing_if = "is_black")]
    pub emissive_factor: [f32; 3],
    #[serde(skip_serializing_if = "AlphaMode::is_opaque")]
    pub alpha_mode: AlphaMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_cutoff: Option<f32>,
    #[serde(skip_serializing_if = "is_false")]
    pub double_sided: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<MaterialExtensions>,
}

impl Material {
    pub fn pbr(&self) -> Option<&PbrMetallicRoughness> {
        self.pbr_metallic_roughness.as_ref()
    }

    pub fn pbr_mut(&mut self) -> &mut PbrMetallicRoughness {
        self.pbr_metallic_roughness.get_or_insert_with(Default::default)
    }

    pub fn extensions_mut(&mut self) -> &mut MaterialExtensions {
        self.extensions.get_or_insert_with(Default::default)
    }

    pub fn is_unlit(&self) -> bool {
        self.extensions.as_ref().is_some_and(|e| e.unlit.is_some())
    }

    /// Rewrites every texture index through `remap`. References mapped to
    /// `None` are removed.
    pub fn remap_textures<F: Fn(usize) -> Option<usize>>(&mut self, remap: F) {
        fn apply<T: TextureInfoLike>(slot: &mut Option<T>, remap: &dyn Fn(usize) -> Option<usize>) {
            *slot = slot.take().and_then(|mut info| {
                let index = remap(info.index())?;
                info.set_index(index);
                Some(info)
            });
        }
        if let Some(pbr) = self.pbr_metallic_roughness.as_mut() {
            apply(&mut pbr.base_color_texture, &remap);
            apply(&mut pbr.metallic_roughness_texture, &remap);
        }
        apply(&mut self.normal_texture, &remap);
        apply(&mut self.occlusion_texture, &remap);
        apply(&mut self.emissive_texture, &remap);
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PbrMetallicRoughness {
    #[serde(skip_serializing_if = "is_white")]
    pub base_color_factor: [f32; 4],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_color_texture: Option<TextureInfo>,
    #[serde(skip_serializing_if = "is_one")]
    pub metallic_factor: f32,
    #[serde(skip_serializing_if = "is_one")]
    pub roughness_factor: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metallic_roughness_texture: Option<TextureInfo>,
}

impl Default for PbrMetallicRoughness {
    fn default() -> Self {
        Self {
            base_color_factor: [1.0; 4],
            base_color_texture: None,
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            metallic_roughness_texture: None,
        }
    }
}

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct MaterialExtensions {
    #[serde(rename = "KHR_materials_unlit", skip_serializing_if = "Option::is_none", default)]
    pub unlit: Option<MaterialUnlit>,
    #[serde(
        rename = "KHR_materials_emissive_strength",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub emissive_strength: Option<EmissiveStrength>,
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct MaterialUnlit {}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissiveStrength {
    pub emissive_strength: f32,
}


/// Common access to the texture info variants, so that extension blocks can
/// be attached uniformly.
pub trait TextureInfoLike {
    fn index(&self) -> usize;
    fn set_index(&mut self, index: usize);
    fn tex_coord(&self) -> u32;
    fn set_tex_coord(&mut self, tex_coord: u32);
    fn extensions(&self) -> Option<&TextureInfoExtensions>;
    fn extensions_mut(&mut self) -> &mut Option<TextureInfoExtensions>;

    fn texture_transform(&self) -> Option<&TextureTransform> {
        self.extensions().and_then(|e| e.texture_transform.as_ref())
    }
}

macro_rules! impl_texture_info_like {
    ($($t:ty),*) => {
        $(
            impl TextureInfoLike for $t {
                fn index(&self) -> usize { self.index }
                fn set_index(&mut self, index: usize) { self.index = index }
                fn tex_coord(&self) -> u32 { self.tex_coord }
                fn set_tex_coord(&mut self, tex_coord: u32) { self.tex_coord = tex_coord }
                fn extensions(&self) -> Option<&TextureInfoExtensions> { self.extensions.as_ref() }
                fn extensions_mut(&mut self) -> &mut Option<TextureInfoExtensions> { &mut self.extensions }
            }
        )*
    };
}

impl_texture_info_like!(TextureInfo, NormalTextureInfo, OcclusionTextureInfo);

/// Reference to a glTF texture. `index` points into the writer's texture
/// list.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureInfo {
    pub index: usize,
    #[serde(skip_serializing_if = "is_zero", default)]
    pub tex_coord: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub extensions: Option<TextureInfoExtensions>,
}

impl TextureInfo {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            tex_coord: 0,
            extensions: None,
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalTextureInfo {
    pub index: usize,
    #[serde(skip_serializing_if = "is_zero", default)]
    pub tex_coord: u32,
    #[serde(skip_serializing_if = "is_one", default = "one")]
    pub scale: f32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub extensions: Option<TextureInfoExtensions>,
}

impl NormalTextureInfo {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            tex_coord: 0,
            scale: 1.0,
            extensions: None,
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcclusionTextureInfo {
    pub index: usize,
    #[serde(skip_serializing_if = "is_zero", default)]
    pub tex_coord: u32,
    #[serde(skip_serializing_if = "is_one", default = "one")]
    pub strength: f32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub extensions: Option<TextureInfoExtensions>,
}

impl OcclusionTextureInfo {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            tex_coord: 0,
            strength: 1.0,
            extensions: None,
        }
    }
}

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct TextureInfoExtensions {
    #[serde(rename = "KHR_texture_transform", skip_serializing_if = "Option::is_none", default)]
    pub texture_transform: Option<TextureTransform>,
}

/// `KHR_texture_transform` payload.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureTransform {
    pub offset: [f32; 2],
    pub scale: [f32; 2],
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tex_coord: Option<u32>,
}


fn is_false(v: &bool) -> bool { !*v }
fn is_zero(v: &u32) -> bool { *v == 0 }
fn is_one(v: &f32) -> bool { *v == 1.0 }
fn one() -> f32 { 1.0 }
fn is_black(c: &[f32; 3]) -> bool { c.iter().all(|v| *v == 0.0) }
fn is_white(c: &[f32; 4]) -> bool { c.iter().all(|v| *v == 1.0) }
