use std::collections::{BTreeSet, HashSet};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use base64::Engine as _;
use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;

use crate::config::{ExportSettings, ImageDestination, ImageFormatSetting, JsonOutputMode};
use crate::core::material::SourceMaterial;
use crate::core::texture::SourceTexture;
use crate::export::image::{self as image_export, EncodingPolicy, ImageExport, ImageKey};
use crate::export::material::MaterialExport;
use crate::logging::CodeLogger;
use crate::schema::{
    Asset, Buffer, BufferView, Extension, Image, Material, NormalTextureInfo, Root, Sampler,
    Texture, TextureInfo,
};

#[remain::sorted]
#[derive(Debug, thiserror::Error)]
pub enum Err {
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON Error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// The writer side consumed by material converters.
///
/// The texture info helpers return `None` when no image could be registered
/// for the texture. A returned `index` always refers to a registered
/// texture.
pub trait GltfWritable {
    fn image_format(&self) -> ImageFormatSetting;

    /// Marks `extension` as used by the asset. Registering twice is a no-op.
    fn register_extension_usage(&mut self, extension: Extension);

    /// Registers a deferred image encode and returns its image index.
    /// Exports of the same texture with the same policy share one index.
    fn add_image_export(&mut self, export: ImageExport) -> Option<usize>;

    /// Returns the index of the texture combining `image` with a sampler
    /// matching `texture`'s filter and wrap modes.
    fn add_texture(&mut self, image: usize, texture: &SourceTexture) -> usize;

    fn export_texture_info(&mut self, texture: &Arc<SourceTexture>, alpha: bool) -> Option<TextureInfo> {
        let policy = EncodingPolicy::color(alpha, self.image_format());
        let image = self.add_image_export(ImageExport::new(texture.clone(), policy))?;
        Some(TextureInfo::new(self.add_texture(image, texture)))
    }

    fn export_normal_texture_info(&mut self, texture: &Arc<SourceTexture>) -> Option<NormalTextureInfo> {
        let policy = EncodingPolicy::normal(self.image_format());
        let image = self.add_image_export(ImageExport::new(texture.clone(), policy))?;
        Some(NormalTextureInfo::new(self.add_texture(image, texture)))
    }

    fn export_linear_texture_info(&mut self, texture: &Arc<SourceTexture>) -> Option<TextureInfo> {
        let policy = EncodingPolicy::linear(self.image_format());
        let image = self.add_image_export(ImageExport::new(texture.clone(), policy))?;
        Some(TextureInfo::new(self.add_texture(image, texture)))
    }
}


/// Collects converted materials together with the images, textures, samplers
/// and extensions they reference, and assembles the glTF document.
///
/// Not synchronized: converting materials in parallel requires one writer per
/// worker or external locking.
#[derive(Debug)]
pub struct GltfWriter {
    settings: ExportSettings,
    image_exports: IndexMap<ImageKey, ImageExport>,
    textures: IndexSet<Texture>,
    samplers: IndexSet<Sampler>,
    materials: Vec<Material>,
    extensions_used: BTreeSet<Extension>,
    extensions_required: BTreeSet<Extension>,
}

impl Default for GltfWriter {
    fn default() -> Self {
        Self::new(ExportSettings::default())
    }
}

impl GltfWriter {
    pub fn new(settings: ExportSettings) -> Self {
        Self {
            settings,
            image_exports: IndexMap::new(),
            textures: IndexSet::new(),
            samplers: IndexSet::new(),
            materials: Vec::new(),
            extensions_used: BTreeSet::new(),
            extensions_required: BTreeSet::new(),
        }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Converts `source` and appends the result. Returns the material index
    /// and whether every channel converted cleanly. The material is added
    /// even when conversion was only partially successful.
    pub fn add_material(
        &mut self,
        source: &SourceMaterial,
        exporter: &dyn MaterialExport,
        logger: &mut dyn CodeLogger,
    ) -> (usize, bool) {
        let (material, success) = exporter.convert_material(source, self, logger);
        (self.push_material(material), success)
    }

    pub fn push_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn image_exports(&self) -> impl Iterator<Item = &ImageExport> {
        self.image_exports.values()
    }

    pub fn image_count(&self) -> usize {
        self.image_exports.len()
    }

    pub fn texture(&self, index: usize) -> Option<&Texture> {
        self.textures.get_index(index)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn sampler(&self, index: usize) -> Option<&Sampler> {
        self.samplers.get_index(index)
    }

    pub fn sampler_count(&self) -> usize {
        self.samplers.len()
    }

    pub fn is_extension_used(&self, extension: Extension) -> bool {
        self.extensions_used.contains(&extension)
    }

    pub fn is_extension_required(&self, extension: Extension) -> bool {
        self.extensions_required.contains(&extension)
    }

    pub fn extensions_used(&self) -> impl Iterator<Item = Extension> + '_ {
        self.extensions_used.iter().copied()
    }

    /// Encodes all registered images and assembles the document.
    ///
    /// Images are encoded in parallel; each encode depends only on its
    /// texture and policy. An image that fails to encode is left out of the
    /// document together with the textures sampling it, and every material
    /// reference to those textures is removed.
    pub fn finish(self) -> GltfOutput {
        let GltfWriter {
            settings,
            image_exports,
            textures,
            samplers,
            mut materials,
            extensions_used,
            extensions_required,
        } = self;

        let exports: Vec<ImageExport> = image_exports.into_values().collect();
        let quality = settings.jpeg_quality;
        let results: Vec<Result<Vec<u8>, image_export::Err>> =
            exports.par_iter().map(|export| export.encode(quality)).collect();

        let mut image_remap = Vec::with_capacity(exports.len());
        let mut encoded = Vec::with_capacity(exports.len());
        let mut omitted_images = Vec::new();
        for (index, (export, result)) in exports.into_iter().zip(results).enumerate() {
            match result {
                Ok(bytes) => {
                    image_remap.push(Some(encoded.len()));
                    encoded.push((export, bytes));
                }
                Err(e) => {
                    let name = export.texture().name().to_string();
                    tracing::warn!(index, name = %name, error = %e, "failed to encode image, omitting it");
                    image_remap.push(None);
                    omitted_images.push(name);
                }
            }
        }

        let (textures, samplers, texture_remap) = compact_textures(textures, samplers, &image_remap);
        if !omitted_images.is_empty() {
            for material in &mut materials {
                material.remap_textures(|index| texture_remap.get(index).copied().flatten());
            }
        }

        let mut bin = Vec::new();
        let mut buffer_views = Vec::new();
        let mut images = Vec::with_capacity(encoded.len());
        let mut external_images = Vec::new();
        let mut used_names = HashSet::new();

        for (index, (export, bytes)) in encoded.into_iter().enumerate() {
            let file_name = unique_file_name(export.file_name(index), index, &mut used_names);
            let name = export.texture().name();
            let mut image = Image {
                name: (!name.is_empty()).then(|| name.to_string()),
                ..Default::default()
            };

            match settings.image_destination {
                ImageDestination::BufferView => {
                    let byte_offset = bin.len();
                    bin.extend_from_slice(&bytes);
                    pad_buffer(&mut bin);
                    buffer_views.push(BufferView {
                        buffer: 0,
                        byte_offset,
                        byte_length: bytes.len(),
                    });
                    image.buffer_view = Some(buffer_views.len() - 1);
                    image.mime_type = Some(export.mime_type().to_string());
                }
                ImageDestination::DataUri => {
                    let data = base64::engine::general_purpose::STANDARD.encode(&bytes);
                    image.uri = Some(format!("data:{};base64,{}", export.mime_type(), data));
                }
                ImageDestination::External => {
                    image.uri = Some(file_name.clone());
                    external_images.push(ExternalImage { file_name, bytes });
                }
            }
            images.push(image);
        }

        let buffers = if bin.is_empty() {
            Vec::new()
        } else {
            vec![Buffer { byte_length: bin.len(), uri: None }]
        };

        let root = Root {
            asset: Asset {
                generator: Some(settings.generator.clone()),
                copyright: settings.copyright.clone(),
                ..Default::default()
            },
            extensions_used: extensions_used.into_iter().collect(),
            extensions_required: extensions_required.into_iter().collect(),
            materials,
            textures,
            samplers,
            images,
            buffer_views,
            buffers,
        };

        GltfOutput {
            root,
            bin,
            external_images,
            omitted_images,
            json_output_mode: settings.json_output_mode,
        }
    }
}

/// Drops textures whose image was omitted and samplers no remaining texture
/// uses. Returns the surviving textures and samplers with rewritten indices,
/// and the old-to-new texture index map.
fn compact_textures(
    textures: IndexSet<Texture>,
    samplers: IndexSet<Sampler>,
    image_remap: &[Option<usize>],
) -> (Vec<Texture>, Vec<Sampler>, Vec<Option<usize>>) {
    let mut texture_remap = Vec::with_capacity(textures.len());
    let mut kept = Vec::with_capacity(textures.len());
    for texture in textures {
        match image_remap.get(texture.source).copied().flatten() {
            Some(source) => {
                texture_remap.push(Some(kept.len()));
                kept.push(Texture { source, ..texture });
            }
            None => texture_remap.push(None),
        }
    }

    let used: BTreeSet<usize> = kept.iter().filter_map(|t| t.sampler).collect();
    let mut sampler_remap = vec![None; samplers.len()];
    let mut kept_samplers = Vec::with_capacity(used.len());
    for (index, sampler) in samplers.into_iter().enumerate() {
        if used.contains(&index) {
            sampler_remap[index] = Some(kept_samplers.len());
            kept_samplers.push(sampler);
        }
    }
    for texture in &mut kept {
        texture.sampler = texture.sampler.and_then(|s| sampler_remap[s]);
    }

    (kept, kept_samplers, texture_remap)
}

/// Returns `file_name`, prefixed with `index` (and a counter if needed) when
/// an earlier image already took the name.
fn unique_file_name(file_name: String, index: usize, used: &mut HashSet<String>) -> String {
    if used.insert(file_name.clone()) {
        return file_name;
    }
    let mut candidate = format!("{}_{}", index, file_name);
    let mut attempt = 1;
    while !used.insert(candidate.clone()) {
        candidate = format!("{}_{}_{}", index, attempt, file_name);
        attempt += 1;
    }
    candidate
}

impl GltfWritable for GltfWriter {
    fn image_format(&self) -> ImageFormatSetting {
        self.settings.image_format
    }

    fn register_extension_usage(&mut self, extension: Extension) {
        if self.extensions_used.insert(extension) {
            tracing::debug!(extension = %extension, "extension registered");
        }
        if extension.is_required() {
            self.extensions_required.insert(extension);
        }
    }

    fn add_image_export(&mut self, export: ImageExport) -> Option<usize> {
        let texture = export.texture();
        if !texture.is_readable() {
            tracing::debug!(texture = %texture.id(), name = texture.name(), "texture is not readable");
            return None;
        }
        let key = export.key();
        if let Some(index) = self.image_exports.get_index_of(&key) {
            tracing::debug!(texture = %key.0, index, "image export reused");
            return Some(index);
        }
        let (index, _) = self.image_exports.insert_full(key, export);
        Some(index)
    }

    fn add_texture(&mut self, image: usize, texture: &SourceTexture) -> usize {
        let sampler = Sampler::for_texture(texture);
        let sampler = (!sampler.is_default()).then(|| self.samplers.insert_full(sampler).0);
        self.textures.insert_full(Texture { source: image, sampler }).0
    }
}

/// Pad `buffer` to 4 byte boundary.
fn pad_buffer(buffer: &mut Vec<u8>) {
    while buffer.len() % 4 != 0 {
        buffer.push(0);
    }
}


#[derive(Clone, Debug)]
pub struct ExternalImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Assembled glTF document plus the binary payloads it refers to.
#[derive(Clone, Debug)]
pub struct GltfOutput {
    root: Root,
    bin: Vec<u8>,
    external_images: Vec<ExternalImage>,
    omitted_images: Vec<String>,
    json_output_mode: JsonOutputMode,
}

impl GltfOutput {
    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn bin(&self) -> &[u8] {
        &self.bin
    }

    pub fn external_images(&self) -> &[ExternalImage] {
        &self.external_images
    }

    /// Names of the textures whose image failed to encode and was left out.
    pub fn omitted_images(&self) -> &[String] {
        &self.omitted_images
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, Err> {
        Ok(serde_json::to_value(&self.root)?)
    }

    pub fn to_json_string(&self) -> Result<String, Err> {
        Ok(match self.json_output_mode {
            JsonOutputMode::Compact => serde_json::to_string(&self.root)?,
            JsonOutputMode::Readable => serde_json::to_string_pretty(&self.root)?,
        })
    }

    /// Writes a glTF-Binary container: header, JSON chunk and, if any buffer
    /// data exists, a BIN chunk.
    pub fn write_glb<W: Write>(&self, writer: &mut W) -> Result<(), Err> {
        let json_data = serde_json::to_vec(&self.root)?;
        let json_padded_length = (json_data.len() + 3) & !3;
        let binary_padded_length = (self.bin.len() + 3) & !3;

        let total_length = 12 + 8 + json_padded_length
            + if binary_padded_length > 0 { 8 + binary_padded_length } else { 0 };

        writer.write_all(b"glTF")?;
        writer.write_all(&2u32.to_le_bytes())?;
        writer.write_all(&(total_length as u32).to_le_bytes())?;

        writer.write_all(&(json_padded_length as u32).to_le_bytes())?;
        writer.write_all(b"JSON")?;
        writer.write_all(&json_data)?;
        // JSON chunk is padded with spaces
        writer.write_all(&b"   "[..json_padded_length - json_data.len()])?;

        if binary_padded_length > 0 {
            writer.write_all(&(binary_padded_length as u32).to_le_bytes())?;
            writer.write_all(b"BIN\0")?;
            writer.write_all(&self.bin)?;
            writer.write_all(&[0u8; 3][..binary_padded_length - self.bin.len()])?;
        }
        Ok(())
    }

    pub fn to_glb(&self) -> Result<Vec<u8>, Err> {
        let mut out = Vec::new();
        self.write_glb(&mut out)?;
        Ok(out)
    }

    /// Writes the `.gltf` file, its `.bin` buffer (if any) and external
    /// images into the directory of `gltf_path`.
    pub fn write_gltf_files<P: AsRef<Path>>(&self, gltf_path: P) -> Result<(), Err> {
        let gltf_path = gltf_path.as_ref();
        let dir = gltf_path.parent().unwrap_or_else(|| Path::new("."));
        let stem = gltf_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "scene".to_string());

        let mut root = self.root.clone();
        if let Some(buffer) = root.buffers.first_mut() {
            let bin_name = format!("{}.bin", stem);
            std::fs::write(dir.join(&bin_name), &self.bin)?;
            buffer.uri = Some(bin_name);
        }

        let json = match self.json_output_mode {
            JsonOutputMode::Compact => serde_json::to_vec(&root)?,
            JsonOutputMode::Readable => serde_json::to_vec_pretty(&root)?,
        };
        std::fs::write(gltf_path, json)?;
        self.write_external_images(dir)
    }

    /// Writes the `.glb` container to `glb_path` and any external images
    /// next to it.
    pub fn write_glb_file<P: AsRef<Path>>(&self, glb_path: P) -> Result<(), Err> {
        let glb_path = glb_path.as_ref();
        let mut file = std::io::BufWriter::new(std::fs::File::create(glb_path)?);
        self.write_glb(&mut file)?;
        file.flush()?;
        self.write_external_images(glb_path.parent().unwrap_or_else(|| Path::new(".")))
    }

    /// Writes every external image into `dir` under its file name.
    pub fn write_external_images<P: AsRef<Path>>(&self, dir: P) -> Result<(), Err> {
        let dir = dir.as_ref();
        for image in &self.external_images {
            std::fs::write(dir.join(&image.file_name), &image.bytes)?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::texture::{FilterMode, TextureId, TextureWrapMode};
    use image::{DynamicImage, Rgba, RgbaImage};

    fn readable(id: u64) -> Arc<SourceTexture> {
        SourceTexture::new(TextureId(id), format!("tex{}", id))
            .with_pixels(DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]))))
            .into_shared()
    }

    #[test]
    fn test_image_dedup() {
        let mut writer = GltfWriter::default();
        let tex = readable(1);
        let policy = EncodingPolicy::color(false, ImageFormatSetting::Png);

        let a = writer.add_image_export(ImageExport::new(tex.clone(), policy));
        let b = writer.add_image_export(ImageExport::new(tex.clone(), policy));
        assert_eq!(a, Some(0));
        assert_eq!(a, b);
        assert_eq!(writer.image_count(), 1);

        // different policy, different image
        let c = writer.add_image_export(ImageExport::new(tex, EncodingPolicy::linear(ImageFormatSetting::Png)));
        assert_eq!(c, Some(1));

        // same content, different handle
        let d = writer.add_image_export(ImageExport::new(readable(2), policy));
        assert_eq!(d, Some(2));
        assert_eq!(writer.image_count(), 3);
    }

    #[test]
    fn test_unreadable_texture_is_not_registered() {
        let mut writer = GltfWriter::default();
        let tex = SourceTexture::new(TextureId(9), "gpu").into_shared();
        assert!(writer.export_texture_info(&tex, false).is_none());
        assert!(writer.export_linear_texture_info(&tex).is_none());
        assert_eq!(writer.image_count(), 0);
        assert_eq!(writer.texture_count(), 0);
    }

    #[test]
    fn test_samplers_are_shared_and_default_is_omitted() {
        let mut writer = GltfWriter::default();
        let plain = readable(1);
        let clamped_a = SourceTexture::new(TextureId(2), "a")
            .with_filter_mode(FilterMode::Point)
            .with_wrap_mode(TextureWrapMode::Clamp, TextureWrapMode::Clamp)
            .with_pixels(DynamicImage::ImageRgba8(RgbaImage::new(1, 1)))
            .into_shared();
        let clamped_b = SourceTexture::new(TextureId(3), "b")
            .with_filter_mode(FilterMode::Point)
            .with_wrap_mode(TextureWrapMode::Clamp, TextureWrapMode::Clamp)
            .with_pixels(DynamicImage::ImageRgba8(RgbaImage::new(1, 1)))
            .into_shared();

        let p = writer.export_texture_info(&plain, false).unwrap();
        let a = writer.export_texture_info(&clamped_a, false).unwrap();
        let b = writer.export_texture_info(&clamped_b, false).unwrap();

        assert_eq!(writer.texture(p.index).unwrap().sampler, None);
        assert_eq!(writer.texture(a.index).unwrap().sampler, Some(0));
        assert_eq!(writer.texture(b.index).unwrap().sampler, Some(0));
        assert_eq!(writer.sampler_count(), 1);
    }

    #[test]
    fn test_finish_embeds_images_in_buffer() {
        let mut writer = GltfWriter::default();
        let info = writer.export_texture_info(&readable(1), true).unwrap();
        writer.push_material(Material::default());

        let output = writer.finish();
        let root = output.root();
        assert_eq!(root.images.len(), 1);
        assert_eq!(root.textures[info.index].source, 0);
        let view = &root.buffer_views[root.images[0].buffer_view.unwrap()];
        assert_eq!(view.byte_offset, 0);
        assert_eq!(output.bin().len() % 4, 0);
        assert_eq!(root.buffers[0].byte_length, output.bin().len());
        assert_eq!(root.images[0].mime_type.as_deref(), Some("image/png"));
        assert_eq!(&output.bin()[1..4], b"PNG");
    }

    #[test]
    fn test_finish_data_uri() {
        let settings = ExportSettings {
            image_destination: ImageDestination::DataUri,
            ..Default::default()
        };
        let mut writer = GltfWriter::new(settings);
        writer.export_texture_info(&readable(1), false).unwrap();
        let output = writer.finish();
        let uri = output.root().images[0].uri.as_deref().unwrap();
        assert!(uri.starts_with("data:image/jpeg;base64,"));
        assert!(output.root().buffers.is_empty());
    }

    #[test]
    fn test_external_names_are_unique() {
        let settings = ExportSettings {
            image_destination: ImageDestination::External,
            image_format: ImageFormatSetting::Png,
            ..Default::default()
        };
        let mut writer = GltfWriter::new(settings);
        let a = SourceTexture::new(TextureId(1), "same")
            .with_pixels(DynamicImage::ImageRgba8(RgbaImage::new(1, 1)))
            .into_shared();
        let b = SourceTexture::new(TextureId(2), "same")
            .with_pixels(DynamicImage::ImageRgba8(RgbaImage::new(1, 1)))
            .into_shared();
        writer.export_texture_info(&a, false);
        writer.export_texture_info(&b, false);

        let output = writer.finish();
        let names: Vec<_> = output.external_images().iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["same.png", "1_same.png"]);
        assert_eq!(output.root().images[1].uri.as_deref(), Some("1_same.png"));
    }

    #[test]
    fn test_prefixed_name_does_not_collide() {
        let settings = ExportSettings {
            image_destination: ImageDestination::External,
            image_format: ImageFormatSetting::Png,
            ..Default::default()
        };
        let mut writer = GltfWriter::new(settings);
        for (id, name) in [(1, "2_x"), (2, "x"), (3, "x")] {
            let tex = SourceTexture::new(TextureId(id), name)
                .with_pixels(DynamicImage::ImageRgba8(RgbaImage::new(1, 1)))
                .into_shared();
            writer.export_texture_info(&tex, false);
        }

        let output = writer.finish();
        let names: Vec<_> = output.external_images().iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["2_x.png", "x.png", "2_1_x.png"]);
    }

    #[test]
    fn test_encode_failure_omits_image_and_references() {
        let mut writer = GltfWriter::default();
        // opaque colour picks JPEG, which cannot hold a 70000 pixel wide image
        let too_wide = SourceTexture::new(TextureId(2), "wide")
            .with_wrap_mode(TextureWrapMode::Clamp, TextureWrapMode::Clamp)
            .with_pixels(DynamicImage::ImageRgba8(RgbaImage::from_pixel(70000, 1, Rgba([1, 2, 3, 255]))))
            .into_shared();
        let wide = writer.export_texture_info(&too_wide, false).unwrap();
        let small = writer.export_texture_info(&readable(1), true).unwrap();
        assert_eq!((wide.index, small.index), (0, 1));
        assert_eq!(writer.sampler_count(), 1);

        let mut material = Material::default();
        material.pbr_mut().base_color_texture = Some(wide);
        material.emissive_texture = Some(small);
        writer.push_material(material);

        let output = writer.finish();
        let root = output.root();
        assert_eq!(output.omitted_images(), ["wide".to_string()]);
        assert_eq!(root.images.len(), 1);
        assert_eq!(root.images[0].name.as_deref(), Some("tex1"));
        assert_eq!(root.textures.len(), 1);
        assert_eq!(root.textures[0].source, 0);
        assert!(root.samplers.is_empty());

        let material = &root.materials[0];
        assert!(material.pbr().unwrap().base_color_texture.is_none());
        assert_eq!(material.emissive_texture.as_ref().unwrap().index, 0);
    }

    #[test]
    fn test_glb_file_writes_external_images() {
        let settings = ExportSettings {
            image_destination: ImageDestination::External,
            image_format: ImageFormatSetting::Png,
            ..Default::default()
        };
        let mut writer = GltfWriter::new(settings);
        writer.export_texture_info(&readable(1), false).unwrap();
        let output = writer.finish();

        let dir = std::env::temp_dir().join(format!("gltf-material-glb-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let glb_path = dir.join("scene.glb");
        output.write_glb_file(&glb_path).unwrap();

        let glb = std::fs::read(&glb_path).unwrap();
        assert_eq!(&glb[0..4], b"glTF");
        let image = std::fs::read(dir.join("tex1.png")).unwrap();
        assert_eq!(&image[1..4], b"PNG");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_glb_layout() {
        let mut writer = GltfWriter::default();
        writer.export_texture_info(&readable(1), true).unwrap();
        let output = writer.finish();
        let glb = output.to_glb().unwrap();

        assert_eq!(&glb[0..4], b"glTF");
        assert_eq!(u32::from_le_bytes(glb[4..8].try_into().unwrap()), 2);
        assert_eq!(u32::from_le_bytes(glb[8..12].try_into().unwrap()) as usize, glb.len());
        let json_len = u32::from_le_bytes(glb[12..16].try_into().unwrap()) as usize;
        assert_eq!(json_len % 4, 0);
        assert_eq!(&glb[16..20], b"JSON");
        assert_eq!(&glb[20 + json_len + 4..20 + json_len + 8], b"BIN\0");

        // the container parses as glTF
        let gltf = gltf::Gltf::from_slice(&glb).unwrap();
        assert_eq!(gltf.images().count(), 1);
    }

    #[test]
    fn test_extension_registration() {
        let mut writer = GltfWriter::default();
        writer.register_extension_usage(Extension::MaterialsUnlit);
        writer.register_extension_usage(Extension::MaterialsUnlit);
        assert!(writer.is_extension_used(Extension::MaterialsUnlit));
        assert!(!writer.is_extension_required(Extension::MaterialsUnlit));
        assert_eq!(writer.extensions_used().count(), 1);
    }
}
