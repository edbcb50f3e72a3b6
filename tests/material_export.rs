use std::sync::Arc;

use gltf_material_bridge::core::material::names;
use gltf_material_bridge::export::common::channel;
use gltf_material_bridge::logging::Severity;
use gltf_material_bridge::prelude::*;
use gltf_material_bridge::schema::{AlphaMode, Extension, TextureInfoLike};
use image::{DynamicImage, Rgba, RgbaImage};

fn texture(id: u64, name: &str) -> Arc<SourceTexture> {
    SourceTexture::new(TextureId(id), name)
        .with_pixels(DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([90, 120, 200, 255]))))
        .into_shared()
}

fn cube(id: u64) -> Arc<SourceTexture> {
    SourceTexture::new(TextureId(id), "sky")
        .with_dimension(TextureDimension::Cube)
        .with_pixels(DynamicImage::ImageRgba8(RgbaImage::new(4, 4)))
        .into_shared()
}

fn lit(name: &str) -> SourceMaterial {
    SourceMaterial::new(name, "Standard")
}

fn convert(writer: &mut GltfWriter, source: &SourceMaterial) -> (usize, bool, CollectLogger) {
    let mut logger = CollectLogger::new();
    let (index, success) = writer.add_material(source, &MaterialExporter::new(), &mut logger);
    (index, success, logger)
}

#[test]
fn alpha_mode_and_culling_without_textures() {
    let mut writer = GltfWriter::default();

    let mut source = lit("Cutout (Instance)");
    source.set_tag(names::TAG_RENDER_TYPE, names::RENDER_TYPE_CUTOUT);
    source.set_float(names::CUTOFF, 0.25);
    source.set_float(names::CULL, 0.0);
    let (index, success, _) = convert(&mut writer, &source);
    assert!(success);

    let material = &writer.materials()[index];
    assert_eq!(material.name.as_deref(), Some("Cutout"));
    assert_eq!(material.alpha_mode, AlphaMode::Mask);
    assert_eq!(material.alpha_cutoff, Some(0.25));
    assert!(material.double_sided);

    let pbr = material.pbr().unwrap();
    assert_eq!(pbr.metallic_factor, 0.0);
    assert_eq!(pbr.roughness_factor, 1.0);
    assert!(pbr.base_color_factor.iter().all(|c| (c - 1.0).abs() < 1e-5));
}

#[test]
fn lit_factors_and_linear_base_color() {
    let mut writer = GltfWriter::default();
    let mut source = lit("Metal");
    source.set_color(names::COLOR, Color::new(0.5, 1.0, 0.0, 0.75));
    source.set_float(names::METALLIC, 0.8);
    source.set_float(names::SMOOTHNESS, 0.75);
    let (index, _, _) = convert(&mut writer, &source);

    let pbr = writer.materials()[index].pbr().unwrap();
    assert_eq!(pbr.metallic_factor, 0.8);
    assert_eq!(pbr.roughness_factor, 0.25);
    let expected = Color::new(0.5, 1.0, 0.0, 0.75).linear();
    assert_eq!(pbr.base_color_factor, expected.to_array());
    assert!(pbr.base_color_factor[0] < 0.5);
    assert_eq!(pbr.base_color_factor[3], 0.75);
}

#[test]
fn emissive_is_clamped_and_strength_discarded_by_default() {
    let mut writer = GltfWriter::default();
    let mut source = lit("Lamp");
    source.enable_keyword(names::KEYWORD_EMISSION);
    source.set_color(names::EMISSION_COLOR, Color::rgb(8.0, 4.0, 2.0));
    let (index, success, _) = convert(&mut writer, &source);
    assert!(success);

    let material = &writer.materials()[index];
    assert_eq!(material.emissive_factor, [1.0, 0.5, 0.25]);
    assert!(material.extensions.is_none());
    assert!(!writer.is_extension_used(Extension::MaterialsEmissiveStrength));
}

#[test]
fn emissive_strength_when_enabled() {
    let mut writer = GltfWriter::default();
    let mut source = lit("Lamp");
    source.enable_keyword(names::KEYWORD_EMISSION);
    source.set_color(names::EMISSION_COLOR, Color::rgb(8.0, 4.0, 2.0));

    let exporter = MaterialExporter::new().with_emissive_strength(true);
    let (index, _) = writer.add_material(&source, &exporter, &mut CollectLogger::new());

    let material = &writer.materials()[index];
    assert_eq!(material.emissive_factor, [1.0, 0.5, 0.25]);
    let strength = material.extensions.as_ref().unwrap().emissive_strength.as_ref().unwrap();
    assert_eq!(strength.emissive_strength, 8.0);
    assert!(writer.is_extension_used(Extension::MaterialsEmissiveStrength));
    assert!(!writer.is_extension_required(Extension::MaterialsEmissiveStrength));
}

#[test]
fn emission_requires_keyword() {
    let mut writer = GltfWriter::default();
    let mut source = lit("Dark");
    source.set_color(names::EMISSION_COLOR, Color::rgb(1.0, 1.0, 1.0));
    source.set_texture(names::EMISSION_MAP, TextureSlot::new(texture(1, "glow")));
    let (index, _, _) = convert(&mut writer, &source);

    let material = &writer.materials()[index];
    assert_eq!(material.emissive_factor, [0.0; 3]);
    assert!(material.emissive_texture.is_none());
    assert_eq!(writer.image_count(), 0);
}

#[test]
fn packed_occlusion_shares_the_metallic_roughness_image() {
    let mut writer = GltfWriter::default();
    let orm = texture(7, "orm");
    let mut source = lit("Rock");
    source.set_texture(names::METALLIC_GLOSS_MAP, TextureSlot::new(orm.clone()));
    source.set_texture(names::OCCLUSION_MAP, TextureSlot::new(orm));
    source.set_float(names::OCCLUSION_STRENGTH, 0.6);
    let (index, success, _) = convert(&mut writer, &source);
    assert!(success);

    let material = &writer.materials()[index];
    let mr = material.pbr().unwrap().metallic_roughness_texture.as_ref().unwrap();
    let occlusion = material.occlusion_texture.as_ref().unwrap();
    assert_eq!(mr.index, occlusion.index);
    assert_eq!(occlusion.strength, 0.6);
    assert_eq!(writer.image_count(), 1);
}

#[test]
fn separate_occlusion_is_exported_on_its_own() {
    let mut writer = GltfWriter::default();
    let mut source = lit("Rock");
    // same name, different handle
    source.set_texture(names::METALLIC_GLOSS_MAP, TextureSlot::new(texture(7, "orm")));
    source.set_texture(names::OCCLUSION_MAP, TextureSlot::new(texture(8, "orm")));
    let (index, _, _) = convert(&mut writer, &source);

    let material = &writer.materials()[index];
    let mr = material.pbr().unwrap().metallic_roughness_texture.as_ref().unwrap();
    let occlusion = material.occlusion_texture.as_ref().unwrap();
    assert_ne!(mr.index, occlusion.index);
    assert_eq!(writer.image_count(), 2);
}

#[test]
fn shared_textures_are_exported_once() {
    let mut writer = GltfWriter::default();
    let albedo = texture(3, "albedo");
    for name in ["A", "B"] {
        let mut source = lit(name);
        source.set_texture(names::MAIN_TEX, TextureSlot::new(albedo.clone()));
        convert(&mut writer, &source);
    }

    let materials = writer.materials();
    let a = materials[0].pbr().unwrap().base_color_texture.as_ref().unwrap();
    let b = materials[1].pbr().unwrap().base_color_texture.as_ref().unwrap();
    assert_eq!(a.index, b.index);
    assert_eq!(writer.image_count(), 1);
}

#[test]
fn unlit_populates_base_color_only() {
    let mut writer = GltfWriter::default();
    let mut source = SourceMaterial::new("Sprite", "Universal Render Pipeline/Unlit");
    source.set_color(names::BASE_COLOR, Color::new(1.0, 0.5, 0.5, 1.0));
    source.set_texture(names::BASE_MAP, TextureSlot::new(texture(1, "sprite")));
    source.enable_keyword(names::KEYWORD_NORMAL_MAP);
    source.set_texture(names::BUMP_MAP, TextureSlot::new(texture(2, "normal")));
    source.set_texture(names::METALLIC_GLOSS_MAP, TextureSlot::new(texture(3, "orm")));
    source.set_texture(names::OCCLUSION_MAP, TextureSlot::new(texture(3, "orm")));
    let (index, success, _) = convert(&mut writer, &source);
    assert!(success);

    let material = &writer.materials()[index];
    assert!(material.is_unlit());
    assert!(material.normal_texture.is_none());
    assert!(material.occlusion_texture.is_none());
    let pbr = material.pbr().unwrap();
    assert!(pbr.metallic_roughness_texture.is_none());
    assert!(pbr.base_color_texture.is_some());
    assert_eq!(pbr.base_color_factor, Color::new(1.0, 0.5, 0.5, 1.0).linear().to_array());
    assert!(writer.is_extension_used(Extension::MaterialsUnlit));
    assert_eq!(writer.image_count(), 1);
}

#[test]
fn unlit_keyword_on_any_shader() {
    let mut writer = GltfWriter::default();
    let mut source = lit("Flat");
    source.enable_keyword(names::KEYWORD_UNLIT);
    let (index, _, _) = convert(&mut writer, &source);
    assert!(writer.materials()[index].is_unlit());
}

#[test]
fn texture_transform_only_for_non_identity_slots() {
    let mut writer = GltfWriter::default();
    let mut source = lit("Plain");
    source.set_texture(names::MAIN_TEX, TextureSlot::new(texture(1, "a")));
    let (index, _, _) = convert(&mut writer, &source);
    let info = writer.materials()[index].pbr().unwrap().base_color_texture.clone().unwrap();
    assert!(info.texture_transform().is_none());
    assert!(!writer.is_extension_used(Extension::TextureTransform));

    let mut source = lit("Tiled");
    source.set_texture(
        names::MAIN_TEX,
        TextureSlot::new(texture(1, "a")).with_offset([0.125, 0.5]).with_scale([4.0, 2.0]),
    );
    let (index, _, _) = convert(&mut writer, &source);
    let info = writer.materials()[index].pbr().unwrap().base_color_texture.clone().unwrap();
    let transform = info.texture_transform().unwrap();
    assert_eq!(transform.offset, [0.125, 0.5]);
    assert_eq!(transform.scale, [4.0, 2.0]);
    assert!(writer.is_extension_used(Extension::TextureTransform));
    assert!(writer.is_extension_required(Extension::TextureTransform));
}

#[test]
fn uv_channel_is_copied() {
    let mut writer = GltfWriter::default();
    let mut source = lit("Decal");
    source.set_texture(names::MAIN_TEX, TextureSlot::new(texture(1, "a")));
    source.set_float(format!("{}{}", names::MAIN_TEX, names::TEX_COORD_SUFFIX), 1.0);
    let (index, _, _) = convert(&mut writer, &source);
    let info = writer.materials()[index].pbr().unwrap().base_color_texture.clone().unwrap();
    assert_eq!(info.tex_coord, 1);
}

#[test]
fn invalid_texture_type_fails_only_its_channel() {
    let mut writer = GltfWriter::default();
    let mut source = lit("Broken");
    source.set_tag(names::TAG_RENDER_TYPE, names::RENDER_TYPE_TRANSPARENT);
    source.set_texture(names::MAIN_TEX, TextureSlot::new(texture(1, "albedo")));
    source.enable_keyword(names::KEYWORD_EMISSION);
    source.set_texture(names::EMISSION_MAP, TextureSlot::new(cube(2)));
    source.enable_keyword(names::KEYWORD_BUMP_MAP);
    source.set_texture(names::NORMAL_MAP, TextureSlot::new(texture(3, "normal")));
    source.set_float(names::BUMP_SCALE, 0.5);
    let (index, success, logger) = convert(&mut writer, &source);
    assert!(!success);

    let errors: Vec<_> = logger.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, LogCode::TextureInvalidType);
    assert_eq!(errors[0].channel, channel::EMISSION);
    assert_eq!(errors[0].material, "Broken");

    let material = &writer.materials()[index];
    assert!(material.emissive_texture.is_none());
    assert!(material.pbr().unwrap().base_color_texture.is_some());
    assert_eq!(material.normal_texture.as_ref().unwrap().scale, 0.5);
    assert_eq!(material.alpha_mode, AlphaMode::Blend);
}

#[test]
fn invalid_channel_names() {
    let cases = [
        (names::MAIN_TEX, channel::BASE_COLOR),
        (names::METALLIC_GLOSS_MAP, channel::METALLIC_ROUGHNESS),
        (names::OCCLUSION_MAP, channel::OCCLUSION),
        (names::BUMP_MAP, channel::NORMAL),
    ];
    for (property, expected) in cases {
        let mut writer = GltfWriter::default();
        let mut source = lit("M");
        source.enable_keyword(names::KEYWORD_NORMAL_MAP);
        source.set_texture(property, TextureSlot::new(cube(1)));
        let (_, success, logger) = convert(&mut writer, &source);
        assert!(!success);
        let items = logger.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].channel, expected);
        assert_eq!(writer.image_count(), 0);
    }
}

#[test]
fn unreadable_texture_is_omitted_without_failing() {
    let mut writer = GltfWriter::default();
    let mut source = lit("Streamed");
    let gpu_only = SourceTexture::new(TextureId(5), "gpu_only").into_shared();
    source.set_texture(names::MAIN_TEX, TextureSlot::new(gpu_only));
    let (index, success, logger) = convert(&mut writer, &source);

    assert!(success);
    assert!(writer.materials()[index].pbr().unwrap().base_color_texture.is_none());
    assert_eq!(logger.items().len(), 1);
    assert_eq!(logger.items()[0].severity, Severity::Warning);
    assert_eq!(logger.items()[0].code, LogCode::TextureNotReadable);
    assert_eq!(writer.image_count(), 0);
}

#[test]
fn every_texture_index_resolves_after_finish() {
    let mut writer = GltfWriter::default();
    let orm = texture(7, "orm");
    let mut source = lit("Full");
    source.set_texture(names::MAIN_TEX, TextureSlot::new(texture(1, "albedo")).with_scale([2.0, 2.0]));
    source.enable_keyword(names::KEYWORD_NORMAL_MAP);
    source.set_texture(
        names::BUMP_MAP,
        TextureSlot::new(
            SourceTexture::new(TextureId(2), "normal")
                .with_filter_mode(FilterMode::Point)
                .with_pixels(DynamicImage::ImageRgba8(RgbaImage::new(2, 2)))
                .into_shared(),
        ),
    );
    source.set_texture(names::METALLIC_GLOSS_MAP, TextureSlot::new(orm.clone()));
    source.set_texture(names::OCCLUSION_MAP, TextureSlot::new(orm));
    let (_, success, _) = convert(&mut writer, &source);
    assert!(success);

    let output = writer.finish();
    let root = output.root();
    let material = &root.materials[0];
    let indices = [
        material.pbr().unwrap().base_color_texture.as_ref().unwrap().index,
        material.pbr().unwrap().metallic_roughness_texture.as_ref().unwrap().index,
        material.occlusion_texture.as_ref().unwrap().index,
        material.normal_texture.as_ref().unwrap().index,
    ];
    for index in indices {
        let texture = &root.textures[index];
        assert!(texture.source < root.images.len());
        if let Some(sampler) = texture.sampler {
            assert!(sampler < root.samplers.len());
        }
    }
    assert_eq!(root.images.len(), 3);
    assert_eq!(root.samplers.len(), 1);

    let json = output.to_json_value().unwrap();
    assert_eq!(json["extensionsUsed"], serde_json::json!(["KHR_texture_transform"]));
    assert_eq!(json["extensionsRequired"], serde_json::json!(["KHR_texture_transform"]));
    assert_eq!(json["samplers"][0], serde_json::json!({ "magFilter": 9728, "minFilter": 9728 }));
    assert_eq!(json["asset"]["version"], "2.0");

    // the output is a valid glTF document
    let glb = output.to_glb().unwrap();
    let gltf = gltf::Gltf::from_slice(&glb).unwrap();
    assert_eq!(gltf.materials().count(), 1);
    assert_eq!(gltf.textures().count(), root.textures.len());
}

#[test]
fn failed_image_encode_keeps_the_document_valid() {
    let mut writer = GltfWriter::default();
    // opaque base colour is written as JPEG, which rejects widths above 65535
    let wide = SourceTexture::new(TextureId(1), "wide")
        .with_pixels(DynamicImage::ImageRgba8(RgbaImage::from_pixel(70000, 1, Rgba([200, 10, 10, 255]))))
        .into_shared();
    let mut source = lit("Broken");
    source.set_texture(names::MAIN_TEX, TextureSlot::new(wide));
    source.enable_keyword(names::KEYWORD_NORMAL_MAP);
    source.set_texture(names::BUMP_MAP, TextureSlot::new(texture(2, "normal")));
    let (_, success, _) = convert(&mut writer, &source);
    assert!(success);
    assert_eq!(writer.image_count(), 2);

    let output = writer.finish();
    let root = output.root();
    assert_eq!(output.omitted_images(), ["wide".to_string()]);
    assert_eq!(root.images.len(), 1);
    assert_eq!(root.textures.len(), 1);

    let material = &root.materials[0];
    assert!(material.pbr().unwrap().base_color_texture.is_none());
    let normal = material.normal_texture.as_ref().unwrap();
    assert!(normal.index < root.textures.len());
    assert!(root.textures[normal.index].source < root.images.len());

    let gltf = gltf::Gltf::from_slice(&output.to_glb().unwrap()).unwrap();
    assert_eq!(gltf.images().count(), 1);
}
