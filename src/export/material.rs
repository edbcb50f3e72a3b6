//! Conversion of engine materials into glTF materials.
//!
//! [`MaterialExporter`] follows the metallic-roughness model: base colour,
//! normal, emission and occlusion/metallic/roughness are converted one after
//! another. A problem with one channel is logged and marks the conversion as
//! unsuccessful, but never stops the remaining channels.

use crate::config::ExportSettings;
use crate::core::color::Color;
use crate::core::descriptor::MaterialDescriptor;
use crate::core::material::SourceMaterial;
use crate::export::common::{apply_slot_mapping, channel, export_map, set_alpha_mode_and_culling};
use crate::export::packing::{resolve_occlusion_packing, OcclusionPacking};
use crate::export::writer::GltfWritable;
use crate::logging::CodeLogger;
use crate::schema::{
    AlphaMode, EmissiveStrength, Extension, Material, MaterialUnlit, OcclusionTextureInfo,
    PbrMetallicRoughness, TextureInfo,
};

/// Converts a [`SourceMaterial`] into a glTF [`Material`].
pub trait MaterialExport {
    /// Always returns a material, degraded if some channel failed, plus
    /// whether every channel converted without error.
    fn convert_material(
        &self,
        source: &SourceMaterial,
        writer: &mut dyn GltfWritable,
        logger: &mut dyn CodeLogger,
    ) -> (Material, bool);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialExporter {
    emissive_strength: bool,
}

impl MaterialExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &ExportSettings) -> Self {
        Self {
            emissive_strength: settings.emissive_strength,
        }
    }

    /// Keep the intensity removed by the emissive clamp as
    /// `KHR_materials_emissive_strength`.
    pub fn with_emissive_strength(mut self, enabled: bool) -> Self {
        self.emissive_strength = enabled;
        self
    }

    fn convert_unlit(
        &self,
        descriptor: &MaterialDescriptor,
        material: &mut Material,
        writer: &mut dyn GltfWritable,
        logger: &mut dyn CodeLogger,
    ) -> bool {
        writer.register_extension_usage(Extension::MaterialsUnlit);
        material.extensions_mut().unlit = Some(MaterialUnlit {});
        material.pbr_mut().base_color_factor = descriptor.base_color.linear().to_array();
        export_base_color_map(descriptor, material, writer, logger)
    }

    fn convert_lit(
        &self,
        descriptor: &MaterialDescriptor,
        material: &mut Material,
        writer: &mut dyn GltfWritable,
        logger: &mut dyn CodeLogger,
    ) -> bool {
        let pbr = material.pbr_mut();
        pbr.metallic_factor = descriptor.metallic;
        pbr.roughness_factor = descriptor.roughness;
        pbr.base_color_factor = descriptor.base_color.linear().to_array();

        let mut success = true;
        success &= export_base_color_map(descriptor, material, writer, logger);
        success &= export_normal_map(descriptor, material, writer, logger);
        success &= self.export_emission(descriptor, material, writer, logger);
        success &= export_occlusion_metallic_roughness(descriptor, material, writer, logger);
        success
    }

    fn export_emission(
        &self,
        descriptor: &MaterialDescriptor,
        material: &mut Material,
        writer: &mut dyn GltfWritable,
        logger: &mut dyn CodeLogger,
    ) -> bool {
        let Some(emission) = &descriptor.emission else {
            return true;
        };

        if let Some(color) = emission.color {
            let (factor, strength) = clamp_emissive(color);
            material.emissive_factor = factor;
            if let Some(strength) = strength.filter(|_| self.emissive_strength) {
                writer.register_extension_usage(Extension::MaterialsEmissiveStrength);
                material.extensions_mut().emissive_strength = Some(EmissiveStrength {
                    emissive_strength: strength,
                });
            }
        }

        let Some(map) = &emission.map else {
            return true;
        };
        let (info, success) = export_map(map, channel::EMISSION, &descriptor.name, writer, logger, |w, t| {
            w.export_texture_info(t, false)
        });
        material.emissive_texture = info;
        success
    }
}

impl MaterialExport for MaterialExporter {
    fn convert_material(
        &self,
        source: &SourceMaterial,
        writer: &mut dyn GltfWritable,
        logger: &mut dyn CodeLogger,
    ) -> (Material, bool) {
        let descriptor = MaterialDescriptor::resolve(source);

        let mut material = Material {
            name: Some(descriptor.name.clone()),
            pbr_metallic_roughness: Some(PbrMetallicRoughness {
                metallic_factor: 0.0,
                roughness_factor: 1.0,
                ..Default::default()
            }),
            ..Default::default()
        };
        set_alpha_mode_and_culling(&mut material, &descriptor);

        let success = if descriptor.unlit {
            self.convert_unlit(&descriptor, &mut material, writer, logger)
        } else {
            self.convert_lit(&descriptor, &mut material, writer, logger)
        };
        (material, success)
    }
}

/// Scales an HDR emissive colour down so that its largest channel is 1.
/// Returns the clamped RGB factor and the scale that was removed, if any.
pub fn clamp_emissive(color: Color) -> ([f32; 3], Option<f32>) {
    let max = color.max_rgb();
    if max > 1.0 {
        ([color.r / max, color.g / max, color.b / max], Some(max))
    } else {
        (color.to_rgb_array(), None)
    }
}

fn export_base_color_map(
    descriptor: &MaterialDescriptor,
    material: &mut Material,
    writer: &mut dyn GltfWritable,
    logger: &mut dyn CodeLogger,
) -> bool {
    let Some(map) = &descriptor.base_color_map else {
        return true;
    };
    let alpha = material.alpha_mode != AlphaMode::Opaque;
    let (info, success) = export_map(map, channel::BASE_COLOR, &descriptor.name, writer, logger, |w, t| {
        w.export_texture_info(t, alpha)
    });
    material.pbr_mut().base_color_texture = info;
    success
}

fn export_normal_map(
    descriptor: &MaterialDescriptor,
    material: &mut Material,
    writer: &mut dyn GltfWritable,
    logger: &mut dyn CodeLogger,
) -> bool {
    let Some(normal) = &descriptor.normal else {
        return true;
    };
    let (info, success) = export_map(&normal.map, channel::NORMAL, &descriptor.name, writer, logger, |w, t| {
        w.export_normal_texture_info(t)
    });
    material.normal_texture = info.map(|mut info| {
        info.scale = normal.scale;
        info
    });
    success
}

fn export_occlusion_metallic_roughness(
    descriptor: &MaterialDescriptor,
    material: &mut Material,
    writer: &mut dyn GltfWritable,
    logger: &mut dyn CodeLogger,
) -> bool {
    let mut success = true;

    let mut metallic_roughness: Option<TextureInfo> = None;
    if let Some(map) = &descriptor.metallic_roughness_map {
        let (info, ok) = export_map(map, channel::METALLIC_ROUGHNESS, &descriptor.name, writer, logger, |w, t| {
            w.export_linear_texture_info(t)
        });
        success &= ok;
        metallic_roughness = info;
    }

    if let Some(occlusion_map) = &descriptor.occlusion_map {
        let packing = resolve_occlusion_packing(
            descriptor.metallic_roughness_map.as_ref().map(|m| &m.texture),
            Some(&occlusion_map.texture),
        );
        let occlusion = match (packing, &metallic_roughness) {
            (OcclusionPacking::Packed, Some(mr)) => {
                let mut info = OcclusionTextureInfo::new(mr.index);
                apply_slot_mapping(&mut info, occlusion_map, writer);
                Some(info)
            }
            _ => {
                let (info, ok) = export_map(occlusion_map, channel::OCCLUSION, &descriptor.name, writer, logger, |w, t| {
                    w.export_linear_texture_info(t).map(|i| OcclusionTextureInfo::new(i.index))
                });
                success &= ok;
                info
            }
        };
        material.occlusion_texture = occlusion.map(|mut info| {
            info.strength = descriptor.occlusion_strength;
            info
        });
    }

    material.pbr_mut().metallic_roughness_texture = metallic_roughness;
    success
}
