use clap::Parser;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

use gltf_material_bridge::io::manifest::Manifest;
use gltf_material_bridge::prelude::*;

#[derive(Parser)]
#[command(name = "gltf-material")]
#[command(about = "Converts engine material manifests into glTF materials")]
struct Cli {
    /// Material manifest (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file path (.gltf or .glb)
    #[arg(short, long)]
    output: PathBuf,

    /// Export settings file (JSON)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Keep HDR emission intensity as KHR_materials_emissive_strength
    #[arg(long)]
    emissive_strength: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output_ext = cli.output
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    if !matches!(output_ext, "gltf" | "glb") {
        anyhow::bail!("Output file must be a .gltf or .glb file");
    }

    let mut settings = match &cli.settings {
        Some(path) => ExportSettings::from_json_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => <ExportSettings as ConfigType>::default(),
    };
    settings.emissive_strength |= cli.emissive_strength;

    let materials = Manifest::load(&cli.input)
        .with_context(|| format!("Failed to load manifest {}", cli.input.display()))?;

    let exporter = MaterialExporter::from_settings(&settings);
    let mut writer = GltfWriter::new(settings);
    let mut logger = TracingLogger;
    let mut failed = 0;
    for material in &materials {
        let (index, success) = writer.add_material(material, &exporter, &mut logger);
        if !success {
            failed += 1;
        }
        tracing::debug!(index, name = material.name(), success, "material converted");
    }

    let output = writer.finish();
    write_output(&output, &cli.output)?;

    tracing::info!(
        materials = materials.len(),
        failed,
        images = output.root().images.len(),
        omitted_images = output.omitted_images().len(),
        "wrote {}",
        cli.output.display()
    );
    Ok(())
}

fn write_output(output: &GltfOutput, path: &Path) -> Result<()> {
    if path.extension().and_then(|s| s.to_str()) == Some("glb") {
        output.write_glb_file(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    } else {
        output.write_gltf_files(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .init();
}
