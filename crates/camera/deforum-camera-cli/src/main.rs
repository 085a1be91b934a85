//! deforum-camera - export scene cameras as Deforum keyframe strings
//!
//! Reads a JSON scene (objects with pose keys), samples camera motion over a frame range,
//! and writes the export text file consumed by Deforum notebooks.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use deforum_camera_core::{
    decode_keyframes, export_to_path, reconstruct_step, write_camera_data, CameraSelection,
    ExportConfig, ExportRequest, Scene, SceneObject,
};

#[derive(Parser)]
#[command(name = "deforum-camera")]
#[command(about = "Export camera animation as Deforum keyframe strings")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum WhichCams {
    /// Scene's active camera
    Active,
    /// Selected cameras only
    Selected,
    /// All cameras in scene
    All,
}

impl From<WhichCams> for CameraSelection {
    fn from(w: WhichCams) -> Self {
        match w {
            WhichCams::Active => CameraSelection::Active,
            WhichCams::Selected => CameraSelection::Selected,
            WhichCams::All => CameraSelection::All,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Export camera motion from a scene file
    Export {
        /// Scene JSON file
        #[arg(short, long)]
        scene: PathBuf,

        /// Export config JSON (flags below override it)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output text file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Which cameras to export
        #[arg(short, long, value_enum)]
        which: Option<WhichCams>,

        /// First frame (default: scene start)
        #[arg(long, allow_negative_numbers = true)]
        start: Option<i32>,

        /// End frame, exclusive (default: scene end)
        #[arg(long, allow_negative_numbers = true)]
        end: Option<i32>,

        /// Conversion factor between scene units and Deforum units
        #[arg(long)]
        scale: Option<f64>,

        /// Also emit the combined cam_code tuple
        #[arg(long)]
        cam_code: bool,

        /// Also emit the full series as JSON
        #[arg(long)]
        json: bool,

        /// Emit raw per-change frames instead of keyframe variables
        #[arg(long)]
        raw_frames: Option<bool>,
    },

    /// Decode a keyframe string and print the step-held series as JSON
    Decode {
        /// Keyframe string, e.g. "0:(1.5),10:(0),"
        keyframes: String,

        /// Number of frames to rebuild (default: last keyframe + 1)
        #[arg(short, long)]
        frames: Option<usize>,
    },

    /// Convert keyframe JSON ({"frame": {"location", "rotation"}}) into a scene file
    Import {
        /// Keyframe JSON file
        input: PathBuf,

        /// Camera name in the generated scene
        #[arg(short, long, default_value = "Camera")]
        name: String,

        /// Output scene file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            scene,
            config,
            output,
            which,
            start,
            end,
            scale,
            cam_code,
            json,
            raw_frames,
        } => {
            let mut cfg = match config {
                Some(path) => {
                    let text = fs::read_to_string(&path)
                        .with_context(|| format!("failed to read config {}", path.display()))?;
                    ExportConfig::from_json(&text)
                        .with_context(|| format!("failed to parse config {}", path.display()))?
                }
                None => ExportConfig::default(),
            };
            if let Some(which) = which {
                cfg.which_cams = which.into();
            }
            cfg.frame_start = start.or(cfg.frame_start);
            cfg.frame_end = end.or(cfg.frame_end);
            if let Some(scale) = scale {
                cfg.translation_scale = scale;
            }
            cfg.output_cam_code |= cam_code;
            cfg.output_json |= json;
            if let Some(raw) = raw_frames {
                cfg.output_raw_frames = raw;
            }

            let text = fs::read_to_string(&scene)
                .with_context(|| format!("failed to read scene {}", scene.display()))?;
            let mut scene = Scene::from_json(&text).context("failed to load scene")?;
            let request = ExportRequest::from_config(&scene, &cfg)?;

            match output {
                Some(path) => export_to_path(&mut scene, &path, &request)
                    .with_context(|| format!("failed to export to {}", path.display()))?,
                None => write_camera_data(&mut scene, &mut io::stdout().lock(), &request)?,
            }
        }

        Commands::Decode { keyframes, frames } => {
            let keys = decode_keyframes(&keyframes)?;
            let len = frames.unwrap_or_else(|| keys.last().map_or(0, |k| k.frame + 1));
            let series = reconstruct_step(&keys, len);
            println!("{}", serde_json::to_string(&series)?);
        }

        Commands::Import {
            input,
            name,
            output,
        } => {
            let text = fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let camera = SceneObject::from_keyframe_json(name.as_str(), &text)
                .with_context(|| format!("failed to import {}", input.display()))?;
            let start = camera.keys.first().map_or(1, |k| k.frame);
            let end = camera.keys.last().map_or(1, |k| k.frame);
            let mut scene = Scene::new(start, end, vec![camera])?;
            scene.active_camera = Some(name);
            let json = scene.to_json_pretty()?;

            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!("wrote {}", path.display());
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    writeln!(stdout, "{json}")?;
                }
            }
        }
    }

    Ok(())
}
