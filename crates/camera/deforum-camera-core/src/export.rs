//! Export driver: sample, render, and write the three-part export file.
//!
//! File layout:
//! ```text
//! Export frames {start} - {end}
//! Export cameras ['Camera', ...]
//! <rendered body, or the nothing-selected message>
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{info, warn};

use crate::config::ExportConfig;
use crate::render::{render, RenderOptions};
use crate::sampler::{sample_cameras, DEFAULT_TRANSLATION_SCALE};
use crate::scene::Scene;
use crate::series::FrameRange;
use crate::source::{PoseSource, Timeline, TimelineCursor};
use crate::Result;

/// Body written in place of series data when no camera is selected.
pub const NOTHING_SELECTED: &str = "No Cameras selected for export";

/// Fully resolved export parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportRequest {
    pub cameras: Vec<String>,
    pub frames: FrameRange,
    pub translation_scale: f64,
    pub options: RenderOptions,
}

impl ExportRequest {
    pub fn new(cameras: Vec<String>, frames: FrameRange) -> Self {
        Self {
            cameras,
            frames,
            translation_scale: DEFAULT_TRANSLATION_SCALE,
            options: RenderOptions::default(),
        }
    }

    /// Resolve camera selection and frame bounds against `scene`.
    pub fn from_config(scene: &Scene, config: &ExportConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cameras: scene.resolve_cameras(config.which_cams)?,
            frames: config.frame_range(scene.frame_start, scene.frame_end)?,
            translation_scale: config.translation_scale,
            options: config.render_options(),
        })
    }

    /// `Export cameras [...]` list, each name written as a Python string literal.
    fn camera_list(&self) -> String {
        let quoted: Vec<String> = self.cameras.iter().map(|c| python_literal(c)).collect();
        format!("[{}]", quoted.join(", "))
    }
}

/// Single quotes unless the name holds a `'` and no `"`; backslashes and the quote are escaped.
fn python_literal(name: &str) -> String {
    let quote = if name.contains('\'') && !name.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(name.len() + 2);
    out.push(quote);
    for ch in name.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Render the export body from a random-access source.
pub fn cameras_to_string<S: PoseSource + ?Sized>(
    source: &mut S,
    request: &ExportRequest,
) -> Result<String> {
    if request.cameras.is_empty() {
        warn!("nothing selected, skipping camera export");
        return Ok(NOTHING_SELECTED.to_string());
    }
    let series = sample_cameras(
        source,
        &request.cameras,
        request.frames,
        request.translation_scale,
    );
    render(&series, &request.options)
}

/// Render the export body by scrubbing a host timeline. The cursor is back at its original
/// frame when this returns, on success or error; an empty selection never moves it.
pub fn cameras_to_string_scrubbed<T: Timeline + ?Sized>(
    timeline: &mut T,
    request: &ExportRequest,
) -> Result<String> {
    if request.cameras.is_empty() {
        warn!("nothing selected, skipping camera export");
        return Ok(NOTHING_SELECTED.to_string());
    }
    let mut cursor = TimelineCursor::new(timeline);
    cameras_to_string(&mut cursor, request)
}

/// Write headers followed by `body`.
pub fn write_export<W: Write>(
    writer: &mut W,
    request: &ExportRequest,
    body: &str,
) -> Result<()> {
    writeln!(
        writer,
        "Export frames {} - {}",
        request.frames.start, request.frames.end
    )?;
    writeln!(writer, "Export cameras {}", request.camera_list())?;
    writer.write_all(body.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Sample, render and write in one go.
pub fn write_camera_data<S, W>(
    source: &mut S,
    writer: &mut W,
    request: &ExportRequest,
) -> Result<()>
where
    S: PoseSource + ?Sized,
    W: Write,
{
    info!(
        "exporting {} camera(s), frames {} - {}",
        request.cameras.len(),
        request.frames.start,
        request.frames.end
    );
    let body = cameras_to_string(source, request)?;
    write_export(writer, request, &body)
}

/// `write_camera_data` into a newly created file at `path`.
pub fn export_to_path<S: PoseSource + ?Sized>(
    source: &mut S,
    path: &Path,
    request: &ExportRequest,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_camera_data(source, &mut writer, request)?;
    info!("wrote {}", path.display());
    Ok(())
}
