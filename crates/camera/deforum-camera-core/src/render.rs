//! Full-export rendering of sampled camera series.
//!
//! Per camera, blocks are appended in a fixed order:
//! header, plain variables (only when raw frames is off), `cam_code:`, `JSON:`, raw frames,
//! then a blank line.

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;

use crate::codec::{encode_keyframes, encode_raw_frames};
use crate::error::ExportError;
use crate::series::{Axis, CameraSeries};
use crate::Result;

/// Independent output toggles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub cam_code: bool,
    pub json: bool,
    pub raw_frames: bool,
}

impl RenderOptions {
    /// Plain `name = "..."` lines are the default view and give way to the raw dump.
    #[inline]
    pub fn plain_variables(&self) -> bool {
        !self.raw_frames
    }
}

pub fn render(series: &[CameraSeries], options: &RenderOptions) -> Result<String> {
    let mut out = String::new();
    for s in series {
        render_camera(&mut out, s, options)?;
    }
    Ok(out)
}

pub fn render_camera(
    out: &mut String,
    series: &CameraSeries,
    options: &RenderOptions,
) -> Result<()> {
    out.push_str(&format!("\nCamera Export: {}\n", series.camera));

    if options.plain_variables() {
        for (axis, values) in series.axes() {
            out.push_str(&format!(
                "{} = \"{}\" #@param {{type:\"string\"}}\n",
                axis.name(),
                encode_keyframes(values)
            ));
        }
    }

    if options.cam_code {
        out.push_str(&cam_code_line(series));
    }

    if options.json {
        out.push_str(&format!("JSON:\n {}\n", spaced_json(series)?));
    }

    if options.raw_frames {
        for (axis, values) in series.axes() {
            out.push_str(&format!(
                "\nRaw frames for {}:\n{}\n",
                axis.name(),
                encode_raw_frames(values)
            ));
        }
    }

    out.push('\n');
    Ok(())
}

fn cam_code_line(series: &CameraSeries) -> String {
    let names: Vec<&str> = Axis::ALL.iter().map(|a| a.name()).collect();
    let encoded: Vec<String> = series
        .axes()
        .map(|(_, values)| format!("\"{}\"", encode_keyframes(values)))
        .collect();
    format!(
        "cam_code:\n({}) = ({})\n",
        names.join(","),
        encoded.join(", ")
    )
}

/// Single-line JSON with `", "` between items and `": "` after keys.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

fn spaced_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| ExportError::SerializationError {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::DeltaSample;

    fn still(name: &str, n: usize) -> CameraSeries {
        let mut s = CameraSeries::with_capacity(name, n);
        for _ in 0..n {
            s.push(&DeltaSample::default());
        }
        s
    }

    /// Two transitions moving +1 on translation_x, nothing else.
    fn nudge(name: &str) -> CameraSeries {
        let mut s = CameraSeries::with_capacity(name, 2);
        for _ in 0..2 {
            s.push(&DeltaSample {
                tx: 1.0,
                ..Default::default()
            });
        }
        s
    }

    const NUDGE_JSON: &str = "{\"translation_x\": [1.0, 1.0], \"translation_y\": [0.0, 0.0], \
\"translation_z\": [0.0, 0.0], \"rotation_3d_x\": [0.0, 0.0], \"rotation_3d_y\": [0.0, 0.0], \
\"rotation_3d_z\": [0.0, 0.0]}";

    #[test]
    fn json_uses_spaced_separators() {
        let mut s = still("Cam", 1);
        s.translation_x[0] = 50.0;
        s.rotation_3d_z[0] = -0.5;
        assert_eq!(
            spaced_json(&s).unwrap(),
            "{\"translation_x\": [50.0], \"translation_y\": [0.0], \"translation_z\": [0.0], \
\"rotation_3d_x\": [0.0], \"rotation_3d_y\": [0.0], \"rotation_3d_z\": [-0.5]}"
        );
    }

    #[test]
    fn every_block_enabled_layout() {
        let opts = RenderOptions {
            cam_code: true,
            json: true,
            raw_frames: true,
        };
        let out = render(&[nudge("Cam")], &opts).unwrap();
        let x = "0:(1),1:(1),";
        let z = "0:(0),1:(0),";
        let expected = format!(
            "\nCamera Export: Cam\n\
cam_code:\n\
(translation_x,translation_y,translation_z,rotation_3d_x,rotation_3d_y,rotation_3d_z) = \
(\"{x}\", \"{z}\", \"{z}\", \"{z}\", \"{z}\", \"{z}\")\n\
JSON:\n {NUDGE_JSON}\n\
\nRaw frames for translation_x:\n0:(1)\n\
\nRaw frames for translation_y:\n0:(0)\n\
\nRaw frames for translation_z:\n0:(0)\n\
\nRaw frames for rotation_3d_x:\n0:(0)\n\
\nRaw frames for rotation_3d_y:\n0:(0)\n\
\nRaw frames for rotation_3d_z:\n0:(0)\n\
\n"
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn plain_variables_with_cam_code_and_json_layout() {
        let opts = RenderOptions {
            cam_code: true,
            json: true,
            raw_frames: false,
        };
        let out = render(&[nudge("Cam")], &opts).unwrap();
        let x = "0:(1),1:(1),";
        let z = "0:(0),1:(0),";
        let expected = format!(
            "\nCamera Export: Cam\n\
translation_x = \"{x}\" #@param {{type:\"string\"}}\n\
translation_y = \"{z}\" #@param {{type:\"string\"}}\n\
translation_z = \"{z}\" #@param {{type:\"string\"}}\n\
rotation_3d_x = \"{z}\" #@param {{type:\"string\"}}\n\
rotation_3d_y = \"{z}\" #@param {{type:\"string\"}}\n\
rotation_3d_z = \"{z}\" #@param {{type:\"string\"}}\n\
cam_code:\n\
(translation_x,translation_y,translation_z,rotation_3d_x,rotation_3d_y,rotation_3d_z) = \
(\"{x}\", \"{z}\", \"{z}\", \"{z}\", \"{z}\", \"{z}\")\n\
JSON:\n {NUDGE_JSON}\n\
\n"
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn plain_block_layout() {
        let out = render(&[still("Cam", 3)], &RenderOptions::default()).unwrap();
        let expected = "\nCamera Export: Cam\n\
translation_x = \"0:(0),2:(0),\" #@param {type:\"string\"}\n\
translation_y = \"0:(0),2:(0),\" #@param {type:\"string\"}\n\
translation_z = \"0:(0),2:(0),\" #@param {type:\"string\"}\n\
rotation_3d_x = \"0:(0),2:(0),\" #@param {type:\"string\"}\n\
rotation_3d_y = \"0:(0),2:(0),\" #@param {type:\"string\"}\n\
rotation_3d_z = \"0:(0),2:(0),\" #@param {type:\"string\"}\n\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn cam_code_tuple() {
        let line = cam_code_line(&still("Cam", 2));
        assert_eq!(
            line,
            "cam_code:\n(translation_x,translation_y,translation_z,rotation_3d_x,rotation_3d_y,rotation_3d_z) = \
(\"0:(0),1:(0),\", \"0:(0),1:(0),\", \"0:(0),1:(0),\", \"0:(0),1:(0),\", \"0:(0),1:(0),\", \"0:(0),1:(0),\")\n"
        );
    }

    #[test]
    fn raw_mode_replaces_plain_variables() {
        let opts = RenderOptions {
            raw_frames: true,
            ..Default::default()
        };
        let out = render(&[still("Cam", 2)], &opts).unwrap();
        assert!(!out.contains("#@param"));
        assert!(out.contains("\nRaw frames for rotation_3d_z:\n0:(0)\n"));
        assert!(out.ends_with("\n\n"));
    }
}
