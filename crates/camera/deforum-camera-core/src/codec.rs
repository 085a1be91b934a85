//! Keyframe string codec.
//!
//! Two independent compaction rules live here:
//! - `encode_keyframes`: snap near-zero values, then drop an interior sample only when it
//!   matches *both* neighbours. A run of three or more equal values keeps its two ends; a
//!   pair keeps both members.
//! - `encode_raw_frames`: no snapping; keep a sample only when it differs from the sample
//!   right before it, so every run collapses to its first member.
//!
//! Entries render as `idx:(value),`. Values use Rust's shortest round-trip float formatting.

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::Result;

/// Magnitudes at or below this are written (and compared) as exactly zero.
pub const ZERO_SNAP_THRESHOLD: f64 = 1e-5;

/// Relative tolerance for closeness, with no absolute floor.
pub const REL_TOLERANCE: f64 = 1e-9;

/// A retained `(frame index, value)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: usize,
    pub value: f64,
}

#[inline]
pub fn snap_zero(v: f64) -> f64 {
    if v.abs() > ZERO_SNAP_THRESHOLD {
        v
    } else {
        0.0
    }
}

/// Relative closeness: `|a - b| <= REL_TOLERANCE * max(|a|, |b|)`.
/// Infinities are close only to themselves; NaN is close to nothing.
#[inline]
pub fn is_close(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    if a.is_infinite() || b.is_infinite() {
        return false;
    }
    (a - b).abs() <= REL_TOLERANCE * a.abs().max(b.abs())
}

/// Indices and snapped values kept by the both-neighbours rule.
pub fn retained_keyframes(series: &[f64]) -> Vec<Keyframe> {
    let n = series.len();
    let mut out = Vec::new();
    for (i, &raw) in series.iter().enumerate() {
        let val = snap_zero(raw);
        let last_is_same = i > 0 && is_close(val, snap_zero(series[i - 1]));
        let next_is_same = i + 1 < n && is_close(val, snap_zero(series[i + 1]));
        if !(last_is_same && next_is_same) {
            out.push(Keyframe {
                frame: i,
                value: val,
            });
        }
    }
    out
}

/// Compact keyframe string; trailing comma is part of the format.
pub fn encode_keyframes(series: &[f64]) -> String {
    let mut s = String::new();
    for k in retained_keyframes(series) {
        push_entry(&mut s, k);
    }
    s
}

/// Indices and raw values where the series changes.
pub fn raw_frame_changes(series: &[f64]) -> Vec<Keyframe> {
    let mut out = Vec::new();
    let mut last: Option<f64> = None;
    for (i, &val) in series.iter().enumerate() {
        if last.map_or(true, |prev| !is_close(val, prev)) {
            out.push(Keyframe { frame: i, value: val });
        }
        last = Some(val);
    }
    out
}

/// Raw per-change dump; trailing comma stripped.
pub fn encode_raw_frames(series: &[f64]) -> String {
    let mut s = String::new();
    for k in raw_frame_changes(series) {
        push_entry(&mut s, k);
    }
    s.pop();
    s
}

fn push_entry(s: &mut String, k: Keyframe) {
    s.push_str(&format!("{}:({}),", k.frame, k.value));
}

/// Parse an `idx:(value),` list. Whitespace is tolerated and the trailing comma is optional.
/// Parentheses around the value are optional too, matching what hand edits tend to produce.
pub fn decode_keyframes(input: &str) -> Result<Vec<Keyframe>> {
    let mut out = Vec::new();
    for (entry, part) in input.split(',').enumerate() {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let invalid = |reason: String| ExportError::InvalidKeyframes { entry, reason };

        let (idx, value) = part
            .split_once(':')
            .ok_or_else(|| invalid(format!("missing ':' in '{part}'")))?;
        let frame = idx
            .trim()
            .parse::<usize>()
            .map_err(|e| invalid(format!("bad frame index '{}': {e}", idx.trim())))?;

        let value = value.trim();
        let value = value
            .strip_prefix('(')
            .and_then(|v| v.strip_suffix(')'))
            .unwrap_or(value)
            .trim();
        let value = value
            .parse::<f64>()
            .map_err(|e| invalid(format!("bad value '{value}': {e}")))?;

        if let Some(prev) = out.last().map(|k: &Keyframe| k.frame) {
            if frame <= prev {
                return Err(invalid(format!(
                    "frame {frame} does not follow frame {prev}"
                )));
            }
        }
        out.push(Keyframe { frame, value });
    }
    Ok(out)
}

/// Rebuild `len` samples by holding each keyframe's value until the next one.
/// Frames before the first keyframe take its value; no keyframes yields zeros.
pub fn reconstruct_step(keys: &[Keyframe], len: usize) -> Vec<f64> {
    let Some(first) = keys.first() else {
        return vec![0.0; len];
    };
    let mut out = Vec::with_capacity(len);
    let mut current = first.value;
    let mut next = 0;
    for i in 0..len {
        while next < keys.len() && keys[next].frame <= i {
            current = keys[next].value;
            next += 1;
        }
        out.push(current);
    }
    out
}
