use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Frame {
    pub(crate) path: String,
}

#[derive(Debug, Clone)]
pub(crate) struct FrameListRead {
    pub(crate) frames: Vec<Frame>,
    pub(crate) skipped: usize,
}

pub(crate) fn read_frame_list(path: &Path) -> Result<FrameListRead> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read frame list {}", path.display()))?;
    parse_frame_list(&raw).with_context(|| format!("invalid frame list {}", path.display()))
}

/// Accepts a bare array of frame objects or an object with a `frames` array.
pub(crate) fn parse_frame_list(raw: &str) -> Result<FrameListRead> {
    let value: Value = serde_json::from_str(raw).context("frame list is not valid JSON")?;
    let items = match &value {
        Value::Array(items) => items,
        Value::Object(_) => match value.get("frames").and_then(Value::as_array) {
            Some(items) => items,
            None => bail!("expected a `frames` array"),
        },
        _ => bail!("expected an array of frames"),
    };

    let mut frames = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for item in items {
        match item.get("path").and_then(Value::as_str) {
            Some(path) if !path.trim().is_empty() => frames.push(Frame {
                path: path.to_string(),
            }),
            _ => skipped += 1,
        }
    }
    Ok(FrameListRead { frames, skipped })
}

/// First `frame_DDDD_` occurrence in the path, as the four-digit string.
pub(crate) fn frame_number_from_path(path: &str) -> Option<&str> {
    const PREFIX: &str = "frame_";
    for (idx, _) in path.match_indices(PREFIX) {
        let start = idx + PREFIX.len();
        let Some(rest) = path.get(start..) else {
            continue;
        };
        let bytes = rest.as_bytes();
        if bytes.len() >= 5 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'_' {
            return Some(&rest[..4]);
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameNavigator {
    cursor: usize,
    len: usize,
}

impl FrameNavigator {
    pub(crate) fn new(len: usize, initial_cursor: usize) -> Result<Self> {
        if len == 0 {
            bail!("frame list is empty");
        }
        Ok(Self {
            cursor: initial_cursor % len,
            len,
        })
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn next(&mut self) {
        self.cursor = (self.cursor + 1) % self.len;
    }

    pub(crate) fn previous(&mut self) {
        self.cursor = (self.cursor + self.len - 1) % self.len;
    }
}
