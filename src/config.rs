use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{MetaError, MetaResult};

// ---------------------------------------------------------------------------
// Annotation formats and per-format policies
// ---------------------------------------------------------------------------

/// On-disk annotation schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationFormat {
    /// `{"images": [{"filename", "boxes": [...]}]}` with explicit boxes.
    Dlib,
    /// Header + rows of `id, x0, y0, ..., x4, y4`; boxes derived from landmarks.
    Vggface2,
}

impl AnnotationFormat {
    /// Infer the format from the labels file extension.
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "json" => Some(AnnotationFormat::Dlib),
            "csv" => Some(AnnotationFormat::Vggface2),
            _ => None,
        }
    }
}

/// Where rectangles of Dlib JSON boxes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum JsonRectPolicy {
    /// Use `left/top/width/height` as written; `rect_scale` is ignored.
    #[default]
    Verbatim,
    /// Replace each box with the square derived from its landmarks.
    FromLandmarks,
}

// ---------------------------------------------------------------------------
// SourceConfig / Manifest
// ---------------------------------------------------------------------------

fn default_rect_scale() -> f32 {
    1.0
}

fn default_sample() -> usize {
    1
}

/// One annotation source to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Inferred from the `labels` extension when absent.
    #[serde(default)]
    pub format: Option<AnnotationFormat>,
    /// Prefix prepended verbatim to every image filename.
    #[serde(default)]
    pub root: String,
    pub labels: String,
    #[serde(default = "default_rect_scale")]
    pub rect_scale: f32,
    #[serde(default = "default_sample")]
    pub sample: usize,
    #[serde(default)]
    pub json_rect: JsonRectPolicy,
}

impl SourceConfig {
    pub fn new(root: impl Into<String>, labels: impl Into<String>) -> Self {
        Self {
            format: None,
            root: root.into(),
            labels: labels.into(),
            rect_scale: default_rect_scale(),
            sample: default_sample(),
            json_rect: JsonRectPolicy::default(),
        }
    }

    pub fn resolved_format(&self) -> MetaResult<AnnotationFormat> {
        self.format
            .or_else(|| AnnotationFormat::from_path(&self.labels))
            .ok_or_else(|| {
                MetaError::InvalidInput(format!(
                    "cannot infer annotation format of '{}', set it explicitly",
                    self.labels
                ))
            })
    }
}

/// A list of sources appended, in order, into one dataset.
///
/// ```json
/// {
///   "sources": [
///     { "format": "vggface2", "root": "/data/vggface2/test/",
///       "labels": "/data/vggface2/test/loose_landmark_test.csv",
///       "rect_scale": 3.0, "sample": 100 },
///     { "root": "/data/ibug/", "labels": "labels_ibug_300W.json" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub sources: Vec<SourceConfig>,
}

impl Manifest {
    pub fn from_path(path: &Path) -> MetaResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| MetaError::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| MetaError::parse(path, e.to_string()))
    }
}
