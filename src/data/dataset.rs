use std::fmt;

use serde::Serialize;

use crate::config::{Manifest, SourceConfig};
use crate::error::MetaResult;

use super::loader;
use super::model::ImageFileMetadata;

// ---------------------------------------------------------------------------
// DatasetSummary – counts reported after each load
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DatasetSummary {
    pub images: usize,
    pub objects: usize,
    pub landmarks: usize,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} images, {} objects, {} landmarks",
            self.images, self.objects, self.landmarks
        )
    }
}

// ---------------------------------------------------------------------------
// MetaDataSet – the accumulated, append-only dataset
// ---------------------------------------------------------------------------

/// Ordered collection of annotated images handed to downstream consumers.
///
/// Records are only ever appended. Each load either appends its whole batch
/// or nothing; batches from separate loads are never merged, even when they
/// name the same file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetaDataSet {
    data: Vec<ImageFileMetadata>,
}

impl MetaDataSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch at the end, keeping its order.
    pub fn append(&mut self, records: Vec<ImageFileMetadata>) {
        self.data.extend(records);
    }

    /// Load a Dlib JSON file and append it. Returns the number of images added.
    pub fn load_dlib(
        &mut self,
        root: &str,
        labels: &str,
        rect_scale: f32,
        sample: usize,
    ) -> MetaResult<usize> {
        let batch = loader::load_dlib_json(root, labels, rect_scale, sample)?;
        Ok(self.push_batch(batch))
    }

    /// Load a VGGFace2 landmark CSV and append it. Returns the number of images added.
    pub fn load_vggface2(
        &mut self,
        root: &str,
        labels: &str,
        rect_scale: f32,
        sample: usize,
    ) -> MetaResult<usize> {
        let batch = loader::load_vggface2_csv(root, labels, rect_scale, sample)?;
        Ok(self.push_batch(batch))
    }

    pub fn load_source(&mut self, cfg: &SourceConfig) -> MetaResult<usize> {
        let batch = loader::load_source(cfg)?;
        Ok(self.push_batch(batch))
    }

    /// Load every manifest source in order. Nothing is appended unless all
    /// of them load.
    pub fn load_manifest(&mut self, manifest: &Manifest) -> MetaResult<usize> {
        let mut batches = Vec::with_capacity(manifest.sources.len());
        for cfg in &manifest.sources {
            batches.push(loader::load_source(cfg)?);
        }
        Ok(batches.into_iter().map(|b| self.push_batch(b)).sum())
    }

    fn push_batch(&mut self, batch: Vec<ImageFileMetadata>) -> usize {
        let n = batch.len();
        self.append(batch);
        log::info!("dataset now holds {}", self.summary());
        n
    }

    pub fn data(&self) -> &[ImageFileMetadata] {
        &self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageFileMetadata> {
        self.data.iter()
    }

    pub fn into_inner(self) -> Vec<ImageFileMetadata> {
        self.data
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn summary(&self) -> DatasetSummary {
        self.data.iter().fold(
            DatasetSummary {
                images: self.data.len(),
                ..Default::default()
            },
            |mut s, ifm| {
                s.objects += ifm.objects.len();
                s.landmarks += ifm.objects.iter().map(|o| o.landmarks.len()).sum::<usize>();
                s
            },
        )
    }
}

impl<'a> IntoIterator for &'a MetaDataSet {
    type Item = &'a ImageFileMetadata;
    type IntoIter = std::slice::Iter<'a, ImageFileMetadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
