/// Data layer: annotation types, geometry, loading, and aggregation.
///
/// Architecture:
/// ```text
///  dlib .json          vggface2 .csv
///       │                    │
///       │                    ▼
///       │              ┌──────────┐
///       │              │ geometry  │  landmarks → square rect
///       │              └──────────┘
///       ▼                    │
///   ┌──────────────────────────┐
///   │          loader           │  parse → Vec<ImageFileMetadata>
///   └──────────────────────────┘
///                │   (sampling: keep every Nth record)
///                ▼
///        ┌──────────────┐
///        │  MetaDataSet  │  append-only, call order preserved
///        └──────────────┘
/// ```

pub mod dataset;
pub mod geometry;
pub mod loader;
pub mod model;
pub mod sampling;
