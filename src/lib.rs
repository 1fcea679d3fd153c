//! Face landmark annotation loading.
//!
//! Reads Dlib-style JSON (explicit boxes) and VGGFace2-style CSV (five
//! landmarks per face, boxes derived) into one ordered [`MetaDataSet`].

pub mod config;
pub mod data;
pub mod error;

pub use config::{AnnotationFormat, JsonRectPolicy, Manifest, SourceConfig};
pub use data::dataset::{DatasetSummary, MetaDataSet};
pub use data::geometry::{rect_from_landmarks, round_half_up};
pub use data::loader::{load_dlib_json, load_dlib_json_with, load_source, load_vggface2_csv};
pub use data::model::{ImageFileMetadata, ObjectOnImage, Point2D, Rectangle};
pub use error::{MetaError, MetaResult};
