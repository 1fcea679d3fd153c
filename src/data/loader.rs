use std::collections::BTreeMap;

use serde::Deserialize;

use crate::config::{AnnotationFormat, JsonRectPolicy, SourceConfig};
use crate::error::{MetaError, MetaResult};

use super::geometry::rect_from_landmarks;
use super::model::{ImageFileMetadata, ObjectOnImage, Point2D, Rectangle};
use super::sampling::{check_stride, every_nth, keeps_index};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load one configured source. Dispatch by format.
pub fn load_source(cfg: &SourceConfig) -> MetaResult<Vec<ImageFileMetadata>> {
    match cfg.resolved_format()? {
        AnnotationFormat::Dlib => load_dlib_json_with(
            &cfg.root,
            &cfg.labels,
            cfg.rect_scale,
            cfg.sample,
            cfg.json_rect,
        ),
        AnnotationFormat::Vggface2 => {
            load_vggface2_csv(&cfg.root, &cfg.labels, cfg.rect_scale, cfg.sample)
        }
    }
}

// ---------------------------------------------------------------------------
// Dlib JSON loader
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct DlibLabels {
    images: Vec<DlibImage>,
}

#[derive(Deserialize)]
struct DlibImage {
    filename: String,
    boxes: Vec<DlibBox>,
}

// Coordinates are plain JSON numbers; fractional ones truncate toward zero.
#[derive(Deserialize)]
struct DlibBox {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    landmarks: Vec<Point2D>,
}

/// Expected JSON schema:
///
/// ```json
/// { "images": [
///     { "filename": "300W/01_Indoor/indoor_001.jpg",
///       "boxes": [ { "left": 87, "top": 146, "width": 286, "height": 286,
///                    "landmarks": [ {"x": 103.2, "y": 232.8}, ... ] } ] },
///     ...
/// ] }
/// ```
///
/// The labels file is read from `root + labels`. Image `i` (document order)
/// is kept when `i % sample == 0` and its filename ends in `.jpg`
/// (case-insensitive). Boxes are taken as written.
pub fn load_dlib_json(
    root: &str,
    labels: &str,
    rect_scale: f32,
    sample: usize,
) -> MetaResult<Vec<ImageFileMetadata>> {
    load_dlib_json_with(root, labels, rect_scale, sample, JsonRectPolicy::Verbatim)
}

/// [`load_dlib_json`] with an explicit rectangle policy.
pub fn load_dlib_json_with(
    root: &str,
    labels: &str,
    rect_scale: f32,
    sample: usize,
    policy: JsonRectPolicy,
) -> MetaResult<Vec<ImageFileMetadata>> {
    check_stride(sample)?;

    let path = format!("{root}{labels}");
    let text = std::fs::read_to_string(&path).map_err(|e| MetaError::io(&path, e))?;
    let doc: DlibLabels =
        serde_json::from_str(&text).map_err(|e| MetaError::parse(&path, e.to_string()))?;

    let total = doc.images.len();
    let mut out = Vec::new();

    for (i, image) in doc.images.into_iter().enumerate() {
        if !keeps_index(i, sample) {
            continue;
        }
        if !image.filename.to_lowercase().ends_with(".jpg") {
            log::debug!("{path}: skipping non-jpg entry {i} '{}'", image.filename);
            continue;
        }

        let mut objects = Vec::with_capacity(image.boxes.len());
        for (k, b) in image.boxes.into_iter().enumerate() {
            let rect = match policy {
                JsonRectPolicy::Verbatim => {
                    if b.width < 0.0 || b.height < 0.0 {
                        return Err(MetaError::Validation {
                            path: path.clone().into(),
                            row: i,
                            msg: format!("box {k} has negative size {}x{}", b.width, b.height),
                        });
                    }
                    Rectangle::new(b.left as i32, b.top as i32, b.width as i32, b.height as i32)
                }
                JsonRectPolicy::FromLandmarks => rect_from_landmarks(&b.landmarks, rect_scale)?,
            };
            if b.landmarks.is_empty() {
                log::warn!("{path}: box {k} {rect} of '{}' has no landmarks", image.filename);
            }

            objects.push(ObjectOnImage {
                rect,
                landmarks: b.landmarks,
            });
        }

        out.push(ImageFileMetadata::new(format!("{root}{}", image.filename), objects));
    }

    log::info!("{path}: kept {} of {total} images (sample={sample})", out.len());
    Ok(out)
}

// ---------------------------------------------------------------------------
// VGGFace2 CSV loader
// ---------------------------------------------------------------------------

const VGGFACE2_LANDMARKS: usize = 5;
const VGGFACE2_FIELDS: usize = 2 * VGGFACE2_LANDMARKS + 1;

/// CSV layout: one header row (ignored), then rows of
/// `NAME_ID, P1X, P1Y, ..., P5X, P5Y`.
///
/// The labels file is read from `labels` as given; image paths are
/// `root + NAME_ID + ".jpg"`. Rows naming the same image are grouped into one
/// record, emitted in filepath order, and only then subsampled by position.
pub fn load_vggface2_csv(
    root: &str,
    labels: &str,
    rect_scale: f32,
    sample: usize,
) -> MetaResult<Vec<ImageFileMetadata>> {
    check_stride(sample)?;

    let file = std::fs::File::open(labels).map_err(|e| MetaError::io(labels, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut grouped: BTreeMap<String, Vec<ObjectOnImage>> = BTreeMap::new();
    let mut rows = 0usize;

    for result in reader.records() {
        let record = result.map_err(|e| MetaError::parse(labels, e.to_string()))?;
        let line = record.position().map_or(0, |p| p.line() as usize);

        if record.len() != VGGFACE2_FIELDS {
            return Err(MetaError::Validation {
                path: labels.into(),
                row: line,
                msg: format!("expected {VGGFACE2_FIELDS} fields, got {}", record.len()),
            });
        }

        let landmarks = (0..VGGFACE2_LANDMARKS)
            .map(|j| -> MetaResult<Point2D> {
                Ok(Point2D::new(
                    parse_coord(&record, 2 * j + 1, labels, line)?,
                    parse_coord(&record, 2 * j + 2, labels, line)?,
                ))
            })
            .collect::<MetaResult<Vec<_>>>()?;

        let rect = rect_from_landmarks(&landmarks, rect_scale)?;
        let filepath = format!("{root}{}.jpg", &record[0]);
        log::debug!("{labels}:{line}: {filepath} {rect}");

        grouped
            .entry(filepath)
            .or_default()
            .push(ObjectOnImage { rect, landmarks });
        rows += 1;
    }

    let images: Vec<ImageFileMetadata> = grouped.into_iter().map(Into::into).collect();
    let grouped_len = images.len();
    let out = every_nth(images, sample);

    log::info!(
        "{labels}: {rows} rows → {grouped_len} images, kept {} (sample={sample})",
        out.len()
    );
    Ok(out)
}

fn parse_coord(record: &csv::StringRecord, idx: usize, labels: &str, line: usize) -> MetaResult<f32> {
    let tok = &record[idx];
    let v = tok.parse::<f32>().map_err(|_| {
        MetaError::parse(labels, format!("line {line}, field {idx}: '{tok}' is not a number"))
    })?;
    if !v.is_finite() {
        return Err(MetaError::parse(
            labels,
            format!("line {line}, field {idx}: '{tok}' is not a finite number"),
        ));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> String {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn root_of(dir: &tempfile::TempDir) -> String {
        format!("{}/", dir.path().display())
    }

    #[test]
    fn dlib_box_taken_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir,
            "labels.json",
            r#"{"images": [{"filename": "a.JPG", "boxes": [
                {"left": 5, "top": 6, "width": 70, "height": 80,
                 "landmarks": [{"x": 1.5, "y": 2.5}, {"x": 3.0, "y": 4.0}]}]}]}"#,
        );
        let root = root_of(&dir);

        let out = load_dlib_json(&root, "labels.json", 3.0, 1).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].filepath, format!("{root}a.JPG"));
        let obj = &out[0].objects[0];
        assert_eq!(obj.rect, Rectangle::new(5, 6, 70, 80));
        assert_eq!(obj.landmarks, vec![Point2D::new(1.5, 2.5), Point2D::new(3.0, 4.0)]);
    }

    #[test]
    fn dlib_from_landmarks_policy() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir,
            "labels.json",
            r#"{"images": [{"filename": "a.jpg", "boxes": [
                {"left": 0, "top": 0, "width": 1, "height": 1,
                 "landmarks": [{"x": 40, "y": 50}, {"x": 60, "y": 50}]}]}]}"#,
        );
        let root = root_of(&dir);

        let out =
            load_dlib_json_with(&root, "labels.json", 2.0, 1, JsonRectPolicy::FromLandmarks)
                .unwrap();
        assert_eq!(out[0].objects[0].rect, Rectangle::new(30, 30, 40, 40));
    }

    #[test]
    fn dlib_from_landmarks_without_landmarks_fails() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir,
            "labels.json",
            r#"{"images": [{"filename": "a.jpg", "boxes": [
                {"left": 0, "top": 0, "width": 1, "height": 1, "landmarks": []}]}]}"#,
        );
        let root = root_of(&dir);

        let err = load_dlib_json_with(&root, "labels.json", 1.0, 1, JsonRectPolicy::FromLandmarks)
            .unwrap_err();
        assert!(matches!(err, MetaError::InvalidInput(_)));
    }

    #[test]
    fn dlib_negative_extent_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir,
            "labels.json",
            r#"{"images": [{"filename": "a.jpg", "boxes": [
                {"left": 0, "top": 0, "width": -4, "height": 1, "landmarks": []}]}]}"#,
        );
        let err = load_dlib_json(&root_of(&dir), "labels.json", 1.0, 1).unwrap_err();
        assert!(matches!(err, MetaError::Validation { row: 0, .. }));
    }

    #[test]
    fn dlib_from_landmarks_ignores_written_size() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir,
            "labels.json",
            r#"{"images": [{"filename": "a.jpg", "boxes": [
                {"left": 0, "top": 0, "width": -1, "height": 5,
                 "landmarks": [{"x": 40, "y": 50}, {"x": 60, "y": 50}]}]}]}"#,
        );
        let root = root_of(&dir);

        let out =
            load_dlib_json_with(&root, "labels.json", 1.0, 1, JsonRectPolicy::FromLandmarks)
                .unwrap();
        assert_eq!(out[0].objects[0].rect, Rectangle::new(40, 40, 20, 20));
    }

    #[test]
    fn dlib_missing_field_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "labels.json", r#"{"images": [{"filename": "a.jpg"}]}"#);
        let err = load_dlib_json(&root_of(&dir), "labels.json", 1.0, 1).unwrap_err();
        assert!(matches!(err, MetaError::Parse { .. }));
    }

    #[test]
    fn dlib_wrong_type_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir,
            "labels.json",
            r#"{"images": [{"filename": 12, "boxes": []}]}"#,
        );
        let err = load_dlib_json(&root_of(&dir), "labels.json", 1.0, 1).unwrap_err();
        assert!(matches!(err, MetaError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dlib_json(&root_of(&dir), "nope.json", 1.0, 1).unwrap_err();
        assert!(matches!(err, MetaError::Io { .. }));

        let missing = dir.path().join("nope.csv");
        let err = load_vggface2_csv("", &missing.to_string_lossy(), 1.0, 1).unwrap_err();
        assert!(matches!(err, MetaError::Io { .. }));
    }

    #[test]
    fn zero_stride_rejected_before_reading() {
        let err = load_dlib_json("", "does-not-exist.json", 1.0, 0).unwrap_err();
        assert!(matches!(err, MetaError::InvalidInput(_)));
        let err = load_vggface2_csv("", "does-not-exist.csv", 1.0, 0).unwrap_err();
        assert!(matches!(err, MetaError::InvalidInput(_)));
    }

    #[test]
    fn vggface2_rect_derived_from_landmarks() {
        let dir = tempfile::tempdir().unwrap();
        let labels = write(
            &dir,
            "lm.csv",
            "NAME_ID,P1X,P1Y,P2X,P2Y,P3X,P3Y,P4X,P4Y,P5X,P5Y\n\
             n000001/0001_01,40,50,60,50,50,50,45,50,55,50\n",
        );

        let out = load_vggface2_csv("/data/", &labels, 1.0, 1).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].filepath, "/data/n000001/0001_01.jpg");
        let obj = &out[0].objects[0];
        assert_eq!(obj.landmarks.len(), 5);
        assert_eq!(obj.landmarks[0], Point2D::new(40.0, 50.0));
        assert_eq!(obj.landmarks[4], Point2D::new(55.0, 50.0));
        assert_eq!(obj.rect, Rectangle::new(40, 40, 20, 20));
    }

    #[test]
    fn vggface2_non_numeric_coordinate_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let labels = write(&dir, "lm.csv", "h\na,1,2,3,4,5,6,7,8,9,ten\n");
        let err = load_vggface2_csv("", &labels, 1.0, 1).unwrap_err();
        assert!(matches!(err, MetaError::Parse { .. }));
    }

    #[test]
    fn vggface2_non_finite_coordinate_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        for row in ["a,NaN,1,2,2,3,3,4,4,5,5", "a,1,1,inf,2,3,3,4,4,5,5", "a,1,1,2,2,3,-infinity,4,4,5,5"] {
            let labels = write(&dir, "lm.csv", &format!("h\n{row}\n"));
            let err = load_vggface2_csv("", &labels, 1.0, 1).unwrap_err();
            assert!(matches!(err, MetaError::Parse { .. }), "{row}: {err}");
        }
    }

    #[test]
    fn vggface2_header_only_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let labels = write(&dir, "lm.csv", "NAME_ID,P1X,P1Y\n");
        assert!(load_vggface2_csv("", &labels, 1.0, 1).unwrap().is_empty());
    }

    #[test]
    fn load_source_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let labels = write(&dir, "lm.csv", "h\nimg,1,1,2,2,3,3,4,4,5,5\n");
        let out = load_source(&SourceConfig::new("", labels)).unwrap();
        assert_eq!(out[0].filepath, "img.jpg");
    }
}
