use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

/// Deterministic splitmix64 generator, enough for jittering landmarks.
struct SplitMix {
    state: u64,
}

impl SplitMix {
    fn new(seed: u64) -> Self {
        SplitMix { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[-amp, amp)`.
    fn jitter(&mut self, amp: f32) -> f32 {
        let unit = (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
        (unit * 2.0 - 1.0) * amp
    }
}

/// Five canonical face landmarks (eyes, nose, mouth corners) in a unit face.
const FACE_5: [(f32, f32); 5] = [
    (0.30, 0.35),
    (0.70, 0.35),
    (0.50, 0.55),
    (0.35, 0.75),
    (0.65, 0.75),
];

fn face_landmarks(rng: &mut SplitMix, left: f32, top: f32, size: f32) -> Vec<(f32, f32)> {
    FACE_5
        .iter()
        .map(|&(u, v)| {
            (
                left + u * size + rng.jitter(size * 0.02),
                top + v * size + rng.jitter(size * 0.02),
            )
        })
        .collect()
}

fn write_dlib(rng: &mut SplitMix, path: &Path) -> Result<usize> {
    let filenames = [
        "faces/img_0001.jpg",
        "faces/img_0002.JPG",
        "faces/img_0003.png",
        "faces/img_0004.jpg",
        "faces/img_0005.jpg",
        "faces/img_0006.jpeg",
    ];

    let images: Vec<_> = filenames
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let boxes: Vec<_> = (0..=i % 2)
                .map(|k| {
                    let size = 80.0 + 10.0 * i as f32;
                    let (left, top) = (20.0 + 120.0 * k as f32, 30.0);
                    let landmarks: Vec<_> = face_landmarks(rng, left, top, size)
                        .into_iter()
                        .map(|(x, y)| json!({ "x": x, "y": y }))
                        .collect();
                    json!({
                        "left": left as i32,
                        "top": top as i32,
                        "width": size as i32,
                        "height": size as i32,
                        "landmarks": landmarks,
                    })
                })
                .collect();
            json!({ "filename": name, "boxes": boxes })
        })
        .collect();

    let doc = json!({ "images": images });
    let text = serde_json::to_string_pretty(&doc)?;
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    Ok(filenames.len())
}

fn write_vggface2(rng: &mut SplitMix, path: &Path) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record([
        "NAME_ID", "P1X", "P1Y", "P2X", "P2Y", "P3X", "P3Y", "P4X", "P4Y", "P5X", "P5Y",
    ])?;

    // Out of filepath order on purpose, with one image holding two faces.
    let ids = [
        "n000002/0001_01",
        "n000001/0002_01",
        "n000001/0001_01",
        "n000002/0001_01",
        "n000003/0001_01",
    ];

    for (i, id) in ids.iter().enumerate() {
        let left = 40.0 + 100.0 * (i % 2) as f32;
        let mut row = vec![id.to_string()];
        for (x, y) in face_landmarks(rng, left, 50.0, 90.0) {
            row.push(format!("{x:.4}"));
            row.push(format!("{y:.4}"));
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(ids.len())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SplitMix::new(42);
    let out_dir = Path::new("sample_data");
    fs::create_dir_all(out_dir).context("creating sample_data/")?;

    let json_path = out_dir.join("dlib_labels.json");
    let csv_path = out_dir.join("vggface2_landmarks.csv");

    let images = write_dlib(&mut rng, &json_path)?;
    let rows = write_vggface2(&mut rng, &csv_path)?;

    log::info!("sample generation done");
    println!("Wrote {images} images to {}", json_path.display());
    println!("Wrote {rows} rows to {}", csv_path.display());
    Ok(())
}
