use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use facemeta::{AnnotationFormat, JsonRectPolicy, Manifest, MetaDataSet, SourceConfig};

/// Load face landmark annotations and report what was loaded.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON manifest listing several sources; replaces the single-source flags.
    #[arg(long, conflicts_with_all = ["format", "labels", "root", "rect_scale", "sample", "json_rect"])]
    manifest: Option<PathBuf>,
    /// Annotation format (inferred from the labels extension when omitted).
    #[arg(long, value_enum)]
    format: Option<AnnotationFormat>,
    /// Prefix prepended to every image filename.
    #[arg(long, default_value = "")]
    root: String,
    /// Labels file.
    #[arg(long, required_unless_present = "manifest")]
    labels: Option<String>,
    /// Scale applied to landmark-derived rectangles.
    #[arg(long, default_value_t = 1.0)]
    rect_scale: f32,
    /// Keep every Nth image.
    #[arg(long, default_value_t = 1)]
    sample: usize,
    /// Rectangle policy for Dlib JSON boxes.
    #[arg(long, value_enum, default_value_t = JsonRectPolicy::Verbatim)]
    json_rect: JsonRectPolicy,
    /// Print the normalized dataset as JSON on stdout.
    #[arg(long, default_value_t = false)]
    dump: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut dataset = MetaDataSet::new();

    match (&args.manifest, &args.labels) {
        (Some(path), _) => {
            let manifest = Manifest::from_path(path)
                .with_context(|| format!("reading manifest {}", path.display()))?;
            dataset
                .load_manifest(&manifest)
                .context("loading manifest sources")?;
        }
        (None, Some(labels)) => {
            let cfg = SourceConfig {
                format: args.format,
                root: args.root.clone(),
                labels: labels.clone(),
                rect_scale: args.rect_scale,
                sample: args.sample,
                json_rect: args.json_rect,
            };
            dataset
                .load_source(&cfg)
                .with_context(|| format!("loading {labels}"))?;
        }
        (None, None) => anyhow::bail!("either --manifest or --labels is required"),
    }

    if args.dump {
        let json = serde_json::to_string_pretty(&dataset).context("serializing dataset")?;
        println!("{json}");
    } else {
        println!("{}", dataset.summary());
    }

    Ok(())
}
