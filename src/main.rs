use clap::{Parser, Subcommand};
use postfit::compliance::{CompliancePipeline, CompressionPolicy, ImageCandidate, Quality};
use postfit::{alt_text, config, output, scan};
use serde::Serialize;
use std::path::PathBuf;

/// Shared arguments for commands that run a compliance batch.
#[derive(clap::Args, Clone)]
struct BatchArgs {
    /// Image files or directories containing images
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Force the one-shot downscale policy regardless of config
    #[arg(long)]
    single_pass: bool,
}

#[derive(Parser)]
#[command(name = "postfit")]
#[command(about = "Prepares local images for social-media posts")]
#[command(long_about = "\
Prepares local images for social-media posts

Every image embedded in a post must fit the destination platform's upload
ceiling (976.56 KiB per blob). postfit takes a batch of images, passes
through the ones that already fit, walks the oversized ones down a
descending quality ladder (75, 65, ... 15) until they fit, and drops the
ones that never do - per image, never failing the batch. Surviving images
keep their input order so alt texts stay paired after drops.

Alt text resolution (first available wins):
  explicit text -> sidecar .txt (photo_1.txt next to photo_1.png) -> filename

Run 'postfit gen-config' to generate a documented postfit.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "postfit.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report which images clear the upload ceiling
    Check(BatchArgs),
    /// Write upload-ready images plus a manifest for the posting step
    Prepare {
        #[command(flatten)]
        batch: BatchArgs,

        /// Output directory
        #[arg(long, default_value = "prepared")]
        output: PathBuf,
    },
    /// Print a stock postfit.toml with all options documented
    GenConfig,
}

/// What `prepare` leaves behind for the posting orchestrator: one file
/// per surviving image plus this manifest, in survivor order.
#[derive(Serialize)]
struct PreparedManifest {
    lang: String,
    images: Vec<PreparedImage>,
}

#[derive(Serialize)]
struct PreparedImage {
    file: String,
    alt: String,
    bytes: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check(batch) => {
            let cfg = config::RunConfig::load(&cli.config)?;
            let candidates = build_candidates(&batch);
            let pipeline = CompliancePipeline::with_defaults(effective_policy(&cfg, &batch));
            let report = pipeline.run(&candidates);
            output::print_report(&candidates, &report);
        }
        Command::Prepare {
            batch,
            output: out_dir,
        } => {
            let cfg = config::RunConfig::load(&cli.config)?;
            let candidates = build_candidates(&batch);
            let pipeline = CompliancePipeline::with_defaults(effective_policy(&cfg, &batch));
            let report = pipeline.run(&candidates);
            output::print_report(&candidates, &report);

            std::fs::create_dir_all(&out_dir)?;
            let mut images = Vec::new();
            for (index, img) in report.images().enumerate() {
                let file = format!("{:0>3}.{}", index + 1, output::sniff_extension(&img.bytes));
                std::fs::write(out_dir.join(&file), &img.bytes)?;
                images.push(PreparedImage {
                    file,
                    alt: img.alt.clone(),
                    bytes: img.bytes.len(),
                });
            }
            let manifest = PreparedManifest {
                lang: cfg.post.lang.clone(),
                images,
            };
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(out_dir.join("manifest.json"), json)?;
            println!(
                "Prepared {} image(s) in {}",
                manifest.images.len(),
                out_dir.display()
            );
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// The CLI flag wins over the configured policy.
fn effective_policy(cfg: &config::RunConfig, batch: &BatchArgs) -> CompressionPolicy {
    if batch.single_pass {
        CompressionPolicy::SinglePass {
            max_width: cfg.compression.single_pass.max_width,
            quality: Quality::new(cfg.compression.single_pass.quality),
        }
    } else {
        cfg.policy()
    }
}

fn build_candidates(batch: &BatchArgs) -> Vec<ImageCandidate> {
    scan::collect_sources(&batch.sources)
        .into_iter()
        .map(|path| {
            let alt = alt_text::resolve(None, &path);
            ImageCandidate::new(path, alt)
        })
        .collect()
}
