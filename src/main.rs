use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use site_assets::config::{CropConfig, FaceScanConfig, HtmlCheckConfig, ValidateConfig, VisionConfig};
use site_assets::crop::{run_crop_batch, FEATURE_CARD_JOBS};
use site_assets::error::{AssetError, HasRecoverySuggestion};
use site_assets::face::run_face_scan;
use site_assets::html::check_html;
use site_assets::labels::run_validation;
use site_assets::telemetry;

/// Asset tooling for the landing page:
/// - crop: cut feature cards out of app screenshots
/// - validate: check that images show what their names promise
/// - check-html: missing assets and unbalanced tags in the page
/// - face-scan: suggest an object-position for a portrait
#[derive(Parser, Debug)]
#[command(name = "assets")]
#[command(about = "Prepare and check landing-page images")]
#[command(long_about = "Prepare and check landing-page images.
Every flag has a default, so each subcommand runs from the site root without arguments.
Flags can also be set through SITE_ASSETS_* environment variables.")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crop feature-card regions from screenshots and scale them to card width
    Crop {
        #[arg(long, default_value = "App Screenshots incomplete", env = "SITE_ASSETS_SOURCE_DIR",
              help = "Directory holding the original app screenshots")]
        source_dir: PathBuf,

        #[arg(long, default_value = "assets/images/feat-cards", env = "SITE_ASSETS_OUTPUT_DIR",
              help = "Directory the card JPEGs are written to (created if missing)")]
        output_dir: PathBuf,

        #[arg(short, long, default_value_t = 540, env = "SITE_ASSETS_WIDTH",
              help = "Output width in pixels; height follows the aspect ratio")]
        width: u32,

        #[arg(short, long, default_value_t = 90, env = "SITE_ASSETS_QUALITY",
              help = "JPEG quality, 1-100")]
        quality: u8,

        #[arg(long, env = "SITE_ASSETS_ROUNDED_RADIUS",
              help = "Also write a <name>-rounded.png with corners of this radius")]
        rounded_radius: Option<u32>,
    },

    /// Classify site images and check them against expected keywords
    Validate {
        #[arg(long, default_value = "assets/images", env = "SITE_ASSETS_IMAGES_DIR")]
        images_dir: PathBuf,

        #[arg(long, default_value = "scripts/image_report.json", env = "SITE_ASSETS_REPORT")]
        report: PathBuf,

        #[arg(long, env = "SITE_ASSETS_EXPECTED_LABELS",
              help = "JSON file mapping filenames to keyword lists (built-in table if omitted)")]
        expected_labels: Option<PathBuf>,

        #[arg(long, default_value_t = 0.15, env = "SITE_ASSETS_THRESHOLD",
              help = "Minimum fraction of expected keywords that must match")]
        threshold: f64,

        #[arg(long, env = "SITE_ASSETS_STRICT", help = "Count classifier errors as failures")]
        strict: bool,

        #[arg(long, env = "SITE_ASSETS_VISION_URL",
              help = "OpenAI-compatible API base URL, e.g. http://127.0.0.1:8001/v1")]
        vision_url: Option<String>,

        #[arg(long, default_value = "qwen3-vl", env = "SITE_ASSETS_VISION_MODEL")]
        vision_model: String,

        #[arg(long, default_value = "30s", env = "SITE_ASSETS_VISION_TIMEOUT",
              help = "Per-image timeout: 30s (30 seconds), 2m (2 minutes)")]
        vision_timeout: String,
    },

    /// Check the landing page for missing assets, unbalanced tags and leftovers
    CheckHtml {
        #[arg(default_value = "index-premium.html", env = "SITE_ASSETS_HTML")]
        html: PathBuf,

        #[arg(long, default_value = ".", env = "SITE_ASSETS_SITE_ROOT",
              help = "Directory asset references are resolved against")]
        site_root: PathBuf,
    },

    /// Find the warmest bright region of a portrait
    FaceScan {
        #[arg(default_value = "assets/images/earphones-commuter.jpg", env = "SITE_ASSETS_FACE_IMAGE")]
        image: PathBuf,

        #[arg(long, default_value_t = 60, env = "SITE_ASSETS_FACE_WINDOW",
              help = "Side of the square window averaged at each grid point")]
        window: u32,
    },
}

fn main() -> Result<ExitCode> {
    telemetry::init_tracing();
    let args = Args::parse();

    match args.command {
        Command::Crop {
            source_dir,
            output_dir,
            width,
            quality,
            rounded_radius,
        } => {
            let config = CropConfig {
                source_dir,
                output_dir,
                target_width: width,
                jpeg_quality: quality,
                rounded_radius,
            };
            let output_dir = config.output_dir.clone();
            let summary = run_crop_batch(config, &FEATURE_CARD_JOBS).map_err(explain)?;
            println!(
                "\nDone! {} crops saved to {}/ ({} skipped, {} failed)",
                summary.written(),
                output_dir.display(),
                summary.skipped(),
                summary.failed()
            );
            Ok(exit_code(summary.is_success()))
        }

        Command::Validate {
            images_dir,
            report,
            expected_labels,
            threshold,
            strict,
            vision_url,
            vision_model,
            vision_timeout,
        } => {
            let config = ValidateConfig {
                images_dir,
                report_path: report,
                expected_labels,
                pass_threshold: threshold,
                strict,
                vision: VisionConfig {
                    endpoint: vision_url,
                    model: vision_model,
                    timeout: parse_duration(&vision_timeout)?,
                    ..VisionConfig::default()
                },
            };
            let result = run_validation(&config).map_err(explain)?;
            let tally = result.tally();
            println!("\n{}", "=".repeat(70));
            println!(
                "SUMMARY: {} passed, {} failed, {} skipped, {} errors (of {})",
                tally.pass,
                tally.fail,
                tally.skip,
                tally.error,
                tally.total()
            );
            println!("Report saved to: {}", config.report_path.display());
            Ok(ExitCode::from(result.exit_code(config.strict) as u8))
        }

        Command::CheckHtml { html, site_root } => {
            let config = HtmlCheckConfig {
                html_path: html,
                site_root,
                ..HtmlCheckConfig::default()
            };
            let report = check_html(&config).map_err(explain)?;
            println!("Lines: {}", report.line_count);
            println!("Pictographs: {}", report.pictographs.len());
            println!(
                "Block tags: {} open, {} close{}",
                report.open_blocks,
                report.close_blocks,
                if report.is_balanced() { "" } else { "  <-- UNBALANCED" }
            );
            println!("Asset references: {}", report.assets.len());
            for missing in &report.missing_assets {
                println!("  MISSING: {}", missing);
            }
            for (pattern, count) in &report.leftovers {
                println!("  LEFTOVER: {} ({}x)", pattern, count);
            }
            Ok(exit_code(report.is_ok()))
        }

        Command::FaceScan { image, window } => {
            let config = FaceScanConfig {
                image_path: image,
                window,
            };
            let (w, h, best) = run_face_scan(&config).map_err(explain)?;
            println!("Image size: {}x{}", w, h);
            match best {
                Some(candidate) => {
                    println!("Best face candidate: {}", candidate);
                    println!("  Recommended object-position: {}", candidate.object_position());
                }
                None => println!("No warm region found"),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Print the recovery hint of a run-level error before handing it to anyhow.
fn explain(error: AssetError) -> anyhow::Error {
    if let Some(hint) = error.recovery_suggestion() {
        eprintln!("Hint: {}", hint);
    }
    error.into()
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Parse duration string like "30s", "2m" or a bare number of seconds
fn parse_duration(duration: &str) -> Result<Duration> {
    if let Ok(seconds) = duration.parse::<u64>() {
        return Ok(Duration::from_secs(seconds));
    }

    let len = duration.len();
    if len < 2 {
        return Err(anyhow::anyhow!("Invalid duration format: {}", duration));
    }

    let (num_str, unit) = duration.split_at(len - 1);
    let num: u64 = num_str.parse().map_err(|_| anyhow::anyhow!("Invalid number in duration: {}", num_str))?;

    match unit {
        "s" => Ok(Duration::from_secs(num)),
        "m" => num
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| anyhow::anyhow!("Duration too large: {}", duration)),
        _ => Err(anyhow::anyhow!("Invalid duration unit: {}. Use 's' for seconds, 'm' for minutes", unit)),
    }
}
