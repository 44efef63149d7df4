use clap::{Parser, Subcommand};
use imagetool::batch::{self, BatchConfig, BatchError};
use imagetool::config::{self, ToolConfig};
use imagetool::imaging::{Shape, Unit};
use imagetool::{input, naming, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Flags shared by commands that read a batch.
#[derive(clap::Args, Clone)]
struct BatchArgs {
    /// Image files and/or directories (directories are not searched recursively)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Unit of --width and --height
    #[arg(long)]
    unit: Option<Unit>,

    /// Target width (default 512 px or 5.0 cm)
    #[arg(long)]
    width: Option<f64>,

    /// Target height (default 512 px or 5.0 cm)
    #[arg(long)]
    height: Option<f64>,

    /// Dots per inch for cm conversion
    #[arg(long)]
    dpi: Option<u32>,

    /// Use the width for the height as well
    #[arg(long)]
    square: bool,

    /// Output silhouette: rectangle, circle or ellipse
    #[arg(long)]
    shape: Option<Shape>,

    /// Per-image size budget in KB
    #[arg(long)]
    max_kb: Option<u32>,

    /// Positions to process after sorting, e.g. "1-3,5" or "4-" (default: all)
    #[arg(long, allow_hyphen_values = true)]
    range: Option<String>,

    /// Skip files whose names contain no number instead of numbering them last
    #[arg(long)]
    no_fallback: bool,
}

impl BatchArgs {
    /// Flags that were given, as a config overlay.
    fn overlay(&self) -> toml::Value {
        let mut output = toml::Table::new();
        if let Some(unit) = self.unit {
            output.insert("unit".into(), unit.to_string().into());
        }
        if let Some(width) = self.width {
            output.insert("width".into(), width.into());
        }
        if let Some(height) = self.height {
            output.insert("height".into(), height.into());
        }
        if let Some(dpi) = self.dpi {
            output.insert("dpi".into(), i64::from(dpi).into());
        }
        if self.square {
            output.insert("square".into(), true.into());
        }
        if let Some(shape) = self.shape {
            output.insert("shape".into(), shape.to_string().into());
        }
        if let Some(max_kb) = self.max_kb {
            output.insert("max_kb".into(), i64::from(max_kb).into());
        }

        let mut selection = toml::Table::new();
        if let Some(range) = &self.range {
            selection.insert("range".into(), range.clone().into());
        }
        if self.no_fallback {
            selection.insert("fallback_by_order".into(), false.into());
        }

        let mut root = toml::Table::new();
        root.insert("output".into(), toml::Value::Table(output));
        root.insert("selection".into(), toml::Value::Table(selection));
        toml::Value::Table(root)
    }
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "imagetool")]
#[command(about = "Batch resize numbered images into a zip")]
#[command(long_about = "\
Batch resize numbered images into a zip

Images are ordered by the last number in their filename (IMG_0012.jpg → 12).
Files without a number go last, in the order given. A range like \"1-3,5\"
then picks positions in that sorted list.

Every selected image is stretched to the target size. Rectangles are saved
as JPEG at the highest quality that fits --max-kb; circles and ellipses get
a transparent background and are saved as PNG.

Examples:

  imagetool process photos/ --width 600 --height 400 --max-kb 200
  imagetool process scans/ --unit cm --width 3.5 --square --shape circle
  imagetool select photos/ --range 2-5

Run 'imagetool gen-config' to generate a documented imagetool.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (default: ./imagetool.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize, mask, and compress the selected images into a zip
    Process {
        #[command(flatten)]
        batch: BatchArgs,

        /// Archive path (default: imagetool_batch_{size}.zip)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Also write a JSON report of outputs and failures
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Show which images a range selects, without processing
    Select {
        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Print a stock imagetool.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Process {
            batch: args,
            output: archive_path,
            report,
        } => {
            let tool_config = resolve_tool_config(cli.config.as_deref(), &args)?;
            let batch_config = BatchConfig::from_tool_config(&tool_config);
            let uploads = input::collect_uploads(&args.inputs)?;
            init_thread_pool(&tool_config.processing);

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_batch_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = batch::run_batch(uploads, &batch_config, Some(tx));
            printer.join().map_err(|_| "progress printer panicked")?;

            let result = match result {
                Ok(result) => result,
                Err(e) => return warn_or_fail(e),
            };

            let archive_path =
                archive_path.unwrap_or_else(|| PathBuf::from(naming::archive_name(&result.label)));
            std::fs::write(&archive_path, &result.archive)?;
            if let Some(report_path) = report {
                let json = serde_json::to_string_pretty(&result.report())?;
                std::fs::write(report_path, json)?;
            }
            output::print_batch_result(&result, &archive_path);
        }
        Command::Select { batch: args } => {
            let tool_config = resolve_tool_config(cli.config.as_deref(), &args)?;
            let batch_config = BatchConfig::from_tool_config(&tool_config);
            let uploads = input::collect_uploads(&args.inputs)?;
            let total = uploads.len();

            match batch::plan_batch(uploads, &batch_config) {
                Ok(selected) => output::print_selection(&selected, total),
                Err(e) => return warn_or_fail(e),
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Stock defaults, then the config file, then command-line flags.
fn resolve_tool_config(
    config_path: Option<&Path>,
    args: &BatchArgs,
) -> Result<ToolConfig, config::ConfigError> {
    let file = match config_path {
        Some(path) => Some(config::read_config_file(path)?),
        None => config::load_raw_config(Path::new("."))?,
    };
    let base = match file {
        Some(file) => config::merge_toml(config::stock_defaults_value(), file),
        None => config::stock_defaults_value(),
    };
    config::resolve_config(base, Some(args.overlay()))
}

/// Nothing-to-do conditions are warnings; everything else is an error.
fn warn_or_fail(error: BatchError) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match error {
        BatchError::EmptyBatch | BatchError::EmptySelection => {
            eprintln!("warning: {error}");
            Ok(ExitCode::FAILURE)
        }
        other => Err(other.into()),
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. User can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
