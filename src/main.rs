use clap::{Parser, Subcommand};
use imagelint::config::{self, CONFIG_FILENAME};
use imagelint::diagnostics::StdoutSink;
use imagelint::engine::Engine;
use imagelint::imaging::RustBackend;
use imagelint::output;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "imagelint")]
#[command(about = "Consistency linter for app image assets")]
#[command(long_about = "\
Consistency linter for app image assets

Walks the images folder (loose files and .xcassets catalogs) and the sources
folder, and reports problems as `path[:line]: severity: message`.

Project structure:

  MyApp/
  ├── imagelint.toml                   # Linter config (optional)
  ├── Resources/Images/                # images_path
  │   ├── Splash.png                   # Loose image, no scale
  │   ├── Splash@2x.png                # Same image, scale 2
  │   └── Assets.xcassets/
  │       ├── AppIcon.appiconset/      # Ignored
  │       ├── Close.imageset/          # Image 'Close'
  │       └── Buttons/                 # provides-namespace → 'Buttons/...'
  └── Sources/                         # sources_path
      ├── View.swift                   # Image(\"Close\"), Asset.Buttons.ok.image
      └── Main.storyboard              # <image name=\"Splash\"

Exit status is 1 when any error is reported, 0 otherwise.

Run 'imagelint gen-config' to generate a documented imagelint.toml.")]
#[command(version)]
struct Cli {
    /// Project directory; relative config paths resolve against it
    #[arg(long, default_value = ".", global = true)]
    project: PathBuf,

    /// Config file (default: <project>/imagelint.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Images folder, overriding images_path
    #[arg(long, global = true)]
    images: Option<PathBuf>,

    /// Sources folder, overriding sources_path
    #[arg(long, global = true)]
    sources: Option<PathBuf>,

    /// Log progress to stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Lint images and their references
    Check,
    /// Print a stock imagelint.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Check => check(&cli),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn check(cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.project.join(CONFIG_FILENAME));
    let settings = config::load_config(&config_path)?;

    if !settings.enabled {
        let program = std::env::args().next().unwrap_or_else(|| "imagelint".into());
        println!("{}", output::format_cancelled(&program));
        return Ok(ExitCode::SUCCESS);
    }

    let images = cli
        .images
        .clone()
        .unwrap_or_else(|| cli.project.join(&settings.images_path));
    let sources = cli
        .sources
        .clone()
        .unwrap_or_else(|| cli.project.join(&settings.sources_path));

    output::print_image_folder(&images);
    output::print_source_folder(&sources);

    let mut engine = Engine::new(settings, images, sources, RustBackend::new(), StdoutSink)?
        .with_config_path(config_path);
    let summary = engine.run();
    output::print_summary(&summary);

    Ok(if summary.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Operational logging on stderr; stdout carries only lint output.
///
/// `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();
}
