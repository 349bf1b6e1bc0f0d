use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use spdf::app::App;
use spdf::command::parse_pair;
use spdf::config::Config;
use spdf::error::AppResult;
use spdf::export::{HeadlessExport, run_headless};
use spdf::logging::{self, LogSink};
use spdf::presenter::PresenterKind;
use spdf::scale::round2;

#[derive(Debug, Parser)]
#[command(
    name = "spdf",
    version,
    about = "Scale an image to print at a measured distance",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Image to open in the viewer.
    image: Option<PathBuf>,

    /// Config file; defaults to the usual config locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Write the scaled PDF without opening the viewer.
    Export(ExportArgs),
}

#[derive(Debug, Args)]
struct ExportArgs {
    image: PathBuf,

    /// Start point in image pixels, `X,Y`.
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    start: (f64, f64),

    /// End point in image pixels, `X,Y`.
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    end: (f64, f64),

    /// Real-world distance between the points, in feet.
    #[arg(long, allow_hyphen_values = true)]
    distance: String,

    /// Feet per inch of paper.
    #[arg(long, allow_hyphen_values = true)]
    scale: Option<String>,

    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,
}

impl From<ExportArgs> for HeadlessExport {
    fn from(args: ExportArgs) -> Self {
        Self {
            image: args.image,
            start: args.start,
            end: args.end,
            distance: args.distance,
            scale: args.scale,
            output: args.output,
        }
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = match cli.config.as_ref() {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Some(CliCommand::Export(args)) => {
            logging::init(&config.log, LogSink::Stderr)?;
            let report = run_headless(&args.into(), &config)?;
            let (width_in, height_in) = report.size_on_paper_inches;
            println!("zoom factor: {}", round2(report.zoom_factor));
            println!(
                "size on paper: {} x {} in",
                round2(width_in),
                round2(height_in)
            );
            println!("saved: {}", report.output.display());
            Ok(())
        }
        None => {
            logging::init(&config.log, LogSink::FileOnly)?;
            let mut app = App::new_with_config(PresenterKind::RatatuiImage, config)?;
            if let Some(image) = cli.image {
                app.open_image(image)?;
            }
            app.run().await
        }
    }
}

fn parse_point(value: &str) -> Result<(f64, f64), String> {
    parse_pair(value).ok_or_else(|| format!("expected X,Y in pixels, got `{value}`"))
}
