//! unoutline CLI - PDF title and heading outline inference

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unoutline::{BatchEvent, BatchRunner, JsonFormat, OutlineExtractor, OutlineOptions};

#[derive(Parser)]
#[command(name = "unoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Infer the title and heading outline of PDF documents", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output compact JSON
    #[arg(long, global = true)]
    compact: bool,

    #[command(flatten)]
    engine: EngineArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an outline JSON for every PDF in a directory
    Batch {
        /// Directory containing PDF files
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Directory receiving one JSON file per PDF
        #[arg(value_name = "OUTPUT_DIR")]
        output: PathBuf,
    },

    /// Show version information
    Version,
}

/// Engine knobs; unset flags keep the library defaults.
#[derive(Args)]
struct EngineArgs {
    /// Pages scanned for headings
    #[arg(long, global = true, env = "UNOUTLINE_MAX_PAGES")]
    max_pages: Option<u32>,

    /// Leading pages sampled to learn the body text size
    #[arg(long, global = true, env = "UNOUTLINE_PROFILE_PAGES")]
    profile_pages: Option<u32>,

    /// Fraction of the first page, from the top, searched for the title
    #[arg(long, global = true, env = "UNOUTLINE_TITLE_BAND")]
    title_band: Option<f32>,

    /// Process batch documents one at a time
    #[arg(long, global = true, env = "UNOUTLINE_SEQUENTIAL")]
    sequential: bool,
}

impl EngineArgs {
    fn to_options(&self) -> OutlineOptions {
        let mut options = OutlineOptions::default();
        if let Some(pages) = self.max_pages {
            options = options.with_max_pages(pages);
        }
        if let Some(pages) = self.profile_pages {
            options = options.with_profile_pages(pages);
        }
        if let Some(band) = self.title_band {
            options = options.with_title_band(band);
        }
        if self.sequential {
            options = options.sequential();
        }
        options
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let options = cli.engine.to_options();
    let format = if cli.compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let result = match cli.command {
        Some(Commands::Batch { input, output }) => cmd_batch(&input, &output, format, options),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                cmd_extract(&input, cli.output.as_deref(), format, options)
            } else {
                println!("{}", "Usage: unoutline <FILE> [-o OUTPUT]".yellow());
                println!("       unoutline batch <INPUT_DIR> <OUTPUT_DIR>");
                println!("       unoutline --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    format: JsonFormat,
    options: OutlineOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    log::debug!("Extracting outline from {}", input.display());
    let extractor = OutlineExtractor::new(options)?;
    let outline = extractor.try_extract_path(input)?;
    let json = unoutline::render::to_json(&outline, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    format: JsonFormat,
    options: OutlineOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = OutlineExtractor::new(options)?;
    let (sender, receiver) = crossbeam_channel::unbounded();
    let runner = BatchRunner::new(extractor)
        .with_format(format)
        .with_events(sender);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let joined = std::thread::scope(|scope| {
        // The runner owns the only sender, so the event loop ends with it
        let worker = scope.spawn(move || runner.run(input, output));

        for event in receiver.iter() {
            match event {
                BatchEvent::Started { total, path, .. } => {
                    pb.set_length(total as u64);
                    pb.set_message(file_name(&path));
                }
                BatchEvent::Finished { .. } => pb.inc(1),
                BatchEvent::Failed { path, error, .. } => {
                    pb.inc(1);
                    pb.println(format!(
                        "{} {}: {}",
                        "Failed".red(),
                        file_name(&path),
                        error
                    ));
                }
            }
        }

        worker.join()
    });
    let report = joined.map_err(|_| "batch worker panicked")??;

    pb.finish_with_message("Done!");

    println!("\n{}", "Batch summary:".green().bold());
    println!("  {} {} documents", "├─".dimmed(), report.total());
    println!("  {} {} succeeded", "├─".dimmed(), report.succeeded());
    let failed = format!("{} failed", report.failed());
    if report.failed() > 0 {
        println!("  {} {}", "└─".dimmed(), failed.red());
    } else {
        println!("  {} {}", "└─".dimmed(), failed);
    }
    println!("\n{} {}", "Outlines written to".green(), output.display());

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn cmd_version() {
    println!("{} {}", "unoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF title and heading outline inference");
    println!();
    println!(
        "Repository: {}",
        "https://github.com/iyulab/unoutline".dimmed()
    );
    println!("License: MIT");
}
