//! Vesna CLI - Command-line tool for SNG song package extraction.
//!
//! This is the main entry point for the Vesna command-line application.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use walkdir::WalkDir;

use vesna::prelude::*;
use vesna::sng::Error as SngError;

/// Vesna - SNG song package extraction tool
#[derive(Parser)]
#[command(name = "vesna")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract an SNG package to a directory
    Extract {
        /// Path to the SNG file
        #[arg(short, long, env = "INPUT_SNG")]
        sng: PathBuf,

        /// Output directory
        #[arg(short, long, env = "OUTPUT_FOLDER")]
        output: PathBuf,

        /// Print decode diagnostics to stderr
        #[arg(short, long)]
        verbose: bool,
    },

    /// List payloads of an SNG package
    List {
        /// Path to the SNG file
        #[arg(short, long, env = "INPUT_SNG")]
        sng: PathBuf,

        /// Show payload sizes
        #[arg(short, long)]
        detailed: bool,
    },

    /// Print the metadata dictionary of an SNG package
    Meta {
        /// Path to the SNG file
        #[arg(short, long, env = "INPUT_SNG")]
        sng: PathBuf,

        /// Emit JSON instead of `key = value` lines
        #[arg(long)]
        json: bool,
    },

    /// Check whether a file starts with the SNG identifier
    Check {
        /// Path to the file to probe
        #[arg(short, long)]
        sng: PathBuf,
    },

    /// Extract every SNG package found under the given inputs
    Batch {
        /// Files or directories to scan for .sng packages
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output directory; each package lands in a subdirectory named
        /// after its file stem
        #[arg(short, long, env = "OUTPUT_FOLDER")]
        output: PathBuf,

        /// Worker threads (defaults to one per core)
        #[arg(short, long)]
        jobs: Option<usize>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            sng,
            output,
            verbose,
        } => {
            cmd_extract(&sng, &output, verbose)?;
        }
        Commands::List { sng, detailed } => {
            cmd_list(&sng, detailed)?;
        }
        Commands::Meta { sng, json } => {
            cmd_meta(&sng, json)?;
        }
        Commands::Check { sng } => {
            return cmd_check(&sng);
        }
        Commands::Batch {
            input,
            output,
            jobs,
        } => {
            cmd_batch(&input, &output, jobs)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Observer that narrates the decode on stderr.
struct StderrObserver;

impl DecodeObserver for StderrObserver {
    fn header(&mut self, version: u32) {
        eprintln!("header: version {version}");
    }

    fn section(&mut self, name: &'static str, declared_len: u64) {
        eprintln!("section: {name} (declared {declared_len} bytes)");
    }

    fn entry_decoded(&mut self, name: &str, len: usize, offset: u64) {
        eprintln!("decoded: {name} ({len} bytes at offset {offset})");
    }

    fn warning(&mut self, message: &str) {
        eprintln!("warning: {message}");
    }
}

fn open_archive(path: &Path, verbose: bool) -> Result<SngArchive> {
    if verbose {
        let data = fs::read(path).context("Failed to read SNG file")?;
        SngArchive::parse_with(&data, &mut StderrObserver).context("Failed to decode SNG package")
    } else {
        SngArchive::open(path).context("Failed to decode SNG package")
    }
}

fn cmd_extract(sng: &Path, output: &Path, verbose: bool) -> Result<()> {
    println!("Opening SNG package: {}", sng.display());

    let start = Instant::now();
    let archive = open_archive(sng, verbose)?;

    println!(
        "Decoded {} payloads ({} bytes) in {:?}",
        archive.payload_count(),
        archive.total_payload_size(),
        start.elapsed()
    );

    match extract(&archive, output) {
        Ok(report) => {
            println!(
                "Wrote {} files to {}",
                report.written,
                output.display()
            );
            Ok(())
        }
        Err(SngError::ExtractionIncomplete { report }) => {
            for (name, reason) in &report.failed {
                eprintln!("Error writing {name}: {reason}");
            }
            anyhow::bail!(
                "extraction incomplete: {} of {} writes failed",
                report.failed.len(),
                report.failed.len() + report.written
            );
        }
        Err(e) => Err(e).context("Failed to extract archive"),
    }
}

fn cmd_list(sng: &Path, detailed: bool) -> Result<()> {
    let archive = open_archive(sng, false)?;

    let mut names: Vec<&str> = archive.payload_names().collect();
    names.sort_unstable();

    for name in &names {
        if detailed {
            let size = archive.payload(name).map_or(0, <[u8]>::len);
            println!("{size:>12} {name}");
        } else {
            println!("{name}");
        }
    }

    println!(
        "\nTotal: {} payloads, {} bytes",
        names.len(),
        archive.total_payload_size()
    );

    Ok(())
}

fn cmd_meta(sng: &Path, json: bool) -> Result<()> {
    let archive = open_archive(sng, false)?;

    let sorted: std::collections::BTreeMap<&str, &str> = archive
        .metadata()
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&sorted)?);
    } else {
        for (key, value) in sorted {
            println!("{key} = {value}");
        }
    }

    Ok(())
}

fn cmd_check(sng: &Path) -> Result<ExitCode> {
    let mut prefix = [0u8; 6];
    let mut file = fs::File::open(sng).context("Failed to open file")?;

    let valid = match file.read_exact(&mut prefix) {
        Ok(()) => SngArchive::is_sng(&prefix),
        Err(_) => false,
    };

    if valid {
        println!("{}: SNG package", sng.display());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}: not an SNG package", sng.display());
        Ok(ExitCode::FAILURE)
    }
}

fn cmd_batch(inputs: &[PathBuf], output: &Path, jobs: Option<usize>) -> Result<()> {
    if let Some(jobs) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    let files = discover_packages(inputs);
    if files.is_empty() {
        anyhow::bail!("no .sng packages found under the given inputs");
    }

    println!("Extracting {} packages...", files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    fs::create_dir_all(output)?;

    let start = Instant::now();
    let results: Vec<(PathBuf, std::result::Result<usize, String>)> = files
        .par_iter()
        .map(|path| {
            let result = process_package(path, output);
            if let Err(reason) = &result {
                pb.println(format!("Error processing {}: {reason}", path.display()));
            }
            pb.inc(1);
            (path.clone(), result)
        })
        .collect();

    pb.finish_with_message("Done");

    let extracted = results.iter().filter(|(_, r)| r.is_ok()).count();
    let errors = results.len() - extracted;
    println!(
        "Extracted {} of {} packages in {:?} ({} errors)",
        extracted,
        results.len(),
        start.elapsed(),
        errors
    );

    if errors > 0 {
        anyhow::bail!("{errors} package(s) failed");
    }
    Ok(())
}

/// Decode one package and extract it into `<output>/<file stem>/`.
fn process_package(path: &Path, output: &Path) -> std::result::Result<usize, String> {
    let archive = SngArchive::open(path).map_err(|e| e.to_string())?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("song");
    let dest = output.join(stem);

    match extract(&archive, &dest) {
        Ok(report) => Ok(report.written),
        Err(e) => Err(e.to_string()),
    }
}

/// Collect .sng files from the given paths, walking directories.
fn discover_packages(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
            continue;
        }

        for entry in WalkDir::new(input)
            .into_iter()
            .filter_map(std::result::Result::ok)
        {
            let path = entry.path();
            if path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("sng"))
            {
                files.push(path.to_path_buf());
            }
        }
    }

    files.sort_unstable();
    files.dedup();
    files
}
