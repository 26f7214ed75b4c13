//! nb4llm: CLI tool to convert Jupyter notebooks to LLM-friendly text and back

mod config;
mod logging;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use config::{CONFIG_FILE_NAME, Config};
use nb4llm_batch::{
    BatchOptions, DEFAULT_TEXT_EXTENSION, Direction, FileConvertOptions, convert_directory,
    convert_file,
};
use nb4llm_core::{DEFAULT_LANGUAGE, EncodeOptions, fence::MIN_FENCE_LENGTH};

#[derive(Parser, Debug)]
#[command(name = "nb4llm")]
#[command(about = "Convert Jupyter notebooks to fenced plain text and back")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
#[command(after_help = "Examples:
  nb4llm notebook.ipynb               # Convert to notebook.txt
  nb4llm notebook.ipynb -o out.txt    # Convert to specific output file
  nb4llm --reverse notebook.txt       # Convert text back to notebook.ipynb
  nb4llm notebooks/ -o text/ -r       # Convert a directory recursively
  nb4llm init                         # Write a sample _nb4llm.toml")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    convert: ConvertArgs,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input notebook, text file, or directory
    #[arg(required = true)]
    input: Option<PathBuf>,

    /// Output file or directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Convert flat text back to a notebook
    #[arg(long)]
    reverse: bool,

    /// Process directories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Number of parallel jobs (defaults to number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Kernel language for notebooks that declare none
    #[arg(long)]
    language: Option<String>,

    /// Configuration file (defaults to _nb4llm.toml next to the input)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only show errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a sample configuration file
    Init {
        /// Where to write the configuration file
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        output: PathBuf,

        /// Print the configuration JSON schema instead
        #[arg(long)]
        schema: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.convert.verbose, cli.convert.quiet);

    match cli.command {
        Some(Command::Init { output, schema }) => run_init(&output, schema),
        None => run_convert(cli.convert),
    }
}

/// Handle `nb4llm init`
fn run_init(output: &Path, schema: bool) -> Result<()> {
    if schema {
        println!("{}", Config::json_schema_string()?);
        return Ok(());
    }

    if output.exists() {
        anyhow::bail!("Refusing to overwrite existing file: {}", output.display());
    }

    let content = Config::sample().to_toml_with_schema()?;
    fs::write(output, content).with_context(|| format!("Failed to write: {}", output.display()))?;
    println!("{}", output.display());

    Ok(())
}

/// Convert a file or a directory
fn run_convert(args: ConvertArgs) -> Result<()> {
    let Some(input) = args.input.as_deref() else {
        anyhow::bail!("No input given");
    };

    let config = load_config(args.config.as_deref(), input)?;
    let file_options = file_options(&args, &config);

    if input.is_file() {
        let output = match &args.output {
            Some(p) => p.clone(),
            None => file_options.default_output(input),
        };

        let written = convert_file(input, &output, &file_options)
            .with_context(|| format!("Failed to convert: {}", input.display()))?;

        if !args.quiet {
            println!("{}", written.display());
        }
    } else if input.is_dir() {
        let options = BatchOptions {
            output_dir: args.output.clone().unwrap_or_else(|| input.to_path_buf()),
            recursive: args.recursive || config.output.recursive.unwrap_or(false),
            parallel_jobs: args.jobs,
            file: file_options,
        };
        convert_dir(input, &options, args.quiet)?;
    } else {
        anyhow::bail!("Input path does not exist: {}", input.display());
    }

    Ok(())
}

/// Convert a directory and report per-file failures
fn convert_dir(input: &Path, options: &BatchOptions, quiet: bool) -> Result<()> {
    let result = convert_directory(input, options)
        .with_context(|| format!("Failed to convert directory: {}", input.display()))?;

    if result.success_count == 0 && result.failed_files.is_empty() {
        if !quiet {
            eprintln!(
                "No .{} files found in {}",
                options.file.source_extension(),
                input.display()
            );
        }
        return Ok(());
    }

    if !quiet {
        for file in &result.output_files {
            println!("{}", file.display());
        }
    }

    for (file, e) in &result.failed_files {
        eprintln!("Error converting {}: {}", file.display(), e);
    }

    if !quiet {
        eprintln!(
            "Converted {} files, {} failed",
            result.success_count,
            result.failed_files.len()
        );
    }

    if !result.failed_files.is_empty() {
        anyhow::bail!("{} files failed to convert", result.failed_files.len());
    }

    Ok(())
}

/// Load the explicit config file, or `_nb4llm.toml` next to the input
fn load_config(explicit: Option<&Path>, input: &Path) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::load(path);
    }

    let dir = if input.is_dir() {
        input
    } else {
        match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    };

    let config = Config::load_from_dir(dir)?;
    if config.is_some() {
        tracing::debug!(dir = %dir.display(), "loaded {}", CONFIG_FILE_NAME);
    }
    Ok(config.unwrap_or_default())
}

/// Merge command-line flags over config values over built-in defaults
fn file_options(args: &ConvertArgs, config: &Config) -> FileConvertOptions {
    FileConvertOptions {
        direction: if args.reverse {
            Direction::Reverse
        } else {
            Direction::Forward
        },
        text_extension: config
            .output
            .text_extension
            .clone()
            .unwrap_or_else(|| DEFAULT_TEXT_EXTENSION.to_string()),
        encode: EncodeOptions {
            default_language: args
                .language
                .clone()
                .or_else(|| config.convert.default_language.clone())
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            min_fence_length: config
                .convert
                .min_fence_length
                .unwrap_or(MIN_FENCE_LENGTH),
        },
    }
}
