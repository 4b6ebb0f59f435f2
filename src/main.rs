use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use halofir::config::{StreamConfig, TailPolicy, WindowAlignment};
use halofir::stream::{SessionSummary, filter_file};

#[derive(Parser, Debug)]
#[command(name = "halofir")]
#[command(about = "Stream a raw f64 file through a block-wise FIR low-pass filter", long_about = None)]
struct Args {
    /// Input file of native-endian f64 samples
    input: PathBuf,

    /// Output file for the filtered samples
    output: PathBuf,

    /// TOML configuration file (command-line options override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Samples per block
    #[arg(short, long)]
    block_size: Option<usize>,

    /// Samples of history carried between blocks
    #[arg(long)]
    halo_size: Option<usize>,

    /// Number of randomly drawn taps
    #[arg(short = 'l', long)]
    taps: Option<usize>,

    /// Explicit filter weights, comma-separated (overrides --taps)
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
    weights: Option<Vec<f64>>,

    /// Seed for randomly drawn weights
    #[arg(short, long)]
    seed: Option<u64>,

    /// Scale weights to unit DC gain
    #[arg(long)]
    normalize: bool,

    /// Window alignment: preceding, inclusive
    #[arg(short, long, value_enum)]
    alignment: Option<WindowAlignment>,

    /// Trailing partial block: truncate, zero-pad
    #[arg(short, long, value_enum)]
    tail: Option<TailPolicy>,

    /// Number of input samples to process (default: whole file)
    #[arg(short = 'n', long)]
    input_size: Option<usize>,

    /// Summary format: text, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = build_config(&args)?;
    config.validate().context("Invalid filter configuration")?;

    let summary = filter_file(&config, &args.input, &args.output).with_context(|| {
        format!(
            "Filtering {} into {} failed",
            args.input.display(),
            args.output.display()
        )
    })?;

    match args.format {
        OutputFormat::Text => print_text(&summary, &args),
        OutputFormat::Json => print_json(&summary)?,
    }

    Ok(())
}

fn build_config(args: &Args) -> anyhow::Result<StreamConfig> {
    let mut config = match &args.config {
        Some(path) => StreamConfig::from_toml_file(path)
            .with_context(|| format!("Loading {}", path.display()))?,
        None => StreamConfig::default(),
    };

    // Without an explicit size the whole input file is processed
    if args.input_size.is_some() || args.config.is_none() {
        config.input_size = args.input_size;
    }
    if let Some(b) = args.block_size {
        config.block_size = b;
    }
    if let Some(h) = args.halo_size {
        config.halo_size = h;
    }
    if let Some(l) = args.taps {
        config.filter_length = l;
        config.weights = None;
    }
    if let Some(w) = &args.weights {
        config.weights = Some(w.clone());
    }
    if let Some(s) = args.seed {
        config.seed = s;
    }
    if args.normalize {
        config.normalize = true;
    }
    if let Some(a) = args.alignment {
        config.alignment = a;
    }
    if let Some(t) = args.tail {
        config.tail = t;
    }

    Ok(config)
}

fn print_text(summary: &SessionSummary, args: &Args) {
    println!("{} -> {}", args.input.display(), args.output.display());
    println!(
        "Blocks: {} x {} samples (halo {}, {} taps)",
        summary.blocks_processed, summary.block_size, summary.halo_size, summary.taps
    );
    println!(
        "Samples: {} read, {} written, {} dropped{}",
        summary.samples_read,
        summary.samples_written,
        summary.samples_dropped,
        if summary.padded_tail {
            " (zero-padded tail)"
        } else {
            ""
        }
    );
    if let Some(stats) = &summary.output_stats {
        println!(
            "Output: mean {:.6}, std {:.6}, min {:.6}, max {:.6}",
            stats.mean, stats.std_dev, stats.min, stats.max
        );
    }
}

fn print_json(summary: &SessionSummary) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    println!("{}", json);
    Ok(())
}
