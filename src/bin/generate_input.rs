use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use halofir::constants::{DEFAULT_INPUT_SIZE, DEFAULT_SEED};
use halofir::simulation::{generate_noisy_tone, generate_uniform};
use halofir::stream::write_samples_file;

#[derive(Parser, Debug)]
#[command(name = "generate_input")]
#[command(about = "Write seeded synthetic f64 samples for filter testing")]
struct Args {
    /// Output file
    #[arg(default_value = "test_in.dat")]
    output: PathBuf,

    /// Number of samples
    #[arg(short = 'n', long, default_value_t = DEFAULT_INPUT_SIZE)]
    samples: usize,

    /// Seed for reproducibility
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Generate a noisy sine at this frequency (cycles/sample) instead of
    /// uniform noise
    #[arg(long)]
    tone: Option<f64>,

    /// Noise amplitude added to the tone
    #[arg(long, default_value_t = 0.5)]
    noise: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let samples = match args.tone {
        Some(freq) => generate_noisy_tone(args.samples, freq, args.noise, args.seed),
        None => generate_uniform(args.samples, args.seed),
    };

    write_samples_file(&args.output, &samples)
        .with_context(|| format!("Writing {}", args.output.display()))?;

    log::info!(
        "Wrote {} samples to {} (seed {})",
        samples.len(),
        args.output.display(),
        args.seed
    );
    Ok(())
}
