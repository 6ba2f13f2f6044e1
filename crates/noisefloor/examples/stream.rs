//! Streams synthetic noisy spectra through the estimator and logs the floor.
//!
//! Generates frames of pseudo-random noise magnitudes, injects a short
//! burst partway through, and prints the tracked noise floor per frame so
//! the burst resistance is visible.
//!
//! ```sh
//! RUST_LOG=info cargo run -p noisefloor --features examples --example stream
//! ```

use anyhow::Result;
use clap::Parser;
use noisefloor::NoiseEstimator;

#[derive(Debug, Parser)]
struct Args {
    /// Number of spectral bins per frame.
    #[arg(long, default_value_t = 256)]
    size: usize,
    /// Number of frames to stream.
    #[arg(long, default_value_t = 40)]
    frames: usize,
    /// Baseline noise magnitude.
    #[arg(long, default_value_t = 0.05)]
    noise: f32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let mut est = NoiseEstimator::new(args.size, args.noise * args.noise)?;
    let mut rng = Lcg(0x9e37_79b9);

    for k in 0..args.frames {
        let mut frame: Vec<f32> = (0..args.size)
            .map(|_| args.noise * (0.5 + rng.next_f32()))
            .collect();

        // A burst frame halfway through; the floor should barely move.
        let burst = k == args.frames / 2;
        if burst {
            for m in frame.iter_mut().take(args.size / 4) {
                *m = 1.0;
            }
        }

        let out = est.compute(&frame)?;
        let floor = out.last().copied().unwrap_or_default();
        tracing::info!(frame = k, floor_db = floor, burst, "noise floor");
    }

    Ok(())
}

/// Small deterministic generator so runs are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next_f32(&mut self) -> f32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 40) as f32) / (1u32 << 24) as f32
    }
}
