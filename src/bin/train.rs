//! Training binary.
//!
//! Usage:
//!   train [--data data.csv] [--output theta.csv] [--plot]
//!
//! Loads the `km,price` dataset, fits the model with bold-driver gradient
//! descent and writes the raw-space coefficients. Ctrl-C stops training at
//! the next iteration boundary; the last fully computed coefficients are
//! kept.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kmprice::{plot, Dataset, Stop, Trainer};

#[derive(Parser)]
#[command(name = "train")]
#[command(about = "Fit the price-from-mileage model with gradient descent")]
#[command(version)]
struct Args {
    /// Training data CSV (km,price with a header row)
    #[arg(short, long, default_value = "data.csv")]
    data: PathBuf,

    /// Where to write the learned coefficients
    #[arg(short, long, default_value = "theta.csv")]
    output: PathBuf,

    /// Iteration cap; without --tolerance it becomes the only stopping rule
    #[arg(short = 'i', long)]
    max_iterations: Option<usize>,

    /// Convergence threshold on successive errors (default 1e-5)
    #[arg(short, long)]
    tolerance: Option<f64>,

    /// Initial learning rate (default 2/N)
    #[arg(short, long)]
    learning_rate: Option<f64>,

    /// Seed coefficients uniformly in (-0.1, 0.1) instead of at zero
    #[arg(long)]
    random_init: bool,

    /// Render diagnostic plots after training
    #[arg(long)]
    plot: bool,

    /// Where to write the diagnostic SVG
    #[arg(long, default_value = "training.svg")]
    plot_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let dataset = Dataset::load(&args.data)?;

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        ctrlc::set_handler(move || cancel.store(true, Ordering::Relaxed))?;
    }

    let mut trainer = Trainer::new().random_init(args.random_init);
    if let Some(n) = args.max_iterations {
        trainer = trainer.max_iterations(n);
    }
    if let Some(t) = args.tolerance {
        trainer = trainer.tolerance(t);
    }
    if let Some(lr) = args.learning_rate {
        trainer = trainer.learning_rate(lr);
    }

    let report = trainer.fit_with_cancel(&dataset, &cancel)?;
    if report.stop == Stop::Interrupted {
        info!(
            iterations = report.record.len(),
            "interrupted; keeping the last fully computed coefficients"
        );
    }

    report.theta.save(&args.output)?;
    println!(
        "t0 = {:.6}, t1 = {:.6} -> {}",
        report.theta.t0,
        report.theta.t1,
        args.output.display()
    );

    if args.plot {
        if report.record.is_empty() {
            warn!("no completed iterations, skipping plots");
        } else {
            plot::render(&args.plot_path, &dataset, &report.theta, &report.record)?;
            info!(path = %args.plot_path.display(), "diagnostic plots written");
        }
    }

    Ok(())
}
