//! Prediction binary.
//!
//! Usage:
//!   predict [MILEAGE] [--theta theta.csv]
//!
//! Loads the learned coefficients and prints the estimated price for a
//! mileage, taken from the command line or an interactive prompt. A missing
//! or malformed coefficients file is only a warning: the model defaults to
//! (0, 0) and every estimate is 0.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kmprice::{Error, Theta};

const MAX_MILEAGE: f64 = 1e9;
const MAX_PROMPT_ATTEMPTS: usize = 10;

#[derive(Parser)]
#[command(name = "predict")]
#[command(about = "Estimate the price of a car from its mileage")]
#[command(version)]
struct Args {
    /// Mileage in km; prompts interactively when omitted
    mileage: Option<f64>,

    /// Coefficients file written by the train binary
    #[arg(short, long, default_value = "theta.csv")]
    theta: PathBuf,
}

fn validate(mileage: f64) -> Result<f64, Error> {
    if !mileage.is_finite() {
        return Err(Error::InvalidInput("mileage must be a number".to_string()));
    }
    if mileage < 0.0 {
        return Err(Error::InvalidInput(
            "mileage cannot be negative".to_string(),
        ));
    }
    if mileage > MAX_MILEAGE {
        return Err(Error::InvalidInput(format!(
            "mileage cannot exceed {}",
            MAX_MILEAGE
        )));
    }
    Ok(mileage)
}

/// Bounded reprompt loop. Invalid input never escapes here; EOF is treated
/// as cancellation.
fn prompt_mileage() -> Result<f64, Error> {
    let stdin = std::io::stdin();
    let mut line = String::new();

    for _ in 0..MAX_PROMPT_ATTEMPTS {
        print!("Enter the mileage: ");
        std::io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err(Error::Interrupted);
        }

        match line.trim().parse::<f64>() {
            Ok(value) => match validate(value) {
                Ok(value) => return Ok(value),
                Err(e) => println!("{}", e),
            },
            Err(_) => println!("invalid input: mileage must be a number"),
        }
    }

    Err(Error::InvalidInput(format!(
        "no valid mileage after {} attempts",
        MAX_PROMPT_ATTEMPTS
    )))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    ctrlc::set_handler(|| {
        eprintln!("\nInterrupted");
        exit(130);
    })?;

    let theta = Theta::load_or_default(&args.theta);

    let mileage = match args.mileage {
        Some(value) => validate(value)?,
        None => match prompt_mileage() {
            Ok(value) => value,
            Err(Error::Interrupted) => {
                eprintln!("\nInterrupted");
                exit(130);
            }
            Err(e) => return Err(e.into()),
        },
    };

    let price = theta.estimate(mileage);
    println!(
        "Predicted price for a car with {:.0} km: {:.2}$",
        mileage, price
    );

    Ok(())
}
