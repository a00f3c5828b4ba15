//! The affine model and its persisted form.
//!
//! `Theta` is the pair of coefficients of the linear model. After training it
//! holds RAW-space values (price per mileage unit), so prediction needs only
//! the coefficients file and no dataset.
//!
//! The file format is textual CSV: a `t0,t1` header row followed by one row
//! with two decimal numbers.

use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Theta {
    pub t0: f64,
    pub t1: f64,
}

impl Theta {
    pub fn new(t0: f64, t1: f64) -> Self {
        Self { t0, t1 }
    }

    /// Evaluates the affine model. Pure, O(1).
    pub fn predict(&self, x: f64) -> f64 {
        self.t0 + self.t1 * x
    }

    /// Price estimate for a mileage: the prediction clamped to zero, since
    /// a car cannot have a negative price.
    pub fn estimate(&self, mileage: f64) -> f64 {
        self.predict(mileage).max(0.0)
    }

    /// Reads coefficients from a CSV file. Absent, unreadable or malformed
    /// files are reported as [`Error::MissingArtifact`] so callers can decide
    /// whether the condition is fatal.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::MissingArtifact(format!("cannot open {}: {}", path.display(), e))
        })?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(BufReader::new(file));

        let record = reader
            .records()
            .next()
            .ok_or_else(|| {
                Error::MissingArtifact(format!("{} contains no data row", path.display()))
            })?
            .map_err(|e| Error::MissingArtifact(e.to_string()))?;

        if record.len() != 2 {
            return Err(Error::MissingArtifact(format!(
                "expected 2 values in {}, got {}",
                path.display(),
                record.len()
            )));
        }

        let parse = |s: &str| -> Result<f64> {
            let v: f64 = s
                .trim()
                .parse()
                .map_err(|e| Error::MissingArtifact(format!("bad theta value: {}", e)))?;
            if v.is_nan() {
                return Err(Error::MissingArtifact("theta value is NaN".to_string()));
            }
            Ok(v)
        };

        Ok(Self::new(parse(&record[0])?, parse(&record[1])?))
    }

    /// Like [`Theta::load`] but degrades to `(0, 0)` with a warning when the
    /// file is absent or malformed. Training simply has not happened yet;
    /// this is not a fatal condition.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(theta) => theta,
            Err(e) => {
                warn!("{}; using default coefficients (0, 0)", e);
                Self::default()
            }
        }
    }

    /// Writes the coefficients atomically: a temp file in the target
    /// directory, flushed, then renamed over the destination. A crash
    /// mid-write cannot leave a corrupt coefficients file behind.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());

        let tmp = match dir {
            Some(d) => d.join(".theta.tmp"),
            None => Path::new(".theta.tmp").to_path_buf(),
        };

        {
            let mut f = File::create(&tmp)?;
            writeln!(f, "t0,t1")?;
            writeln!(f, "{},{}", self.t0, self.t1)?;
            f.sync_all()?;
        }
        fs::rename(&tmp, path)?;

        debug!(t0 = self.t0, t1 = self.t1, path = %path.display(), "coefficients saved");
        Ok(())
    }
}
