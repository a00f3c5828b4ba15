//! Training data loading.
//!
//! The data file is textual CSV with a header row followed by `km,price`
//! rows. The two columns are kept as parallel vectors paired by index and
//! are immutable once loaded.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{Error, Result};
use crate::Vector;

#[derive(Clone, Debug)]
pub struct Dataset {
    mileage: Vector,
    price: Vector,
}

impl Dataset {
    pub fn new(mileage: Vector, price: Vector) -> Result<Self> {
        if mileage.len() != price.len() {
            return Err(Error::InvalidDataset(format!(
                "mileage and price columns differ in length ({} vs {})",
                mileage.len(),
                price.len()
            )));
        }
        if mileage.is_empty() {
            return Err(Error::InvalidDataset(
                "dataset must contain at least one row".to_string(),
            ));
        }

        Ok(Self { mileage, price })
    }

    /// Loads a `km,price` CSV file. A missing file, an empty file, or any
    /// row that does not parse as two decimal numbers is a fatal load error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::InvalidDataset(format!("cannot open {}: {}", path.display(), e))
        })?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(BufReader::new(file));

        let mut mileage = Vec::new();
        let mut price = Vec::new();

        for record in reader.records() {
            let record = record?;
            if record.len() != 2 {
                return Err(Error::InvalidDataset(format!(
                    "expected 2 columns, got {} (row {})",
                    record.len(),
                    mileage.len() + 1
                )));
            }
            mileage.push(record[0].trim().parse::<f64>()?);
            price.push(record[1].trim().parse::<f64>()?);
        }

        debug!(rows = mileage.len(), path = %path.display(), "dataset loaded");
        Self::new(Vector::from(mileage), Vector::from(price))
    }

    pub fn n_samples(&self) -> usize {
        self.mileage.len()
    }

    pub fn mileage(&self) -> &Vector {
        &self.mileage
    }

    pub fn price(&self) -> &Vector {
        &self.price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;

    #[test]
    fn test_dataset_creation() {
        let mileage = array![240000.0, 139800.0, 150500.0];
        let price = array![3650.0, 3800.0, 4400.0];

        let dataset = Dataset::new(mileage, price).unwrap();
        assert_eq!(dataset.n_samples(), 3);
    }

    #[test]
    fn test_mismatched_columns_rejected() {
        let mileage = array![1.0, 2.0];
        let price = array![1.0, 2.0, 3.0];

        assert!(Dataset::new(mileage, price).is_err());
    }

    #[test]
    fn test_empty_dataset_rejected() {
        assert!(Dataset::new(Vector::zeros(0), Vector::zeros(0)).is_err());
    }

    #[test]
    fn test_load_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "km,price").unwrap();
        writeln!(f, "240000,3650").unwrap();
        writeln!(f, "139800,3800").unwrap();

        let dataset = Dataset::load(&path).unwrap();
        assert_eq!(dataset.n_samples(), 2);
        assert_eq!(dataset.mileage()[0], 240000.0);
        assert_eq!(dataset.price()[1], 3800.0);
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        assert!(Dataset::load("no/such/file.csv").is_err());
    }

    #[test]
    fn test_load_header_only_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "km,price").unwrap();

        assert!(matches!(
            Dataset::load(&path),
            Err(Error::InvalidDataset(_))
        ));
    }

    #[test]
    fn test_load_malformed_row_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "km,price").unwrap();
        writeln!(f, "240000,cheap").unwrap();

        assert!(Dataset::load(&path).is_err());
    }
}
