//! Datetime encoders

use anyhow::{bail, Result};
use polars::prelude::*;

use super::Transformer;
use crate::pipeline::error::QualityError;
use crate::pipeline::sdtype::Sdtype;

/// Largest power of ten the optimized encoder will divide by
const MAX_DIVIDER_EXPONENT: u32 = 18;

/// Read a Date or Datetime column as nanoseconds since the Unix epoch
fn epoch_nanos(column: &Column) -> Result<Vec<Option<i64>>> {
    let datetime = match column.dtype() {
        DataType::Datetime(_, _) => column.clone(),
        DataType::Date => column.cast(&DataType::Datetime(TimeUnit::Nanoseconds, None))?,
        other => bail!(
            "Column '{}' has dtype {} and cannot be encoded as a timestamp",
            column.name(),
            other
        ),
    };

    let factor: i64 = match datetime.dtype() {
        DataType::Datetime(TimeUnit::Milliseconds, _) => 1_000_000,
        DataType::Datetime(TimeUnit::Microseconds, _) => 1_000,
        _ => 1,
    };

    let physical = datetime.cast(&DataType::Int64)?;
    Ok(physical
        .i64()?
        .into_iter()
        .map(|v| v.map(|n| n.saturating_mul(factor)))
        .collect())
}

fn mean_nanos(values: &[Option<i64>]) -> f64 {
    let present: Vec<f64> = values.iter().flatten().map(|&v| v as f64).collect();
    if present.is_empty() {
        0.0
    } else {
        present.iter().sum::<f64>() / present.len() as f64
    }
}

/// Nanoseconds since the epoch as a float; missing values take the fitted mean
#[derive(Debug, Clone, Default)]
pub struct UnixTimestampEncoder {
    fill_value: Option<f64>,
}

impl UnixTimestampEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transformer for UnixTimestampEncoder {
    fn name(&self) -> &str {
        "UnixTimestampEncoder"
    }

    fn input_sdtype(&self) -> Sdtype {
        Sdtype::Datetime
    }

    fn fit(&mut self, column: &Column) -> Result<()> {
        self.fill_value = Some(mean_nanos(&epoch_nanos(column)?));
        Ok(())
    }

    fn transform(&self, column: &Column) -> Result<Vec<Vec<f64>>> {
        let fill = self
            .fill_value
            .ok_or_else(|| QualityError::NotFitted(self.name().to_string()))?;
        let values = epoch_nanos(column)?
            .into_iter()
            .map(|v| v.map_or(fill, |n| n as f64))
            .collect();
        Ok(vec![values])
    }

    fn fresh(&self) -> Box<dyn Transformer> {
        Box::new(Self::new())
    }
}

/// Like [`UnixTimestampEncoder`] but divided by the largest power of ten
/// that divides every fitted timestamp, so day-resolution data is not
/// expressed in nanoseconds.
#[derive(Debug, Clone, Default)]
pub struct OptimizedTimestampEncoder {
    fitted: Option<(i64, f64)>,
}

impl OptimizedTimestampEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Divider learned during fit
    pub fn divider(&self) -> Option<i64> {
        self.fitted.map(|(divider, _)| divider)
    }
}

fn common_power_of_ten(values: &[Option<i64>]) -> i64 {
    let mut divider: i64 = 1;
    for _ in 0..MAX_DIVIDER_EXPONENT {
        let next = divider * 10;
        if values.iter().flatten().all(|v| v % next == 0) {
            divider = next;
        } else {
            break;
        }
    }
    divider
}

impl Transformer for OptimizedTimestampEncoder {
    fn name(&self) -> &str {
        "OptimizedTimestampEncoder"
    }

    fn input_sdtype(&self) -> Sdtype {
        Sdtype::Datetime
    }

    fn fit(&mut self, column: &Column) -> Result<()> {
        let values = epoch_nanos(column)?;
        let divider = common_power_of_ten(&values);
        let fill = mean_nanos(&values) / divider as f64;
        self.fitted = Some((divider, fill));
        Ok(())
    }

    fn transform(&self, column: &Column) -> Result<Vec<Vec<f64>>> {
        let (divider, fill) = self
            .fitted
            .ok_or_else(|| QualityError::NotFitted(self.name().to_string()))?;
        let values = epoch_nanos(column)?
            .into_iter()
            .map(|v| v.map_or(fill, |n| n as f64 / divider as f64))
            .collect();
        Ok(vec![values])
    }

    fn fresh(&self) -> Box<dyn Transformer> {
        Box::new(Self::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_NS: i64 = 86_400_000_000_000;

    fn dates() -> Column {
        // 1970-01-02, missing, 1970-01-04
        Column::new("d".into(), &[Some(1i32), None, Some(3)])
            .cast(&DataType::Date)
            .unwrap()
    }

    #[test]
    fn test_unix_timestamp_from_date() {
        let mut encoder = UnixTimestampEncoder::new();
        let out = encoder.fit_transform(&dates()).unwrap();
        assert_eq!(out[0][0], DAY_NS as f64);
        assert_eq!(out[0][1], 2.0 * DAY_NS as f64);
        assert_eq!(out[0][2], 3.0 * DAY_NS as f64);
    }

    #[test]
    fn test_optimized_divider() {
        let mut encoder = OptimizedTimestampEncoder::new();
        let out = encoder.fit_transform(&dates()).unwrap();
        // One day in ns is 864 * 10^11
        assert_eq!(encoder.divider(), Some(100_000_000_000));
        assert_eq!(out[0], vec![864.0, 1728.0, 2592.0]);
    }

    #[test]
    fn test_rejects_non_temporal_column() {
        let column = Column::new("s".into(), &["2020-01-01"]);
        assert!(UnixTimestampEncoder::new().fit(&column).is_err());
    }
}
