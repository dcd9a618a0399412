//! Numerical formatting

use anyhow::Result;
use polars::prelude::*;

use super::{mean_of_present, Transformer};
use crate::pipeline::error::QualityError;
use crate::pipeline::sdtype::Sdtype;

/// Casts a numeric column to floats.
///
/// Missing values (nulls and NaN) are replaced by the fitted mean unless
/// replacement is disabled, in which case they come out as NaN.
#[derive(Debug, Clone)]
pub struct FloatFormatter {
    replace_missing: bool,
    fill_value: Option<f64>,
}

impl Default for FloatFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl FloatFormatter {
    pub fn new() -> Self {
        Self {
            replace_missing: true,
            fill_value: None,
        }
    }

    /// Enable or disable missing-value replacement
    pub fn with_missing_replacement(mut self, replace: bool) -> Self {
        self.replace_missing = replace;
        self
    }

    fn read(column: &Column) -> Result<Vec<Option<f64>>> {
        let cast = column.cast(&DataType::Float64)?;
        Ok(cast
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }
}

impl Transformer for FloatFormatter {
    fn name(&self) -> &str {
        "FloatFormatter"
    }

    fn input_sdtype(&self) -> Sdtype {
        Sdtype::Numerical
    }

    fn fit(&mut self, column: &Column) -> Result<()> {
        let values = Self::read(column)?;
        self.fill_value = Some(mean_of_present(&values));
        Ok(())
    }

    fn transform(&self, column: &Column) -> Result<Vec<Vec<f64>>> {
        let fill = self
            .fill_value
            .ok_or_else(|| QualityError::NotFitted(self.name().to_string()))?;
        let missing = if self.replace_missing { fill } else { f64::NAN };
        let values = Self::read(column)?
            .into_iter()
            .map(|v| v.unwrap_or(missing))
            .collect();
        Ok(vec![values])
    }

    fn fresh(&self) -> Box<dyn Transformer> {
        Box::new(Self {
            replace_missing: self.replace_missing,
            fill_value: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_with_gap() -> Column {
        Column::new("x".into(), &[Some(1.0f64), None, Some(3.0)])
    }

    #[test]
    fn test_replaces_missing_with_mean() {
        let mut formatter = FloatFormatter::new();
        let out = formatter.fit_transform(&column_with_gap()).unwrap();
        assert_eq!(out, vec![vec![1.0, 2.0, 3.0]]);
    }

    #[test]
    fn test_keeps_nan_when_replacement_disabled() {
        let mut formatter = FloatFormatter::new().with_missing_replacement(false);
        let out = formatter.fit_transform(&column_with_gap()).unwrap();
        assert!(out[0][1].is_nan());
        assert_eq!(out[0][2], 3.0);
    }

    #[test]
    fn test_casts_integers() {
        let column = Column::new("n".into(), &[1i32, 2, 3]);
        let mut formatter = FloatFormatter::new();
        assert_eq!(formatter.fit_transform(&column).unwrap(), vec![vec![1.0, 2.0, 3.0]]);
    }

    #[test]
    fn test_transform_before_fit_errors() {
        let formatter = FloatFormatter::new();
        assert!(formatter.transform(&column_with_gap()).is_err());
    }
}
