//! Boolean encoding

use anyhow::Result;
use polars::prelude::*;

use super::{mean_of_present, Transformer};
use crate::pipeline::error::QualityError;
use crate::pipeline::sdtype::Sdtype;

/// true → 1, false → 0; missing values take the fitted share of `true`
#[derive(Debug, Clone, Default)]
pub struct BinaryEncoder {
    fill_value: Option<f64>,
}

impl BinaryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(column: &Column) -> Result<Vec<Option<f64>>> {
        let cast = column.cast(&DataType::Boolean)?;
        Ok(cast
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| if b { 1.0 } else { 0.0 }))
            .collect())
    }
}

impl Transformer for BinaryEncoder {
    fn name(&self) -> &str {
        "BinaryEncoder"
    }

    fn input_sdtype(&self) -> Sdtype {
        Sdtype::Boolean
    }

    fn fit(&mut self, column: &Column) -> Result<()> {
        self.fill_value = Some(mean_of_present(&Self::read(column)?));
        Ok(())
    }

    fn transform(&self, column: &Column) -> Result<Vec<Vec<f64>>> {
        let fill = self
            .fill_value
            .ok_or_else(|| QualityError::NotFitted(self.name().to_string()))?;
        let values = Self::read(column)?
            .into_iter()
            .map(|v| v.unwrap_or(fill))
            .collect();
        Ok(vec![values])
    }

    fn fresh(&self) -> Box<dyn Transformer> {
        Box::new(Self::new())
    }
}
