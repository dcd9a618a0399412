//! Categorical encoders
//!
//! Missing values are treated as a category of their own.

use std::collections::HashMap;

use anyhow::Result;
use polars::prelude::*;

use super::{string_values, Transformer};
use crate::pipeline::error::QualityError;
use crate::pipeline::sdtype::Sdtype;

/// Categories in order of first appearance, with their counts
fn categories_with_counts(values: &[Option<String>]) -> Vec<(Option<String>, usize)> {
    let mut order: Vec<(Option<String>, usize)> = Vec::new();
    let mut index: HashMap<Option<String>, usize> = HashMap::new();
    for value in values {
        match index.get(value) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(value.clone(), order.len());
                order.push((value.clone(), 1));
            }
        }
    }
    order
}

/// Integer code per category, assigned in order of first appearance.
/// Categories not seen during fit encode as -1.
#[derive(Debug, Clone, Default)]
pub struct LabelEncoder {
    codes: Option<HashMap<Option<String>, f64>>,
}

impl LabelEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transformer for LabelEncoder {
    fn name(&self) -> &str {
        "LabelEncoder"
    }

    fn input_sdtype(&self) -> Sdtype {
        Sdtype::Categorical
    }

    fn fit(&mut self, column: &Column) -> Result<()> {
        let values = string_values(column)?;
        let codes = categories_with_counts(&values)
            .into_iter()
            .enumerate()
            .map(|(code, (category, _))| (category, code as f64))
            .collect();
        self.codes = Some(codes);
        Ok(())
    }

    fn transform(&self, column: &Column) -> Result<Vec<Vec<f64>>> {
        let codes = self
            .codes
            .as_ref()
            .ok_or_else(|| QualityError::NotFitted(self.name().to_string()))?;
        let encoded = string_values(column)?
            .iter()
            .map(|v| codes.get(v).copied().unwrap_or(-1.0))
            .collect();
        Ok(vec![encoded])
    }

    fn fresh(&self) -> Box<dyn Transformer> {
        Box::new(Self::new())
    }
}

/// Replaces each category by its relative frequency in the fitted data.
/// Unseen categories encode as 0.
#[derive(Debug, Clone, Default)]
pub struct FrequencyEncoder {
    frequencies: Option<HashMap<Option<String>, f64>>,
}

impl FrequencyEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transformer for FrequencyEncoder {
    fn name(&self) -> &str {
        "FrequencyEncoder"
    }

    fn input_sdtype(&self) -> Sdtype {
        Sdtype::Categorical
    }

    fn fit(&mut self, column: &Column) -> Result<()> {
        let values = string_values(column)?;
        let total = values.len().max(1) as f64;
        let frequencies = categories_with_counts(&values)
            .into_iter()
            .map(|(category, count)| (category, count as f64 / total))
            .collect();
        self.frequencies = Some(frequencies);
        Ok(())
    }

    fn transform(&self, column: &Column) -> Result<Vec<Vec<f64>>> {
        let frequencies = self
            .frequencies
            .as_ref()
            .ok_or_else(|| QualityError::NotFitted(self.name().to_string()))?;
        let encoded = string_values(column)?
            .iter()
            .map(|v| frequencies.get(v).copied().unwrap_or(0.0))
            .collect();
        Ok(vec![encoded])
    }

    fn fresh(&self) -> Box<dyn Transformer> {
        Box::new(Self::new())
    }
}

/// One 0/1 indicator column per fitted category
#[derive(Debug, Clone, Default)]
pub struct OneHotEncoder {
    categories: Option<Vec<Option<String>>>,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transformer for OneHotEncoder {
    fn name(&self) -> &str {
        "OneHotEncoder"
    }

    fn input_sdtype(&self) -> Sdtype {
        Sdtype::Categorical
    }

    fn fit(&mut self, column: &Column) -> Result<()> {
        let values = string_values(column)?;
        let categories = categories_with_counts(&values)
            .into_iter()
            .map(|(category, _)| category)
            .collect();
        self.categories = Some(categories);
        Ok(())
    }

    fn transform(&self, column: &Column) -> Result<Vec<Vec<f64>>> {
        let categories = self
            .categories
            .as_ref()
            .ok_or_else(|| QualityError::NotFitted(self.name().to_string()))?;
        let values = string_values(column)?;
        Ok(categories
            .iter()
            .map(|category| {
                values
                    .iter()
                    .map(|v| if v == category { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect())
    }

    fn output_columns(&self, input: &str) -> Vec<String> {
        let count = self.categories.as_ref().map_or(0, Vec::len);
        (0..count).map(|i| format!("{}.value{}", input, i)).collect()
    }

    fn fresh(&self) -> Box<dyn Transformer> {
        Box::new(Self::new())
    }
}
