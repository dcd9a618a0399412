//! Column transformers
//!
//! A transformer converts one column of a given sdtype into one or more
//! numeric output columns. Prototypes live in the [`TransformerRegistry`];
//! every fit works on a [`Transformer::fresh`] copy so prototypes are never
//! mutated.

mod boolean;
mod categorical;
mod datetime;
mod numerical;
mod registry;

use anyhow::Result;
use polars::prelude::*;

use super::sdtype::Sdtype;

pub use boolean::BinaryEncoder;
pub use categorical::{FrequencyEncoder, LabelEncoder, OneHotEncoder};
pub use datetime::{OptimizedTimestampEncoder, UnixTimestampEncoder};
pub use numerical::FloatFormatter;
pub use registry::{default_transformer, TransformerRegistry, TransformersByType};

/// Strategy for turning one column into numeric features
pub trait Transformer: Send + Sync {
    /// Name used in score tables and skip lists
    fn name(&self) -> &str;

    /// The sdtype this transformer accepts
    fn input_sdtype(&self) -> Sdtype;

    /// Learn whatever state the transform needs
    fn fit(&mut self, column: &Column) -> Result<()>;

    /// Produce output columns, each with one value per input row
    fn transform(&self, column: &Column) -> Result<Vec<Vec<f64>>>;

    /// Names of the output columns for an input column
    fn output_columns(&self, input: &str) -> Vec<String> {
        vec![format!("{}.value", input)]
    }

    /// An unfitted copy with the same configuration
    fn fresh(&self) -> Box<dyn Transformer>;

    fn fit_transform(&mut self, column: &Column) -> Result<Vec<Vec<f64>>> {
        self.fit(column)?;
        self.transform(column)
    }
}

/// Mean of the present values, or 0.0 when every value is missing
pub(crate) fn mean_of_present(values: &[Option<f64>]) -> f64 {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Read a column as optional strings (works for String and Categorical)
pub(crate) fn string_values(column: &Column) -> Result<Vec<Option<String>>> {
    let cast = column.cast(&DataType::String)?;
    Ok(cast
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect())
}
