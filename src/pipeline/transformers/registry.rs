//! Registry of transformer prototypes grouped by input sdtype

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use super::{
    BinaryEncoder, FloatFormatter, FrequencyEncoder, LabelEncoder, OneHotEncoder,
    OptimizedTimestampEncoder, Transformer, UnixTimestampEncoder,
};
use crate::pipeline::sdtype::Sdtype;

/// Transformer prototypes keyed by the sdtype they accept
pub type TransformersByType = BTreeMap<Sdtype, Vec<Arc<dyn Transformer>>>;

/// Ordered collection of transformer prototypes
#[derive(Clone, Default)]
pub struct TransformerRegistry {
    entries: Vec<Arc<dyn Transformer>>,
}

impl std::fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl TransformerRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in transformers
    pub fn with_defaults() -> Self {
        Self::new()
            .with(FloatFormatter::new())
            .with(LabelEncoder::new())
            .with(FrequencyEncoder::new())
            .with(OneHotEncoder::new())
            .with(UnixTimestampEncoder::new())
            .with(OptimizedTimestampEncoder::new())
            .with(BinaryEncoder::new())
    }

    /// Add a transformer prototype
    pub fn with<T: Transformer + 'static>(mut self, transformer: T) -> Self {
        self.entries.push(Arc::new(transformer));
        self
    }

    /// A new registry without the named transformers
    pub fn without(&self, names: &[String]) -> Self {
        let skip: HashSet<&str> = names.iter().map(String::as_str).collect();
        Self {
            entries: self
                .entries
                .iter()
                .filter(|t| !skip.contains(t.name()))
                .cloned()
                .collect(),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prototypes grouped by input sdtype, in registration order
    pub fn transformers_by_type(&self) -> TransformersByType {
        let mut grouped: TransformersByType = BTreeMap::new();
        for transformer in &self.entries {
            grouped
                .entry(transformer.input_sdtype())
                .or_default()
                .push(Arc::clone(transformer));
        }
        grouped
    }
}

/// Transformer the encoding pipeline assigns to a detected sdtype
pub fn default_transformer(sdtype: &Sdtype) -> Option<Box<dyn Transformer>> {
    match sdtype {
        Sdtype::Numerical | Sdtype::Float | Sdtype::Int | Sdtype::Integer => {
            Some(Box::new(FloatFormatter::new()))
        }
        Sdtype::Categorical => Some(Box::new(FrequencyEncoder::new())),
        Sdtype::Datetime => Some(Box::new(UnixTimestampEncoder::new())),
        Sdtype::Boolean => Some(Box::new(BinaryEncoder::new())),
        Sdtype::Id | Sdtype::Other(_) => None,
    }
}
