//! Pipeline module - the quality benchmark steps

pub mod aggregate;
pub mod assessment;
pub mod catalog;
pub mod columns;
pub mod config;
pub mod encoding;
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod metadata;
pub mod ranking;
pub mod regression;
pub mod run;
pub mod sdtype;
pub mod transformers;

pub use aggregate::*;
pub use assessment::*;
pub use catalog::*;
pub use columns::*;
pub use config::*;
pub use encoding::EncodingPipeline;
pub use error::QualityError;
pub use evaluator::*;
pub use loader::*;
pub use metadata::{FieldMetadata, Metadata};
pub use ranking::*;
pub use regression::{cross_val_r2, r2_score, FeatureMatrix, KFold, LinearRegression, Split};
pub use run::*;
pub use sdtype::Sdtype;
pub use transformers::{
    default_transformer, BinaryEncoder, FloatFormatter, FrequencyEncoder, LabelEncoder,
    OneHotEncoder, OptimizedTimestampEncoder, Transformer, TransformerRegistry,
    TransformersByType, UnixTimestampEncoder,
};
