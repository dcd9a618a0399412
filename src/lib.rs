//! tquality: Transformer Quality Benchmark Library
//!
//! Measures how much predictive signal each transformer's numeric encoding
//! keeps: encoded columns are used to predict the other numerical columns of
//! benchmark tables under k-fold cross-validated linear regression, and
//! transformers are ranked against the others of the same sdtype.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
