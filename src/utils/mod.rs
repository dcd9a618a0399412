//! Console helpers: progress bars and styled output

mod progress;
mod styling;

pub use progress::*;
pub use styling::*;
