//! Semantic data types
//!
//! An sdtype describes what a column *means* (categorical, datetime, ...)
//! rather than how it is stored. Catalog entries and metadata files refer
//! to sdtypes by name. Names match case-insensitively; unknown names are
//! kept as `Other`, in lower case.

use serde::{Serialize, Serializer};

/// Semantic type of a column
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sdtype {
    Numerical,
    Float,
    /// Written as `integer` in metadata
    Integer,
    /// Written as `int`; selects native integer columns
    Int,
    Categorical,
    Datetime,
    Boolean,
    Id,
    /// Any sdtype without a native dtype mapping (e.g. `pii`, `text`)
    Other(String),
}

impl Sdtype {
    /// Lower-case name as it appears in catalogs and metadata
    pub fn as_str(&self) -> &str {
        match self {
            Sdtype::Numerical => "numerical",
            Sdtype::Float => "float",
            Sdtype::Integer => "integer",
            Sdtype::Int => "int",
            Sdtype::Categorical => "categorical",
            Sdtype::Datetime => "datetime",
            Sdtype::Boolean => "boolean",
            Sdtype::Id => "id",
            Sdtype::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Sdtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Sdtype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        if name.is_empty() {
            return Err("sdtype name cannot be empty".to_string());
        }

        Ok(match name.as_str() {
            "numerical" => Sdtype::Numerical,
            "float" => Sdtype::Float,
            "integer" => Sdtype::Integer,
            "int" => Sdtype::Int,
            "categorical" => Sdtype::Categorical,
            "datetime" => Sdtype::Datetime,
            "boolean" => Sdtype::Boolean,
            "id" => Sdtype::Id,
            _ => Sdtype::Other(name),
        })
    }
}

impl Serialize for Sdtype {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
