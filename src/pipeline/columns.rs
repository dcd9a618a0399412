//! Column selection by sdtype
//!
//! Columns are matched either through declared metadata or, when no
//! metadata is available, by the native polars dtype families an sdtype
//! maps to.

use std::collections::BTreeSet;

use polars::prelude::*;

use super::metadata::Metadata;
use super::sdtype::Sdtype;

/// Native dtype family an sdtype can select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DtypeFamily {
    Number,
    Float,
    Integer,
    Text,
    Temporal,
    Bool,
}

impl DtypeFamily {
    fn matches(self, dtype: &DataType) -> bool {
        match self {
            DtypeFamily::Number => dtype.is_primitive_numeric(),
            DtypeFamily::Float => dtype.is_float(),
            DtypeFamily::Integer => dtype.is_integer(),
            DtypeFamily::Text => matches!(
                dtype,
                DataType::String | DataType::Categorical(_, _) | DataType::Enum(_, _)
            ),
            DtypeFamily::Temporal => matches!(dtype, DataType::Datetime(_, _) | DataType::Date),
            DtypeFamily::Bool => matches!(dtype, DataType::Boolean),
        }
    }
}

/// Dtype families selected by an sdtype; empty for unmapped sdtypes
fn dtype_families(sdtype: &Sdtype) -> &'static [DtypeFamily] {
    match sdtype {
        Sdtype::Numerical => &[DtypeFamily::Number],
        Sdtype::Float => &[DtypeFamily::Float],
        Sdtype::Int | Sdtype::Integer => &[DtypeFamily::Integer],
        Sdtype::Categorical => &[DtypeFamily::Text],
        Sdtype::Datetime => &[DtypeFamily::Temporal],
        Sdtype::Boolean => &[DtypeFamily::Bool],
        Sdtype::Id | Sdtype::Other(_) => &[],
    }
}

/// Find the columns of `df` that have the given sdtype.
///
/// With metadata, a column matches when its declared type equals `sdtype`
/// (metadata columns absent from `df` are still returned; callers that index
/// the frame should intersect with its columns). Without metadata, columns
/// are matched by native dtype.
pub fn find_columns(df: &DataFrame, sdtype: &Sdtype, metadata: Option<&Metadata>) -> BTreeSet<String> {
    if let Some(metadata) = metadata {
        return metadata
            .fields
            .iter()
            .filter(|(_, field)| field.sdtype.parse::<Sdtype>().ok().as_ref() == Some(sdtype))
            .map(|(name, _)| name.clone())
            .collect();
    }

    let families = dtype_families(sdtype);
    df.get_columns()
        .iter()
        .filter(|col| families.iter().any(|family| family.matches(col.dtype())))
        .map(|col| col.name().to_string())
        .collect()
}

/// Infer the sdtype a column would be assigned from its native dtype.
///
/// Numeric columns are `numerical`; returns `None` for dtypes with no
/// sdtype (lists, structs, binary, ...).
pub fn detect_sdtype(column: &Column) -> Option<Sdtype> {
    let dtype = column.dtype();
    if DtypeFamily::Bool.matches(dtype) {
        Some(Sdtype::Boolean)
    } else if DtypeFamily::Number.matches(dtype) {
        Some(Sdtype::Numerical)
    } else if DtypeFamily::Text.matches(dtype) {
        Some(Sdtype::Categorical)
    } else if DtypeFamily::Temporal.matches(dtype) {
        Some(Sdtype::Datetime)
    } else {
        None
    }
}
