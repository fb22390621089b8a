use std::fmt;

use super::error::{ModelError, ModelResult};

/// The value domain of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    String,
    Boolean,
    Integer,
}

impl ColumnType {
    /// Next type in the design view's cycle: String, Boolean, Integer, String, ...
    pub fn next(self) -> Self {
        match self {
            ColumnType::String => ColumnType::Boolean,
            ColumnType::Boolean => ColumnType::Integer,
            ColumnType::Integer => ColumnType::String,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColumnType::String => "String",
            ColumnType::Boolean => "Boolean",
            ColumnType::Integer => "Integer",
        }
    }

    /// Default a column takes right after switching to this type.
    pub fn fallback_value(self, allows_blanks: bool) -> CellValue {
        match self {
            ColumnType::String if allows_blanks => CellValue::Blank,
            ColumnType::String => CellValue::Text("x".to_string()),
            ColumnType::Boolean => CellValue::Boolean(true),
            ColumnType::Integer => CellValue::Integer(0),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single stored value.
///
/// `Text` never holds an empty string: empty input always parses to `Blank`,
/// so the `Display` form parses back to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellValue {
    Blank,
    Text(String),
    Boolean(bool),
    Integer(i64),
}

impl CellValue {
    /// Parse user input under the rules of a column.
    pub fn parse(ty: ColumnType, input: &str, allows_blanks: bool) -> ModelResult<CellValue> {
        if input.is_empty() {
            return if allows_blanks {
                Ok(CellValue::Blank)
            } else {
                Err(ModelError::BlankNotAllowed)
            };
        }

        let invalid = || ModelError::InvalidValue {
            text: input.to_string(),
            expected: ty,
        };

        match ty {
            ColumnType::String => Ok(CellValue::Text(input.to_string())),
            ColumnType::Boolean => {
                if input.eq_ignore_ascii_case("true") {
                    Ok(CellValue::Boolean(true))
                } else if input.eq_ignore_ascii_case("false") {
                    Ok(CellValue::Boolean(false))
                } else {
                    Err(invalid())
                }
            }
            ColumnType::Integer => input
                .parse::<i64>()
                .map(CellValue::Integer)
                .map_err(|_| invalid()),
        }
    }

    /// Re-interpret this value under another type, if its text form allows it.
    pub fn convert(&self, ty: ColumnType, allows_blanks: bool) -> Option<CellValue> {
        CellValue::parse(ty, &self.to_string(), allows_blanks).ok()
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Blank => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Boolean(b) => write!(f, "{}", b),
            CellValue::Integer(n) => write!(f, "{}", n),
        }
    }
}
