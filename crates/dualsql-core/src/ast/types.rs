//! SQL data type definitions.

use std::fmt;

use super::expression::Identifier;

/// SQL data types as written in `CAST` and type constructors.
///
/// Type names are not resolved; `varchar(3)` and `VARCHAR(3)` only differ in
/// spelling.
#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    /// A named type with optional parameters, e.g. `decimal(10, 2)`.
    Named {
        /// Type name as written.
        name: String,
        /// Type parameters.
        parameters: Vec<TypeParameter>,
    },
    /// `ARRAY<element>`.
    Array(Box<DataType>),
    /// `MAP<key, value>`.
    Map(Box<DataType>, Box<DataType>),
    /// `ROW(name type, ...)`.
    Row(Vec<RowField>),
}

/// A parameter of a named type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeParameter {
    /// Numeric parameter such as a length or precision.
    Integer(u64),
    /// Nested type parameter.
    Type(DataType),
}

/// A field of a `ROW` type.
#[derive(Debug, Clone, PartialEq)]
pub struct RowField {
    pub name: Identifier,
    pub data_type: DataType,
}

impl DataType {
    /// Creates a parameterless named type.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    /// Returns the SQL representation of the data type.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Named { name, parameters } if parameters.is_empty() => name.clone(),
            Self::Named { name, parameters } => {
                let parameters = parameters
                    .iter()
                    .map(|parameter| match parameter {
                        TypeParameter::Integer(value) => value.to_string(),
                        TypeParameter::Type(data_type) => data_type.to_sql(),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{name}({parameters})")
            }
            Self::Array(element) => format!("ARRAY<{}>", element.to_sql()),
            Self::Map(key, value) => format!("MAP<{}, {}>", key.to_sql(), value.to_sql()),
            Self::Row(fields) => {
                let fields = fields
                    .iter()
                    .map(|field| format!("{} {}", field.name, field.data_type.to_sql()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("ROW({fields})")
            }
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_to_sql() {
        assert_eq!(DataType::named("bigint").to_sql(), "bigint");
        assert_eq!(
            DataType::Named {
                name: "decimal".to_string(),
                parameters: vec![TypeParameter::Integer(10), TypeParameter::Integer(2)],
            }
            .to_sql(),
            "decimal(10, 2)"
        );
        assert_eq!(
            DataType::Map(
                Box::new(DataType::named("varchar")),
                Box::new(DataType::Array(Box::new(DataType::named("int"))))
            )
            .to_sql(),
            "MAP<varchar, ARRAY<int>>"
        );
    }

    #[test]
    fn test_row_type_to_sql() {
        let row = DataType::Row(vec![RowField {
            name: Identifier::new("x"),
            data_type: DataType::named("double"),
        }]);
        assert_eq!(row.to_string(), "ROW(x double)");
    }
}
