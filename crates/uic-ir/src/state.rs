//! `StateDefinition` and `StateVariable` (§3.1).

use serde::{Deserialize, Serialize};

use crate::node::PropValue;

/// Where a `StateDefinition` is visible from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateScope {
    /// Visible only to the node that declares it.
    Local,
    /// Visible across the whole component tree (context/provider).
    Global,
}

/// A state variable's declared semantic type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SemanticType {
    /// A string value.
    String,
    /// An integer value.
    Integer,
    /// A decimal (floating point) value.
    Decimal,
    /// A boolean value.
    Boolean,
    /// An ordered list of `T`.
    List {
        /// Element type.
        element: Box<SemanticType>,
    },
    /// A mapping from `K` to `V`.
    Map {
        /// Key type.
        key: Box<SemanticType>,
        /// Value type.
        value: Box<SemanticType>,
    },
    /// Any of the above, wrapped to also allow a null/absent value.
    Nullable {
        /// The wrapped type.
        inner: Box<SemanticType>,
    },
    /// The front-end could not infer a type from the initializer.
    Unknown,
}

impl SemanticType {
    /// Wrap `self` as nullable, unless it already is.
    #[must_use]
    pub fn nullable(self) -> Self {
        match self {
            SemanticType::Nullable { .. } => self,
            other => SemanticType::Nullable {
                inner: Box::new(other),
            },
        }
    }

    /// Infer a semantic type from a literal initial value (§4.1 hook-1).
    pub fn infer_from(value: &PropValue) -> Self {
        match value {
            PropValue::Null => SemanticType::Unknown,
            PropValue::Bool(_) => SemanticType::Boolean,
            PropValue::Int(_) => SemanticType::Integer,
            PropValue::Decimal(_) => SemanticType::Decimal,
            PropValue::Str(_) => SemanticType::String,
            PropValue::List(items) => SemanticType::List {
                element: Box::new(
                    items
                        .first()
                        .map(SemanticType::infer_from)
                        .unwrap_or(SemanticType::Unknown),
                ),
            },
            PropValue::Map(_) => SemanticType::Map {
                key: Box::new(SemanticType::String),
                value: Box::new(SemanticType::Unknown),
            },
            _ => SemanticType::Unknown,
        }
    }
}

/// One declared state variable (§3.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateVariable {
    /// Name, unique within its scope.
    pub name: String,
    /// Declared (or inferred) semantic type.
    pub ty: SemanticType,
    /// Initial value.
    pub initial: PropValue,
    /// Whether the variable can be reassigned (`false` for e.g. Dart `final`).
    pub mutable: bool,
}

/// A named, scoped collection of state variables (§3.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDefinition {
    /// Local-to-node or global visibility.
    pub scope: StateScope,
    /// Declared variables, in declaration order.
    pub variables: Vec<StateVariable>,
}

impl StateDefinition {
    /// Look up a variable by name.
    pub fn get(&self, name: &str) -> Option<&StateVariable> {
        self.variables.iter().find(|v| v.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_integer_from_int_literal() {
        assert_eq!(SemanticType::infer_from(&PropValue::Int(0)), SemanticType::Integer);
    }

    #[test]
    fn nullable_does_not_double_wrap() {
        let ty = SemanticType::String.nullable().nullable();
        assert_eq!(
            ty,
            SemanticType::Nullable {
                inner: Box::new(SemanticType::String)
            }
        );
    }
}
