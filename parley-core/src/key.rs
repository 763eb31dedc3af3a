use crate::{Error, Result};
use std::{
    cmp::Ordering,
    fmt::{self, Display},
};

/// Identifier of a routine parameter.
///
/// Either the 1-based position of the `?` placeholder in the call string, or
/// the name of a formal parameter declared by the routine. Two keys are equal
/// only when they are the same variant with the same payload: `Index(1)` and
/// `Name("1")` are different parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParameterKey {
    Index(i32),
    Name(String),
}

impl ParameterKey {
    /// Positional key, `index` must be strictly positive.
    pub fn index(index: i32) -> Result<Self> {
        ParameterKey::Index(index).validated()
    }

    /// Nominal key, `name` must not be blank.
    pub fn name(name: impl Into<String>) -> Result<Self> {
        ParameterKey::Name(name.into()).validated()
    }

    pub fn is_index(&self) -> bool {
        matches!(self, ParameterKey::Index(..))
    }

    pub fn is_name(&self) -> bool {
        matches!(self, ParameterKey::Name(..))
    }

    pub fn as_index(&self) -> Option<i32> {
        match self {
            ParameterKey::Index(v) => Some(*v),
            ParameterKey::Name(..) => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            ParameterKey::Index(..) => None,
            ParameterKey::Name(v) => Some(v),
        }
    }

    /// Returns the key itself if it identifies a parameter, an error otherwise.
    pub fn validated(self) -> Result<Self> {
        match &self {
            ParameterKey::Index(v) if *v <= 0 => Err(Error::msg(format!(
                "Parameter index must be a positive integer (1-based), got {v}"
            ))),
            ParameterKey::Name(v) if v.trim().is_empty() => {
                Err(Error::msg("Parameter name must be a non empty string"))
            }
            _ => Ok(self),
        }
    }
}

impl Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterKey::Index(v) => write!(f, "{v}"),
            ParameterKey::Name(v) => write!(f, "'{v}'"),
        }
    }
}

/// Positional keys sort numerically and come before every nominal key.
impl Ord for ParameterKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ParameterKey::Index(l), ParameterKey::Index(r)) => l.cmp(r),
            (ParameterKey::Name(l), ParameterKey::Name(r)) => l.cmp(r),
            (ParameterKey::Index(..), ParameterKey::Name(..)) => Ordering::Less,
            (ParameterKey::Name(..), ParameterKey::Index(..)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for ParameterKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Anything that can identify a parameter.
///
/// The conversion validates, so every registration entry point rejects
/// non positive indexes and blank names the same way.
pub trait AsParameterKey {
    fn as_parameter_key(self) -> Result<ParameterKey>;
}

impl AsParameterKey for ParameterKey {
    fn as_parameter_key(self) -> Result<ParameterKey> {
        self.validated()
    }
}

impl AsParameterKey for &ParameterKey {
    fn as_parameter_key(self) -> Result<ParameterKey> {
        self.clone().validated()
    }
}

impl AsParameterKey for i32 {
    fn as_parameter_key(self) -> Result<ParameterKey> {
        ParameterKey::index(self)
    }
}

impl AsParameterKey for &str {
    fn as_parameter_key(self) -> Result<ParameterKey> {
        ParameterKey::name(self)
    }
}

impl AsParameterKey for String {
    fn as_parameter_key(self) -> Result<ParameterKey> {
        ParameterKey::name(self)
    }
}
