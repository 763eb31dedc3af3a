use crate::{SharedConverter, SqlType, ValueCell};
use std::{
    fmt::{self, Debug, Display},
    sync::Arc,
};

/// Everything known about one routine parameter.
///
/// The direction is implied by the cells: a parameter is an input when it has
/// an `input` cell, an output when it has an `output` cell, and in-out when it
/// has both (possibly the very same cell).
pub struct Parameter<C> {
    /// Cell holding the value bound before execution.
    pub input: Option<ValueCell>,
    /// Cell receiving the value read after execution.
    pub output: Option<ValueCell>,
    /// Database type code, required for outputs.
    pub sql_type: Option<SqlType>,
    /// Structured type name, for outputs of user defined types.
    pub type_name: Option<String>,
    pub encoder: Option<SharedConverter<C>>,
    pub decoder: Option<SharedConverter<C>>,
}

impl<C> Parameter<C> {
    pub fn is_input(&self) -> bool {
        self.input.is_some()
    }

    pub fn is_output(&self) -> bool {
        self.output.is_some()
    }

    pub fn is_in_out(&self) -> bool {
        self.is_input() && self.is_output()
    }
}

impl<C> Default for Parameter<C> {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            sql_type: None,
            type_name: None,
            encoder: None,
            decoder: None,
        }
    }
}

impl<C> Clone for Parameter<C> {
    fn clone(&self) -> Self {
        Self {
            input: self.input.clone(),
            output: self.output.clone(),
            sql_type: self.sql_type,
            type_name: self.type_name.clone(),
            encoder: self.encoder.clone(),
            decoder: self.decoder.clone(),
        }
    }
}

fn same_converter<C>(l: &Option<SharedConverter<C>>, r: &Option<SharedConverter<C>>) -> bool {
    match (l, r) {
        (Some(l), Some(r)) => Arc::ptr_eq(l, r),
        (None, None) => true,
        _ => false,
    }
}

impl<C> PartialEq for Parameter<C> {
    fn eq(&self, other: &Self) -> bool {
        self.input == other.input
            && self.output == other.output
            && self.sql_type == other.sql_type
            && self.type_name == other.type_name
            && same_converter(&self.encoder, &other.encoder)
            && same_converter(&self.decoder, &other.decoder)
    }
}

impl<C> Debug for Parameter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("input", &self.input)
            .field("output", &self.output)
            .field("sql_type", &self.sql_type)
            .field("type_name", &self.type_name)
            .field("encoder", &self.encoder.as_ref().map(|_| ".."))
            .field("decoder", &self.decoder.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Renders `input/output (type/struct)`, absent parts as `-`.
impl<C> Display for Parameter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn part(f: &mut fmt::Formatter<'_>, value: Option<impl Display>) -> fmt::Result {
            match value {
                Some(v) => write!(f, "{v}"),
                None => f.write_str("-"),
            }
        }
        part(f, self.input.as_ref())?;
        f.write_str("/")?;
        part(f, self.output.as_ref())?;
        f.write_str(" (")?;
        part(f, self.sql_type)?;
        f.write_str("/")?;
        part(f, self.type_name.as_ref())?;
        f.write_str(")")
    }
}
