use crate::{Result, Value};
use std::sync::Arc;

/// Transformation applied to a parameter value at the driver boundary.
///
/// Used as encoder (input value, before binding) and as decoder (output
/// value, after reading). It receives the connection so it can build driver
/// specific objects, it must not touch the registry that invoked it.
pub trait Converter<C>: Send + Sync {
    fn perform(&self, connection: &C, value: Value) -> Result<Value>;
}

impl<C, F> Converter<C> for F
where
    F: Fn(&C, Value) -> Result<Value> + Send + Sync,
{
    fn perform(&self, connection: &C, value: Value) -> Result<Value> {
        self(connection, value)
    }
}

pub type SharedConverter<C> = Arc<dyn Converter<C>>;

/// Wraps a closure into a [`SharedConverter`].
///
/// ```rust
/// use parley_core::{AsValue, Converter, Value, converter};
/// let double = converter(|_: &(), v: Value| Ok((i32::try_from_value(v)? * 2).as_value()));
/// assert_eq!(double.perform(&(), 5.into()).unwrap(), Value::Int32(Some(10)));
/// ```
pub fn converter<C, F>(f: F) -> SharedConverter<C>
where
    F: Fn(&C, Value) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}
