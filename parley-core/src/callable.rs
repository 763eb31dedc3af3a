use crate::{Result, SqlType, Value};
use std::future::Future;

/// A driver prepared call to a stored routine.
///
/// This is the surface a driver implements, positional and nominal variants
/// are separate methods. The [`Statement`](crate::Statement) adapter picks the
/// right one from a [`ParameterKey`](crate::ParameterKey).
///
/// # Ordering
/// Binding and out parameter registration happen before `execute`, reads
/// after it. Drivers may reject calls out of order, the adapter does not
/// check it.
///
/// Positional indexes are 1-based and refer to the `?` placeholders of the
/// call string, the function return placeholder included.
pub trait CallableStatement: Send {
    /// Run the routine once with the current bindings.
    fn execute(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Bind an input value letting the driver pick the type.
    fn bind_index(&mut self, value: Value, index: i32) -> Result<()>;
    /// Bind an input value with an explicit type code.
    fn bind_index_typed(&mut self, value: Value, index: i32, sql_type: SqlType) -> Result<()>;
    fn bind_name(&mut self, value: Value, name: &str) -> Result<()>;
    fn bind_name_typed(&mut self, value: Value, name: &str, sql_type: SqlType) -> Result<()>;

    /// Declare an out parameter.
    fn register_out_index(&mut self, index: i32, sql_type: SqlType) -> Result<()>;
    /// Declare an out parameter of a user defined (structured) type.
    fn register_out_index_struct(
        &mut self,
        index: i32,
        sql_type: SqlType,
        type_name: &str,
    ) -> Result<()>;
    fn register_out_name(&mut self, name: &str, sql_type: SqlType) -> Result<()>;
    fn register_out_name_struct(
        &mut self,
        name: &str,
        sql_type: SqlType,
        type_name: &str,
    ) -> Result<()>;

    /// Current value of an out parameter.
    fn read_index(&mut self, index: i32) -> Result<Value>;
    fn read_name(&mut self, name: &str) -> Result<Value>;

    /// Remove all the previously bound input values.
    fn clear_bindings(&mut self) -> Result<()>;
}

impl<S: CallableStatement> CallableStatement for &mut S {
    fn execute(&mut self) -> impl Future<Output = Result<()>> + Send {
        (**self).execute()
    }
    fn bind_index(&mut self, value: Value, index: i32) -> Result<()> {
        (**self).bind_index(value, index)
    }
    fn bind_index_typed(&mut self, value: Value, index: i32, sql_type: SqlType) -> Result<()> {
        (**self).bind_index_typed(value, index, sql_type)
    }
    fn bind_name(&mut self, value: Value, name: &str) -> Result<()> {
        (**self).bind_name(value, name)
    }
    fn bind_name_typed(&mut self, value: Value, name: &str, sql_type: SqlType) -> Result<()> {
        (**self).bind_name_typed(value, name, sql_type)
    }
    fn register_out_index(&mut self, index: i32, sql_type: SqlType) -> Result<()> {
        (**self).register_out_index(index, sql_type)
    }
    fn register_out_index_struct(
        &mut self,
        index: i32,
        sql_type: SqlType,
        type_name: &str,
    ) -> Result<()> {
        (**self).register_out_index_struct(index, sql_type, type_name)
    }
    fn register_out_name(&mut self, name: &str, sql_type: SqlType) -> Result<()> {
        (**self).register_out_name(name, sql_type)
    }
    fn register_out_name_struct(
        &mut self,
        name: &str,
        sql_type: SqlType,
        type_name: &str,
    ) -> Result<()> {
        (**self).register_out_name_struct(name, sql_type, type_name)
    }
    fn read_index(&mut self, index: i32) -> Result<Value> {
        (**self).read_index(index)
    }
    fn read_name(&mut self, name: &str) -> Result<Value> {
        (**self).read_name(name)
    }
    fn clear_bindings(&mut self) -> Result<()> {
        (**self).clear_bindings()
    }
}
