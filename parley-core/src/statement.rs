use crate::{CallableStatement, Connection, Driver, ParameterKey, Result, SqlType, Value, separated_by};
use futures::TryFutureExt;
use std::fmt::{self, Display};

/// Kind of stored routine, decides the shape of the call string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutineKind {
    /// `{call name(?,…)}`
    Procedure,
    /// `{? = call name(?,…)}`, the leading placeholder receives the result.
    Function,
}

/// Writes the call string for a routine with `parameters` placeholders in
/// total. For functions the return placeholder counts toward `parameters`.
pub fn write_call(out: &mut String, kind: RoutineKind, name: &str, parameters: usize) {
    let placeholders = match kind {
        RoutineKind::Procedure => {
            out.push_str("{call ");
            parameters
        }
        RoutineKind::Function => {
            out.push_str("{? = call ");
            parameters.saturating_sub(1)
        }
    };
    out.push_str(name);
    out.push('(');
    separated_by(out, 0..placeholders, |out, _| out.push('?'), ",");
    out.push_str(")}");
}

/// Call string for a routine, see [`write_call`].
///
/// ```rust
/// use parley_core::{RoutineKind, call_sql};
/// assert_eq!(call_sql(RoutineKind::Procedure, "pkg.proc", 2), "{call pkg.proc(?,?)}");
/// assert_eq!(call_sql(RoutineKind::Function, "pkg.fn", 2), "{? = call pkg.fn(?)}");
/// ```
pub fn call_sql(kind: RoutineKind, name: &str, parameters: usize) -> String {
    let mut out = String::with_capacity(name.len() + 16 + parameters * 2);
    write_call(&mut out, kind, name, parameters);
    out
}

/// Callable statement adapter.
///
/// Turns a [`ParameterKey`] into the positional or nominal driver call and
/// keeps the call string when it was synthesized here. Wrapping a `&mut S`
/// leaves the statement to its owner; a statement created through
/// [`Statement::create_procedure`] or [`Statement::create_function`] is owned
/// and closed when the adapter is dropped (or taken back with
/// [`Statement::into_base`]).
#[derive(Debug)]
pub struct Statement<S: CallableStatement> {
    base: S,
    sql: Option<String>,
}

impl<S: CallableStatement> Statement<S> {
    /// Adapter over a statement already prepared by the caller.
    pub fn new(base: S) -> Self {
        Self { base, sql: None }
    }

    /// Prepare a call to the procedure `name` taking `parameters` arguments.
    pub async fn create_procedure<C>(
        connection: &mut C,
        name: &str,
        parameters: usize,
    ) -> Result<Self>
    where
        C: Connection,
        C::Driver: Driver<Statement = S>,
    {
        Self::create(connection, RoutineKind::Procedure, name, parameters).await
    }

    /// Prepare a call to the function `name`, `parameters` counts the return value.
    pub async fn create_function<C>(
        connection: &mut C,
        name: &str,
        parameters: usize,
    ) -> Result<Self>
    where
        C: Connection,
        C::Driver: Driver<Statement = S>,
    {
        Self::create(connection, RoutineKind::Function, name, parameters).await
    }

    async fn create<C>(
        connection: &mut C,
        kind: RoutineKind,
        name: &str,
        parameters: usize,
    ) -> Result<Self>
    where
        C: Connection,
        C::Driver: Driver<Statement = S>,
    {
        let sql = call_sql(kind, name, parameters);
        log::debug!("Preparing `{}`", sql);
        connection
            .prepare_call(sql.clone())
            .map_ok(|base| Self {
                base,
                sql: Some(sql),
            })
            .await
    }

    /// Call string, only known when the adapter prepared the statement.
    pub fn sql(&self) -> Option<&str> {
        self.sql.as_deref()
    }

    pub fn base(&self) -> &S {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut S {
        &mut self.base
    }

    pub fn into_base(self) -> S {
        self.base
    }

    pub async fn execute(&mut self) -> Result<()> {
        log::trace!("Executing {}", self);
        self.base.execute().await
    }

    /// Bind an input, with the type code when given.
    pub fn bind_input(
        &mut self,
        key: &ParameterKey,
        value: Value,
        sql_type: Option<SqlType>,
    ) -> Result<()> {
        match (key, sql_type) {
            (ParameterKey::Index(index), None) => self.base.bind_index(value, *index),
            (ParameterKey::Index(index), Some(t)) => self.base.bind_index_typed(value, *index, t),
            (ParameterKey::Name(name), None) => self.base.bind_name(value, name),
            (ParameterKey::Name(name), Some(t)) => self.base.bind_name_typed(value, name, t),
        }
    }

    /// Register an out parameter, with the structured type name when given.
    pub fn bind_output(
        &mut self,
        key: &ParameterKey,
        sql_type: SqlType,
        type_name: Option<&str>,
    ) -> Result<()> {
        match (key, type_name) {
            (ParameterKey::Index(index), None) => self.base.register_out_index(*index, sql_type),
            (ParameterKey::Index(index), Some(n)) => {
                self.base.register_out_index_struct(*index, sql_type, n)
            }
            (ParameterKey::Name(name), None) => self.base.register_out_name(name, sql_type),
            (ParameterKey::Name(name), Some(n)) => {
                self.base.register_out_name_struct(name, sql_type, n)
            }
        }
    }

    pub fn read_output(&mut self, key: &ParameterKey) -> Result<Value> {
        match key {
            ParameterKey::Index(index) => self.base.read_index(*index),
            ParameterKey::Name(name) => self.base.read_name(name),
        }
    }

    pub fn clear_bindings(&mut self) -> Result<()> {
        self.base.clear_bindings()
    }
}

impl<S: CallableStatement> Display for Statement<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql.as_deref().unwrap_or("external callable statement"))
    }
}
