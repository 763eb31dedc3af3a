use parley_core::{AsValue, Error, Result, RoutineKind, SqlType, Value};
use std::{
    fmt::{self, Debug},
    sync::Arc,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterMode {
    In,
    Out,
    InOut,
}

impl ParameterMode {
    pub fn is_input(&self) -> bool {
        matches!(self, ParameterMode::In | ParameterMode::InOut)
    }

    pub fn is_output(&self) -> bool {
        matches!(self, ParameterMode::Out | ParameterMode::InOut)
    }
}

/// Formal parameter declared by a routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineParameter {
    pub name: String,
    pub mode: ParameterMode,
    pub sql_type: SqlType,
    /// Structured type name, for parameters of user defined types.
    pub type_name: Option<String>,
}

impl RoutineParameter {
    pub fn new(name: impl Into<String>, mode: ParameterMode, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            mode,
            sql_type,
            type_name: None,
        }
    }

    pub fn input(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self::new(name, ParameterMode::In, sql_type)
    }

    pub fn output(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self::new(name, ParameterMode::Out, sql_type)
    }

    pub fn in_out(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self::new(name, ParameterMode::InOut, sql_type)
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }
}

pub type RoutineBody = Arc<dyn Fn(&mut Arguments<'_>) -> Result<()> + Send + Sync>;

/// Stored routine living in a [`MemoryConnection`](crate::MemoryConnection).
///
/// The body receives the arguments, reads the inputs and writes the outputs
/// (and the result, for functions).
#[derive(Clone)]
pub struct Routine {
    pub name: String,
    pub kind: RoutineKind,
    /// Type code of the result, functions only.
    pub returns: Option<SqlType>,
    pub parameters: Vec<RoutineParameter>,
    body: RoutineBody,
}

impl Routine {
    pub fn procedure<F>(name: impl Into<String>, parameters: Vec<RoutineParameter>, body: F) -> Self
    where
        F: Fn(&mut Arguments<'_>) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: RoutineKind::Procedure,
            returns: None,
            parameters,
            body: Arc::new(body),
        }
    }

    pub fn function<F>(
        name: impl Into<String>,
        returns: SqlType,
        parameters: Vec<RoutineParameter>,
        body: F,
    ) -> Self
    where
        F: Fn(&mut Arguments<'_>) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: RoutineKind::Function,
            returns: Some(returns),
            parameters,
            body: Arc::new(body),
        }
    }

    /// Number of `?` placeholders expected in the call string.
    pub fn placeholders(&self) -> usize {
        self.parameters.len() + self.returns.map_or(0, |_| 1)
    }

    pub(crate) fn invoke(&self, arguments: &mut Arguments<'_>) -> Result<()> {
        (self.body)(arguments)
    }
}

impl Debug for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Routine")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("returns", &self.returns)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Values seen by a routine body during one execution.
pub struct Arguments<'r> {
    routine: &'r Routine,
    pub(crate) values: Vec<Value>,
    pub(crate) result: Value,
}

impl<'r> Arguments<'r> {
    pub(crate) fn new(routine: &'r Routine, values: Vec<Value>) -> Self {
        Self {
            routine,
            values,
            result: Value::Null,
        }
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.routine
            .parameters
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                Error::msg(format!(
                    "Routine `{}` does not have a parameter named `{}`",
                    self.routine.name, name
                ))
            })
    }

    pub fn get(&self, name: &str) -> Result<&Value> {
        Ok(&self.values[self.position(name)?])
    }

    pub fn get_as<T: AsValue>(&self, name: &str) -> Result<T> {
        T::try_from_value(self.get(name)?.clone())
    }

    /// Write an OUT or INOUT parameter.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let position = self.position(name)?;
        if !self.routine.parameters[position].mode.is_output() {
            return Err(Error::msg(format!(
                "Parameter `{}` of routine `{}` is not an output parameter",
                name, self.routine.name
            )));
        }
        self.values[position] = value.into();
        Ok(())
    }

    /// Set the function result.
    pub fn set_result(&mut self, value: impl Into<Value>) -> Result<()> {
        if self.routine.kind != RoutineKind::Function {
            return Err(Error::msg(format!(
                "Procedure `{}` cannot return a result",
                self.routine.name
            )));
        }
        self.result = value.into();
        Ok(())
    }
}
