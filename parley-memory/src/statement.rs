use crate::{Arguments, Routine, RoutineParameter};
use parley_core::{
    CallableStatement, Error, ParameterKey, Result, SqlType, Value, truncate_long,
    types,
};
use std::{future::Future, sync::Arc};

/// Operation received by a [`MemoryStatement`], in the order it was received.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementEvent {
    BindInput {
        key: ParameterKey,
        value: Value,
        sql_type: Option<SqlType>,
    },
    BindOutput {
        key: ParameterKey,
        sql_type: SqlType,
        type_name: Option<String>,
    },
    Execute,
    ReadOutput {
        key: ParameterKey,
    },
    ClearBindings,
}

/// Placeholder of the call string.
enum Slot<'r> {
    Result(SqlType),
    Parameter(&'r RoutineParameter),
}

impl Slot<'_> {
    fn is_input(&self) -> bool {
        match self {
            Slot::Result(..) => false,
            Slot::Parameter(p) => p.mode.is_input(),
        }
    }

    fn is_output(&self) -> bool {
        match self {
            Slot::Result(..) => true,
            Slot::Parameter(p) => p.mode.is_output(),
        }
    }

    fn sql_type(&self) -> SqlType {
        match self {
            Slot::Result(t) => *t,
            Slot::Parameter(p) => p.sql_type,
        }
    }

    fn type_name(&self) -> Option<&str> {
        match self {
            Slot::Result(..) => None,
            Slot::Parameter(p) => p.type_name.as_deref(),
        }
    }
}

/// Prepared call to a routine of a [`MemoryConnection`](crate::MemoryConnection).
///
/// Every operation it receives is recorded and can be inspected with
/// [`MemoryStatement::events`].
#[derive(Debug)]
pub struct MemoryStatement {
    sql: String,
    routine: Arc<Routine>,
    strict: bool,
    inputs: Vec<Option<Value>>,
    outputs: Vec<Option<(SqlType, Option<String>)>>,
    results: Option<Vec<Value>>,
    events: Vec<StatementEvent>,
}

impl MemoryStatement {
    pub(crate) fn new(sql: String, routine: Arc<Routine>, strict: bool) -> Self {
        let placeholders = routine.placeholders();
        Self {
            sql,
            routine,
            strict,
            inputs: vec![None; placeholders],
            outputs: vec![None; placeholders],
            results: None,
            events: Vec::new(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn routine(&self) -> &Routine {
        &self.routine
    }

    pub fn events(&self) -> &[StatementEvent] {
        &self.events
    }

    /// Returns the events recorded so far and forgets them.
    pub fn take_events(&mut self) -> Vec<StatementEvent> {
        std::mem::take(&mut self.events)
    }

    fn error(&self, message: String) -> Error {
        let error = Error::msg(message).context(format!(
            "While using the statement `{}`",
            truncate_long!(self.sql)
        ));
        log::error!("{:#}", error);
        error
    }

    fn slot(&self, position: usize) -> Slot<'_> {
        match self.routine.returns {
            Some(returns) if position == 0 => Slot::Result(returns),
            Some(..) => Slot::Parameter(&self.routine.parameters[position - 1]),
            None => Slot::Parameter(&self.routine.parameters[position]),
        }
    }

    /// 0-based placeholder position of a key.
    fn position(&self, key: &ParameterKey) -> Result<usize> {
        let offset = self.routine.returns.map_or(0, |_| 1);
        match key {
            ParameterKey::Index(index) => {
                let placeholders = self.routine.placeholders();
                if *index < 1 || *index as usize > placeholders {
                    return Err(self.error(format!(
                        "Parameter index {} is out of range, the call has {} placeholders",
                        index, placeholders
                    )));
                }
                Ok(*index as usize - 1)
            }
            ParameterKey::Name(name) => self
                .routine
                .parameters
                .iter()
                .position(|p| p.name.eq_ignore_ascii_case(name))
                .map(|p| p + offset)
                .ok_or_else(|| {
                    self.error(format!(
                        "Routine `{}` does not have a parameter named `{}`",
                        self.routine.name, name
                    ))
                }),
        }
    }

    fn check_type(&self, key: &ParameterKey, slot: &Slot, sql_type: SqlType) -> Result<()> {
        if self.strict && slot.sql_type() != sql_type {
            return Err(self.error(format!(
                "Parameter {} is declared as {}, got {}",
                key,
                types::name(slot.sql_type()).unwrap_or("an unknown type"),
                types::name(sql_type).unwrap_or("an unknown type"),
            )));
        }
        Ok(())
    }

    fn bind(&mut self, key: ParameterKey, value: Value, sql_type: Option<SqlType>) -> Result<()> {
        let position = self.position(&key)?;
        let slot = self.slot(position);
        if !slot.is_input() {
            return Err(self.error(format!("Parameter {} is not an input parameter", key)));
        }
        if let Some(sql_type) = sql_type {
            self.check_type(&key, &slot, sql_type)?;
        }
        log::debug!("Binding {} = {}", key, value);
        self.inputs[position] = Some(value.clone());
        self.events.push(StatementEvent::BindInput {
            key,
            value,
            sql_type,
        });
        Ok(())
    }

    fn register(
        &mut self,
        key: ParameterKey,
        sql_type: SqlType,
        type_name: Option<&str>,
    ) -> Result<()> {
        let position = self.position(&key)?;
        let slot = self.slot(position);
        if !slot.is_output() {
            return Err(self.error(format!("Parameter {} is not an output parameter", key)));
        }
        self.check_type(&key, &slot, sql_type)?;
        if self.strict {
            let matches = match (slot.type_name(), type_name) {
                (Some(l), Some(r)) => l.eq_ignore_ascii_case(r),
                (None, None) => true,
                _ => false,
            };
            if !matches {
                return Err(self.error(format!(
                    "Parameter {} is declared with type name {:?}, got {:?}",
                    key,
                    slot.type_name(),
                    type_name
                )));
            }
        }
        log::debug!("Registering output {} ({})", key, sql_type);
        let type_name = type_name.map(ToString::to_string);
        self.outputs[position] = Some((sql_type, type_name.clone()));
        self.events.push(StatementEvent::BindOutput {
            key,
            sql_type,
            type_name,
        });
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        self.results = None;
        let offset = self.routine.returns.map_or(0, |_| 1);
        for position in 0..self.routine.placeholders() {
            let slot = self.slot(position);
            if slot.is_input() && self.inputs[position].is_none() {
                return Err(self.error(format!(
                    "Parameter {} was not bound",
                    position + 1
                )));
            }
            if slot.is_output() && self.outputs[position].is_none() {
                return Err(self.error(format!(
                    "Output parameter {} was not registered",
                    position + 1
                )));
            }
        }
        let values = self.inputs[offset..]
            .iter()
            .map(|v| v.clone().unwrap_or_default())
            .collect();
        let routine = self.routine.clone();
        let mut arguments = Arguments::new(&routine, values);
        routine.invoke(&mut arguments).map_err(|e| {
            let error = e.context(format!("While executing `{}`", routine.name));
            log::error!("{:#}", error);
            error
        })?;
        let mut results = Vec::with_capacity(routine.placeholders());
        if offset > 0 {
            results.push(arguments.result);
        }
        results.extend(arguments.values);
        self.results = Some(results);
        self.events.push(StatementEvent::Execute);
        Ok(())
    }

    fn read(&mut self, key: ParameterKey) -> Result<Value> {
        let position = self.position(&key)?;
        if self.outputs[position].is_none() {
            return Err(self.error(format!(
                "Parameter {} was not registered as an output parameter",
                key
            )));
        }
        let Some(results) = &self.results else {
            return Err(self.error(format!(
                "Cannot read parameter {} before the statement is executed",
                key
            )));
        };
        let value = results[position].clone();
        self.events.push(StatementEvent::ReadOutput { key });
        Ok(value)
    }
}

impl CallableStatement for MemoryStatement {
    fn execute(&mut self) -> impl Future<Output = Result<()>> + Send {
        log::debug!("Executing `{}`", truncate_long!(self.sql));
        let result = self.run();
        async move { result }
    }

    fn bind_index(&mut self, value: Value, index: i32) -> Result<()> {
        self.bind(ParameterKey::Index(index), value, None)
    }

    fn bind_index_typed(&mut self, value: Value, index: i32, sql_type: SqlType) -> Result<()> {
        self.bind(ParameterKey::Index(index), value, Some(sql_type))
    }

    fn bind_name(&mut self, value: Value, name: &str) -> Result<()> {
        self.bind(ParameterKey::Name(name.into()), value, None)
    }

    fn bind_name_typed(&mut self, value: Value, name: &str, sql_type: SqlType) -> Result<()> {
        self.bind(ParameterKey::Name(name.into()), value, Some(sql_type))
    }

    fn register_out_index(&mut self, index: i32, sql_type: SqlType) -> Result<()> {
        self.register(ParameterKey::Index(index), sql_type, None)
    }

    fn register_out_index_struct(
        &mut self,
        index: i32,
        sql_type: SqlType,
        type_name: &str,
    ) -> Result<()> {
        self.register(ParameterKey::Index(index), sql_type, Some(type_name))
    }

    fn register_out_name(&mut self, name: &str, sql_type: SqlType) -> Result<()> {
        self.register(ParameterKey::Name(name.into()), sql_type, None)
    }

    fn register_out_name_struct(
        &mut self,
        name: &str,
        sql_type: SqlType,
        type_name: &str,
    ) -> Result<()> {
        self.register(ParameterKey::Name(name.into()), sql_type, Some(type_name))
    }

    fn read_index(&mut self, index: i32) -> Result<Value> {
        self.read(ParameterKey::Index(index))
    }

    fn read_name(&mut self, name: &str) -> Result<Value> {
        self.read(ParameterKey::Name(name.into()))
    }

    fn clear_bindings(&mut self) -> Result<()> {
        log::debug!("Clearing the bindings of `{}`", truncate_long!(self.sql));
        self.inputs.iter_mut().for_each(|v| *v = None);
        self.results = None;
        self.events.push(StatementEvent::ClearBindings);
        Ok(())
    }
}
