use crate::{
    AsParameterKey, CallableStatement, Error, Parameter, ParameterKey, Result, SharedConverter,
    SqlType, Statement, ValueCell, separated_by,
};
use indexmap::IndexMap;
use std::{
    collections::BTreeMap,
    fmt::{self, Display, Write},
};

/// Set of parameters for one stored routine call.
///
/// Parameters are registered once and can be applied to any number of
/// executions. Iteration (for binding, reading back and printing) visits the
/// positional parameters in ascending index order first, then the nominal
/// ones in the order they were first registered.
///
/// # Registration
/// Registering a key that already exists merges into the existing record:
/// the input and output cells are replaced only when the new registration
/// supplies one, every other field (type code, structured type name,
/// encoder, decoder) is overwritten, possibly with `None`.
///
/// # Example
/// ```rust,ignore
/// let mut registry = ParameterRegistry::new();
/// registry.register_input(1, ValueCell::new(42), Some(types::INTEGER), None)?;
/// let total = registry.register_output("total", types::BIGINT, None, None)?;
/// let mut statement = Statement::create_procedure(&mut connection, "acc.add", 2).await?;
/// registry.call(&connection, &mut statement).await?;
/// let total: i64 = total.get_as()?;
/// ```
pub struct ParameterRegistry<C> {
    positional: BTreeMap<i32, Parameter<C>>,
    nominal: IndexMap<String, Parameter<C>>,
}

impl<C> ParameterRegistry<C> {
    pub fn new() -> Self {
        Self {
            positional: BTreeMap::new(),
            nominal: IndexMap::new(),
        }
    }

    /// Register (or update) an input parameter.
    ///
    /// The output side of an existing record is kept, its type code is
    /// overwritten with `sql_type`, which therefore cannot be `None` when the
    /// record is also an output.
    pub fn register_input(
        &mut self,
        key: impl AsParameterKey,
        value: ValueCell,
        sql_type: Option<SqlType>,
        encoder: Option<SharedConverter<C>>,
    ) -> Result<()> {
        let key = Self::key(key)?;
        if sql_type.is_none() && self.get(&key).is_some_and(Parameter::is_output) {
            let error = Error::msg(format!(
                "Cannot register the input parameter {key} without a type code, it is also an output parameter"
            ));
            log::error!("{:#}", error);
            return Err(error);
        }
        self.merge(
            key,
            Parameter {
                input: Some(value),
                output: None,
                sql_type,
                type_name: None,
                encoder,
                decoder: None,
            },
        );
        Ok(())
    }

    /// Register (or update) an output parameter.
    ///
    /// Returns a fresh cell that will receive the value read back after each
    /// execution. The cell is the one stored in the record, any output cell
    /// previously registered under the same key is replaced.
    pub fn register_output(
        &mut self,
        key: impl AsParameterKey,
        sql_type: SqlType,
        type_name: Option<String>,
        decoder: Option<SharedConverter<C>>,
    ) -> Result<ValueCell> {
        let key = Self::key(key)?;
        let cell = ValueCell::empty();
        self.merge(
            key,
            Parameter {
                input: None,
                output: Some(cell.clone()),
                sql_type: Some(sql_type),
                type_name,
                encoder: None,
                decoder,
            },
        );
        Ok(cell)
    }

    /// Register (or update) an in-out parameter using `value` both as input
    /// and as output cell: its content is bound, then replaced by the value
    /// read back.
    pub fn register_in_out(
        &mut self,
        key: impl AsParameterKey,
        value: ValueCell,
        sql_type: SqlType,
        type_name: Option<String>,
        encoder: Option<SharedConverter<C>>,
        decoder: Option<SharedConverter<C>>,
    ) -> Result<ValueCell> {
        let key = Self::key(key)?;
        self.merge(
            key,
            Parameter {
                input: Some(value.clone()),
                output: Some(value.clone()),
                sql_type: Some(sql_type),
                type_name,
                encoder,
                decoder,
            },
        );
        Ok(value)
    }

    pub fn get(&self, key: impl AsParameterKey) -> Option<&Parameter<C>> {
        match key.as_parameter_key().ok()? {
            ParameterKey::Index(index) => self.positional.get(&index),
            ParameterKey::Name(name) => self.nominal.get(&name),
        }
    }

    pub fn contains(&self, key: impl AsParameterKey) -> bool {
        self.get(key).is_some()
    }

    /// Remove a parameter, does nothing if it is not registered.
    pub fn remove(&mut self, key: impl AsParameterKey) {
        let Ok(key) = key.as_parameter_key() else {
            return;
        };
        let removed = match &key {
            ParameterKey::Index(index) => self.positional.remove(index),
            ParameterKey::Name(name) => self.nominal.shift_remove(name),
        };
        if removed.is_some() {
            log::trace!("Removed parameter {}", key);
        }
    }

    pub fn clear(&mut self) {
        self.positional.clear();
        self.nominal.clear();
    }

    /// Snapshot of the keys in iteration order.
    pub fn keys(&self) -> Vec<ParameterKey> {
        self.iter().map(|(k, _)| k).collect()
    }

    /// Parameters in iteration order.
    pub fn iter(&self) -> impl Iterator<Item = (ParameterKey, &Parameter<C>)> {
        self.positional
            .iter()
            .map(|(k, v)| (ParameterKey::Index(*k), v))
            .chain(
                self.nominal
                    .iter()
                    .map(|(k, v)| (ParameterKey::Name(k.clone()), v)),
            )
    }

    pub fn len(&self) -> usize {
        self.positional.len() + self.nominal.len()
    }

    /// Same as [`ParameterRegistry::len`].
    pub fn count(&self) -> usize {
        self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bind every parameter to the statement, before it gets executed.
    ///
    /// Inputs are bound with their current cell content, passed through the
    /// encoder first. Outputs are registered with their type code and
    /// structured type name. Stops at the first failure, parameters already
    /// bound stay bound.
    pub fn apply_all<S: CallableStatement>(
        &self,
        connection: &C,
        statement: &mut Statement<S>,
    ) -> Result<()> {
        for (key, parameter) in self.iter() {
            if let Some(input) = &parameter.input {
                let mut value = input.get();
                if let Some(encoder) = &parameter.encoder {
                    value = encoder.perform(connection, value)?;
                }
                log::trace!("Binding input {} = {}", key, value);
                statement.bind_input(&key, value, parameter.sql_type)?;
            }
            if parameter.output.is_some() {
                let Some(sql_type) = parameter.sql_type else {
                    let error = Error::msg(format!(
                        "Output parameter {key} does not have a type code"
                    ));
                    log::error!("{:#}", error);
                    return Err(error);
                };
                log::trace!("Registering output {} ({})", key, sql_type);
                statement.bind_output(&key, sql_type, parameter.type_name.as_deref())?;
            }
        }
        Ok(())
    }

    /// Read every output parameter back from the executed statement.
    ///
    /// Each value goes through the decoder and is then written into the
    /// output cell handed out at registration. Stops at the first failure,
    /// cells already written keep their new value.
    pub fn read_all<S: CallableStatement>(
        &self,
        connection: &C,
        statement: &mut Statement<S>,
    ) -> Result<()> {
        for (key, parameter) in self.iter() {
            let Some(output) = &parameter.output else {
                continue;
            };
            let mut value = statement.read_output(&key)?;
            if let Some(decoder) = &parameter.decoder {
                value = decoder.perform(connection, value)?;
            }
            log::trace!("Read output {} = {}", key, value);
            output.set(value);
        }
        Ok(())
    }

    /// Bind, execute and read back in one go.
    pub async fn call<S: CallableStatement>(
        &self,
        connection: &C,
        statement: &mut Statement<S>,
    ) -> Result<()> {
        self.apply_all(connection, statement)?;
        statement.execute().await?;
        self.read_all(connection, statement)
    }

    fn key(key: impl AsParameterKey) -> Result<ParameterKey> {
        key.as_parameter_key().inspect_err(|e| log::error!("{:#}", e))
    }

    fn merge(&mut self, key: ParameterKey, parameter: Parameter<C>) {
        let existing = match &key {
            ParameterKey::Index(index) => self.positional.get_mut(index),
            ParameterKey::Name(name) => self.nominal.get_mut(name),
        };
        match existing {
            Some(existing) => {
                log::trace!("Updating parameter {}", key);
                if parameter.input.is_some() {
                    existing.input = parameter.input;
                }
                if parameter.output.is_some() {
                    existing.output = parameter.output;
                }
                existing.sql_type = parameter.sql_type;
                existing.type_name = parameter.type_name;
                existing.encoder = parameter.encoder;
                existing.decoder = parameter.decoder;
            }
            None => {
                log::trace!("Registering parameter {}", key);
                match key {
                    ParameterKey::Index(index) => {
                        self.positional.insert(index, parameter);
                    }
                    ParameterKey::Name(name) => {
                        self.nominal.insert(name, parameter);
                    }
                }
            }
        }
    }
}

impl<C> Default for ParameterRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for ParameterRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            positional: self.positional.clone(),
            nominal: self.nominal.clone(),
        }
    }
}

impl<C> fmt::Debug for ParameterRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Renders `key = parameter` for every parameter, separated by `, `.
impl<C> Display for ParameterRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        separated_by(
            &mut out,
            self.iter(),
            |out, (key, parameter)| {
                let _ = write!(out, "{key} = {parameter}");
            },
            ", ",
        );
        f.write_str(&out)
    }
}
