use crate::{MemoryDriver, MemoryStatement, Routine, parse_call};
use parley_core::{Connection, Context, Driver, Error, Result, truncate_long};
use std::{borrow::Cow, collections::HashMap, sync::Arc};
use url::Url;

/// Session of the in-memory driver, it owns the routines that can be called.
///
/// Options are passed as query parameters of the connection url:
/// - `strict` (default `true`): type codes and structured type names given
///   when binding must be the ones declared by the routine.
#[derive(Debug)]
pub struct MemoryConnection {
    routines: HashMap<String, Arc<Routine>>,
    strict: bool,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self {
            routines: HashMap::new(),
            strict: true,
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn set_strict(&mut self, strict: bool) -> &mut Self {
        self.strict = strict;
        self
    }

    /// Create or replace a routine. Routine names are case insensitive.
    pub fn define(&mut self, routine: Routine) -> &mut Self {
        let name = routine.name.to_lowercase();
        if self.routines.insert(name, Arc::new(routine)).is_some() {
            log::debug!("Replaced an existing routine");
        }
        self
    }

    /// Drop a routine, returns false if it did not exist.
    pub fn drop_routine(&mut self, name: &str) -> bool {
        self.routines.remove(&name.to_lowercase()).is_some()
    }

    pub fn routine(&self, name: &str) -> Option<&Routine> {
        self.routines.get(&name.to_lowercase()).map(Arc::as_ref)
    }
}

impl Default for MemoryConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection for MemoryConnection {
    type Driver = MemoryDriver;

    async fn connect(url: Cow<'static, str>) -> Result<MemoryConnection> {
        let context = || format!("While trying to connect to `{}`", truncate_long!(url));
        let prefix = format!("{}://", <Self::Driver as Driver>::NAME);
        if !url.starts_with(&prefix) {
            let error = Error::msg(format!(
                "Memory connection url must start with `{}`",
                &prefix
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let parsed = Url::parse(&url).with_context(context)?;
        let mut connection = MemoryConnection::new();
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "strict" => {
                    connection.strict = value
                        .parse()
                        .with_context(|| format!("Invalid value `{value}` for option `strict`"))
                        .with_context(context)?;
                }
                _ => {
                    let error = Error::msg(format!("Unknown connection option `{key}`"))
                        .context(context());
                    log::error!("{:#}", error);
                    return Err(error);
                }
            }
        }
        Ok(connection)
    }

    fn driver(&self) -> &Self::Driver {
        &MemoryDriver {}
    }

    async fn prepare_call(&mut self, sql: String) -> Result<MemoryStatement> {
        let call = parse_call(&sql)?;
        let Some(routine) = self.routines.get(&call.name.to_lowercase()) else {
            let error = Error::msg(format!("Routine `{}` does not exist", call.name));
            log::error!("{:#}", error);
            return Err(error);
        };
        if routine.kind != call.kind {
            let error = Error::msg(format!(
                "Routine `{}` is a {:?}, it cannot be called as a {:?}",
                routine.name, routine.kind, call.kind
            ));
            log::error!("{:#}", error);
            return Err(error);
        }
        if routine.placeholders() != call.placeholders {
            let error = Error::msg(format!(
                "Routine `{}` expects {} placeholders, `{}` has {}",
                routine.name,
                routine.placeholders(),
                truncate_long!(sql),
                call.placeholders
            ));
            log::error!("{:#}", error);
            return Err(error);
        }
        Ok(MemoryStatement::new(sql, routine.clone(), self.strict))
    }
}
