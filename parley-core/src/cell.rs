use crate::{AsValue, Result, Value};
use std::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
    sync::{Arc, PoisonError, RwLock},
};

/// Single slot container shared between the registry and the caller.
///
/// Cloning is cheap and yields a handle to the same slot: a value written
/// through one clone is observed by all of them. Equality and hashing follow
/// the slot identity, not its contents.
#[derive(Clone, Default)]
pub struct ValueCell {
    slot: Arc<RwLock<Value>>,
}

impl ValueCell {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(value.into())),
        }
    }

    /// A cell holding `Value::Null`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Value {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, value: impl Into<Value>) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = value.into();
    }

    /// Current value converted into a native type.
    pub fn get_as<T: AsValue>(&self) -> Result<T> {
        T::try_from_value(self.get())
    }

    /// True if both handles point to the same slot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl PartialEq for ValueCell {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ValueCell {}

impl Hash for ValueCell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.slot).hash(state);
    }
}

impl fmt::Debug for ValueCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueCell").field(&self.get()).finish()
    }
}

impl Display for ValueCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}
