use crate::{MemoryConnection, MemoryStatement};
use parley_core::Driver;

#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryDriver;

impl MemoryDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for MemoryDriver {
    type Connection = MemoryConnection;
    type Statement = MemoryStatement;

    const NAME: &'static str = "memory";
}
