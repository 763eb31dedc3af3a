mod as_value;
mod callable;
mod cell;
mod connection;
mod converter;
mod driver;
mod key;
mod parameter;
mod registry;
mod sql_type;
mod statement;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use callable::*;
pub use cell::*;
pub use connection::*;
pub use converter::*;
pub use driver::*;
pub use key::*;
pub use parameter::*;
pub use registry::*;
pub use sql_type::*;
pub use statement::*;
pub use util::*;
pub use value::*;
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
