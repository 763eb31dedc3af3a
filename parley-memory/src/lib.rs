mod connection;
mod driver;
mod parse;
mod routine;
mod statement;

pub use connection::*;
pub use driver::*;
pub use parse::*;
pub use routine::*;
pub use statement::*;
