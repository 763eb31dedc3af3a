use crate::{Driver, Result};
use std::{borrow::Cow, future::Future};

/// A live database session able to prepare calls to stored routines.
///
/// Acquiring, pooling and closing connections is left to the driver, the
/// registry only hands a shared reference to encoders and decoders.
pub trait Connection: Send + Sized + 'static {
    type Driver: Driver<Connection = Self>;

    /// Open a connection to the given url, the scheme must be the driver name.
    fn connect(url: Cow<'static, str>) -> impl Future<Output = Result<Self>> + Send;

    fn driver(&self) -> &Self::Driver;

    /// Prepare a call string such as `{call pkg.proc(?,?)}`.
    fn prepare_call(
        &mut self,
        sql: String,
    ) -> impl Future<Output = Result<<Self::Driver as Driver>::Statement>> + Send;
}
