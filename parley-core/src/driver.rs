use crate::{CallableStatement, Connection, Result};
use std::{borrow::Cow, future::Future};

pub trait Driver {
    type Connection: Connection<Driver = Self>;
    type Statement: CallableStatement;

    /// Scheme of the connection urls accepted by the driver.
    const NAME: &'static str;

    fn connect(
        &self,
        url: Cow<'static, str>,
    ) -> impl Future<Output = Result<Self::Connection>> + Send {
        Self::Connection::connect(url)
    }
}
