//! Driver agnostic test suite.
//!
//! The connection handed to [`execute_tests`] must expose the following
//! routines:
//!
//! | Routine | Parameters | Behavior |
//! |---|---|---|
//! | `test.add` | `IN a INTEGER, IN b INTEGER, OUT sum INTEGER` | `sum = a + b` |
//! | `test.greet` | `IN name VARCHAR, OUT greeting VARCHAR` | `greeting = 'Hello, ' \|\| name \|\| '!'` |
//! | `test.noop` | | does nothing |
//! | `test.twice` | `INOUT value INTEGER` | `value = value * 2` |
//! | `test.length` | `IN text VARCHAR` returns `INTEGER` | character length of `text` |
//! | `test.make_point` | `IN x INTEGER, IN y INTEGER, OUT point STRUCT POINT` | `point = POINT(x, y)` |
mod functions;
mod in_out;
mod procedures;
#[cfg(not(feature = "disable-structs"))]
mod structs;

use crate::{functions::functions, in_out::in_out, procedures::procedures};
use log::LevelFilter;
use parley::Connection;
use std::env;
#[cfg(not(feature = "disable-structs"))]
use structs::structs;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

pub async fn execute_tests<C: Connection>(mut connection: C) {
    procedures(&mut connection).await;
    functions(&mut connection).await;
    in_out(&mut connection).await;
    #[cfg(not(feature = "disable-structs"))]
    structs(&mut connection).await;
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
