//! Parley: stored routine calls made simple.
//!
//! Register the inputs and outputs of a procedure or function once in a
//! [`ParameterRegistry`], bind them to a [`Statement`], execute it and find the
//! results in the [`ValueCell`]s handed out at registration.
pub use parley_core::*;
