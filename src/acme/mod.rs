//! Storage contract for the CA's ACME endpoints.
//!
//! Only the boundary lives here: entity types, the [`AcmeDb`] trait and, for
//! tests, a configurable [`MockAcmeDb`].

mod db;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod types;

pub use db::{AcmeDb, AcmeDbError};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockAcmeDb, MockReturn};
pub use types::{
    Account, Authorization, Certificate, Challenge, Identifier, Nonce, Order, Problem, Status,
};
