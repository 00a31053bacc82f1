mod claims;
mod minter;

pub use claims::{AdminClaims, AdminToken};
pub use minter::TokenMinter;
