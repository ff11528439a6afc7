//! Access control: who administers the registry and who may create proposals.
//!
//! Leaf module. It knows nothing about proposals or votes; the ledger only
//! reads from it.

pub mod control;
pub mod role;

pub use control::{AccessControl, RoleChange};
pub use role::Role;
