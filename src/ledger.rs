// Thin re-export module: implementation is in `ledger/core.rs` to allow
// progressive decomposition of ledger responsibilities (authorization,
// class registry, balance accounting, gate management).

pub mod core;
// `self::` keeps the path from colliding with the built-in `core` crate.
pub use self::core::*;
