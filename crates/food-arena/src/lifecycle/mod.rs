//! # System Lifecycle
//!
//! Starts the collection actors, hands out their clients, and coordinates
//! graceful shutdown: dropping every client closes the request channels, the
//! actors drain and exit, and `shutdown` awaits their tasks.

pub mod arena;
pub mod tracing;

pub use self::arena::*;
pub use self::tracing::*;
