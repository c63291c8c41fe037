//! Session auto-expiry after a period without user input.

mod idle;

pub use idle::{IdleMonitor, SignOut};
