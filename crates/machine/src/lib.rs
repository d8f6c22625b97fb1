//! Vending session (application layer).
//!
//! One [`session::VendingSession`] owns one inventory and everything the pure
//! domain crate must not touch: the random snack draw, business timestamps,
//! the handle/apply pipeline, and event logging. The [`notice`] module turns
//! outcomes and errors into the messages a front panel displays.

pub mod notice;
pub mod session;

pub use notice::{Notice, Severity};
pub use session::VendingSession;
