//! Test session setup
//!
//! The environment preparer runs once per session and hands out a
//! [`Session`] that every scenario borrows.

mod preparer;

pub use preparer::{Environment, Session, StepEvent, StepKind};
