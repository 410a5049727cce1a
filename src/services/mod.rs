//! Service layer for the learning platform.
//!
//! Background work lives here, separated from the view controller and the
//! page host.

pub mod processing;

pub use processing::{ProcessingTasks, TaskKind, TaskToken};
