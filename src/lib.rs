//! Adaptive learning platform page mock-up.
//!
//! A [`ViewController`] holds the page state, applies user actions and
//! re-renders the page markup from that state. Processing is simulated with
//! fixed-delay background tasks; every statistic on the page is canned.

pub mod config;
pub mod controller;
pub mod error;
pub mod icons;
pub mod models;
pub mod server;
pub mod services;

pub use controller::{ControllerConfig, Dispatch, ViewController};
pub use error::AppError;
pub use models::{Action, AppState, ProcessingStatus, Tab};
