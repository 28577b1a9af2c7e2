//! UI utilities for terminal output
//!
//! Progress spinners shown while waiting on the platform.

mod spinner;

pub use spinner::{create_spinner, finish_spinner};
