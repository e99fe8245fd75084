#![forbid(unsafe_code)]

//! Guidepost demo: the onboarding tour running over a mock thesis dashboard
//! in the terminal.

pub mod app;
pub mod canvas;
pub mod cli;
pub mod dashboard;
pub mod logging;
pub mod overlay;
pub mod session;
