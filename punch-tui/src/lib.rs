//! Kiosk terminal client for the NW time-clock service.
//!
//! [`app::App`] holds the interaction state machine, [`ui`] turns it into a
//! frame and [`runtime`] ties both to the terminal and the remote service.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod runtime;
pub mod terminal;
pub mod time_utils;
pub mod ui;
