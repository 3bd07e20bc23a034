//! Progress widgets library
//!
//! An arc-shaped and a line-shaped progress bar drawn with a shared
//! three-stop gradient, plus the terminal host used to demo them.

pub mod app;
pub mod error;
pub mod event;
pub mod graphics;
pub mod monitor;
pub mod state;
pub mod style;
pub mod ui;
