//! One dialog API over kdialog and zenity.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use dialogbridge::backend::DialogOptions;
//! use dialogbridge::dialog::Dialogs;
//! use dialogbridge::process::SystemRunner;
//! use dialogbridge::shared::{config::Config, env_var::EnvVars};
//!
//! let dialogs = Dialogs::detect(Arc::new(SystemRunner), &EnvVars::load(), Config::default());
//! if let Some(name) = dialogs.entry("Your name?", "", &DialogOptions::new().title("Hello"))? {
//!     dialogs.info(&format!("Hi {name}"), &DialogOptions::new())?;
//! }
//! # Ok::<(), dialogbridge::error::DialogError>(())
//! ```

pub mod backend;
pub mod dialog;
pub mod error;
pub mod infra;
pub mod outcome;
pub mod process;
pub mod progress;
pub mod shared;

#[cfg(test)]
mod testing;
