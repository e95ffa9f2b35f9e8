//! Inspect and modify memory-mapped peripheral registers of a debug target using a
//! runtime-loaded hardware description.
//!
//! The core lives under [`soc`]: the description tree, name resolver, register codec,
//! formatter and session. [`loader`] turns description files into trees and
//! [`command::Inspector`] ties everything to a [`soc::target::Target`].

pub mod command;
pub mod config;
pub mod loader;
pub mod soc;

pub use command::{FieldWrite, Inspector, PendingWrite};
pub use config::Settings;
pub use soc::error::{RegError, RegResult};
