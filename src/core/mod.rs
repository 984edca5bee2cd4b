//! Core client modules
//!
//! This module contains configuration, constants, errors, logging, the
//! transport abstraction and the request primitive.

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod transport;
