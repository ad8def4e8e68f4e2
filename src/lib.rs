//! Glucose/insulin closed-loop simulator library.
//!
//! Exposes the simulation core (ledger, pump policy, dynamics, controller)
//! and its adapters for the binary, integration tests and fuzzing.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod clock;
pub mod config;
pub mod control;
pub mod dynamics;
pub mod error;
pub mod ledger;
pub mod pump;

pub use error::{Error, Result};
