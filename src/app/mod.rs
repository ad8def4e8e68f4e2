//! Application core: simulation orchestration, zero I/O.
//!
//! The [`service::AppService`] drives one step at a time: glucose update,
//! controller decision, telemetry.  Everything outside the process (clock,
//! entropy, settings and config files, telemetry sinks) is reached through
//! the **port traits** in [`ports`], so the core runs unchanged under a
//! simulated clock and scripted randomness in tests.

pub mod events;
pub mod ports;
pub mod service;
