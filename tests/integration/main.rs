//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  Everything runs on a simulated clock; no test
//! sleeps for a simulated step.

mod adapter_tests;
mod ledger_tests;
mod mock_ports;
mod service_tests;
