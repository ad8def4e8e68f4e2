//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements          | Connects to                 |
//! |-----------------|---------------------|-----------------------------|
//! | `config_file`   | ConfigPort          | JSON file on disk           |
//! | `dice`          | RandomSource        | `rand` / ChaCha8 generator  |
//! | `json_sink`     | TelemetryPublisher  | Any `io::Write` (JSON lines)|
//! | `log_sink`      | TelemetryPublisher  | `log` facade                |
//! | `settings_file` | SettingsPort        | Pump settings text file     |
//! | `time`          | ClockPort           | Host clock / simulated clock|

pub mod config_file;
pub mod dice;
pub mod json_sink;
pub mod log_sink;
pub mod settings_file;
pub mod time;
