//! Fuzz target: pump settings parser
//!
//! Feeds arbitrary text into `PolicyTable::load` and verifies:
//! - No panics under arbitrary input
//! - Any accepted table renders to text that loads back to the same table
//! - Lookups on an accepted table never panic
//!
//! cargo fuzz run fuzz_pump_settings

#![no_main]

use chrono::NaiveTime;
use glucosim::pump::PolicyTable;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(table) = PolicyTable::load(text) else {
        return;
    };

    let rendered = table.render();
    let reloaded = PolicyTable::load(&rendered).expect("rendered settings must parse");
    assert_eq!(reloaded, table);

    for hour in [0, 6, 12, 18, 23] {
        let t = NaiveTime::from_hms_opt(hour, 30, 0).expect("valid time");
        let _ = table.insulin_to_carb(t);
        let _ = table.basal(t);
        let _ = table.correction(t);
    }
});
