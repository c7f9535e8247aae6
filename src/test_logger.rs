use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

/// Installs a logger for tests once per process. `RUST_LOG` overrides the
/// default level.
pub(crate) fn init_test_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Info)
            .filter_module("probe_table", LevelFilter::Info)
            .format_timestamp_millis()
            .is_test(true)
            .parse_default_env();

        // Another test harness may have installed a logger already.
        let _ = builder.try_init();
    });
}
