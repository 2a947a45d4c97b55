use serdeconv;
use slog::Logger;
use sloggers::{Config, LoggerConfig};

/// Builds the crate's internal diagnostic logger.
///
/// This is separate from the host-facing `Listener::debug_return` channel;
/// it exists purely for tracing connection lifecycle and malformed frames
/// during development, same as `flux::logging::init` does for the server
/// side of this stack.
pub fn root_logger() -> Logger {
    let config: LoggerConfig = serdeconv::from_toml_str(
        r#"
type = "terminal"
level = "info"
destination = "stderr"
"#,
    )
    .expect("embedded logging config is always valid toml");

    config.build_logger().expect("terminal logger always builds")
}
