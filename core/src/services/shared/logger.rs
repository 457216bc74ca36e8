use tracing::Level;

use super::env::get_env_variable;

pub fn parse_verbosity(verbosity: &str) -> Option<Level> {
    match verbosity.to_uppercase().as_str() {
        "TRACE" => Some(Level::TRACE),
        "DEBUG" => Some(Level::DEBUG),
        "INFO" => Some(Level::INFO),
        "WARN" => Some(Level::WARN),
        "ERROR" => Some(Level::ERROR),
        _ => None,
    }
}

pub fn init_logger() {
    let verbosity = get_env_variable("VERBOSITY").unwrap_or_else(|| "INFO".to_string());
    let level = match parse_verbosity(&verbosity) {
        Some(level) => level,
        None => {
            eprintln!(
                "Invalid verbosity level '{}', defaulting to INFO",
                verbosity
            );
            Level::INFO
        }
    };

    // stdout is reserved for command output
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}
