use std::fmt::Display;

pub type Result<T> = std::result::Result<T, String>;

/// Logs a fatal error and terminates with a failure status.
pub fn handle_error_and_exit(err: impl Display) -> ! {
    log::error!("posom failed: {}", err);
    std::process::exit(1);
}
