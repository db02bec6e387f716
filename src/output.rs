use std::io::{self, Write};

/// Prints a user-facing line on stdout and appends it to `capture`.
///
/// A broken stdout only warns; a failing capture is returned to the caller.
pub fn println(message: &str, capture: &mut Option<&mut dyn Write>) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{message}").and_then(|()| stdout.flush()) {
        tracing::warn!(error = %e, "stdout unavailable");
    }

    match capture {
        Some(sink) => writeln!(sink, "{message}"),
        None => Ok(()),
    }
}
