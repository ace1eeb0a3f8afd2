/// User interface and status output utilities
///
/// This module handles:
/// - Thread-safe console output
/// - Colored terminal text
/// - Status message formatting

use lazy_static::lazy_static;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Execute a function with exclusive access to console output
fn status_lock<F>(f: F)
where
    F: FnOnce(),
{
    lazy_static! {
        static ref LOCK: Mutex<()> = Mutex::new(());
    }
    let _guard = LOCK.lock();
    f();
}

/// Print the "diabreport: " prefix for status messages
fn print_status_header() {
    print!("diabreport: ");
}

/// Print colored text to terminal, with fallback to plain text
fn print_color(s: &str, fg: term::color::Color) {
    if !really_print_color(s, fg) {
        print!("{}", s);
    }

    fn really_print_color(s: &str, fg: term::color::Color) -> bool {
        if let Some(ref mut t) = term::stdout() {
            if t.fg(fg).is_err() {
                return false;
            }
            let _ = t.attr(term::Attr::Bold);
            if write!(t, "{}", s).is_err() {
                return false;
            }
            let _ = t.reset();
            return true;
        }

        false
    }
}

/// Print a status message with "diabreport: " prefix (thread-safe)
pub fn status(s: &str) {
    status_lock(|| {
        print_status_header();
        println!("{}", s);
    });
}

/// Announce a written report file
pub fn artifact_written(format: &str, path: &Path) {
    status_lock(|| {
        print_status_header();
        print_color(format, term::color::BRIGHT_GREEN);
        println!(" {}", path.display());
    });
}

/// Print an error message with colored "erro" prefix
pub fn print_error(msg: &str) {
    status_lock(|| {
        println!();
        print_color("erro", term::color::BRIGHT_RED);
        println!(": {}", msg);
        println!();
    });
}
