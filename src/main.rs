//! tabstore CLI entry point
//!
//! This is a minimal entrypoint that:
//! 1. Delegates parsing, loading and the command itself to `cli::run`
//! 2. Prints errors to stderr
//! 3. Exits with non-zero on failure
//!
//! The JSON error response has already been written to stdout by then.

use tabstore::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}: {}", e.code(), e);
        std::process::exit(1);
    }
}
