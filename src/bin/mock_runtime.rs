//! Mock interpreter binary for integration testing
//!
//! Stands in for clox without compiling anything: every line of the script
//! is echoed to stderr, except for two directives.
//!
//! - `#!stdout <text>` prints `<text>` on stdout instead
//! - `#!exit <code>` stops immediately with that exit code
//!
//! Exit codes follow clox: 64 for bad usage, 74 for an unreadable script.

use std::io::Write;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: clox [path]");
        std::process::exit(64);
    }

    let source = match std::fs::read_to_string(&args[1]) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Could not open file \"{}\": {}", args[1], e);
            std::process::exit(74);
        }
    };

    let stderr = std::io::stderr();
    let mut stderr = stderr.lock();

    for line in source.lines() {
        if let Some(text) = line.strip_prefix("#!stdout ") {
            println!("{}", text);
        } else if let Some(code) = line.strip_prefix("#!exit ") {
            let _ = stderr.flush();
            std::process::exit(code.trim().parse().unwrap_or(1));
        } else {
            let _ = writeln!(stderr, "{}", line);
        }
    }
}
