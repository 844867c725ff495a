//! Operator identity: who is annotating this session.
//!
//! Every record carries the operator's name. It is resolved through a chain:
//!
//! 1. `--operator <name>`: explicit per-run override
//! 2. `LABELLER_OPERATOR` env var: set once per shell or machine
//! 3. `operator` in the config file
//! 4. interactive prompt on the console

use std::env;
use std::io::{self, BufRead, Write};

use crate::console::Console;

pub const OPERATOR_ENV: &str = "LABELLER_OPERATOR";

const NAME_PROMPT: &str = "Please insert your name: ";

/// Resolve the operator without asking anyone.
///
/// Returns `None` when the console has to be asked.
pub fn resolve_operator(explicit: Option<&str>, configured: Option<&str>) -> Option<String> {
    // 1. Explicit --operator flag.
    if let Some(name) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return Some(name.to_string());
    }

    // 2. LABELLER_OPERATOR environment variable.
    if let Ok(name) = env::var(OPERATOR_ENV)
        && !name.trim().is_empty()
    {
        return Some(name.trim().to_string());
    }

    // 3. Config file.
    configured
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Resolve the operator, falling back to asking on the console.
pub fn resolve_or_ask<R: BufRead, W: Write>(
    explicit: Option<&str>,
    configured: Option<&str>,
    console: &mut Console<R, W>,
) -> io::Result<String> {
    match resolve_operator(explicit, configured) {
        Some(name) => Ok(name),
        None => console.ask_text(NAME_PROMPT),
    }
}
