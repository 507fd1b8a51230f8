//! Operator gate: blocks until the operator explicitly says to continue

use crate::operator::Operator;
use std::io;
use thiserror::Error;

/// Tokens accepted as "proceed"
pub const CONTINUE_TOKENS: [&str; 2] = ["c", "-c"];

/// The operator typed something other than a continue token
#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a valid answer, type c (or -c) to continue")]
pub struct InvalidInput(pub String);

/// Checks a single answer, ignoring only the line terminator
///
/// Matching is case-sensitive and no other whitespace is trimmed.
pub fn check(answer: &str) -> Result<(), InvalidInput> {
    let answer = answer.trim_end_matches(|c| c == '\n' || c == '\r');
    match CONTINUE_TOKENS.contains(&answer) {
        true => Ok(()),
        false => Err(InvalidInput(answer.to_string())),
    }
}

/// Asks `prompt` until the operator answers with a continue token
///
/// There is no attempt limit or timeout; invalid answers are reported and the prompt repeats.
///
/// # Errors
/// * If the console can no longer be read
pub fn confirm(operator: &mut dyn Operator, prompt: &str) -> io::Result<()> {
    loop {
        let answer = operator.read_line(prompt)?;
        match check(&answer) {
            Ok(()) => return Ok(()),
            Err(invalid) => {
                tracing::debug!(answer = %invalid.0, "rejected gate answer");
                operator.warn(&invalid.to_string());
            }
        }
    }
}
