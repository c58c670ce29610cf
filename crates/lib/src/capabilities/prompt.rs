//! Operator prompts.

use std::io::{self, BufRead, Write};

use super::CapabilityError;

/// Asks the operator for input.
pub trait Prompt {
  /// Show `query` and return the answer without its line terminator.
  fn question(&self, query: &str) -> Result<String, CapabilityError>;

  /// Ask a yes/no question; only `y` and `yes` (any case) count as yes.
  fn confirm(&self, query: &str) -> Result<bool, CapabilityError> {
    let answer = self.question(&format!("{} [y/N] ", query))?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
  }
}

/// Prompts on stderr and reads answers from stdin.
///
/// stdin does not have to be a terminal, so answers can be piped in.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
  fn question(&self, query: &str) -> Result<String, CapabilityError> {
    let mut stderr = io::stderr();
    write!(stderr, "{}", query).map_err(CapabilityError::Prompt)?;
    stderr.flush().map_err(CapabilityError::Prompt)?;

    read_answer(&mut io::stdin().lock())
  }
}

fn read_answer(input: &mut impl BufRead) -> Result<String, CapabilityError> {
  let mut line = String::new();
  if input.read_line(&mut line).map_err(CapabilityError::Prompt)? == 0 {
    return Err(CapabilityError::InputClosed);
  }
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}
