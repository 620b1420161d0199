/// Utility functions for user interaction on the command line.
use std::io::{self, BufRead, IsTerminal, Write};

use crate::error::Result;

/// Prompt for a token on stdin, the terminal stand-in for the token modal.
pub fn read_token_from_stdin() -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        print!("GitHub personal access token: ");
        io::stdout().flush()?;
    }

    let mut input = String::new();
    stdin.lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Show only the ends of a token.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}
