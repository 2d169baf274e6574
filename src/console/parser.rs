//! Command line tokenizer.
//!
//! Splits a frozen line on ASCII whitespace without allocating: every
//! token is a slice into the line's storage and is invalid once the
//! assembler is cleared for the next line.

use super::line::MAX_LINE_LENGTH;

/// Upper bound on tokens per line. A line of `MAX_LINE_LENGTH` bytes
/// cannot hold more single-character space-separated tokens than this.
pub const MAX_TOKENS: usize = MAX_LINE_LENGTH / 2;

/// Ordered token views into one frozen line; element 0 is the command
/// name candidate.
pub type TokenList<'a> = heapless::Vec<&'a str, MAX_TOKENS>;

/// Tokenize a completed line.
pub fn tokenize(line: &str) -> TokenList<'_> {
    let mut tokens = TokenList::new();
    for tok in line.split_ascii_whitespace() {
        if tokens.push(tok).is_err() {
            // Unreachable for assembler-bounded lines; stop splitting
            // rather than truncate a token if fed a longer slice.
            break;
        }
    }
    tokens
}
