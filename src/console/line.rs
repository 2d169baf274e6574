//! Line assembly for console input.
//!
//! Consumes bytes pulled from the receive ring one at a time, echoes them
//! back to the operator, and reports when a full line is ready for
//! dispatch. The buffer is fixed-size; input past `MAX_LINE_LENGTH - 1`
//! is still echoed but discarded until the next line feed, because
//! accepting it would overflow the storage the token slices alias.

use core::fmt::Write;

/// Fixed line storage size; one byte is reserved so a full line always
/// leaves room for the bound check below.
pub const MAX_LINE_LENGTH: usize = 80;

/// Outcome of feeding one byte to the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    /// More input is needed.
    Pending,
    /// A line feed arrived; the frozen line is readable via `as_str`.
    Complete,
}

/// Incremental line buffer with echo.
pub struct LineAssembler {
    buf: [u8; MAX_LINE_LENGTH],
    len: usize,
}

impl LineAssembler {
    pub const fn new() -> Self {
        Self {
            buf: [0u8; MAX_LINE_LENGTH],
            len: 0,
        }
    }

    /// Process one received byte.
    ///
    /// Carriage returns are ignored entirely. A line feed echoes a
    /// newline and freezes the line. Any other byte is echoed, and
    /// appended only while the buffer has room.
    pub fn feed(&mut self, byte: u8, echo: &mut dyn Write) -> LineStatus {
        match byte {
            b'\r' => LineStatus::Pending,
            b'\n' => {
                let _ = writeln!(echo);
                LineStatus::Complete
            }
            _ => {
                let _ = echo.write_char(byte as char);
                if self.len < MAX_LINE_LENGTH - 1 {
                    self.buf[self.len] = byte;
                    self.len += 1;
                }
                LineStatus::Pending
            }
        }
    }

    /// The frozen line content. Valid until [`clear`](Self::clear).
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    /// Reset for the next line; the storage is reused in place.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}
