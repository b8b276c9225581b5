//! Six-cell one-time code editor.
//!
//! Each cell holds at most one ASCII digit. The editor tracks which cell has
//! focus so a terminal or GUI front-end can mirror the usual "one box per digit"
//! interaction: typing advances, backspace on an empty cell steps back, paste
//! fills from the start.

use backbox_core::validation::OTP_LENGTH;

const LAST: usize = OTP_LENGTH - 1;

/// Keys with editor semantics beyond plain digit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpKey {
    Backspace,
    ArrowLeft,
    ArrowRight,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpEditor {
    cells: [Option<char>; OTP_LENGTH],
    focus: usize,
}

impl OtpEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Option<char>; OTP_LENGTH] {
        &self.cells
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Concatenation of the filled cells. Shorter than six when any cell is empty.
    pub fn code(&self) -> String {
        self.cells.iter().flatten().collect()
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Text typed into cell `index`. Returns `false` when the input was rejected.
    pub fn input(&mut self, index: usize, text: &str) -> bool {
        if index > LAST {
            return false;
        }

        if text.is_empty() {
            self.cells[index] = None;
            return true;
        }

        let Some(digit) = text.chars().rev().find(char::is_ascii_digit) else {
            return false;
        };

        self.cells[index] = Some(digit);
        self.focus = (index + 1).min(LAST);
        true
    }

    pub fn key(&mut self, index: usize, key: OtpKey) {
        if index > LAST {
            return;
        }

        match key {
            OtpKey::Backspace => {
                if self.cells[index].is_some() {
                    self.cells[index] = None;
                    self.focus = index;
                } else if index > 0 {
                    self.cells[index - 1] = None;
                    self.focus = index - 1;
                }
            }
            OtpKey::ArrowLeft => {
                self.focus = index.saturating_sub(1);
            }
            OtpKey::ArrowRight => {
                self.focus = (index + 1).min(LAST);
            }
        }
    }

    /// Replace the whole code with the digits found in `text`.
    pub fn paste(&mut self, text: &str) {
        let mut digits = text.chars().filter(char::is_ascii_digit);
        for cell in self.cells.iter_mut() {
            *cell = digits.next();
        }
        self.focus = self
            .cells
            .iter()
            .position(Option::is_none)
            .unwrap_or(LAST);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn set_focus(&mut self, index: usize) {
        self.focus = index.min(LAST);
    }
}
