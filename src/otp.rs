/// One-time-code entry model.
///
/// A reset code is entered one digit per slot. A slot accepts exactly one
/// numeric character; anything else is rejected on input. The code is
/// complete only while every slot holds a digit, so clearing any slot
/// (backspace) makes it incomplete again.

use std::fmt;

/// Default number of slots in a reset code.
pub const RESET_CODE_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpCode {
    slots: Vec<Option<char>>,
}

impl OtpCode {
    /// Create an empty code with the given number of slots.
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Put a digit into a slot. Non-digit input is filtered out and leaves
    /// the slot unchanged; returns whether the digit was accepted.
    pub fn set(&mut self, index: usize, ch: char) -> bool {
        if index >= self.slots.len() || !ch.is_ascii_digit() {
            return false;
        }
        self.slots[index] = Some(ch);
        true
    }

    /// Clear a slot (backspace).
    pub fn clear(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = None;
        }
    }

    /// Fill slots from pasted text, starting at `index`. Digits are taken
    /// in order until the slots or the characters run out; everything else
    /// in the paste is ignored. Returns the index of the slot that should
    /// receive focus next.
    pub fn paste(&mut self, index: usize, text: &str) -> usize {
        let mut cursor = index;
        for ch in text.trim().chars() {
            if cursor >= self.slots.len() {
                break;
            }
            if self.set(cursor, ch) {
                cursor += 1;
            }
        }
        cursor.min(self.slots.len().saturating_sub(1))
    }

    /// True only when every slot holds exactly one digit.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// The full code, available only once complete.
    pub fn value(&self) -> Option<String> {
        if self.is_complete() {
            Some(self.slots.iter().map(|s| s.unwrap_or(' ')).collect())
        } else {
            None
        }
    }

    /// Per-slot form values for step validation, keyed `otp0..otpN`.
    pub fn form_values(&self) -> crate::validate::FormValues {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                let value = slot.map(String::from).unwrap_or_default();
                (format!("otp{i}"), value)
            })
            .collect()
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in &self.slots {
            write!(f, "{}", slot.unwrap_or('_'))?;
        }
        Ok(())
    }
}
