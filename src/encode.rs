//! A module for all encoding needs.
use crate::alphabet::FIRST_FREE;
use crate::dict::{Cursor, Dictionary};
use crate::width::Width;
use crate::{Code, Compressed, Configuration, LzwError};

/// The configuration of an encoding.
///
/// Holds no state between calls: every [`encode`] starts from a fresh dictionary, so the same
/// encoder always produces the same codes for the same input.
///
/// [`encode`]: #method.encode
#[derive(Clone, Debug)]
pub struct Encoder {
    config: Configuration,
}

struct EncodeState {
    /// The current encoding symbol tree.
    tree: Dictionary,
    /// The node corresponding to the currently read characters.
    current: Cursor,
    /// The code the next new sequence will be bound to.
    next_code: u32,
    /// The current code size.
    width: Width,
    /// The codes emitted so far.
    codes: Vec<Code>,
}

impl Encoder {
    /// Create an encoder emitting codes of a fixed `max_bits` width.
    pub fn new(max_bits: u8) -> Result<Self, LzwError> {
        Configuration::new(max_bits).build_encoder()
    }

    /// Create an encoder whose codes start at 9 bits and grow up to `max_bits`.
    pub fn with_dynamic_size(max_bits: u8) -> Result<Self, LzwError> {
        Configuration::with_dynamic_size(max_bits).build_encoder()
    }

    pub(crate) fn from_configuration(config: Configuration) -> Self {
        Encoder { config }
    }

    pub fn configuration(&self) -> Configuration {
        self.config
    }

    /// Encode all of `data`.
    ///
    /// Empty input yields no codes. The returned code size is the one in effect after the last
    /// code, which a dynamic frame needs to record.
    pub fn encode(&self, data: &[u8]) -> Result<Compressed, LzwError> {
        let mut state = EncodeState::new(self.config);
        for &byte in data {
            state.advance(byte)?;
        }
        let compressed = state.finish()?;

        tracing::debug!(
            input = data.len(),
            codes = compressed.codes.len(),
            bits = compressed.bits,
            "encoded"
        );
        Ok(compressed)
    }
}

impl EncodeState {
    fn new(config: Configuration) -> Self {
        let tree = Dictionary::with_alphabet();
        let current = tree.root();
        EncodeState {
            tree,
            current,
            next_code: u32::from(FIRST_FREE),
            width: Width::new(config),
            codes: Vec::new(),
        }
    }

    fn advance(&mut self, byte: u8) -> Result<(), LzwError> {
        match self.tree.step(self.current, byte) {
            Some(next) if self.tree.code(next).is_some() => {
                self.current = next;
                Ok(())
            }
            _ => {
                self.buffer_code()?;

                if self.width.has_room(self.next_code) {
                    self.tree.extend(self.current, byte, self.next_code as Code);
                    self.next_code += 1;
                }
                self.width.bump_code_size(self.next_code);

                // Every single symbol is in the tree from the start.
                self.current = self
                    .tree
                    .step(self.tree.root(), byte)
                    .ok_or(LzwError::InvariantViolation)?;
                Ok(())
            }
        }
    }

    fn finish(mut self) -> Result<Compressed, LzwError> {
        if self.current != self.tree.root() {
            self.buffer_code()?;
        }

        Ok(Compressed {
            codes: self.codes,
            bits: self.width.code_size(),
        })
    }

    /// Emit the code of the longest match.
    fn buffer_code(&mut self) -> Result<(), LzwError> {
        let code = self
            .tree
            .code(self.current)
            .ok_or(LzwError::InvariantViolation)?;
        debug_assert!(u32::from(code) <= self.width.max_code());
        self.codes.push(code);
        Ok(())
    }
}
