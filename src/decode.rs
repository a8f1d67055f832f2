//! A module for all decoding needs.
use core::ops::Range;

use crate::alphabet::{self, FIRST_FREE};
use crate::width::Width;
use crate::{Code, Configuration, LzwError};

/// The configuration of a decoding.
///
/// Like the [`Encoder`], this holds no state between calls.
///
/// [`Encoder`]: ../encode/struct.Encoder.html
#[derive(Clone, Debug)]
pub struct Decoder {
    config: Configuration,
}

struct DecodeState {
    /// The table of decoded codes.
    table: Table,
    /// The run of output written for the previous code.
    last: Option<Link>,
    /// The code the next new entry will be bound to.
    next_code: u32,
    /// The current code size.
    width: Width,
    /// The decoded data, every table entry points into it.
    buffer: Vec<u8>,
}

/// A run of already decoded bytes.
#[derive(Clone, Copy, Debug)]
struct Link {
    start: usize,
    len: usize,
}

/// What a code resolves to.
#[derive(Clone, Copy, Debug)]
enum Entry {
    Symbol(u8),
    Run(Link),
}

/// Maps every code above the symbols to the output run it stands for.
///
/// A new entry is always the previous run extended by the first byte of the one after it, and
/// the two runs are adjacent in the output. So no entry needs bytes of its own.
struct Table {
    links: Vec<Link>,
}

impl Decoder {
    /// Create a decoder for codes of a fixed `max_bits` width.
    pub fn new(max_bits: u8) -> Result<Self, LzwError> {
        Configuration::new(max_bits).build_decoder()
    }

    /// Create a decoder for codes that start at 9 bits and grow up to `max_bits`.
    pub fn with_dynamic_size(max_bits: u8) -> Result<Self, LzwError> {
        Configuration::with_dynamic_size(max_bits).build_decoder()
    }

    pub(crate) fn from_configuration(config: Configuration) -> Self {
        Decoder { config }
    }

    pub fn configuration(&self) -> Configuration {
        self.config
    }

    /// Decode a complete code sequence.
    ///
    /// An empty sequence decodes to empty data.
    pub fn decode(&self, codes: &[Code]) -> Result<Vec<u8>, LzwError> {
        let mut state = DecodeState::new(self.config);
        for (position, &code) in codes.iter().enumerate() {
            if let Err(err) = state.advance(position, code) {
                tracing::debug!(%err, decoded = state.buffer.len(), "decoding failed");
                return Err(err);
            }
        }

        tracing::debug!(
            codes = codes.len(),
            output = state.buffer.len(),
            bits = state.width.code_size(),
            "decoded"
        );
        Ok(state.buffer)
    }
}

impl DecodeState {
    fn new(config: Configuration) -> Self {
        DecodeState {
            table: Table::new(),
            last: None,
            next_code: u32::from(FIRST_FREE),
            width: Width::new(config),
            buffer: Vec::new(),
        }
    }

    fn advance(&mut self, position: usize, code: Code) -> Result<(), LzwError> {
        let start = self.buffer.len();

        match self.last {
            // The first code has nothing to build on, it must be a symbol.
            None => match self.table.at(code) {
                Some(entry) => self.reconstruct(entry),
                None => return Err(self.invalid(code, position)),
            },
            Some(last) => {
                match self.table.at(code) {
                    Some(entry) => self.reconstruct(entry),
                    // The encoder emitted the entry it was just about to register: the previous
                    // run followed by its own first byte.
                    None if u32::from(code) == self.next_code
                        && self.width.has_room(self.next_code) =>
                    {
                        self.reconstruct(Entry::Run(last));
                        let first = self.buffer[last.start];
                        self.buffer.push(first);
                    }
                    None => return Err(self.invalid(code, position)),
                }

                if self.width.has_room(self.next_code) {
                    self.table.derive(&last);
                    self.next_code += 1;
                }
                self.width.bump_code_size(self.next_code);
            }
        }

        self.last = Some(Link {
            start,
            len: self.buffer.len() - start,
        });
        Ok(())
    }

    fn reconstruct(&mut self, entry: Entry) {
        match entry {
            Entry::Symbol(byte) => self.buffer.push(byte),
            Entry::Run(link) => self.buffer.extend_from_within(link.range()),
        }
    }

    fn invalid(&self, code: Code, position: usize) -> LzwError {
        LzwError::InvalidCode {
            code,
            position,
            next_code: self.next_code,
        }
    }
}

impl Table {
    fn new() -> Self {
        Table { links: Vec::new() }
    }

    fn at(&self, code: Code) -> Option<Entry> {
        match alphabet::symbol(code) {
            Some(byte) => Some(Entry::Symbol(byte)),
            None => self
                .links
                .get(usize::from(code - FIRST_FREE))
                .copied()
                .map(Entry::Run),
        }
    }

    /// Register the run after `from`, extended by one byte, under the next free code.
    fn derive(&mut self, from: &Link) {
        self.links.push(Link {
            start: from.start,
            len: from.len + 1,
        });
    }
}

impl Link {
    fn range(self) -> Range<usize> {
        self.start..self.start + self.len
    }
}
