//! Code size bookkeeping shared by the encoder and the decoder.
//!
//! Both sides drive this with the same `next_code` counter so that their growth schedules are
//! identical by construction.
use crate::{CodeWidth, Configuration, MIN_CODESIZE};

#[derive(Clone, Copy, Debug)]
pub(crate) struct Width {
    /// The current code length.
    code_size: u8,
    /// The ceiling for the code length.
    max_size: u8,
    /// Whether the code length follows the table size.
    grows: bool,
}

impl Width {
    pub(crate) fn new(config: Configuration) -> Self {
        match config.width() {
            CodeWidth::Static => Width {
                code_size: config.max_bits(),
                max_size: config.max_bits(),
                grows: false,
            },
            CodeWidth::Dynamic => Width {
                code_size: MIN_CODESIZE,
                max_size: config.max_bits(),
                grows: true,
            },
        }
    }

    /// Return the current code size in bits.
    pub(crate) fn code_size(&self) -> u8 {
        self.code_size
    }

    /// Return the maximum code with the current code size.
    pub(crate) fn max_code(&self) -> u32 {
        (1u32 << self.code_size) - 1
    }

    /// Whether a new entry may still be assigned the code `next_code`.
    pub(crate) fn has_room(&self, next_code: u32) -> bool {
        next_code <= self.max_code()
    }

    /// Increase the code size if `next_code` no longer fits and the ceiling allows it.
    pub(crate) fn bump_code_size(&mut self, next_code: u32) {
        if self.grows && next_code > self.max_code() && self.code_size < self.max_size {
            self.code_size += 1;
            tracing::trace!(code_size = self.code_size, next_code, "code size increased");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Width;
    use crate::Configuration;

    #[test]
    fn static_never_grows() {
        let mut width = Width::new(Configuration::new(12));
        assert_eq!(width.code_size(), 12);
        assert_eq!(width.max_code(), 4095);
        width.bump_code_size(4096);
        assert_eq!(width.code_size(), 12);
        assert!(!width.has_room(4096));
    }

    #[test]
    fn dynamic_grows_to_ceiling() {
        let mut width = Width::new(Configuration::with_dynamic_size(10));
        assert_eq!(width.code_size(), 9);
        width.bump_code_size(511);
        assert_eq!(width.code_size(), 9);
        width.bump_code_size(512);
        assert_eq!(width.code_size(), 10);
        width.bump_code_size(1024);
        assert_eq!(width.code_size(), 10);
        assert!(!width.has_room(1024));
    }
}
