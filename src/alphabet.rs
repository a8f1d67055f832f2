//! The single-byte symbols every table starts out with.
use crate::Code;

/// Number of pre-registered symbols.
pub(crate) const SYMBOLS: usize = 256;

/// The first code that is not a single symbol.
pub(crate) const FIRST_FREE: Code = SYMBOLS as Code;

/// All symbols together with their permanent code.
pub(crate) fn symbols() -> impl Iterator<Item = (u8, Code)> {
    (0..=u8::MAX).map(|byte| (byte, Code::from(byte)))
}

/// The symbol a code stands for, if it is one of the pre-registered ones.
pub(crate) fn symbol(code: Code) -> Option<u8> {
    if code < FIRST_FREE {
        Some(code as u8)
    } else {
        None
    }
}
