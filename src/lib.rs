//! # LZW decoder and encoder
//!
//! This crate provides an [`Encoder`] and a [`Decoder`] for Lempel-Ziv-Welch code streams. The
//! encoder matches input against a prefix trie of all sequences seen so far and emits one code
//! per longest match; the decoder rebuilds the same table in lock-step from the codes alone.
//!
//! Codes `0..=255` always stand for the single byte of the same value. New codes are assigned
//! from 256 upwards until the table holds `1 << max_bits` entries, after which the table is
//! frozen and encoding continues with the codes it has.
//!
//! Two width schemes exist:
//!
//!  * *static*: every code is `max_bits` wide for the whole call.
//!  * *dynamic*: codes start 9 bits wide and the width grows by one bit whenever the table
//!    outgrows it, up to `max_bits`. The final width is recorded in the [`Compressed`] result and
//!    in the header of the dynamic [`frame`].
//!
//! The supported range for `max_bits` is `9..=16`.
//!
//! Exemplary use of the encoder:
//!
//! ```
//! use trielzw::{encode::Encoder, decode::Decoder};
//! let data = b"TOBEORNOTTOBEORTOBEORNOT";
//!
//! let encoder = Encoder::new(12).unwrap();
//! let compressed = encoder.encode(&data[..]).unwrap();
//! assert!(compressed.codes.len() < data.len());
//!
//! let decoder = Decoder::new(12).unwrap();
//! let decoded = decoder.decode(&compressed.codes).unwrap();
//! assert_eq!(decoded, &data[..]);
//! ```
#![forbid(unsafe_code)]

/// The smallest supported maximum code size, also the starting size of dynamic streams.
pub const MIN_CODESIZE: u8 = 9;
/// The largest supported code size. Codes of this width still fit into a [`Code`].
pub const MAX_CODESIZE: u8 = 16;
/// The maximum code size used when none is configured.
pub const DEFAULT_CODESIZE: u8 = 12;

/// Alias for a LZW code point
pub type Code = u16;

mod alphabet;
pub mod decode;
pub mod dict;
pub mod encode;
pub mod frame;
mod width;

pub use crate::decode::Decoder;
pub use crate::encode::Encoder;

/// How the code size evolves during one call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeWidth {
    /// Every code uses the configured maximum size.
    Static,
    /// Codes start at [`MIN_CODESIZE`] bits and grow with the table.
    Dynamic,
}

/// The parameters shared by an encoder and the decoder of its output.
///
/// Both sides must agree on these for a stream to decode, except that a dynamic decoder reads
/// its width from the stream itself (see [`frame::read_dynamic`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Configuration {
    max_bits: u8,
    width: CodeWidth,
}

/// The result of one encoding call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Compressed {
    /// The emitted codes, in order.
    pub codes: Vec<Code>,
    /// The code size in effect after the last code was emitted.
    ///
    /// For a static encoder this is the configured size. For a dynamic one it is the size the
    /// table grew to, which is what the dynamic frame records.
    pub bits: u8,
}

/// The error kinds of the codec.
///
/// None of these are recovered from internally. Each aborts the call that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LzwError {
    /// The encoder lost track of a sequence it had already matched. This is a bug in the
    /// dictionary, not a property of the input.
    #[error("dictionary has no code for a sequence that was already matched")]
    InvariantViolation,
    /// A code that is neither in the table nor the next code to be assigned.
    ///
    /// The stream is corrupt or was produced with a different configuration.
    #[error("invalid code {code} at position {position}, the next assignable code is {next_code}")]
    InvalidCode {
        code: Code,
        position: usize,
        next_code: u32,
    },
    /// The requested maximum code size is not within `9..=16`.
    #[error("unsupported maximum code size of {max_bits} bits, expected 9 to 16")]
    InvalidConfiguration { max_bits: u8 },
    /// A code does not fit into the frame it should be written to.
    #[error("code {code} does not fit into {bits} bits")]
    CodeOutOfRange { code: Code, bits: u8 },
    /// The frame body does not divide into whole code slots.
    #[error("frame body of {len} bytes is not a multiple of the {width} byte code slot")]
    TruncatedFrame { len: usize, width: usize },
    /// A dynamic frame without its leading width byte.
    #[error("frame is missing its code size header")]
    MissingHeader,
    /// A dynamic frame whose recorded width is not a supported code size.
    #[error("frame header records an unsupported code size of {bits} bits")]
    InvalidHeader { bits: u8 },
}

impl Configuration {
    /// A static configuration: all codes are `max_bits` wide.
    pub fn new(max_bits: u8) -> Self {
        Configuration {
            max_bits,
            width: CodeWidth::Static,
        }
    }

    /// A dynamic configuration: codes grow from 9 bits up to `max_bits`.
    pub fn with_dynamic_size(max_bits: u8) -> Self {
        Configuration {
            max_bits,
            width: CodeWidth::Dynamic,
        }
    }

    /// The largest code size, in bits, that codes may reach.
    pub fn max_bits(&self) -> u8 {
        self.max_bits
    }

    /// Whether codes keep that size throughout or grow towards it.
    pub fn width(&self) -> CodeWidth {
        self.width
    }

    /// Check the configuration and create an encoder from it.
    pub fn build_encoder(self) -> Result<Encoder, LzwError> {
        self.validate()?;
        Ok(Encoder::from_configuration(self))
    }

    /// Check the configuration and create a decoder from it.
    pub fn build_decoder(self) -> Result<Decoder, LzwError> {
        self.validate()?;
        Ok(Decoder::from_configuration(self))
    }

    fn validate(&self) -> Result<(), LzwError> {
        if (MIN_CODESIZE..=MAX_CODESIZE).contains(&self.max_bits) {
            Ok(())
        } else {
            Err(LzwError::InvalidConfiguration {
                max_bits: self.max_bits,
            })
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new(DEFAULT_CODESIZE)
    }
}

/// Compress `data` with the given configuration into a complete frame.
///
/// Static configurations produce a headerless frame, dynamic ones a frame that starts with the
/// final code size.
pub fn compress(config: Configuration, data: &[u8]) -> Result<Vec<u8>, LzwError> {
    let compressed = config.build_encoder()?.encode(data)?;
    match config.width {
        CodeWidth::Static => frame::to_vec_static(&compressed.codes, config.max_bits),
        CodeWidth::Dynamic => frame::to_vec_dynamic(&compressed),
    }
}

/// Decompress a frame produced by [`compress`] with the same configuration.
///
/// For a dynamic configuration the code size is read from the frame header and the configured
/// maximum is only validated, not used.
pub fn decompress(config: Configuration, data: &[u8]) -> Result<Vec<u8>, LzwError> {
    config.validate()?;
    match config.width {
        CodeWidth::Static => {
            let codes = frame::from_slice_static(data, config.max_bits)?;
            Decoder::from_configuration(config).decode(&codes)
        }
        CodeWidth::Dynamic => {
            let compressed = frame::from_slice_dynamic(data)?;
            Decoder::with_dynamic_size(compressed.bits)?.decode(&compressed.codes)
        }
    }
}
