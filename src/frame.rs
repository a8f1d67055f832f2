//! Persisting code sequences as bytes.
//!
//! Every code occupies a slot of `ceil(bits / 8)` bytes, most significant byte first, with no
//! separators and no length prefix. The end of the data is the end of the stream.
//!
//! * The static frame has no header. The reader must be told the code size out of band.
//! * The dynamic frame starts with one byte holding the final code size of the encoder. All codes
//!   are then stored in slots for that size, including the early ones that were emitted while the
//!   size was still smaller.
//!
//! The slice based functions report [`LzwError`]s. The reader and writer based ones are meant for
//! files and report those errors as `io::ErrorKind::InvalidData`.
use std::io::{self, Read, Write};

use crate::{Code, Compressed, LzwError, MAX_CODESIZE, MIN_CODESIZE};

/// The number of bytes each code occupies at `bits` wide codes.
pub fn slot_width(bits: u8) -> usize {
    (usize::from(bits) + 7) / 8
}

/// Serialize `codes` into a headerless frame of `max_bits` wide codes.
pub fn to_vec_static(codes: &[Code], max_bits: u8) -> Result<Vec<u8>, LzwError> {
    check_size(max_bits, |max_bits| LzwError::InvalidConfiguration { max_bits })?;
    let mut out = Vec::with_capacity(codes.len() * slot_width(max_bits));
    push_codes(&mut out, codes, max_bits)?;
    Ok(out)
}

/// Parse a headerless frame of `max_bits` wide codes.
pub fn from_slice_static(data: &[u8], max_bits: u8) -> Result<Vec<Code>, LzwError> {
    check_size(max_bits, |max_bits| LzwError::InvalidConfiguration { max_bits })?;
    pull_codes(data, max_bits)
}

/// Serialize an encoding result into a frame headed by its final code size.
pub fn to_vec_dynamic(compressed: &Compressed) -> Result<Vec<u8>, LzwError> {
    let bits = compressed.bits;
    check_size(bits, |bits| LzwError::InvalidHeader { bits })?;
    let mut out = Vec::with_capacity(1 + compressed.codes.len() * slot_width(bits));
    out.push(bits);
    push_codes(&mut out, &compressed.codes, bits)?;
    Ok(out)
}

/// Parse a frame headed by its code size.
pub fn from_slice_dynamic(data: &[u8]) -> Result<Compressed, LzwError> {
    let (&bits, body) = data.split_first().ok_or(LzwError::MissingHeader)?;
    check_size(bits, |bits| LzwError::InvalidHeader { bits })?;
    let codes = pull_codes(body, bits)?;
    Ok(Compressed { codes, bits })
}

/// Write a headerless frame of `max_bits` wide codes.
pub fn write_static(mut write: impl Write, codes: &[Code], max_bits: u8) -> io::Result<()> {
    let frame = to_vec_static(codes, max_bits).map_err(invalid_data)?;
    write.write_all(&frame)?;
    write.flush()
}

/// Read a headerless frame of `max_bits` wide codes until the end of `read`.
pub fn read_static(mut read: impl Read, max_bits: u8) -> io::Result<Vec<Code>> {
    let mut data = Vec::new();
    read.read_to_end(&mut data)?;
    from_slice_static(&data, max_bits).map_err(invalid_data)
}

/// Write a frame headed by the final code size of `compressed`.
pub fn write_dynamic(mut write: impl Write, compressed: &Compressed) -> io::Result<()> {
    let frame = to_vec_dynamic(compressed).map_err(invalid_data)?;
    write.write_all(&frame)?;
    write.flush()
}

/// Read a frame headed by its code size until the end of `read`.
pub fn read_dynamic(mut read: impl Read) -> io::Result<Compressed> {
    let mut data = Vec::new();
    read.read_to_end(&mut data)?;
    from_slice_dynamic(&data).map_err(invalid_data)
}

fn check_size(bits: u8, err: impl FnOnce(u8) -> LzwError) -> Result<(), LzwError> {
    if (MIN_CODESIZE..=MAX_CODESIZE).contains(&bits) {
        Ok(())
    } else {
        Err(err(bits))
    }
}

fn push_codes(out: &mut Vec<u8>, codes: &[Code], bits: u8) -> Result<(), LzwError> {
    let width = slot_width(bits);
    let max_code = (1u32 << bits) - 1;
    for &code in codes {
        if u32::from(code) > max_code {
            return Err(LzwError::CodeOutOfRange { code, bits });
        }
        let bytes = u32::from(code).to_be_bytes();
        out.extend_from_slice(&bytes[bytes.len() - width..]);
    }
    Ok(())
}

fn pull_codes(data: &[u8], bits: u8) -> Result<Vec<Code>, LzwError> {
    let width = slot_width(bits);
    if data.len() % width != 0 {
        return Err(LzwError::TruncatedFrame {
            len: data.len(),
            width,
        });
    }

    let max_code = (1u32 << bits) - 1;
    data.chunks_exact(width)
        .map(|slot| {
            let code = slot.iter().fold(0u32, |acc, &b| acc << 8 | u32::from(b));
            if code > max_code {
                // Only reachable when the slot has spare high bits.
                Err(LzwError::CodeOutOfRange {
                    code: code as Code,
                    bits,
                })
            } else {
                Ok(code as Code)
            }
        })
        .collect()
}

fn invalid_data(err: LzwError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}
