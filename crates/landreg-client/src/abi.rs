//! Minimal contract ABI codec for the registry getter.
//!
//! The registry contract exposes one read used here: a function taking the
//! parcel id as a `string` and returning a tuple whose first two members are
//! `string`s (content id, digest). Only dynamic `string` encoding is needed,
//! so this module implements exactly that rather than a general ABI.
//!
//! Layout of a tuple of dynamic values: one 32-byte head word per member
//! holding the byte offset of its tail, then tails of `len ‖ bytes` padded
//! to a 32-byte boundary.

use thiserror::Error;

const WORD: usize = 32;

/// ABI decoding failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    #[error("return data too short: need {need} bytes, have {have}")]
    Truncated { need: usize, have: usize },
    #[error("word at {at} does not fit in a usize")]
    Overflow { at: usize },
    #[error("string at {at} is not valid UTF-8")]
    Utf8 { at: usize },
}

fn push_word(out: &mut Vec<u8>, value: usize) {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&(value as u64).to_be_bytes());
    out.extend_from_slice(&word);
}

fn push_padded(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(bytes);
    let rem = bytes.len() % WORD;
    if rem != 0 {
        out.resize(out.len() + WORD - rem, 0);
    }
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

/// Encode a tuple of `string` values.
pub fn encode_string_tuple(values: &[&str]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut offset = values.len() * WORD;
    for v in values {
        push_word(&mut out, offset);
        offset += WORD + padded_len(v.len());
    }
    for v in values {
        push_word(&mut out, v.len());
        push_padded(&mut out, v.as_bytes());
    }
    out
}

/// Calldata for `selector(string arg)`.
pub fn encode_string_call(selector: [u8; 4], arg: &str) -> Vec<u8> {
    let mut out = selector.to_vec();
    out.extend(encode_string_tuple(&[arg]));
    out
}

fn read_word(data: &[u8], at: usize) -> Result<usize, AbiError> {
    let end = at.checked_add(WORD).ok_or(AbiError::Overflow { at })?;
    let word = data.get(at..end).ok_or(AbiError::Truncated {
        need: end,
        have: data.len(),
    })?;
    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return Err(AbiError::Overflow { at });
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&word[WORD - 8..]);
    usize::try_from(u64::from_be_bytes(low)).map_err(|_| AbiError::Overflow { at })
}

fn read_string(data: &[u8], head: usize) -> Result<String, AbiError> {
    let offset = read_word(data, head)?;
    let len = read_word(data, offset)?;
    let start = offset + WORD;
    let end = start.checked_add(len).ok_or(AbiError::Overflow { at: offset })?;
    let bytes = data.get(start..end).ok_or(AbiError::Truncated {
        need: end,
        have: data.len(),
    })?;
    String::from_utf8(bytes.to_vec()).map_err(|_| AbiError::Utf8 { at: offset })
}

/// Decode the first two `string` members of a returned tuple.
///
/// Further members, if any, are ignored.
pub fn decode_string_pair(data: &[u8]) -> Result<(String, String), AbiError> {
    Ok((read_string(data, 0)?, read_string(data, WORD)?))
}
