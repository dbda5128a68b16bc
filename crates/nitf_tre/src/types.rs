//! Wire types framing each TRE.

use binrw::{BinRead, BinWrite};

use crate::error::{Error, Result};

/// Number of bytes of the tag
pub const TAG_LENGTH: usize = 6;

/// Number of bytes of the ASCII length
pub const LENGTH_LENGTH: usize = 5;

/// Number of bytes the envelope adds in front of every body
pub const ENVELOPE_LENGTH: usize = TAG_LENGTH + LENGTH_LENGTH;

/// Largest body the five digit length can describe
pub const MAX_BODY_LENGTH: usize = 99_999;

/// TRE envelope
///
/// Every TRE starts with its tag, space padded to six bytes, followed by the length of its body
/// as five zero padded ASCII digits.
#[derive(BinRead, BinWrite, Debug, Clone, PartialEq)]
#[brw(big)]
pub struct TreEnvelope {
    /// The tag with its padding removed
    #[br(try_map = |raw: [u8; TAG_LENGTH]| read_tag(raw))]
    #[bw(map = |tag: &String| write_tag(tag))]
    pub tag: String,

    /// The number of body bytes following the envelope
    #[br(try_map = |raw: [u8; LENGTH_LENGTH]| read_length(raw))]
    #[bw(try_map = |length: &u32| write_length(*length))]
    pub length: u32,
}

impl TreEnvelope {
    /// Create a validated envelope for a body of `length` bytes
    pub fn new(tag: &str, length: usize) -> Result<Self> {
        validate_tag(tag)?;
        if length > MAX_BODY_LENGTH {
            return Err(Error::BodyTooLong {
                tag: tag.to_owned(),
                length,
            });
        }

        Ok(TreEnvelope {
            tag: tag.to_owned(),
            length: length as u32,
        })
    }
}

/// Check that `tag` fits in the envelope without relying on its padding
pub fn validate_tag(tag: &str) -> Result<()> {
    let valid = !tag.is_empty()
        && tag.len() <= TAG_LENGTH
        && tag.is_ascii()
        && tag.trim() == tag;

    if !valid {
        return Err(Error::InvalidTag(tag.to_owned()));
    }
    Ok(())
}

fn read_tag(raw: [u8; TAG_LENGTH]) -> core::result::Result<String, std::string::FromUtf8Error> {
    String::from_utf8(raw.to_vec()).map(|tag| tag.trim_end().to_owned())
}

fn write_tag(tag: &str) -> [u8; TAG_LENGTH] {
    let mut raw = [b' '; TAG_LENGTH];
    raw.iter_mut()
        .zip(tag.bytes())
        .for_each(|(slot, byte)| *slot = byte);
    raw
}

fn read_length(raw: [u8; LENGTH_LENGTH]) -> core::result::Result<u32, String> {
    std::str::from_utf8(&raw)
        .ok()
        .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse::<u32>().ok())
        .ok_or_else(|| format!("invalid tre length {:?}", String::from_utf8_lossy(&raw)))
}

fn write_length(length: u32) -> core::result::Result<[u8; LENGTH_LENGTH], String> {
    if length as usize > MAX_BODY_LENGTH {
        return Err(format!("tre length {length} does not fit in {LENGTH_LENGTH} digits"));
    }

    let mut raw = [b'0'; LENGTH_LENGTH];
    raw.copy_from_slice(format!("{length:05}").as_bytes());
    Ok(raw)
}
