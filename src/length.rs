//! The length octets.
//!
//! This is a private module. The [`Length`] defined herein is not
//! publicly exposed.

use smallvec::SmallVec;


//------------ Length -------------------------------------------------------

/// The length octets of an encoded value.
///
/// A length value can either be definite, meaning it provides the actual
/// number of content octets in the value, or indefinite, in which case the
/// content is delimited by a special end-of-contents marker.
///
/// # Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets is one octet long and the remaining bits of this
/// first octet provide the definite length. Thus, if the first octet is
/// less than 128, it provides the definite length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. If they specify that there are zero more octets, i.e., the
/// value of the first octet is 128, the length is indefinite. Otherwise,
/// those following octets give the big-endian encoding of the definite
/// length of the content octets.
///
/// We always produce the minimum number of octets which is what CER and
/// DER demand and BER permits.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Length {
    /// A definite length with the given number of content octets.
    Definite(usize),

    /// The indefinite length.
    Indefinite,
}

impl Length {
    const LEN: usize = 0usize.to_ne_bytes().len();

    /// Returns the length of the encoded representation of the value.
    pub fn encoded_len(self) -> usize {
        match self {
            Length::Definite(len) if len > 0x7F => {
                Self::LEN - Self::encoded_start_idx(len) + 1
            }
            _ => 1
        }
    }

    /// Returns the encoded length octets.
    pub fn to_octets(self) -> SmallVec<[u8; 9]> {
        let mut res = SmallVec::new();
        match self {
            Length::Indefinite => res.push(0x80),
            Length::Definite(len) if len > 0x7F => {
                let idx = Self::encoded_start_idx(len);
                debug_assert!(idx < Self::LEN);

                // LEN will never be greater than 126 bytes. Also, `idx`
                // won’t be greater than LEN, so the subtraction is fine.
                res.push(((Self::LEN - idx) | 0x80) as u8);
                res.extend_from_slice(&len.to_be_bytes()[idx..]);
            }
            Length::Definite(len) => res.push(len as u8),
        }
        res
    }

    /// Returns the index of the first non-zero octet of `len`.
    fn encoded_start_idx(len: usize) -> usize {
        (len.leading_zeros() / 8) as usize
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encode() {
        fn step(l: Length, res: &[u8]) {
            assert_eq!(l.to_octets().as_slice(), res, "failed for {l:?}");
            assert_eq!(l.encoded_len(), res.len(), "bad len for {l:?}");
        }

        step(Length::Indefinite, b"\x80");
        step(Length::Definite(0), b"\x00");
        step(Length::Definite(0x0d), b"\x0d");
        step(Length::Definite(0x7f), b"\x7f");
        step(Length::Definite(0x80), b"\x81\x80");
        step(Length::Definite(0xff), b"\x81\xff");
        step(Length::Definite(0x100), b"\x82\x01\x00");
        step(Length::Definite(0xdead), b"\x82\xde\xad");
        step(Length::Definite(0x01_0000), b"\x83\x01\x00\x00");
    }
}
