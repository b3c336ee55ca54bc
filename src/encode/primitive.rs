//! Content octets of simple primitive values.
//!
//! This is an internal module. The relevant items are re-exported by the
//! parent.

use smallvec::SmallVec;


//------------ bool ----------------------------------------------------------

/// Returns the content octet of a BOOLEAN.
///
/// CER and DER require TRUE to be all ones. We use this for BER, too.
pub fn bool_content(value: bool) -> [u8; 1] {
    if value {
        [0xff]
    }
    else {
        [0]
    }
}


//------------ i64 -----------------------------------------------------------

/// Returns the content octets of an INTEGER.
///
/// The content is the shortest big-endian two’s complement representation
/// of the value. This means that the first nine bits of the content are
/// never all zero or all one.
pub fn integer_content(value: i64) -> SmallVec<[u8; 8]> {
    let octets = value.to_be_bytes();
    let mut start = 0;
    while start < octets.len() - 1 {
        let redundant = match octets[start] {
            0x00 => octets[start + 1] & 0x80 == 0,
            0xff => octets[start + 1] & 0x80 != 0,
            _ => false
        };
        if !redundant {
            break
        }
        start += 1;
    }
    SmallVec::from_slice(&octets[start..])
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn integers() {
        fn step(value: i64, content: &[u8]) {
            assert_eq!(
                integer_content(value).as_slice(), content,
                "failed for {value}"
            );
        }

        step(0, b"\x00");
        step(1, b"\x01");
        step(127, b"\x7f");
        step(128, b"\x00\x80");
        step(256, b"\x01\x00");
        step(-1, b"\xff");
        step(-128, b"\x80");
        step(-129, b"\xff\x7f");
        step(i64::MAX, b"\x7f\xff\xff\xff\xff\xff\xff\xff");
        step(i64::MIN, b"\x80\x00\x00\x00\x00\x00\x00\x00");
    }

    #[test]
    fn booleans() {
        assert_eq!(bool_content(true), [0xff]);
        assert_eq!(bool_content(false), [0x00]);
    }
}
