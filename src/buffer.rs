//! A growable octet buffer with backpatching.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::{Bytes, BytesMut};


//------------ Buffer --------------------------------------------------------

/// A growable buffer for encoded octets.
///
/// Octets can only be appended at the end. In order to allow writing data
/// whose size is only known later, such as the length octets of a
/// constructed value, a span of placeholder octets can be reserved via
/// [`reserve_fixup`]. The returned [`Fixup`] remembers the position of the
/// span as an offset, so it stays valid whenever the buffer reallocates.
///
/// Resetting the buffer keeps the allocated capacity around for reuse.
///
/// [`reserve_fixup`]: #method.reserve_fixup
#[derive(Clone, Debug, Default)]
pub struct Buffer {
    octets: BytesMut,
}

impl Buffer {
    /// The capacity of a buffer when it first needs to grow.
    const MIN_CAPACITY: usize = 64;

    /// Creates a new, empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty buffer with room for `capacity` octets.
    pub fn with_capacity(capacity: usize) -> Self {
        Buffer { octets: BytesMut::with_capacity(capacity) }
    }

    /// Returns the number of octets written so far.
    pub fn len(&self) -> usize {
        self.octets.len()
    }

    /// Returns whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.octets.is_empty()
    }

    /// Returns the number of octets that fit without reallocating.
    pub fn capacity(&self) -> usize {
        self.octets.capacity()
    }

    /// Appends the octets to the end of the buffer.
    pub fn append(&mut self, data: &[u8]) {
        self.grow(data.len());
        self.octets.extend_from_slice(data);
    }

    /// Appends `len` zero octets and returns their position.
    pub fn reserve_fixup(&mut self, len: usize) -> Fixup {
        self.grow(len);
        let pos = self.octets.len();
        self.octets.resize(pos + len, 0);
        Fixup { pos, len }
    }

    /// Overwrites the reserved octets of `fixup` with `data`.
    ///
    /// # Panics
    ///
    /// The method panics if the length of `data` differs from the length of
    /// the span reserved by `fixup` or if the span lies beyond the end of
    /// the buffer.
    pub fn overwrite(&mut self, fixup: Fixup, data: &[u8]) {
        assert_eq!(
            data.len(), fixup.len,
            "fixup data differs in length from reserved span"
        );
        self.octets[fixup.pos..fixup.pos + fixup.len].copy_from_slice(data);
    }

    /// Changes the length of the span reserved by `fixup`.
    ///
    /// All octets following the span are moved accordingly. Added octets
    /// are zero. Returns the fixup for the resized span. Any other fixups
    /// located after `fixup` are invalidated.
    ///
    /// # Panics
    ///
    /// The method panics if the span lies beyond the end of the buffer.
    pub fn resize_fixup(&mut self, fixup: Fixup, len: usize) -> Fixup {
        let end = fixup.pos + fixup.len;
        assert!(end <= self.octets.len(), "fixup beyond end of buffer");
        let old_len = self.octets.len();
        if len > fixup.len {
            let grow = len - fixup.len;
            self.grow(grow);
            self.octets.resize(old_len + grow, 0);
            self.octets.copy_within(end..old_len, end + grow);
            self.octets[end..end + grow].fill(0);
        }
        else {
            let shrink = fixup.len - len;
            self.octets.copy_within(end..old_len, end - shrink);
            self.octets.truncate(old_len - shrink);
        }
        Fixup { pos: fixup.pos, len }
    }

    /// Logically empties the buffer while keeping its capacity.
    pub fn reset(&mut self) {
        self.octets.clear()
    }

    /// Returns a slice of the written octets.
    pub fn as_slice(&self) -> &[u8] {
        self.octets.as_ref()
    }

    /// Returns a copy of the written octets.
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_slice())
    }

    /// Converts the buffer into the written octets.
    pub fn into_bytes(self) -> Bytes {
        self.octets.freeze()
    }

    /// Makes sure there is room for `additional` octets.
    ///
    /// The capacity is at least doubled every time we need to grow.
    fn grow(&mut self, additional: usize) {
        let needed = self.octets.len() + additional;
        let capacity = self.octets.capacity();
        if needed <= capacity {
            return
        }
        let target = needed.max(capacity * 2).max(Self::MIN_CAPACITY);
        self.octets.reserve(target - self.octets.len());
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}


//------------ Fixup ---------------------------------------------------------

/// The position of a span of reserved octets in a buffer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Fixup {
    pos: usize,
    len: usize,
}

impl Fixup {
    /// Returns the offset of the first reserved octet.
    pub fn pos(self) -> usize {
        self.pos
    }

    /// Returns the number of reserved octets.
    pub fn len(self) -> usize {
        self.len
    }

    /// Returns whether the span is empty.
    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Returns the offset of the first octet after the span.
    pub fn end(self) -> usize {
        self.pos + self.len
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn append_and_read_back() {
        let mut buf = Buffer::new();
        assert!(buf.is_empty());
        buf.append(b"\x17\x0d");
        buf.append(b"171016152403Z");
        assert_eq!(buf.len(), 15);
        assert_eq!(buf.as_slice(), b"\x17\x0d171016152403Z");
        assert_eq!(&buf.to_bytes()[..], buf.as_slice());
    }

    #[test]
    fn growth_doubles() {
        let mut buf = Buffer::with_capacity(4);
        buf.append(b"abcd");
        let before = buf.capacity();
        buf.append(b"e");
        assert!(buf.capacity() >= 2 * before);
        assert_eq!(buf.as_slice(), b"abcde");
    }

    #[test]
    fn fixups() {
        let mut buf = Buffer::new();
        buf.append(b"\x30");
        let fixup = buf.reserve_fixup(1);
        assert_eq!(fixup.pos(), 1);
        assert_eq!(fixup.len(), 1);
        buf.append(b"\x05\x00");
        for _ in 0..1000 {
            buf.append(b"\x00")
        }
        buf.overwrite(fixup, b"\x7f");
        assert_eq!(&buf.as_slice()[..4], b"\x30\x7f\x05\x00");
    }

    #[test]
    #[should_panic]
    fn overwrite_with_wrong_length() {
        let mut buf = Buffer::new();
        let fixup = buf.reserve_fixup(2);
        buf.overwrite(fixup, b"\x01");
    }

    #[test]
    fn resize_fixup() {
        let mut buf = Buffer::new();
        buf.append(b"\x30");
        let fixup = buf.reserve_fixup(1);
        buf.append(b"abc");

        let fixup = buf.resize_fixup(fixup, 3);
        assert_eq!(fixup.end(), 4);
        buf.overwrite(fixup, b"\x82\x00\x03");
        assert_eq!(buf.as_slice(), b"\x30\x82\x00\x03abc");

        let fixup = buf.resize_fixup(fixup, 1);
        buf.overwrite(fixup, b"\x03");
        assert_eq!(buf.as_slice(), b"\x30\x03abc");
    }

    #[test]
    fn reset_keeps_capacity() {
        let mut buf = Buffer::new();
        buf.append(&[0u8; 200]);
        let capacity = buf.capacity();
        buf.reset();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), capacity);
        buf.append(b"x");
        assert_eq!(buf.as_slice(), b"x");
    }
}
