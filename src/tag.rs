//! The identifier octets of an encoded value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use smallvec::SmallVec;
use crate::error::EncodeError;


//------------ Tag -----------------------------------------------------------

/// The tag of an encoded value.
///
/// Each BER encoded value starts with a sequence of one or more octets
/// called the _identifier octets._ They encode the class of the tag, its
/// number within that class, and whether the value uses primitive or
/// constructed encoding. A `Tag` carries all three.
///
/// Two tags are equal if all three parts are equal. When checking for the
/// reserved end-of-contents tag via [`is_end_of_contents`], only class and
/// number are considered.
///
/// Note that for most values the writer decides on its own whether to use
/// primitive or constructed encoding. In this case, the constructed flag of
/// a tag supplied by the caller is ignored.
///
/// # Limitations
///
/// Tag numbers are limited to [`Tag::MAX_NUMBER`], i.e., 31 bits. This
/// keeps the identifier octets at a maximum of six octets.
///
/// [`is_end_of_contents`]: #method.is_end_of_contents
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Tag {
    class: Class,
    number: u32,
    constructed: bool,
}

impl Tag {
    /// The largest tag number supported.
    pub const MAX_NUMBER: u32 = 0x7fff_ffff;

    /// The bit in the first identifier octet marking constructed encoding.
    const CONSTRUCTED_MASK: u8 = 0x20;

    /// The largest number that fits into the first octet.
    const MAX_SINGLE_OCTET: u32 = 0x1e;

    /// The low five bits of the first octet of a multi-octet tag.
    const MULTI_OCTET_MARKER: u8 = 0x1f;

    /// Creates a primitive tag from a class and number.
    ///
    /// # Panics
    ///
    /// The function panics if `number` is larger than `Tag::MAX_NUMBER`.
    /// Use [`try_new`] for tag numbers from untrusted sources.
    ///
    /// [`try_new`]: #method.try_new
    pub const fn new(class: Class, number: u32) -> Self {
        assert!(number <= Tag::MAX_NUMBER);
        Tag { class, number, constructed: false }
    }

    /// Creates a primitive tag from a class and a number of any width.
    ///
    /// Returns an error of kind [`InvalidTag`] if the number is negative or
    /// larger than `Tag::MAX_NUMBER`.
    ///
    /// [`InvalidTag`]: enum.ErrorKind.html#variant.InvalidTag
    pub fn try_new<N: TryInto<u32>>(
        class: Class, number: N
    ) -> Result<Self, EncodeError> {
        match number.try_into() {
            Ok(number) if number <= Tag::MAX_NUMBER => {
                Ok(Tag { class, number, constructed: false })
            }
            _ => {
                Err(EncodeError::invalid_tag(
                    "number", "tag number out of range"
                ))
            }
        }
    }

    /// Creates a new tag in the universal class.
    pub const fn universal(number: u32) -> Self {
        Self::new(Class::Universal, number)
    }

    /// Creates a new tag in the application class.
    pub const fn application(number: u32) -> Self {
        Self::new(Class::Application, number)
    }

    /// Creates a new tag in the context specific class.
    pub const fn ctx(number: u32) -> Self {
        Self::new(Class::Context, number)
    }

    /// Creates a new tag in the private class.
    pub const fn private(number: u32) -> Self {
        Self::new(Class::Private, number)
    }

    /// Returns the same tag marked for constructed encoding.
    pub const fn constructed(self) -> Self {
        Tag { class: self.class, number: self.number, constructed: true }
    }

    /// Returns the same tag marked for primitive encoding.
    pub const fn primitive(self) -> Self {
        Tag { class: self.class, number: self.number, constructed: false }
    }

    /// Returns the class of the tag.
    pub const fn class(self) -> Class {
        self.class
    }

    /// Returns the number of the tag.
    pub const fn number(self) -> u32 {
        self.number
    }

    /// Returns whether the tag is marked for constructed encoding.
    pub const fn is_constructed(self) -> bool {
        self.constructed
    }

    /// Returns whether this is the reserved end-of-contents tag.
    ///
    /// The constructed flag is not considered.
    pub const fn is_end_of_contents(self) -> bool {
        matches!(self.class, Class::Universal) && self.number == 0
    }

    /// Returns whether two tags have the same class and number.
    pub const fn same_number(self, other: Tag) -> bool {
        self.class.into_u8() == other.class.into_u8()
            && self.number == other.number
    }

    /// Returns the number of identifier octets of the tag.
    pub const fn encoded_len(self) -> usize {
        if self.number <= Tag::MAX_SINGLE_OCTET {
            return 1
        }
        let mut len = 1;
        let mut number = self.number;
        while number != 0 {
            len += 1;
            number >>= 7;
        }
        len
    }

    /// Returns the identifier octets of the tag.
    ///
    /// There are two forms:
    ///
    /// * low tag number (for tag numbers between 0 and 30):
    ///     One octet. Bits 8 and 7 specify the class, bit 6 indicates
    ///     whether the encoding is constructed, and bits 5-1 give the tag
    ///     number.
    /// * high tag number (for tag numbers 31 and greater):
    ///     Two or more octets. First octet is as in low-tag-number form,
    ///     except that bits 5-1 all have value 1. Second and following
    ///     octets give the tag number, base 128, most significant digit
    ///     first, with as few digits as possible, and with the bit 8 of each
    ///     octet except the last set to 1.
    pub fn to_octets(self) -> SmallVec<[u8; 6]> {
        let mut first = self.class.into_u8();
        if self.constructed {
            first |= Tag::CONSTRUCTED_MASK
        }
        let mut res = SmallVec::new();
        if self.number <= Tag::MAX_SINGLE_OCTET {
            res.push(first | self.number as u8);
            return res
        }
        res.push(first | Tag::MULTI_OCTET_MARKER);

        // Collect the base 128 digits least significant first, then append
        // them in reverse.
        let mut digits = [0u8; 5];
        let mut count = 0;
        let mut number = self.number;
        while number != 0 {
            digits[count] = (number & 0x7f) as u8;
            count += 1;
            number >>= 7;
        }
        for i in (0..count).rev() {
            if i == 0 {
                res.push(digits[i])
            }
            else {
                res.push(digits[i] | 0x80)
            }
        }
        res
    }
}

/// # Constants for universal tags.
///
/// See clause 8.4 of ITU Recommendation X.690. Only the tags the writer
/// produces itself are listed.
///
impl Tag {
    /// The tag marking the end-of-contents in an indefinite length value.
    ///
    /// This is UNIVERSAL 0.
    pub const END_OF_CONTENTS: Self = Self::new(Class::Universal, 0);

    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Self::new(Class::Universal, 1);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Self::new(Class::Universal, 2);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Self::new(Class::Universal, 4);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Self::new(Class::Universal, 5);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    pub const SEQUENCE: Self = Self::new(Class::Universal, 16);

    /// The tag for the UTCTime type, UNIVERSAL 23.
    pub const UTC_TIME: Self = Self::new(Class::Universal, 23);
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.primitive() {
            Tag::END_OF_CONTENTS => write!(f, "END-OF-CONTENTS"),
            Tag::BOOLEAN => write!(f, "BOOLEAN"),
            Tag::INTEGER => write!(f, "INTEGER"),
            Tag::OCTET_STRING => write!(f, "OCTET STRING"),
            Tag::NULL => write!(f, "NULL"),
            Tag::SEQUENCE => write!(f, "SEQUENCE"),
            Tag::UTC_TIME => write!(f, "UTCTime"),
            tag => {
                match tag.class() {
                    Class::Universal => write!(f, "[UNIVERSAL ")?,
                    Class::Application => write!(f, "[APPLICATION ")?,
                    Class::Context => write!(f, "[")?,
                    Class::Private => write!(f, "[PRIVATE ")?,
                }
                write!(f, "{}]", tag.number())
            }
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({} - {:?})", self, self.to_octets().as_slice())
    }
}


//------------ Class ---------------------------------------------------------

/// The class of a tag.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Class {
    Universal,
    Application,
    Context,
    Private,
}

impl Class {
    const fn into_u8(self) -> u8 {
        match self {
            Self::Universal => 0x00,
            Self::Application => 0x40,
            Self::Context => 0x80,
            Self::Private => 0xC0,
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::error::ErrorKind;
    use super::*;

    const CLASSES: &[Class] = &[
        Class::Universal, Class::Application, Class::Context, Class::Private
    ];

    #[test]
    fn single_octet_tags() {
        for &class in CLASSES {
            for number in (0..5).chain(26..=30) {
                let tag = Tag::new(class, number);
                assert_eq!(tag.encoded_len(), 1);
                assert_eq!(
                    tag.to_octets().as_slice(),
                    &[class.into_u8() | number as u8]
                );
                assert_eq!(
                    tag.constructed().to_octets().as_slice(),
                    &[class.into_u8() | 0x20 | number as u8]
                );
            }
        }
    }

    #[test]
    fn multi_octet_tags() {
        assert_eq!(Tag::ctx(31).to_octets().as_slice(), b"\x9f\x1f");
        assert_eq!(Tag::application(0x7f).to_octets().as_slice(), b"\x5f\x7f");
        assert_eq!(
            Tag::private(0x80).to_octets().as_slice(), b"\xdf\x81\x00"
        );
        assert_eq!(
            Tag::universal(0x3fff).to_octets().as_slice(), b"\x1f\xff\x7f"
        );
        assert_eq!(
            Tag::universal(0x4000).to_octets().as_slice(),
            b"\x1f\x81\x80\x00"
        );
        assert_eq!(
            Tag::ctx(Tag::MAX_NUMBER).to_octets().as_slice(),
            b"\x9f\x87\xff\xff\xff\x7f"
        );
        for number in [31, 0x7f, 0x80, 0x3fff, 0x4000, Tag::MAX_NUMBER] {
            let tag = Tag::ctx(number);
            assert_eq!(tag.encoded_len(), tag.to_octets().len());
        }
    }

    #[test]
    fn try_new() {
        assert_eq!(
            Tag::try_new(Class::Context, 12u64).unwrap(), Tag::ctx(12)
        );
        assert_eq!(
            Tag::try_new(Class::Private, Tag::MAX_NUMBER).unwrap(),
            Tag::private(Tag::MAX_NUMBER)
        );
        assert_eq!(
            Tag::try_new(Class::Context, -1i64).unwrap_err().kind(),
            ErrorKind::InvalidTag
        );
        assert_eq!(
            Tag::try_new(Class::Context, 0x8000_0000u64).unwrap_err().kind(),
            ErrorKind::InvalidTag
        );
        assert_eq!(
            Tag::try_new(Class::Context, u64::MAX).unwrap_err().kind(),
            ErrorKind::InvalidTag
        );
    }

    #[test]
    fn equality_and_end_of_contents() {
        assert_ne!(Tag::ctx(3), Tag::ctx(3).constructed());
        assert!(Tag::ctx(3).same_number(Tag::ctx(3).constructed()));
        assert!(!Tag::ctx(3).same_number(Tag::application(3)));
        assert!(Tag::END_OF_CONTENTS.is_end_of_contents());
        assert!(Tag::END_OF_CONTENTS.constructed().is_end_of_contents());
        assert!(!Tag::ctx(0).is_end_of_contents());
        assert!(!Tag::NULL.is_end_of_contents());
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Tag::UTC_TIME), "UTCTime");
        assert_eq!(format!("{}", Tag::UTC_TIME.constructed()), "UTCTime");
        assert_eq!(format!("{}", Tag::ctx(4)), "[4]");
        assert_eq!(format!("{}", Tag::application(7)), "[APPLICATION 7]");
        assert_eq!(format!("{}", Tag::universal(99)), "[UNIVERSAL 99]");
    }
}
