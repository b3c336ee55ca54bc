//! The encoding rules and what they permit.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::tag::Tag;


//------------ Mode ----------------------------------------------------------

/// The encoding rules to use when writing data.
///
/// A writer is created for one of the three rule sets and keeps using it for
/// its entire lifetime. Whenever the rule sets differ in how a value may be
/// represented, the writer asks [`Mode::form`] and writes whatever form it
/// answers.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Mode {
    /// Basic Encoding Rules.
    ///
    /// These are the most flexible rules, allowing alternative encodings for
    /// some types as well as indefinite length values.
    Ber,

    /// Canonical Encoding Rules.
    ///
    /// These rules always employ indefinite length encoding for constructed
    /// values and the shortest possible form for primitive values.  There
    /// are additional restrictions for certain types.
    Cer,

    /// Distinguished Encoding Rules.
    ///
    /// These rules always employ definite length values and require the
    /// shortest possible encoding. Additional rules apply to some types.
    Der,
}

impl Mode {
    /// The size of string segments in CER.
    pub const CER_SEGMENT_LEN: usize = 1000;

    /// Returns whether values of the given type must be primitive.
    ///
    /// BER would permit constructed encoding for the string and time types
    /// but we never produce it.
    pub fn requires_primitive(self, kind: ValueKind) -> bool {
        match (self, kind) {
            (_, ValueKind::Sequence) => false,
            (Mode::Ber, ValueKind::OctetString) => true,
            (Mode::Cer, ValueKind::OctetString) => false,
            (Mode::Der, ValueKind::OctetString) => true,
            (_, ValueKind::Boolean)
            | (_, ValueKind::Integer)
            | (_, ValueKind::Null)
            | (_, ValueKind::UtcTime) => true,
        }
    }

    /// Returns the size of segments when splitting string content.
    ///
    /// Returns `None` if strings are always written as a single primitive
    /// value. Content that is no longer than the returned size also is to
    /// be written as a single primitive value.
    pub fn string_segment_len(self) -> Option<usize> {
        match self {
            Mode::Ber | Mode::Der => None,
            Mode::Cer => Some(Self::CER_SEGMENT_LEN),
        }
    }

    /// Returns whether constructed values use the indefinite length form.
    pub fn indefinite_constructed(self) -> bool {
        match self {
            Mode::Ber | Mode::Der => false,
            Mode::Cer => true,
        }
    }

    /// Returns the form to write a value of the given type in.
    ///
    /// `content_len` is the number of content octets if they are known
    /// up front, which is the case for everything but SEQUENCE values.
    pub fn form(self, kind: ValueKind, content_len: Option<usize>) -> Form {
        if self.requires_primitive(kind) {
            return Form::Primitive
        }
        if let (Some(step), Some(len)) = (
            self.string_segment_len(), content_len
        ) {
            if len <= step {
                return Form::Primitive
            }
            return Form::Segmented(step)
        }
        if self.indefinite_constructed() {
            Form::Indefinite
        }
        else {
            Form::Definite
        }
    }
}


//------------ Form ----------------------------------------------------------

/// The form a value is written in.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Form {
    /// A single primitive value.
    Primitive,

    /// A constructed value of indefinite length.
    ///
    /// The content is split into primitive values of the natural tag of the
    /// type, each of the given size except for the last one.
    Segmented(usize),

    /// A constructed value of definite length.
    Definite,

    /// A constructed value of indefinite length.
    Indefinite,
}

impl Form {
    /// Returns whether the form is constructed.
    pub fn is_constructed(self) -> bool {
        !matches!(self, Form::Primitive)
    }
}


//------------ ValueKind -----------------------------------------------------

/// The universal types the writer knows how to produce.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ValueKind {
    Boolean,
    Integer,
    OctetString,
    Null,
    Sequence,
    UtcTime,
}

impl ValueKind {
    /// All the kinds.
    pub const ALL: [ValueKind; 6] = [
        ValueKind::Boolean, ValueKind::Integer, ValueKind::OctetString,
        ValueKind::Null, ValueKind::Sequence, ValueKind::UtcTime,
    ];

    /// Returns the natural tag of values of this kind.
    pub fn tag(self) -> Tag {
        match self {
            ValueKind::Boolean => Tag::BOOLEAN,
            ValueKind::Integer => Tag::INTEGER,
            ValueKind::OctetString => Tag::OCTET_STRING,
            ValueKind::Null => Tag::NULL,
            ValueKind::Sequence => Tag::SEQUENCE,
            ValueKind::UtcTime => Tag::UTC_TIME,
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    const MODES: [Mode; 3] = [Mode::Ber, Mode::Cer, Mode::Der];

    #[test]
    fn utc_time_is_always_primitive() {
        for mode in MODES {
            assert!(mode.requires_primitive(ValueKind::UtcTime));
            assert_eq!(
                mode.form(ValueKind::UtcTime, Some(13)), Form::Primitive
            );
        }
    }

    #[test]
    fn form_follows_requires_primitive() {
        for mode in MODES {
            for kind in ValueKind::ALL {
                let form = mode.form(kind, Some(10));
                assert_eq!(
                    form.is_constructed(), !mode.requires_primitive(kind),
                    "{mode:?} {kind:?}"
                );
            }
        }
    }

    #[test]
    fn sequence_forms() {
        assert_eq!(Mode::Ber.form(ValueKind::Sequence, None), Form::Definite);
        assert_eq!(
            Mode::Cer.form(ValueKind::Sequence, None), Form::Indefinite
        );
        assert_eq!(Mode::Der.form(ValueKind::Sequence, None), Form::Definite);
    }

    #[test]
    fn octet_string_forms() {
        for len in [0, 1000, 1001, 5000] {
            assert_eq!(
                Mode::Ber.form(ValueKind::OctetString, Some(len)),
                Form::Primitive
            );
            assert_eq!(
                Mode::Der.form(ValueKind::OctetString, Some(len)),
                Form::Primitive
            );
        }
        assert_eq!(
            Mode::Cer.form(ValueKind::OctetString, Some(1000)),
            Form::Primitive
        );
        assert_eq!(
            Mode::Cer.form(ValueKind::OctetString, Some(1001)),
            Form::Segmented(1000)
        );
    }
}
