//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::{error, fmt};


//------------ ErrorKind -----------------------------------------------------

/// The kind of an encoding error.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// The writer has been disposed of.
    Disposed,

    /// A tag was invalid for the operation.
    ///
    /// This happens when the end-of-contents tag is used for a value or
    /// when a tag number is out of range.
    InvalidTag,

    /// A value was outside of the range permitted for the operation.
    OutOfRange,

    /// Constructed values were not properly opened and closed.
    Unbalanced,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            ErrorKind::Disposed => "writer disposed",
            ErrorKind::InvalidTag => "invalid tag",
            ErrorKind::OutOfRange => "value out of range",
            ErrorKind::Unbalanced => "unbalanced constructed value",
        })
    }
}


//------------ EncodeError ---------------------------------------------------

/// An error happened while writing encoded data.
///
/// Besides the [kind][Self::kind] of the error, the value carries the name
/// of the parameter that caused the error if there was one and a short
/// message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EncodeError {
    kind: ErrorKind,
    param: Option<&'static str>,
    msg: &'static str,
}

impl EncodeError {
    /// Creates an error signalling use of a disposed writer.
    pub(crate) fn disposed() -> Self {
        EncodeError {
            kind: ErrorKind::Disposed,
            param: None,
            msg: "the writer can no longer be used",
        }
    }

    /// Creates an invalid tag error for the given parameter.
    pub(crate) fn invalid_tag(param: &'static str, msg: &'static str) -> Self {
        EncodeError { kind: ErrorKind::InvalidTag, param: Some(param), msg }
    }

    /// Creates an out of range error for the given parameter.
    pub(crate) fn out_of_range(
        param: &'static str, msg: &'static str
    ) -> Self {
        EncodeError { kind: ErrorKind::OutOfRange, param: Some(param), msg }
    }

    /// Creates an error for unbalanced constructed values.
    pub(crate) fn unbalanced(msg: &'static str) -> Self {
        EncodeError { kind: ErrorKind::Unbalanced, param: None, msg }
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the name of the offending parameter if there was one.
    pub fn param(&self) -> Option<&'static str> {
        self.param
    }

    /// Returns the message of the error.
    pub fn message(&self) -> &'static str {
        self.msg
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.param {
            Some(param) => {
                write!(f, "{} in parameter '{}': {}", self.kind, param, self.msg)
            }
            None => write!(f, "{}: {}", self.kind, self.msg)
        }
    }
}

impl error::Error for EncodeError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            EncodeError::out_of_range("value", "year outside window")
                .to_string(),
            "value out of range in parameter 'value': year outside window"
        );
        assert_eq!(
            EncodeError::disposed().to_string(),
            "writer disposed: the writer can no longer be used"
        );
    }
}
