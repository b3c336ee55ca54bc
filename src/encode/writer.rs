//! The writer.
//!
//! This is an internal module. The relevant items are re-exported by the
//! parent.

use bytes::Bytes;
use log::{debug, trace};
use smallvec::SmallVec;
use time::OffsetDateTime;
use crate::buffer::{Buffer, Fixup};
use crate::error::EncodeError;
use crate::length::Length;
use crate::mode::{Form, Mode, ValueKind};
use crate::tag::Tag;
use super::primitive::{bool_content, integer_content};
use super::utctime::{DEFAULT_UTC_MAX_YEAR, UtcTimeContent};


//------------ Writer --------------------------------------------------------

/// A writer for a sequence of encoded values.
///
/// A writer is created for one of the encoding rules described by [`Mode`].
/// Values are then added one by one through the various `write_*` methods.
/// Each of these comes in a variant that uses the natural tag of the type
/// and one with an `_as` suffix that takes the tag to use for implicit
/// tagging. Whether a value is written in primitive or constructed form is
/// decided by the writer alone, so the constructed flag of such a tag is
/// ignored.
///
/// Constructed SEQUENCE values are written by enclosing the writes of their
/// content between [`push_sequence`] and [`pop_sequence`].
///
/// Writes either succeed completely or fail without changing what has been
/// written before. The octets written so far can be retrieved via
/// [`encoded`], [`to_bytes`], or [`into_bytes`] once all constructed values
/// have been closed.
///
/// Once [`dispose`] has been called, the writer releases its buffer and all
/// further operations fail with an error of kind
/// [`Disposed`][crate::ErrorKind::Disposed]. Dropping the writer releases
/// the buffer, too.
///
/// [`push_sequence`]: #method.push_sequence
/// [`pop_sequence`]: #method.pop_sequence
/// [`encoded`]: #method.encoded
/// [`to_bytes`]: #method.to_bytes
/// [`into_bytes`]: #method.into_bytes
/// [`dispose`]: #method.dispose
#[derive(Debug)]
pub struct Writer {
    /// The encoding rules in use.
    mode: Mode,

    /// The octets written so far.
    buffer: Buffer,

    /// The constructed values that are currently open.
    stack: SmallVec<[Frame; 4]>,

    /// Has the writer been disposed of?
    disposed: bool,
}

impl Writer {
    /// Creates a new writer using the given encoding rules.
    pub fn new(mode: Mode) -> Self {
        Self::with_buffer(mode, Buffer::new())
    }

    /// Creates a new writer with room for `capacity` octets.
    pub fn with_capacity(mode: Mode, capacity: usize) -> Self {
        Self::with_buffer(mode, Buffer::with_capacity(capacity))
    }

    fn with_buffer(mode: Mode, buffer: Buffer) -> Self {
        Writer {
            mode,
            buffer,
            stack: SmallVec::new(),
            disposed: false,
        }
    }

    /// Returns the encoding rules used by the writer.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns whether the writer has been disposed of.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

/// # Lifecycle
///
impl Writer {
    /// Returns the number of octets written so far.
    ///
    /// This is the number of octets written since the writer was created or
    /// last reset. Fails if the writer was disposed of or if there are
    /// still constructed values open.
    pub fn encoded_len(&self) -> Result<usize, EncodeError> {
        self.check_complete()?;
        Ok(self.buffer.len())
    }

    /// Returns the octets written so far.
    pub fn encoded(&self) -> Result<&[u8], EncodeError> {
        self.check_complete()?;
        Ok(self.buffer.as_slice())
    }

    /// Returns a copy of the octets written so far.
    pub fn to_bytes(&self) -> Result<Bytes, EncodeError> {
        self.check_complete()?;
        Ok(self.buffer.to_bytes())
    }

    /// Returns whether the octets written so far equal `other`.
    pub fn encoded_matches(&self, other: &[u8]) -> Result<bool, EncodeError> {
        Ok(self.encoded()? == other)
    }

    /// Converts the writer into the octets written so far.
    pub fn into_bytes(self) -> Result<Bytes, EncodeError> {
        self.check_complete()?;
        Ok(self.buffer.into_bytes())
    }

    /// Discards everything written so far.
    ///
    /// This includes any constructed values still open. The buffer keeps
    /// its capacity so the writer can be reused cheaply.
    pub fn reset(&mut self) -> Result<(), EncodeError> {
        self.check_open()?;
        trace!(
            "resetting {:?} writer, dropping {} octets",
            self.mode, self.buffer.len()
        );
        self.buffer.reset();
        self.stack.clear();
        Ok(())
    }

    /// Disposes of the writer.
    ///
    /// This releases the buffer. All later operations except for `dispose`
    /// itself will fail. Calling the method again has no effect.
    pub fn dispose(&mut self) {
        if self.disposed {
            return
        }
        trace!(
            "disposing of {:?} writer with {} octets",
            self.mode, self.buffer.len()
        );
        self.buffer = Buffer::new();
        self.stack = SmallVec::new();
        self.disposed = true;
    }
}

/// # Writing UTCTime values
///
impl Writer {
    /// Writes a UTCTime value with the natural tag and default window.
    ///
    /// The value is converted to UTC. Its year after this conversion must
    /// be between 1950 and 2049.
    pub fn write_utc_time(
        &mut self, value: OffsetDateTime
    ) -> Result<(), EncodeError> {
        self.write_utc_time_as_with_max_year(
            Tag::UTC_TIME, value, DEFAULT_UTC_MAX_YEAR
        )
    }

    /// Writes a UTCTime value with the given tag and default window.
    pub fn write_utc_time_as(
        &mut self, tag: Tag, value: OffsetDateTime
    ) -> Result<(), EncodeError> {
        self.write_utc_time_as_with_max_year(
            tag, value, DEFAULT_UTC_MAX_YEAR
        )
    }

    /// Writes a UTCTime value with the natural tag and the given window.
    ///
    /// The year of the value after conversion to UTC must be between
    /// `max_year - 99` and `max_year`.
    pub fn write_utc_time_with_max_year(
        &mut self, value: OffsetDateTime, max_year: i32
    ) -> Result<(), EncodeError> {
        self.write_utc_time_as_with_max_year(Tag::UTC_TIME, value, max_year)
    }

    /// Writes a UTCTime value with the given tag and window.
    ///
    /// The content is always the thirteen octets `YYMMDDHHMMSSZ` of the
    /// value converted to UTC. The value is always primitive regardless of
    /// the constructed flag of `tag` and the encoding rules.
    pub fn write_utc_time_as_with_max_year(
        &mut self, tag: Tag, value: OffsetDateTime, max_year: i32
    ) -> Result<(), EncodeError> {
        self.check_open()?;
        let tag = Self::check_tag(tag)?;
        let content = UtcTimeContent::new(value, max_year).map_err(|err| {
            debug!("rejected UTCTime {:?}: {}", value, err);
            err
        })?;
        self.write_value(tag, ValueKind::UtcTime, content.as_slice());
        Ok(())
    }
}

/// # Writing other primitive values
///
impl Writer {
    /// Writes a NULL value.
    pub fn write_null(&mut self) -> Result<(), EncodeError> {
        self.write_null_as(Tag::NULL)
    }

    /// Writes a NULL value with the given tag.
    pub fn write_null_as(&mut self, tag: Tag) -> Result<(), EncodeError> {
        self.check_open()?;
        let tag = Self::check_tag(tag)?;
        self.write_value(tag, ValueKind::Null, b"");
        Ok(())
    }

    /// Writes a BOOLEAN value.
    pub fn write_bool(&mut self, value: bool) -> Result<(), EncodeError> {
        self.write_bool_as(Tag::BOOLEAN, value)
    }

    /// Writes a BOOLEAN value with the given tag.
    pub fn write_bool_as(
        &mut self, tag: Tag, value: bool
    ) -> Result<(), EncodeError> {
        self.check_open()?;
        let tag = Self::check_tag(tag)?;
        self.write_value(tag, ValueKind::Boolean, &bool_content(value));
        Ok(())
    }

    /// Writes an INTEGER value.
    pub fn write_integer(&mut self, value: i64) -> Result<(), EncodeError> {
        self.write_integer_as(Tag::INTEGER, value)
    }

    /// Writes an INTEGER value with the given tag.
    pub fn write_integer_as(
        &mut self, tag: Tag, value: i64
    ) -> Result<(), EncodeError> {
        self.check_open()?;
        let tag = Self::check_tag(tag)?;
        self.write_value(tag, ValueKind::Integer, &integer_content(value));
        Ok(())
    }

    /// Writes an OCTET STRING value.
    pub fn write_octet_string(
        &mut self, value: &[u8]
    ) -> Result<(), EncodeError> {
        self.write_octet_string_as(Tag::OCTET_STRING, value)
    }

    /// Writes an OCTET STRING value with the given tag.
    ///
    /// In CER, content longer than 1000 octets is written in constructed
    /// form as a sequence of primitive OCTET STRING segments. Otherwise the
    /// value is primitive.
    pub fn write_octet_string_as(
        &mut self, tag: Tag, value: &[u8]
    ) -> Result<(), EncodeError> {
        self.check_open()?;
        let tag = Self::check_tag(tag)?;
        self.write_value(tag, ValueKind::OctetString, value);
        Ok(())
    }
}

/// # Writing constructed values
///
impl Writer {
    /// Starts a SEQUENCE value.
    ///
    /// All values written until the matching call to [`pop_sequence`]
    /// become the content of the sequence.
    ///
    /// [`pop_sequence`]: #method.pop_sequence
    pub fn push_sequence(&mut self) -> Result<(), EncodeError> {
        self.push_sequence_as(Tag::SEQUENCE)
    }

    /// Starts a SEQUENCE value with the given tag.
    pub fn push_sequence_as(&mut self, tag: Tag) -> Result<(), EncodeError> {
        self.check_open()?;
        let tag = Self::check_tag(tag)?;
        let fixup = match self.mode.form(ValueKind::Sequence, None) {
            Form::Indefinite => {
                self.write_header(tag.constructed(), Length::Indefinite);
                None
            }
            Form::Definite => {
                self.buffer.append(&tag.constructed().to_octets());
                Some(self.buffer.reserve_fixup(1))
            }
            Form::Primitive | Form::Segmented(_) => {
                unreachable!("SEQUENCE values are always constructed")
            }
        };
        self.stack.push(Frame { tag, fixup });
        Ok(())
    }

    /// Completes the SEQUENCE value started last.
    pub fn pop_sequence(&mut self) -> Result<(), EncodeError> {
        self.pop_sequence_as(Tag::SEQUENCE)
    }

    /// Completes the SEQUENCE value with the given tag started last.
    ///
    /// Fails if no value is open or the last value was started with a
    /// different tag.
    pub fn pop_sequence_as(&mut self, tag: Tag) -> Result<(), EncodeError> {
        self.check_open()?;
        let tag = Self::check_tag(tag)?;
        let frame = match self.stack.last() {
            Some(frame) => *frame,
            None => {
                debug!("rejected closing {} with nothing open", tag);
                return Err(EncodeError::unbalanced("no open value"))
            }
        };
        if !frame.tag.same_number(tag) {
            debug!("rejected closing {} while {} is open", tag, frame.tag);
            return Err(EncodeError::unbalanced("closing tag differs"))
        }
        self.stack.pop();
        match frame.fixup {
            None => self.write_end_of_contents(),
            Some(fixup) => {
                let length = Length::Definite(
                    self.buffer.len() - fixup.end()
                );
                let octets = length.to_octets();
                let fixup = if octets.len() != fixup.len() {
                    self.buffer.resize_fixup(fixup, octets.len())
                }
                else {
                    fixup
                };
                self.buffer.overwrite(fixup, &octets);
            }
        }
        Ok(())
    }
}

/// # Helpers
///
impl Writer {
    fn check_open(&self) -> Result<(), EncodeError> {
        if self.disposed {
            debug!("rejected use of disposed writer");
            Err(EncodeError::disposed())
        }
        else {
            Ok(())
        }
    }

    fn check_complete(&self) -> Result<(), EncodeError> {
        self.check_open()?;
        if self.stack.is_empty() {
            Ok(())
        }
        else {
            debug!(
                "rejected read-back with {} open values", self.stack.len()
            );
            Err(EncodeError::unbalanced("constructed value still open"))
        }
    }

    fn check_tag(tag: Tag) -> Result<Tag, EncodeError> {
        if tag.is_end_of_contents() {
            debug!("rejected end-of-contents tag for value");
            Err(EncodeError::invalid_tag(
                "tag", "end-of-contents tag cannot be used for a value"
            ))
        }
        else {
            Ok(tag)
        }
    }

    fn write_header(&mut self, tag: Tag, length: Length) {
        self.buffer.append(&tag.to_octets());
        self.buffer.append(&length.to_octets());
    }

    /// Writes a complete value in the form the encoding rules ask for.
    fn write_value(&mut self, tag: Tag, kind: ValueKind, content: &[u8]) {
        let form = self.mode.form(kind, Some(content.len()));
        self.write_in_form(form, tag, kind, content)
    }

    /// Writes a complete value in the given form.
    ///
    /// Constructed forms wrap the content in primitive values with the
    /// natural tag of `kind`.
    fn write_in_form(
        &mut self, form: Form, tag: Tag, kind: ValueKind, content: &[u8]
    ) {
        match form {
            Form::Primitive => {
                self.write_header(
                    tag.primitive(), Length::Definite(content.len())
                );
                self.buffer.append(content);
            }
            Form::Segmented(step) => {
                self.write_header(tag.constructed(), Length::Indefinite);
                for segment in content.chunks(step) {
                    self.write_header(
                        kind.tag(), Length::Definite(segment.len())
                    );
                    self.buffer.append(segment);
                }
                self.write_end_of_contents();
            }
            Form::Definite => {
                let inner = Length::Definite(content.len());
                let len = kind.tag().encoded_len() + inner.encoded_len()
                    + content.len();
                self.write_header(tag.constructed(), Length::Definite(len));
                self.write_header(kind.tag(), inner);
                self.buffer.append(content);
            }
            Form::Indefinite => {
                self.write_header(tag.constructed(), Length::Indefinite);
                self.write_header(
                    kind.tag(), Length::Definite(content.len())
                );
                self.buffer.append(content);
                self.write_end_of_contents();
            }
        }
    }

    fn write_end_of_contents(&mut self) {
        self.buffer.append(b"\0\0")
    }
}


//------------ Frame ---------------------------------------------------------

/// A constructed value currently open.
#[derive(Clone, Copy, Debug)]
struct Frame {
    /// The tag the value was opened with.
    tag: Tag,

    /// The length octets to fix up for a definite length value.
    fixup: Option<Fixup>,
}


//============ Tests =========================================================
