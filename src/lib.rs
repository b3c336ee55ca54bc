//! Writing data in the Basic, Canonical, and Distinguished Encoding Rules.
//!
//! The crate provides a [`Writer`] that produces a sequence of values
//! encoded in BER, CER, or DER into a growable buffer. Values are written
//! one by one, each with either its natural tag or a tag supplied for
//! implicit tagging. The central value type is UTCTime, whose two-digit
//! year is checked against a configurable window after converting the
//! time to UTC.
//!
//! ```
//! use bcwriter::{Mode, Writer};
//! use time::macros::datetime;
//!
//! let mut writer = Writer::new(Mode::Der);
//! writer.write_utc_time(datetime!(2017-10-16 08:24:03 -07:00)).unwrap();
//! assert_eq!(writer.encoded().unwrap(), b"\x17\x0d171016152403Z");
//! ```

pub use self::buffer::{Buffer, Fixup};
pub use self::encode::Writer;
pub use self::error::{EncodeError, ErrorKind};
pub use self::mode::{Form, Mode, ValueKind};
pub use self::tag::{Class, Tag};

pub mod encode;

mod buffer;
mod error;
mod length;
mod mode;
mod tag;
