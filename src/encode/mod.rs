//! Encoding data in BER, CER, and DER.
//!
//! This module provides the [`Writer`], which collects a sequence of encoded
//! values in a growable buffer. A writer is created for one of the encoding
//! rules represented by [`Mode`] and produces values of a number of
//! universal types, most prominently UTCTime, as well as constructed
//! SEQUENCE values.
//!
//! The content of UTCTime values is available separately through
//! [`UtcTimeContent`].
//!
//! [`Mode`]: ../enum.Mode.html

pub use self::utctime::{DEFAULT_UTC_MAX_YEAR, UTC_TIME_LEN, UtcTimeContent};
pub use self::writer::Writer;

mod primitive;
mod utctime;
mod writer;
