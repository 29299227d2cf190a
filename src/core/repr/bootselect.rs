use std;
use std::fmt::{
    Debug,
    Display,
    Formatter,
    Result as FmtResult,
};

use core::repr::ethernet::Frame;
use {
    Error,
    Result,
};

/// Width of the entry field in a data frame, including the zero terminator.
pub const ENTRY_FIELD_LEN: usize = 64;

/// Wire size of a request frame, an Ethernet header with no payload.
pub const REQUEST_FRAME_LEN: usize = Frame::<&'static [u8]>::HEADER_LEN;

/// Wire size of a data frame, the larger of the two frame kinds.
pub const DATA_FRAME_LEN: usize = Frame::<&'static [u8]>::HEADER_LEN + ENTRY_FIELD_LEN;

/// Boot menu entry identifier carried in a data frame.
///
/// Stored zero padded to the wire field width so the serialized field is
/// always terminated within its fixed capacity.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    field: [u8; ENTRY_FIELD_LEN],
    len: usize,
}

impl Entry {
    /// Maximum length of an entry, one less than the field width to leave
    /// room for the terminator.
    pub const MAX_LEN: usize = ENTRY_FIELD_LEN - 1;

    /// Tries to create an entry from a byte slice.
    ///
    /// Entries longer than MAX_LEN or containing a zero byte are rejected,
    /// never truncated.
    pub fn try_new(entry: &[u8]) -> Result<Entry> {
        if entry.len() > Self::MAX_LEN {
            return Err(Error::Exhausted);
        } else if entry.iter().any(|&byte| byte == 0) {
            return Err(Error::Malformed);
        }

        let mut field = [0; ENTRY_FIELD_LEN];
        field[.. entry.len()].copy_from_slice(entry);

        Ok(Entry {
            field,
            len: entry.len(),
        })
    }

    /// Reads an entry from a wire field, stopping at the first zero byte.
    ///
    /// The entry length is capped at MAX_LEN even for an unterminated field
    /// so a hostile buffer can never be read as an unbounded string.
    pub fn from_field(field: &[u8]) -> Entry {
        let bounded = if field.len() > ENTRY_FIELD_LEN {
            &field[.. ENTRY_FIELD_LEN]
        } else {
            field
        };

        let len = bounded
            .iter()
            .position(|&byte| byte == 0)
            .unwrap_or(std::cmp::min(bounded.len(), Self::MAX_LEN));

        let mut entry = Entry {
            field: [0; ENTRY_FIELD_LEN],
            len,
        };
        entry.field[.. len].copy_from_slice(&bounded[.. len]);
        entry
    }

    /// Returns the entry text without padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.field[.. self.len]
    }

    /// Returns the entry as a zero padded wire field.
    pub fn as_field(&self) -> &[u8; ENTRY_FIELD_LEN] {
        &self.field
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", String::from_utf8_lossy(self.as_bytes()))
    }
}

impl Debug for Entry {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "Entry({})", self)
    }
}

/// A boot selection frame payload.
///
/// A request carries no payload at all; its broadcast destination is what
/// marks it as a request. A data frame carries exactly one entry field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Bootselect {
    Request,
    Data { entry: Entry },
}

impl Bootselect {
    /// Returns the size of the payload when serialized to a buffer.
    pub fn buffer_len(&self) -> usize {
        match *self {
            Bootselect::Request => 0,
            Bootselect::Data { .. } => ENTRY_FIELD_LEN,
        }
    }

    /// Serializes the payload into a buffer, zero filling the remainder of
    /// the entry field.
    ///
    /// You should ensure buffer has at least buffer_len() bytes to avoid errors.
    pub fn serialize(&self, buffer: &mut [u8]) -> Result<()> {
        if self.buffer_len() > buffer.len() {
            return Err(Error::Exhausted);
        }

        match *self {
            Bootselect::Request => {}
            Bootselect::Data { ref entry } => {
                buffer[.. ENTRY_FIELD_LEN].copy_from_slice(entry.as_field());
            }
        };

        Ok(())
    }

    /// Deserializes a payload from a buffer.
    ///
    /// The buffer length is trusted to have been capped by the packet filter;
    /// anything larger than the entry field is rejected, and the entry itself
    /// is read with a defensive length cap, never from a length the sender
    /// controls.
    pub fn deserialize(payload: &[u8]) -> Result<Bootselect> {
        if payload.is_empty() {
            Ok(Bootselect::Request)
        } else if payload.len() > ENTRY_FIELD_LEN {
            Err(Error::Exhausted)
        } else {
            Ok(Bootselect::Data {
                entry: Entry::from_field(payload),
            })
        }
    }
}
