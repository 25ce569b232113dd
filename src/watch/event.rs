// src/watch/event.rs

//! Decoder for the raw event records read from an inotify descriptor.
//!
//! Each record is a fixed 16-byte header (`wd: i32`, `mask: u32`,
//! `cookie: u32`, `len: u32`, native endian) followed by `len` bytes of
//! NUL-padded name. The decoder checks that every header and name fits in
//! what is left of the buffer before reading it, so a short or corrupted read
//! turns into a [`DecodeError`] rather than an out-of-bounds access.

use thiserror::Error;

use crate::types::WatchId;

pub use libc::{IN_IGNORED, IN_MODIFY, IN_Q_OVERFLOW};

/// Size of the fixed part of a record.
pub const EVENT_HEADER_LEN: usize = std::mem::size_of::<libc::inotify_event>();

/// Longest name the kernel attaches to a record (`NAME_MAX` plus the NUL).
pub const MAX_NAME_LEN: usize = 256;

/// Smallest buffer guaranteed to hold one complete record.
pub const MIN_EVENT_BUFFER: usize = EVENT_HEADER_LEN + MAX_NAME_LEN;


/// One decoded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub watch_id: WatchId,
    pub mask: u32,
    pub cookie: u32,
    /// Entry name inside the watched directory, without NUL padding. Empty
    /// for events about the directory itself.
    pub name: Vec<u8>,
}

impl RawEvent {
    /// Whether this record names an entry that callbacks could be waiting on.
    pub fn is_actionable(&self) -> bool {
        self.mask != 0 && !self.name.is_empty() && self.watch_id.is_valid()
    }

    pub fn is_overflow(&self) -> bool {
        self.mask & IN_Q_OVERFLOW != 0
    }

    pub fn is_ignored(&self) -> bool {
        self.mask & IN_IGNORED != 0
    }

    /// Name as text, for logging.
    pub fn name_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("truncated header at offset {offset}: {remaining} bytes left, need 16")]
    TruncatedHeader { offset: usize, remaining: usize },

    #[error("truncated name at offset {offset}: record claims {len} bytes, {remaining} left")]
    TruncatedName {
        offset: usize,
        len: usize,
        remaining: usize,
    },
}

/// Iterate over the records in `buf`.
///
/// Yields at most one error, after which the iterator is exhausted: once a
/// record boundary is wrong there is no reliable way to find the next one.
pub fn decode_events(buf: &[u8]) -> EventIter<'_> {
    EventIter {
        buf,
        offset: 0,
        failed: false,
    }
}

#[derive(Debug)]
pub struct EventIter<'a> {
    buf: &'a [u8],
    offset: usize,
    failed: bool,
}

impl Iterator for EventIter<'_> {
    type Item = Result<RawEvent, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.buf.len() {
            return None;
        }

        let offset = self.offset;
        let rest = &self.buf[offset..];

        let Some((header, tail)) = rest.split_first_chunk::<EVENT_HEADER_LEN>() else {
            self.failed = true;
            return Some(Err(DecodeError::TruncatedHeader {
                offset,
                remaining: rest.len(),
            }));
        };

        let wd = i32::from_ne_bytes(field(header, 0));
        let mask = u32::from_ne_bytes(field(header, 4));
        let cookie = u32::from_ne_bytes(field(header, 8));
        let len = u32::from_ne_bytes(field(header, 12)) as usize;

        if len > tail.len() {
            self.failed = true;
            return Some(Err(DecodeError::TruncatedName {
                offset,
                len,
                remaining: tail.len(),
            }));
        }

        let raw_name = &tail[..len];
        let name_end = raw_name.iter().position(|&b| b == 0).unwrap_or(len);

        self.offset = offset + EVENT_HEADER_LEN + len;

        Some(Ok(RawEvent {
            watch_id: WatchId(wd),
            mask,
            cookie,
            name: raw_name[..name_end].to_vec(),
        }))
    }
}

fn field(header: &[u8; EVENT_HEADER_LEN], at: usize) -> [u8; 4] {
    [header[at], header[at + 1], header[at + 2], header[at + 3]]
}
