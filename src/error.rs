use core::fmt;

/// Error that is possible during CTRK file decoding.
///
/// These are the only three conditions that abort a parse outright; every
/// other malformed input is tolerated and absorbed locally (see the crate
/// docs for the rationale).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The first four bytes of the input are not `HEAD`.
    BadMagic,
    /// A read crossed the end of the input while validating the magic.
    UnexpectedEof,
    /// The header key/value entry table is structurally invalid: an entry's
    /// declared size is too small to hold its own tag, or it would run past
    /// the end of the buffer before the terminator entry is reached.
    MalformedHeader,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::BadMagic => f.write_str("input does not start with the CTRK 'HEAD' magic"),
            DecodeError::UnexpectedEof => f.write_str("unexpected end of input while reading the file header"),
            DecodeError::MalformedHeader => f.write_str("header key/value entry table is malformed"),
        }
    }
}

impl std::error::Error for DecodeError {}
