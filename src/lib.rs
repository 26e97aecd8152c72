//! Decoder for the CTRK motorcycle track-day telemetry log format.
//!
//! This crate turns a single in-memory byte buffer produced by a
//! commercial track-day data logger into an ordered, owned sequence of
//! [`Sample`] values: one fully-populated row every 100ms of recorded
//! time, lap-segmented by a GPS finish-line crossing detector.
//!
//! The decoder is a pure function of its input: no I/O, no ambient
//! configuration beyond [`DecoderConfig`], and no global or thread-local
//! state. Two independent buffers can be decoded concurrently from
//! different threads.
//!
//! ```no_run
//! # fn read_file() -> Vec<u8> { vec![] }
//! let buf = read_file();
//! match ctrk_decoder::decode(&buf) {
//!     Ok(samples) => println!("decoded {} samples", samples.len()),
//!     Err(e) => eprintln!("failed to decode: {e}"),
//! }
//! ```

mod cache;
mod calibration;
mod can;
mod config;
mod driver;
mod error;
mod header;
mod lap;
mod nmea;
mod reader;
mod sample;
mod timestamp;

pub use config::DecoderConfig;
pub use error::DecodeError;
pub use sample::Sample;

/// Decodes `buf` with the default [`DecoderConfig`].
pub fn decode(buf: &[u8]) -> Result<Vec<Sample>, DecodeError> {
    decode_with_config(buf, &DecoderConfig::default())
}

/// Decodes `buf` with caller-supplied tunables. See [`DecoderConfig`] for
/// what can be adjusted.
pub fn decode_with_config(buf: &[u8], config: &DecoderConfig) -> Result<Vec<Sample>, DecodeError> {
    driver::decode(buf, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_only_file_yields_empty_sequence() {
        let buf = b"HEAD";
        assert_eq!(decode(buf).unwrap(), vec![]);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let buf = [0u8; 4];
        assert_eq!(decode(&buf).unwrap_err(), DecodeError::BadMagic);
    }
}
