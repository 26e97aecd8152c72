use crate::error::DecodeError;
use crate::reader::ByteReader;
use log::{debug, warn};

const MAGIC: &[u8; 4] = b"HEAD";
const HEADER_ENTRIES_OFFSET: usize = 0x34;
const RECORD_LINE_ENTRY_TYPE: u16 = 0x0001;

/// The two GPS points that define the track's finish line, read out of the
/// header's "record-line" entry. Lap detection is disabled whenever no
/// finish line could be read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinishLine {
    pub p1: (f64, f64),
    pub p2: (f64, f64),
}

/// Result of scanning the header: where the data section begins, and the
/// finish line if one was present and well-formed.
pub struct HeaderInfo {
    pub data_section_offset: usize,
    pub finish_line: Option<FinishLine>,
}

/// Validates the magic, then scans the key/value entry table starting at
/// [`HEADER_ENTRIES_OFFSET`] until the terminator entry (`rec_type == 0`)
/// is found, returning the offset right after it.
pub fn scan_header(buf: &[u8]) -> Result<HeaderInfo, DecodeError> {
    let mut r = ByteReader::new(buf);
    let magic = r.read_bytes(4)?;
    if magic != MAGIC.as_slice() {
        return Err(DecodeError::BadMagic);
    }

    if buf.len() < HEADER_ENTRIES_OFFSET {
        // No room for even one entry; treat as an empty, terminator-less
        // table landing right at end of file. A caller with no records
        // will simply get zero samples back.
        return Ok(HeaderInfo {
            data_section_offset: buf.len(),
            finish_line: None,
        });
    }

    let mut cursor = ByteReader::new(buf);
    cursor.seek(HEADER_ENTRIES_OFFSET);

    let mut finish_line = None;

    loop {
        let Ok(rec_type) = cursor.read_u16_le() else {
            warn!("header entry table ran off the end of the file before a terminator");
            return Err(DecodeError::MalformedHeader);
        };
        let Ok(total_size) = cursor.read_u16_le() else {
            return Err(DecodeError::MalformedHeader);
        };

        if rec_type == 0 {
            return Ok(HeaderInfo {
                data_section_offset: cursor.position(),
                finish_line,
            });
        }

        if total_size < 4 {
            return Err(DecodeError::MalformedHeader);
        }
        let payload_len = (total_size - 4) as usize;
        if cursor.remaining() < payload_len {
            return Err(DecodeError::MalformedHeader);
        }

        let payload = cursor
            .read_bytes(payload_len)
            .map_err(|_| DecodeError::MalformedHeader)?;

        if rec_type == RECORD_LINE_ENTRY_TYPE {
            match parse_finish_line(payload) {
                Some(fl) => finish_line = Some(fl),
                None => debug!("record-line header entry had unexpected length {payload_len}, ignoring"),
            }
        }
    }
}

fn parse_finish_line(payload: &[u8]) -> Option<FinishLine> {
    if payload.len() != 32 {
        return None;
    }
    let mut r = ByteReader::new(payload);
    let p1_lat = r.read_f64_le().ok()?;
    let p1_lng = r.read_f64_le().ok()?;
    let p2_lat = r.read_f64_le().ok()?;
    let p2_lng = r.read_f64_le().ok()?;
    Some(FinishLine {
        p1: (p1_lat, p1_lng),
        p2: (p2_lat, p2_lng),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{LittleEndian, WriteBytesExt};
    use std::io::Write;

    fn padded_header(entries: &[u8]) -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_ENTRIES_OFFSET];
        buf[0..4].copy_from_slice(MAGIC);
        buf.extend_from_slice(entries);
        buf
    }

    fn terminator() -> Vec<u8> {
        let mut v = vec![];
        v.write_u16::<LittleEndian>(0).unwrap();
        v.write_u16::<LittleEndian>(4).unwrap();
        v
    }

    #[test]
    fn bad_magic_is_rejected() {
        let buf = [0u8; 4];
        assert_eq!(scan_header(&buf).unwrap_err(), DecodeError::BadMagic);
    }

    #[test]
    fn entry_table_running_off_the_end_without_a_terminator_is_malformed() {
        // A header big enough to reach the entry table, but with no bytes
        // left for even a terminator entry.
        let buf = padded_header(&[]);
        assert_eq!(scan_header(&buf).unwrap_err(), DecodeError::MalformedHeader);
    }

    #[test]
    fn header_with_only_terminator_has_no_finish_line() {
        let buf = padded_header(&terminator());
        let info = scan_header(&buf).unwrap();
        assert_eq!(info.data_section_offset, buf.len());
        assert!(info.finish_line.is_none());
    }

    #[test]
    fn record_line_entry_populates_finish_line() {
        let mut entries = vec![];
        entries.write_u16::<LittleEndian>(RECORD_LINE_ENTRY_TYPE).unwrap();
        entries.write_u16::<LittleEndian>(4 + 32).unwrap();
        for v in [0.0f64, 0.0, 0.0, 1.0] {
            entries.write_f64::<LittleEndian>(v).unwrap();
        }
        entries.extend_from_slice(&terminator());

        let buf = padded_header(&entries);
        let info = scan_header(&buf).unwrap();
        let fl = info.finish_line.unwrap();
        assert_eq!(fl.p1, (0.0, 0.0));
        assert_eq!(fl.p2, (0.0, 1.0));
    }

    #[test]
    fn zero_size_non_terminator_entry_is_malformed() {
        let mut entries = vec![];
        entries.write_u16::<LittleEndian>(9).unwrap();
        entries.write_u16::<LittleEndian>(0).unwrap();
        let buf = padded_header(&entries);
        assert_eq!(scan_header(&buf).unwrap_err(), DecodeError::MalformedHeader);
    }

    #[test]
    fn unknown_entries_are_skipped() {
        let mut entries = vec![];
        entries.write_u16::<LittleEndian>(42).unwrap();
        entries.write_u16::<LittleEndian>(7).unwrap();
        entries.write_all(&[0xAA, 0xBB, 0xCC]).unwrap();
        entries.extend_from_slice(&terminator());

        let buf = padded_header(&entries);
        let info = scan_header(&buf).unwrap();
        assert!(info.finish_line.is_none());
    }
}
