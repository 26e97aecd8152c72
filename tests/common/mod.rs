use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

pub const HEADER_ENTRIES_OFFSET: usize = 0x34;

/// Builds a minimal CTRK file: magic + zero-padded preamble, the given raw
/// header entry bytes (including the terminator), followed by the given
/// raw record bytes (including the terminator).
pub fn build_file(header_entries: &[u8], records: &[u8]) -> Vec<u8> {
    let mut buf = vec![0u8; HEADER_ENTRIES_OFFSET];
    buf[0..4].copy_from_slice(b"HEAD");
    buf.extend_from_slice(header_entries);
    buf.extend_from_slice(records);
    buf
}

pub fn header_terminator() -> Vec<u8> {
    let mut v = vec![];
    v.write_u16::<LittleEndian>(0).unwrap();
    v.write_u16::<LittleEndian>(4).unwrap();
    v
}

pub fn finish_line_entry(p1: (f64, f64), p2: (f64, f64)) -> Vec<u8> {
    let mut v = vec![];
    v.write_u16::<LittleEndian>(1).unwrap();
    v.write_u16::<LittleEndian>(4 + 32).unwrap();
    v.write_f64::<LittleEndian>(p1.0).unwrap();
    v.write_f64::<LittleEndian>(p1.1).unwrap();
    v.write_f64::<LittleEndian>(p2.0).unwrap();
    v.write_f64::<LittleEndian>(p2.1).unwrap();
    v
}

pub fn record_terminator() -> Vec<u8> {
    let mut v = vec![];
    v.write_u16::<LittleEndian>(0).unwrap();
    v.write_u16::<LittleEndian>(0).unwrap();
    v
}

/// A single record's fixed 10-byte timestamp field.
#[derive(Clone, Copy)]
pub struct Timestamp {
    pub millis: u16,
    pub sec: u8,
    pub min: u8,
    pub hour: u8,
    pub weekday: u8,
    pub day: u8,
    pub month: u8,
    pub year: u16,
}

impl Timestamp {
    pub fn new(year: u16, month: u8, day: u8, hour: u8, min: u8, sec: u8, millis: u16) -> Self {
        Timestamp {
            millis,
            sec,
            min,
            hour,
            weekday: 0,
            day,
            month,
            year,
        }
    }

    fn write(&self, buf: &mut Vec<u8>) {
        buf.write_u16::<LittleEndian>(self.millis).unwrap();
        buf.write_u8(self.sec).unwrap();
        buf.write_u8(self.min).unwrap();
        buf.write_u8(self.hour).unwrap();
        buf.write_u8(self.weekday).unwrap();
        buf.write_u8(self.day).unwrap();
        buf.write_u8(self.month).unwrap();
        buf.write_u16::<LittleEndian>(self.year).unwrap();
    }
}

/// Builds one record (header + timestamp + payload) of the given
/// `rec_type`.
pub fn build_record(rec_type: u16, ts: Timestamp, payload: &[u8]) -> Vec<u8> {
    let total_size = 14 + payload.len();
    let mut buf = vec![];
    buf.write_u16::<LittleEndian>(rec_type).unwrap();
    buf.write_u16::<LittleEndian>(total_size as u16).unwrap();
    ts.write(&mut buf);
    buf.extend_from_slice(payload);
    buf
}

pub fn gprmc_sentence(lat_ddmm: &str, lat_hemi: char, lon_dddmm: &str, lon_hemi: char, speed: f64, time: &str, date: &str) -> String {
    let body = format!(
        "$GPRMC,{time},A,{lat_ddmm},{lat_hemi},{lon_dddmm},{lon_hemi},{speed:.2},0.00,{date},,,A"
    );
    let checksum = body[1..].bytes().fold(0u8, |acc, b| acc ^ b);
    format!("{body}*{checksum:02X}\r\n")
}

pub fn bus_payload(id: u16, data: &[u8]) -> Vec<u8> {
    let mut buf = vec![];
    buf.write_u16::<LittleEndian>(id).unwrap();
    buf.write_u16::<LittleEndian>(0).unwrap(); // reserved
    buf.write_u8(data.len() as u8).unwrap();
    buf.extend_from_slice(data);
    buf
}
