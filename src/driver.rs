use crate::cache::ChannelCache;
use crate::can;
use crate::config::DecoderConfig;
use crate::error::DecodeError;
use crate::header::scan_header;
use crate::lap::{FinishLineDetector, GPS_SENTINEL};
use crate::nmea::parse_gprmc;
use crate::reader::ByteReader;
use crate::sample::Sample;
use crate::timestamp::{RawTimestamp, TimestampReconstructor};
use log::{trace, warn};

const BUS_RECORD: u16 = 1;
const NMEA_RECORD: u16 = 2;
const LAP_MARKER_RECORD: u16 = 5;
const RECORD_HEADER_LEN: usize = 14; // rec_type + total_size + 10-byte timestamp

/// Bundles all mutable parse state into a single value created per call, so
/// independent parses never share state and multiple calls can run
/// concurrently on disjoint buffers.
struct Driver {
    cache: ChannelCache,
    timestamp: TimestampReconstructor,
    finish_line: FinishLineDetector,
    lap: u32,
    latitude: f64,
    longitude: f64,
    gps_speed_knots: f64,
    first_fix_received: bool,
    next_emission_ms: Option<i64>,
    samples: Vec<Sample>,
    max_samples: usize,
    ceiling_logged: bool,
}

impl Driver {
    fn new(config: &DecoderConfig, finish_line: Option<crate::header::FinishLine>) -> Self {
        let finish_line = if config.lap_detection { finish_line } else { None };
        Driver {
            cache: ChannelCache::new(),
            timestamp: TimestampReconstructor::new(),
            finish_line: FinishLineDetector::new(finish_line),
            lap: 1,
            latitude: GPS_SENTINEL,
            longitude: GPS_SENTINEL,
            gps_speed_knots: 0.0,
            first_fix_received: false,
            next_emission_ms: None,
            samples: Vec::new(),
            max_samples: config.max_samples,
            ceiling_logged: false,
        }
    }

    fn handle_bus_payload(&mut self, payload: &[u8]) {
        let mut r = ByteReader::new(payload);
        let Ok(id) = r.read_u16_le() else { return };
        if r.read_bytes(2).is_err() {
            return;
        }
        let Ok(declared_len) = r.read_u8() else { return };
        let available = r.remaining().min(declared_len as usize);
        let Ok(data) = r.read_bytes(available) else {
            return;
        };
        can::decode_can_frame(&mut self.cache, id, data);
    }

    fn handle_nmea_payload(&mut self, payload: &[u8], time_ms: i64) {
        let Some(fix) = parse_gprmc(payload) else {
            return;
        };
        self.latitude = fix.latitude;
        self.longitude = fix.longitude;
        self.gps_speed_knots = fix.speed_knots;

        if !self.first_fix_received {
            self.first_fix_received = true;
            self.next_emission_ms = Some(time_ms);
        }

        if self.finish_line.observe(fix) {
            self.on_lap_crossing(time_ms);
        }
    }

    fn on_lap_crossing(&mut self, time_ms: i64) {
        self.lap += 1;
        self.cache.reset_lap_baseline();
        if self.next_emission_ms.is_some() {
            self.next_emission_ms = Some(time_ms);
        }
    }

    /// Advances the 100ms emission grid up to `time_ms`, materialising one
    /// [`Sample`] per tick.
    fn tick(&mut self, time_ms: i64) {
        let Some(mut next) = self.next_emission_ms else {
            return;
        };

        while time_ms >= next {
            if self.samples.len() >= self.max_samples {
                if !self.ceiling_logged {
                    warn!(
                        "emission ceiling of {} samples reached, dropping further emissions",
                        self.max_samples
                    );
                    self.ceiling_logged = true;
                }
                break;
            }
            let sample = Sample::snapshot(
                &self.cache,
                self.latitude,
                self.longitude,
                self.gps_speed_knots,
                self.lap,
                next,
            );
            self.samples.push(sample);
            next += 100;
        }

        self.next_emission_ms = Some(next);
    }
}

/// Decodes a CTRK byte buffer into an ordered sequence of samples using
/// `config`'s tunables. This is the only place the record stream is
/// iterated; every other component is driven from here.
pub fn decode(buf: &[u8], config: &DecoderConfig) -> Result<Vec<Sample>, DecodeError> {
    let header = scan_header(buf)?;
    let mut driver = Driver::new(config, header.finish_line);

    let mut cursor = ByteReader::new(buf);
    cursor.seek(header.data_section_offset);

    loop {
        let record_start = cursor.position();

        let rec_type = match cursor.read_u16_le() {
            Ok(v) => v,
            Err(_) => break,
        };
        let total_size = match cursor.read_u16_le() {
            Ok(v) => v,
            Err(_) => break,
        };

        if rec_type == 0 || total_size == 0 {
            break;
        }
        if (total_size as usize) < RECORD_HEADER_LEN {
            warn!("record at offset {record_start} has total_size smaller than its own header, stopping");
            break;
        }

        let raw_ts = match RawTimestamp::read(&mut cursor) {
            Ok(v) => v,
            Err(_) => break,
        };

        let payload_len = total_size as usize - RECORD_HEADER_LEN;
        if cursor.remaining() < payload_len {
            warn!("record at offset {record_start} extends past the end of the file, stopping");
            break;
        }
        let payload = match cursor.read_bytes(payload_len) {
            Ok(v) => v,
            Err(_) => break,
        };

        let time_ms = driver.timestamp.reconstruct(raw_ts);

        match rec_type {
            BUS_RECORD => driver.handle_bus_payload(payload),
            NMEA_RECORD => driver.handle_nmea_payload(payload, time_ms),
            LAP_MARKER_RECORD => driver.on_lap_crossing(time_ms),
            other => trace!("skipping record with unrecognised rec_type {other}"),
        }

        driver.tick(time_ms);
    }

    Ok(driver.samples)
}
