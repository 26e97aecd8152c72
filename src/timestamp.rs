use crate::reader::ByteReader;
use chrono::{NaiveDate, NaiveDateTime, TimeZone};
use log::trace;

/// The raw 10-byte time field embedded in every record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTimestamp {
    pub millis: u16,
    pub sec: u8,
    pub min: u8,
    pub hour: u8,
    pub weekday: u8,
    pub day: u8,
    pub month: u8,
    pub year: u16,
}

impl RawTimestamp {
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, crate::error::DecodeError> {
        let millis = r.read_u16_le()?;
        let sec = r.read_u8()?;
        let min = r.read_u8()?;
        let hour = r.read_u8()?;
        let weekday = r.read_u8()?;
        let day = r.read_u8()?;
        let month = r.read_u8()?;
        let year = r.read_u16_le()?;
        Ok(RawTimestamp {
            millis,
            sec,
            min,
            hour,
            weekday,
            day,
            month,
            year,
        })
    }
}

/// Reconstructs a monotonic millisecond epoch from successive partially
/// populated [`RawTimestamp`] values.
///
/// The on-disk calendar is the logger's local wall clock. Before GPS
/// time-sync the hardware defaults the year field to a value below 2000;
/// such frames carry the previously seen year forward instead of resetting
/// the clock to the epoch's start.
pub struct TimestampReconstructor {
    last_year: u16,
    last_month: u8,
    last_day: u8,
    last_hour: u8,
    last_min: u8,
    last_sec: u8,
    previous_epoch_ms: Option<i64>,
}

impl TimestampReconstructor {
    pub fn new() -> Self {
        TimestampReconstructor {
            last_year: 2000,
            last_month: 1,
            last_day: 1,
            last_hour: 0,
            last_min: 0,
            last_sec: 0,
            previous_epoch_ms: None,
        }
    }

    /// Folds in one raw timestamp and returns the reconstructed epoch (ms).
    pub fn reconstruct(&mut self, raw: RawTimestamp) -> i64 {
        let year = if raw.year < 2000 {
            self.last_year
        } else {
            raw.year
        };

        let same_ymdhm = year == self.last_year
            && raw.month == self.last_month
            && raw.day == self.last_day
            && raw.hour == self.last_hour
            && raw.min == self.last_min;

        self.last_year = year;
        self.last_month = raw.month;
        self.last_day = raw.day;
        self.last_hour = raw.hour;
        self.last_min = raw.min;
        self.last_sec = raw.sec;

        let mut candidate = civil_to_epoch_ms(
            year,
            raw.month,
            raw.day,
            raw.hour,
            raw.min,
            raw.sec,
            raw.millis,
        );

        let previous = match self.previous_epoch_ms {
            None => {
                self.previous_epoch_ms = Some(candidate);
                return candidate;
            }
            Some(p) => p,
        };

        let delta = candidate - previous;
        if delta < -500 && same_ymdhm {
            trace!("timestamp millis wrap detected, compensating by +1000ms");
            candidate += 1000;
        }

        let delta_after_wrap = candidate - previous;
        let accepted = if delta_after_wrap < -10 {
            trace!("timestamp regressed by {delta_after_wrap}ms, carrying previous forward");
            previous
        } else {
            candidate
        };

        self.previous_epoch_ms = Some(accepted);
        accepted
    }
}

impl Default for TimestampReconstructor {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a local civil calendar date/time to milliseconds since the Unix
/// epoch, interpreting the fields as the host's local time the way the
/// source hardware's own clock does. Out-of-range fields (month 0,
/// day 32, …) clamp to the nearest valid value rather than panicking,
/// since the input is untrusted.
fn civil_to_epoch_ms(year: u16, month: u8, day: u8, hour: u8, min: u8, sec: u8, millis: u16) -> i64 {
    let month = month.clamp(1, 12) as u32;
    let day = day.clamp(1, 31) as u32;
    let hour = (hour as u32).min(23);
    let min = (min as u32).min(59);
    let sec = (sec as u32).min(59);

    let date = NaiveDate::from_ymd_opt(year as i32, month, day)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year as i32, month, 1).unwrap());
    let naive: NaiveDateTime = date
        .and_hms_opt(hour, min, sec)
        .unwrap_or_else(|| date.and_hms_opt(0, 0, 0).unwrap());

    let epoch_ms = match chrono::Local.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => dt.timestamp_millis(),
        chrono::LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
        // `naive` names a local time that doesn't exist (a DST spring-forward
        // gap); there is no correct local instant to pick, so fall back to
        // treating the fields as UTC rather than panicking on untrusted input.
        chrono::LocalResult::None => naive.and_utc().timestamp_millis(),
    };

    epoch_ms + millis as i64
}
