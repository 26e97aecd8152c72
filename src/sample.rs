use crate::calibration;
use crate::cache::ChannelCache;
use crate::lap::GPS_SENTINEL;

/// One fully-populated, immutable telemetry row.
///
/// Raw fields hold the on-wire integer/float values exactly as received;
/// calibrated engineering-unit values are derived on demand through the
/// accessor methods below rather than pre-computed, so a caller can choose
/// to export raw columns, calibrated columns, or both.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    pub lap: u32,
    pub time_ms: i64,

    pub latitude: f64,
    pub longitude: f64,
    pub gps_speed_knots: f64,

    pub rpm_raw: u16,
    pub gear_raw: u8,

    pub aps_raw: u16,
    pub tps_raw: u16,

    pub water_temp_raw: u8,
    pub intake_temp_raw: u8,

    pub front_wheel_speed_raw: u16,
    pub rear_wheel_speed_raw: u16,

    pub fuel_counter_raw: u16,
    pub fuel_lap_baseline_raw: u16,

    pub lean_raw: u16,
    pub lean_signed_raw: u16,
    pub pitch_raw: u16,

    pub acc_x_raw: u16,
    pub acc_y_raw: u16,

    pub front_brake_raw: u16,
    pub rear_brake_raw: u16,

    pub front_abs: bool,
    pub rear_abs: bool,
    pub traction: u8,
    pub slide: u8,
    pub lift: u8,
    pub launch: u8,
}

impl Sample {
    /// Snapshots the cache, the current GPS triple and the running lap
    /// index at emission time. The fuel baseline defaults to the current
    /// counter (yielding a zero delta) when no 0x023E frame has been seen
    /// yet this lap.
    pub(crate) fn snapshot(
        cache: &ChannelCache,
        latitude: f64,
        longitude: f64,
        gps_speed_knots: f64,
        lap: u32,
        time_ms: i64,
    ) -> Self {
        Sample {
            lap,
            time_ms,
            latitude,
            longitude,
            gps_speed_knots,
            rpm_raw: cache.rpm,
            gear_raw: cache.gear,
            aps_raw: cache.aps,
            tps_raw: cache.tps,
            water_temp_raw: cache.water_temp,
            intake_temp_raw: cache.intake_temp,
            front_wheel_speed_raw: cache.front_wheel_speed,
            rear_wheel_speed_raw: cache.rear_wheel_speed,
            fuel_counter_raw: cache.fuel_counter,
            fuel_lap_baseline_raw: cache.fuel_lap_baseline.unwrap_or(cache.fuel_counter),
            lean_raw: cache.lean,
            lean_signed_raw: cache.lean_signed,
            pitch_raw: cache.pitch,
            acc_x_raw: cache.acc_x,
            acc_y_raw: cache.acc_y,
            front_brake_raw: cache.front_brake,
            rear_brake_raw: cache.rear_brake,
            front_abs: cache.front_abs,
            rear_abs: cache.rear_abs,
            traction: cache.traction,
            slide: cache.slide,
            lift: cache.lift,
            launch: cache.launch,
        }
    }

    /// `true` until the first GPS fix is received; downstream consumers
    /// should treat coordinates as invalid while this holds.
    pub fn has_gps_fix(&self) -> bool {
        self.latitude != GPS_SENTINEL || self.longitude != GPS_SENTINEL
    }

    pub fn rpm(&self) -> f64 {
        calibration::rpm(self.rpm_raw)
    }

    pub fn aps_percent(&self) -> f64 {
        calibration::throttle_percent(self.aps_raw)
    }

    pub fn tps_percent(&self) -> f64 {
        calibration::throttle_percent(self.tps_raw)
    }

    pub fn water_temp_celsius(&self) -> f64 {
        calibration::temperature_celsius(self.water_temp_raw)
    }

    pub fn intake_temp_celsius(&self) -> f64 {
        calibration::temperature_celsius(self.intake_temp_raw)
    }

    pub fn front_wheel_speed_kmh(&self) -> f64 {
        calibration::wheel_speed_kmh(self.front_wheel_speed_raw)
    }

    pub fn rear_wheel_speed_kmh(&self) -> f64 {
        calibration::wheel_speed_kmh(self.rear_wheel_speed_raw)
    }

    pub fn fuel_cc(&self) -> f64 {
        calibration::fuel_cc(self.fuel_counter_raw, self.fuel_lap_baseline_raw)
    }

    pub fn lean_degrees(&self) -> f64 {
        calibration::lean_degrees(self.lean_raw)
    }

    pub fn lean_signed_degrees(&self) -> f64 {
        calibration::lean_degrees(self.lean_signed_raw)
    }

    pub fn pitch_degrees_per_sec(&self) -> f64 {
        calibration::pitch_degrees_per_sec(self.pitch_raw)
    }

    pub fn acc_x_g(&self) -> f64 {
        calibration::acceleration_g(self.acc_x_raw)
    }

    pub fn acc_y_g(&self) -> f64 {
        calibration::acceleration_g(self.acc_y_raw)
    }

    pub fn front_brake_bar(&self) -> f64 {
        calibration::brake_bar(self.front_brake_raw)
    }

    pub fn rear_brake_bar(&self) -> f64 {
        calibration::brake_bar(self.rear_brake_raw)
    }

    pub fn gps_speed_kmh(&self) -> f64 {
        calibration::gps_speed_kmh(self.gps_speed_knots)
    }
}
