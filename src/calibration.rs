//! Pure, stateless raw-to-engineering-unit conversions.
//!
//! Every formula here is fixed by the reference hardware; none of them
//! depend on parser state. Values are returned at full `f64` precision.
//! Rounding calibrated values to a fixed decimal count for CSV-style
//! printing is a downstream exporter concern (see §1 scope), not this
//! crate's.

pub fn rpm(raw: u16) -> f64 {
    raw as f64 / 2.56
}

pub fn throttle_percent(raw: u16) -> f64 {
    ((raw as f64 / 8.192) * 100.0) / 84.96
}

pub fn temperature_celsius(raw: u8) -> f64 {
    raw as f64 / 1.6 - 30.0
}

pub fn wheel_speed_kmh(raw: u16) -> f64 {
    (raw as f64 / 64.0) * 3.6
}

pub fn fuel_cc(raw: u16, lap_baseline: u16) -> f64 {
    (raw as i64 - lap_baseline as i64) as f64 / 100.0
}

pub fn lean_degrees(raw: u16) -> f64 {
    raw as f64 / 100.0 - 90.0
}

pub fn pitch_degrees_per_sec(raw: u16) -> f64 {
    raw as f64 / 100.0 - 300.0
}

pub fn acceleration_g(raw: u16) -> f64 {
    raw as f64 / 1000.0 - 7.0
}

pub fn brake_bar(raw: u16) -> f64 {
    raw as f64 / 32.0
}

pub fn gps_speed_kmh(knots: f64) -> f64 {
    knots * 1.852
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpm_matches_reference_example() {
        assert!((rpm(100) - 39.0625).abs() < 1e-9);
    }

    #[test]
    fn fuel_subtracts_lap_baseline() {
        assert_eq!(fuel_cc(100, 100), 0.0);
        assert_eq!(fuel_cc(200, 100), 1.0);
    }

    #[test]
    fn gps_speed_converts_knots_to_kmh() {
        assert!((gps_speed_kmh(5.14) - 9.51928).abs() < 1e-4);
    }
}
