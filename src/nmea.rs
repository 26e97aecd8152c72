use log::debug;

/// A validated, parsed `$GPRMC` fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpRmcFix {
    pub latitude: f64,
    pub longitude: f64,
    pub speed_knots: f64,
}

/// Parses and validates a single NMEA sentence, returning a fix only if it
/// is a checksum-valid, status-`A` `$GPRMC` sentence. Every other sentence
/// type, and every rejected `$GPRMC`, is absorbed silently (logged at
/// `debug` level) rather than surfaced as an error — the source hardware is
/// known to emit the occasional garbage sentence.
pub fn parse_gprmc(sentence: &[u8]) -> Option<GpRmcFix> {
    let text = core::str::from_utf8(sentence).ok()?;
    let text = text.trim_end_matches(['\r', '\n']);

    if !text.starts_with("$GPRMC") {
        return None;
    }

    if !validate_checksum(text) {
        debug!("GPRMC sentence failed checksum validation");
        return None;
    }

    let body = match text.find('*') {
        Some(idx) => &text[..idx],
        None => text,
    };

    let fields: Vec<&str> = body.split(',').collect();
    // $GPRMC,time,status,lat,lat_hemi,lon,lon_hemi,speed,course,date,...
    if fields.len() < 8 {
        debug!("GPRMC sentence has too few fields ({})", fields.len());
        return None;
    }

    let status = fields[2];
    if status != "A" {
        debug!("GPRMC sentence status is void ('{status}')");
        return None;
    }

    let latitude = parse_coordinate(fields[3], fields[4], 2)?;
    let longitude = parse_coordinate(fields[5], fields[6], 3)?;
    let speed_knots = if fields[7].is_empty() {
        0.0
    } else {
        fields[7].parse::<f64>().ok()?
    };

    Some(GpRmcFix {
        latitude,
        longitude,
        speed_knots,
    })
}

/// Converts a `DDMM.mmmm` (or `DDDMM.mmmm`) field plus hemisphere letter
/// into signed decimal degrees. `deg_digits` is 2 for latitude, 3 for
/// longitude.
fn parse_coordinate(value: &str, hemisphere: &str, deg_digits: usize) -> Option<f64> {
    if value.len() <= deg_digits {
        return None;
    }
    let deg: f64 = value[..deg_digits].parse().ok()?;
    let min: f64 = value[deg_digits..].parse().ok()?;
    let mut decimal = deg + min / 60.0;
    match hemisphere {
        "S" | "W" => decimal = -decimal,
        "N" | "E" => {}
        _ => return None,
    }
    Some(decimal)
}

/// Verifies the `*HH` trailing checksum: the XOR of every byte between `$`
/// (exclusive) and `*` (exclusive) must equal the two hex digits following
/// `*`.
fn validate_checksum(sentence: &str) -> bool {
    let bytes = sentence.as_bytes();
    let Some(dollar) = bytes.iter().position(|&b| b == b'$') else {
        return false;
    };
    let Some(star) = bytes.iter().position(|&b| b == b'*') else {
        return false;
    };
    if star < dollar || star + 3 > bytes.len() {
        return false;
    }

    let hex = &sentence[star + 1..star + 3];
    let Ok(expected) = u8::from_str_radix(hex, 16) else {
        return false;
    };

    let computed = bytes[dollar + 1..star].iter().fold(0u8, |acc, &b| acc ^ b);
    computed == expected
}
