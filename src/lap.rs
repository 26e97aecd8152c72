use crate::header::FinishLine;
use crate::nmea::GpRmcFix;
use log::debug;

/// GPS sentinel value meaning "no fix received yet", matching the on-wire
/// convention used by the source hardware.
pub const GPS_SENTINEL: f64 = 9999.0;

/// Tracks the current and previous valid GPS fix and tests successive
/// segments against the track's finish line.
pub struct FinishLineDetector {
    finish_line: Option<FinishLine>,
    previous_fix: Option<(f64, f64)>,
}

impl FinishLineDetector {
    pub fn new(finish_line: Option<FinishLine>) -> Self {
        FinishLineDetector {
            finish_line,
            previous_fix: None,
        }
    }

    /// Feeds in a new valid fix. Returns `true` if this fix closes a lap
    /// (a finish-line crossing was detected against the previous fix).
    pub fn observe(&mut self, fix: GpRmcFix) -> bool {
        let current = (fix.latitude, fix.longitude);
        let crossed = match (self.finish_line, self.previous_fix) {
            (Some(fl), Some(prev)) => segments_cross(prev, current, fl.p1, fl.p2),
            _ => false,
        };
        if crossed {
            debug!("finish-line crossing detected");
        }
        self.previous_fix = Some(current);
        crossed
    }
}

fn orientation(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> i32 {
    let val = (b.1 - a.1) * (c.0 - b.0) - (b.0 - a.0) * (c.1 - b.1);
    if val.abs() < f64::EPSILON {
        0
    } else if val > 0.0 {
        1
    } else {
        -1
    }
}

fn on_segment(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> bool {
    p.0 <= a.0.max(b.0) && p.0 >= a.0.min(b.0) && p.1 <= a.1.max(b.1) && p.1 >= a.1.min(b.1)
}

/// Standard orientation-triangle segment intersection test. Colinear
/// degenerate cases resolve to "no crossing" except where one endpoint
/// provably lies on the other segment.
fn segments_cross(p1: (f64, f64), q1: (f64, f64), p2: (f64, f64), q2: (f64, f64)) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    if o1 == 0 && on_segment(p1, q1, p2) {
        return true;
    }
    if o2 == 0 && on_segment(p1, q1, q2) {
        return true;
    }
    if o3 == 0 && on_segment(p2, q2, p1) {
        return true;
    }
    if o4 == 0 && on_segment(p2, q2, q1) {
        return true;
    }

    false
}
