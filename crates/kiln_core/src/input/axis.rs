//! Raw gamepad readings to normalized controller values.

/// Smallest raw reading a signed 16-bit analog axis reports.
pub const AXIS_MIN_VALUE: i32 = -32768;

/// Largest raw reading a signed 16-bit analog axis reports.
pub const AXIS_MAX_VALUE: i32 = 32767;

/// Half-width of the band around center that reads as exactly zero:
/// one eighth of the full raw range.
pub const DEAD_ZONE_RANGE: i32 = (AXIS_MAX_VALUE - AXIS_MIN_VALUE) / 8;

/// Maps a raw analog reading to [-1, 1] with a dead zone.
///
/// Readings inside `±DEAD_ZONE_RANGE` map to `0.0`. Outside it the value is
/// rescaled linearly so the dead-zone edge maps to `0.0` and the raw
/// extremes map to exactly `-1.0` and `1.0`.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn map_axis_value(raw: i16) -> f32 {
    let value = i32::from(raw);
    if (-DEAD_ZONE_RANGE..=DEAD_ZONE_RANGE).contains(&value) {
        return 0.0;
    }

    if value > 0 {
        (value - DEAD_ZONE_RANGE) as f32 / (AXIS_MAX_VALUE - DEAD_ZONE_RANGE) as f32
    } else {
        (value + DEAD_ZONE_RANGE) as f32 / (-AXIS_MIN_VALUE - DEAD_ZONE_RANGE) as f32
    }
}

/// Digitizes an analog trigger: pressed past half travel.
#[must_use]
pub fn map_trigger_value(raw: i16) -> bool {
    i32::from(raw) > AXIS_MAX_VALUE / 2
}

/// Maps a pair of opposing digital buttons onto an axis value.
///
/// The negative direction wins when both are held.
#[must_use]
pub fn digital_axis(negative: bool, positive: bool) -> f32 {
    if negative {
        -1.0
    } else if positive {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_dead_zone_reads_zero() {
        for raw in [-4096i16, -1, 0, 1, 4096] {
            assert_eq!(map_axis_value(raw), 0.0);
        }
        assert_eq!(map_axis_value(8191), 0.0);
        assert_eq!(map_axis_value(-8191), 0.0);
        assert!(map_axis_value(8192) > 0.0);
        assert!(map_axis_value(-8192) < 0.0);
    }

    #[test]
    fn test_extremes_are_exact() {
        assert_eq!(map_axis_value(i16::MAX), 1.0);
        assert_eq!(map_axis_value(i16::MIN), -1.0);
    }

    #[test]
    fn test_trigger_threshold() {
        assert!(!map_trigger_value(0));
        assert!(!map_trigger_value(16383));
        assert!(map_trigger_value(16384));
        assert!(map_trigger_value(i16::MAX));
    }

    #[test]
    fn test_digital_axis() {
        assert_eq!(digital_axis(false, false), 0.0);
        assert_eq!(digital_axis(true, false), -1.0);
        assert_eq!(digital_axis(false, true), 1.0);
        assert_eq!(digital_axis(true, true), -1.0);
    }

    proptest! {
        #[test]
        fn prop_mapping_is_monotonic(a in any::<i16>(), b in any::<i16>()) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(map_axis_value(low) <= map_axis_value(high));
        }

        #[test]
        fn prop_mapping_stays_in_range(raw in any::<i16>()) {
            let value = map_axis_value(raw);
            prop_assert!((-1.0..=1.0).contains(&value));
        }
    }
}
