//! Slot/time model for the broadcast week.
//!
//! The broadcast day runs 06:00 to 02:00 the next morning (20 hours) in
//! `SLOT_MINUTES`-wide slots. All scheduling arithmetic happens in integer
//! slot indices; `hh:mm` strings are a presentation-layer concern only,
//! confined to parsing/formatting at the edges.

use serde::{Deserialize, Serialize};

/// Width of one schedule slot, in minutes.
pub const SLOT_MINUTES: u32 = 5;

/// Number of slots in one broadcast day (06:00 .. 02:00 next day).
pub const SLOTS_PER_DAY: u32 = 240;

/// Number of days in a broadcast week.
pub const DAYS_PER_WEEK: usize = 7;

/// French day names, Monday through Sunday, index-aligned with day indices.
pub const DAY_NAMES_FR: [&str; DAYS_PER_WEEK] = [
    "Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi", "Samedi", "Dimanche",
];

/// Per-day audience multiplier (spec.md Time bands: weekdays 1.0, Sat 1.1, Sun 1.2).
pub fn day_coefficient(day: usize) -> f64 {
    match day {
        5 => 1.1, // Samedi
        6 => 1.2, // Dimanche
        _ => 1.0,
    }
}

/// A contiguous, named interval of slots sharing an audience multiplier and CPM.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeBand {
    pub name: &'static str,
    pub start_slot: u32,
    pub end_slot: u32,
    pub audience_multiplier: f64,
    pub cpm: f64,
}

/// The eight named time bands partitioning the broadcast day, in order.
pub const TIME_BANDS: [TimeBand; 8] = [
    TimeBand { name: "Matin", start_slot: 0, end_slot: 36, audience_multiplier: 0.6, cpm: 5.0 },
    TimeBand { name: "Matinée", start_slot: 36, end_slot: 72, audience_multiplier: 0.4, cpm: 5.0 },
    TimeBand { name: "Midi", start_slot: 72, end_slot: 96, audience_multiplier: 0.9, cpm: 10.0 },
    TimeBand { name: "Après-midi", start_slot: 96, end_slot: 144, audience_multiplier: 0.5, cpm: 5.0 },
    TimeBand { name: "Access Prime", start_slot: 144, end_slot: 168, audience_multiplier: 1.1, cpm: 12.0 },
    TimeBand { name: "Prime Time", start_slot: 168, end_slot: 198, audience_multiplier: 1.3, cpm: 15.0 },
    TimeBand { name: "Deuxième partie", start_slot: 198, end_slot: 222, audience_multiplier: 0.8, cpm: 8.0 },
    TimeBand { name: "Nuit", start_slot: 222, end_slot: 240, audience_multiplier: 0.3, cpm: 3.0 },
];

/// Returns the band containing `slot`. Every slot in `0..SLOTS_PER_DAY` is
/// covered by exactly one band; out-of-range slots fall back to the first band.
pub fn band_for_slot(slot: u32) -> TimeBand {
    TIME_BANDS
        .iter()
        .copied()
        .find(|b| b.start_slot <= slot && slot < b.end_slot)
        .unwrap_or(TIME_BANDS[0])
}

/// Parses an `HH:MM` string into (hour, minute). Returns `None` on malformed input.
pub fn parse_hhmm(s: &str) -> Option<(u32, u32)> {
    let (h, m) = s.split_once(':')?;
    Some((h.parse().ok()?, m.parse().ok()?))
}

/// Converts an `HH:MM` wall-clock string to a slot index relative to the
/// 06:00 schedule start, treating times before 06:00 as the following
/// calendar day (so `01:55` maps to slot 239, the last slot of the day).
pub fn slot_index_from_hhmm(hhmm: &str) -> Option<u32> {
    let (h, m) = parse_hhmm(hhmm)?;
    let start = 6 * 60;
    let mut minutes = h as i64 * 60 + m as i64;
    if minutes < start {
        minutes += 24 * 60;
    }
    Some(((minutes - start) as u32) / SLOT_MINUTES)
}

/// Converts a slot index back to an `HH:MM` wall-clock string.
pub fn hhmm_from_slot_index(slot: u32) -> String {
    let start = 6 * 60;
    let total = (start + slot * SLOT_MINUTES) % (24 * 60);
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_zero_is_six_am() {
        assert_eq!(slot_index_from_hhmm("06:00"), Some(0));
        assert_eq!(hhmm_from_slot_index(0), "06:00");
    }

    #[test]
    fn slot_wraps_past_midnight() {
        assert_eq!(slot_index_from_hhmm("00:30"), Some(222));
        assert_eq!(slot_index_from_hhmm("01:55"), Some(239));
        assert_eq!(hhmm_from_slot_index(239), "01:55");
    }

    #[test]
    fn band_lookup_covers_whole_day() {
        for s in 0..SLOTS_PER_DAY {
            let b = band_for_slot(s);
            assert!(b.start_slot <= s && s < b.end_slot);
        }
    }

    #[test]
    fn band_boundaries_match_spec() {
        assert_eq!(band_for_slot(0).name, "Matin");
        assert_eq!(band_for_slot(143).name, "Après-midi");
        assert_eq!(band_for_slot(144).name, "Access Prime");
        assert_eq!(band_for_slot(167).name, "Access Prime");
        assert_eq!(band_for_slot(168).name, "Prime Time");
        assert_eq!(band_for_slot(221).name, "Deuxième partie");
        assert_eq!(band_for_slot(222).name, "Nuit");
        assert_eq!(band_for_slot(239).name, "Nuit");
    }

    #[test]
    fn day_coefficients_match_spec() {
        assert_eq!(day_coefficient(0), 1.0);
        assert_eq!(day_coefficient(5), 1.1);
        assert_eq!(day_coefficient(6), 1.2);
    }

    #[test]
    fn malformed_hhmm_is_none() {
        assert_eq!(slot_index_from_hhmm("not-a-time"), None);
    }
}
