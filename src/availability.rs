//! Per-day slot availability for a hall, derived from its accepted bookings.
//!
//! Each booking claims a slot ("Morning", "Evening" or "Full Day") on every
//! day between its start and end date inclusive. The derivation is recomputed
//! on every request; nothing here is persisted.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::Booking;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayAvailability {
    pub morning: bool,
    pub evening: bool,
    pub full: bool,
}

impl DayAvailability {
    /// A day takes no further bookings once the whole day is claimed,
    /// either by a Full Day booking or by both half-day slots.
    pub fn fully_booked(&self) -> bool {
        self.full || (self.morning && self.evening)
    }

    /// Whether a booking with the given slot would collide with what is
    /// already claimed on this day.
    pub fn conflicts_with(&self, slot: &str) -> bool {
        if self.fully_booked() {
            return true;
        }
        match normalize_slot(slot) {
            Some(Slot::Morning) => self.morning || self.full,
            Some(Slot::Evening) => self.evening || self.full,
            Some(Slot::FullDay) => self.morning || self.evening || self.full,
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Morning,
    Evening,
    FullDay,
}

// Slot strings are free text; the client normalizes case only.
fn normalize_slot(slot: &str) -> Option<Slot> {
    match slot.trim().to_lowercase().as_str() {
        "morning" => Some(Slot::Morning),
        "evening" => Some(Slot::Evening),
        "full day" => Some(Slot::FullDay),
        _ => None,
    }
}

/// Expand bookings day-by-day into a per-day map of claimed slots.
/// O(bookings x days); inverted date ranges expand to nothing.
pub fn derive(bookings: &[Booking]) -> BTreeMap<NaiveDate, DayAvailability> {
    let mut map: BTreeMap<NaiveDate, DayAvailability> = BTreeMap::new();

    for booking in bookings {
        let Some(slot) = normalize_slot(&booking.slot) else {
            continue;
        };

        let mut day = booking.start_date;
        while day <= booking.end_date {
            let entry = map.entry(day).or_default();
            match slot {
                Slot::Morning => entry.morning = true,
                Slot::Evening => entry.evening = true,
                Slot::FullDay => entry.full = true,
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
    }

    map
}

/// True when a request for `slot` over `start..=end` collides with any
/// already-claimed slot in `map`.
pub fn range_conflicts(
    map: &BTreeMap<NaiveDate, DayAvailability>,
    start: NaiveDate,
    end: NaiveDate,
    slot: &str,
) -> bool {
    map.range(start..=end).any(|(_, day)| day.conflicts_with(slot))
}
