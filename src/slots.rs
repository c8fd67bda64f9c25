//! Fixed time-slot labels for booking.
//!
//! Slots run from 09:00 AM to 05:00 PM inclusive at 15-minute intervals,
//! which yields 33 labels. The display label (`"09:15 AM"`) is the slot's
//! identity: it is stored on appointments and compared verbatim. Ordering
//! goes through [`slot_index`], never through string comparison of labels.

use chrono::NaiveTime;
use once_cell::sync::Lazy;

/// Opening hour (24h clock).
pub const OPEN_HOUR: u32 = 9;
/// Closing hour (24h clock); the closing slot itself is bookable.
pub const CLOSE_HOUR: u32 = 17;
/// Minutes between consecutive slots.
pub const SLOT_MINUTES: u32 = 15;

static SLOT_LABELS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut labels = Vec::new();
    let mut hour = OPEN_HOUR;
    let mut minute = 0;
    loop {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .expect("slot grid stays within a valid day");
        labels.push(time.format("%I:%M %p").to_string());
        if hour == CLOSE_HOUR && minute == 0 {
            break;
        }
        minute += SLOT_MINUTES;
        if minute >= 60 {
            minute -= 60;
            hour += 1;
        }
    }
    labels
});

/// All bookable slot labels, in chronological order.
pub fn slot_labels() -> &'static [String] {
    &SLOT_LABELS
}

/// Resolve a label to its position in the slot grid.
///
/// Returns `None` unless the label matches a generated slot exactly,
/// including zero-padding and the AM/PM suffix.
pub fn slot_index(label: &str) -> Option<usize> {
    SLOT_LABELS.iter().position(|slot| slot == label)
}

/// True when the label is one of the generated slots.
pub fn is_valid_slot(label: &str) -> bool {
    slot_index(label).is_some()
}
