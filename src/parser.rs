//! Tolerant record parser for ride-hailing trip CSVs.
//!
//! Input files are assumed dirty: embedded headers, stray whitespace,
//! variable column counts, and mixed 12/24-hour timestamp styles all show
//! up in practice. Anything that cannot be read cleanly is rejected with
//! `None` and excluded from aggregation; nothing here ever panics or
//! returns an error for bad data.

use csv::StringRecord;

/// Minimum fields a data row must carry:
/// TripID, PickupZoneID, DropoffZoneID, PickupDateTime, TripDistance, FareAmount.
pub const MIN_FIELDS: usize = 6;

const PICKUP_ZONE_IDX: usize = 1;
const PICKUP_DATETIME_IDX: usize = 3;

/// A validated (pickup zone, pickup hour) pair extracted from one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    /// Upper-cased, trimmed pickup zone identifier.
    pub zone: String,
    /// Pickup hour-of-day in `0..24`.
    pub hour: u8,
}

/// Extracts the pickup zone and hour from one CSV record.
///
/// Returns `None` for anything that is not a clean data row: a header line
/// (first field `TripID`, case-insensitive — checked on every record since
/// dirty files repeat their header mid-stream), fewer than [`MIN_FIELDS`]
/// fields, an empty pickup zone, or a pickup timestamp whose hour cannot
/// be resolved.
pub fn parse_record(record: &StringRecord) -> Option<Trip> {
    let first = record.get(0)?.trim();
    if first.eq_ignore_ascii_case("TripID") {
        return None;
    }

    if record.len() < MIN_FIELDS {
        return None;
    }

    let zone = record.get(PICKUP_ZONE_IDX)?.trim();
    if zone.is_empty() {
        return None;
    }

    let hour = parse_hour(record.get(PICKUP_DATETIME_IDX)?)?;

    Some(Trip {
        zone: zone.to_uppercase(),
        hour,
    })
}

/// Resolves the hour-of-day from a pickup timestamp without committing to
/// any one layout.
///
/// The candidate hour is the run of one or two digits immediately before
/// the first `:` in the text, so `2024-01-01 08:15`, `1/2/2024 9:05 PM`
/// and `08:15:30` all resolve. A timestamp containing `AM`/`PM`
/// (case-insensitive) is read as 12-hour and mapped onto `0..24`; anything
/// else is read as 24-hour. Out-of-range candidates are rejected.
pub fn parse_hour(raw: &str) -> Option<u8> {
    let ts = raw.trim();
    let colon = ts.find(':')?;

    let bytes = ts.as_bytes();
    let mut start = colon;
    while start > 0 && bytes[start - 1].is_ascii_digit() {
        start -= 1;
    }

    let digits = &ts[start..colon];
    if digits.is_empty() || digits.len() > 2 {
        return None;
    }
    let hour: u8 = digits.parse().ok()?;

    let upper = ts.to_ascii_uppercase();
    let pm = upper.contains("PM");
    let am = upper.contains("AM");

    if am || pm {
        if !(1..=12).contains(&hour) {
            return None;
        }
        Some(match (hour, pm) {
            (12, true) => 12,
            (h, true) => h + 12,
            (12, false) => 0,
            (h, false) => h,
        })
    } else if hour <= 23 {
        Some(hour)
    } else {
        None
    }
}
