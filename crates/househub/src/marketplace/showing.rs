//! Showing slot validation: bookings need at least a week of lead time, must
//! land on a weekday, and use one of the fixed hourly slots.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};

use super::error::MarketplaceError;

/// Minimum calendar days between booking and the showing itself.
pub const MIN_LEAD_DAYS: i64 = 7;

/// Fixed hourly slots: on the hour, 09:00 through 17:00.
pub const FIRST_SLOT_HOUR: u32 = 9;
pub const LAST_SLOT_HOUR: u32 = 17;

pub fn validate_showing_slot(
    today: NaiveDate,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<(), MarketplaceError> {
    let lead = (date - today).num_days();
    if lead < MIN_LEAD_DAYS {
        return Err(MarketplaceError::InvalidDate(format!(
            "showing must be booked at least {MIN_LEAD_DAYS} days ahead ({lead} given)"
        )));
    }

    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        return Err(MarketplaceError::InvalidDate(format!(
            "showings are not held on weekends ({date} is a {})",
            date.weekday()
        )));
    }

    if time.minute() != 0 || time.second() != 0 {
        return Err(MarketplaceError::InvalidDate(format!(
            "showing time must be a whole-hour slot, got {time}"
        )));
    }

    if !(FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).contains(&time.hour()) {
        return Err(MarketplaceError::InvalidDate(format!(
            "showing slots run {FIRST_SLOT_HOUR:02}:00-{LAST_SLOT_HOUR:02}:00, got {time}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn slot(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).expect("valid time")
    }

    // 2026-08-25 is a Tuesday.
    const TODAY: (i32, u32, u32) = (2026, 8, 25);

    #[test]
    fn accepts_weekday_ten_days_out() {
        let today = date(TODAY.0, TODAY.1, TODAY.2);
        // Friday, 10 days out.
        assert!(validate_showing_slot(today, date(2026, 9, 4), slot(16)).is_ok());
    }

    #[test]
    fn rejects_short_lead_time() {
        let today = date(TODAY.0, TODAY.1, TODAY.2);
        let result = validate_showing_slot(today, date(2026, 8, 28), slot(16));
        assert!(matches!(result, Err(MarketplaceError::InvalidDate(_))));
    }

    #[test]
    fn rejects_weekend_dates() {
        let today = date(TODAY.0, TODAY.1, TODAY.2);
        // Saturday and Sunday, both with plenty of lead time.
        for day in [5, 6] {
            let result = validate_showing_slot(today, date(2026, 9, day), slot(11));
            assert!(matches!(result, Err(MarketplaceError::InvalidDate(_))));
        }
    }

    #[test]
    fn rejects_off_hour_and_out_of_band_slots() {
        let today = date(TODAY.0, TODAY.1, TODAY.2);
        let target = date(2026, 9, 8);
        let half_past = NaiveTime::from_hms_opt(14, 30, 0).expect("valid time");
        assert!(matches!(
            validate_showing_slot(today, target, half_past),
            Err(MarketplaceError::InvalidDate(_))
        ));
        assert!(matches!(
            validate_showing_slot(today, target, slot(7)),
            Err(MarketplaceError::InvalidDate(_))
        ));
        assert!(matches!(
            validate_showing_slot(today, target, slot(20)),
            Err(MarketplaceError::InvalidDate(_))
        ));
    }

    #[test]
    fn boundary_lead_time_is_accepted() {
        let today = date(TODAY.0, TODAY.1, TODAY.2);
        // Exactly seven days out lands on a Tuesday.
        assert!(validate_showing_slot(today, date(2026, 9, 1), slot(9)).is_ok());
    }
}
