use meetbook_core::{days_in_month, month_short_name, Date, DateValidationError};

#[test]
fn leap_years_follow_century_rule() {
    assert_eq!(days_in_month(2, 2000), 29);
    for year in [2001, 2002, 2003, 2021, 2023, 2037] {
        assert_eq!(days_in_month(2, year), 28, "year {year}");
    }
}

#[test]
fn month_lengths_cover_the_whole_window() {
    for year in meetbook_core::MIN_YEAR..=meetbook_core::MAX_YEAR {
        for month in 1..=12 {
            let last = days_in_month(month, year);
            assert!(Date::new(year, month, last).is_ok());
            assert!(Date::new(year, month, last + 1).is_err());
        }
    }
}

#[test]
fn date_serialization_uses_named_fields() {
    let date = Date::new(2024, 3, 15).unwrap();
    let json = serde_json::to_value(date).unwrap();
    assert_eq!(json, serde_json::json!({ "year": 2024, "month": 3, "day": 15 }));

    let decoded: Date = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, date);
}

#[test]
fn deserialize_rejects_nonexistent_day() {
    let value = serde_json::json!({ "year": 2023, "month": 2, "day": 29 });
    let err = serde_json::from_value::<Date>(value).unwrap_err();
    assert!(
        err.to_string().contains("day 29 does not exist in 2023-02"),
        "unexpected error: {err}"
    );
}

#[test]
fn changing_month_under_a_late_day_clamps() {
    let date = Date::new(2024, 5, 31).unwrap();
    assert_eq!(date.with_month(6).unwrap().day(), 30);
    assert_eq!(date.with_month(2).unwrap().day(), 29);
    assert_eq!(
        date.with_month(0).unwrap_err(),
        DateValidationError::MonthOutOfRange(0)
    );
    assert_eq!(month_short_name(date.month()), "May");
}
