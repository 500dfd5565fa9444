// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use studioledger::{Month, Window};

#[test]
fn month_parses_and_displays() {
    let m: Month = "2024-03".parse().unwrap();
    assert_eq!((m.year(), m.number()), (2024, 3));
    assert_eq!(m.to_string(), "2024-03");
    assert!("2024-3".parse::<Month>().is_err());
    assert!("2024-13".parse::<Month>().is_err());
    assert!("March 2024".parse::<Month>().is_err());
}

#[test]
fn month_steps_across_year_boundaries() {
    let dec: Month = "2023-12".parse().unwrap();
    assert_eq!(dec.next().to_string(), "2024-01");
    assert_eq!(dec.next().previous(), dec);
    let feb: Month = "2024-02".parse().unwrap();
    assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    assert!(feb.range().contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
    assert!(!feb.range().contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
}

#[test]
fn window_covers_year_or_month() {
    let year = Window::new(2024, None).unwrap();
    assert_eq!(year.months().len(), 12);
    assert!(year.contains_month("2024-07".parse().unwrap()));
    assert!(!year.contains_month("2025-01".parse().unwrap()));

    let march = Window::new(2024, Some(3)).unwrap();
    assert_eq!(march.month_number(), Some(3));
    assert_eq!(march.to_string(), "2024-03");
    assert!(Window::new(2024, Some(0)).is_err());
}

#[test]
fn month_serializes_as_text() {
    let m: Month = "2024-11".parse().unwrap();
    assert_eq!(serde_json::to_string(&m).unwrap(), "\"2024-11\"");
    let back: Month = serde_json::from_str("\"2024-11\"").unwrap();
    assert_eq!(back, m);
}
