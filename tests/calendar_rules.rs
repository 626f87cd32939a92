use pdx_reader::{Age, Calendar, CalendarError, CalendarReform, OrdinalDate};

fn ymd(cal: &Calendar, ordinal: OrdinalDate) -> (i32, u32, u32) {
    let date = cal.to_date(ordinal).unwrap();
    (date.year(), date.month(), date.day())
}

#[test]
fn test_epoch_and_known_dates() {
    let cal = Calendar::default();
    assert_eq!(cal.ordinal(1970, 1, 1).unwrap(), OrdinalDate::EPOCH);
    assert_eq!(cal.ordinal(2000, 3, 1).unwrap().days(), 11_017);
    assert_eq!(cal.ordinal(1969, 12, 31).unwrap().days(), -1);
    assert_eq!(ymd(&cal, OrdinalDate::new(10_956)), (1999, 12, 31));
    assert_eq!(cal.ordinal(1, 1, 1).unwrap().days(), -719_164);
    assert_eq!(ymd(&cal, OrdinalDate::new(-719_165)), (-1, 12, 31), "1 BC precedes 1 AD");
}

#[test]
fn test_ordinal_round_trip_across_range() {
    let cal = Calendar::default();
    let mut days = OrdinalDate::MIN.days();
    while days <= OrdinalDate::MAX.days() {
        let ordinal = OrdinalDate::new(days);
        let date = cal.to_date(ordinal).unwrap();
        assert_eq!(cal.to_ordinal(date), ordinal, "round trip of ordinal {}", days);
        days += 9_973;
    }
    // Dense around the reform.
    for days in -141_500..-141_300 {
        let ordinal = OrdinalDate::new(days);
        assert_eq!(cal.to_ordinal(cal.to_date(ordinal).unwrap()), ordinal);
    }
}

#[test]
fn test_date_round_trip_across_range() {
    let cal = Calendar::default();
    for year in (-999_999..=999_999).step_by(997).chain([-1, 1, 4, 1582, 1600, 1700, 2000]) {
        if year == 0 {
            continue;
        }
        for month in 1..=12 {
            let last = Calendar::days_in_month(month as u32, cal.is_leap_year(year)) as i32;
            for day in [1, 15, last] {
                if !cal.is_valid(year, month, day) {
                    continue;
                }
                let date = cal.date(year, month, day).unwrap();
                let back = cal.to_date(cal.to_ordinal(date)).unwrap();
                assert_eq!(back, date, "round trip of {}", date);
            }
        }
    }
}

#[test]
fn test_leap_years() {
    let cal = Calendar::default();
    assert!(!cal.is_leap_year(1900));
    assert!(cal.is_leap_year(2000));
    assert!(cal.is_leap_year(1896));
    assert!(cal.is_leap_year(1500), "Julian rule before the reform");
    assert!(!cal.is_leap_year(1700));
    assert!(cal.is_leap_year(-4));
    assert!(!cal.is_leap_year(-1));

    let british = Calendar::british();
    assert!(british.is_leap_year(1700));
    assert!(!british.is_leap_year(1800));
    assert_eq!(british.leap100_year(), 1800);
    assert_eq!(british.leap400_year(), 2000);
    assert_eq!(cal.leap100_year(), 1600);
    assert_eq!(cal.leap400_year(), 1600);
}

#[test]
fn test_reform_gap() {
    let cal = Calendar::default();
    let last_julian = cal.ordinal(1582, 10, 4).unwrap();
    let first_gregorian = cal.ordinal(1582, 10, 15).unwrap();
    assert_eq!(last_julian.days() + 1, first_gregorian.days());
    for day in 5..=14 {
        assert!(!cal.is_valid(1582, 10, day), "1582-10-{} is in the gap", day);
        assert!(matches!(cal.date(1582, 10, day), Err(CalendarError::InvalidDate { .. })));
    }
    assert_eq!(ymd(&cal, first_gregorian), (1582, 10, 15));
    assert_eq!(ymd(&cal, OrdinalDate::new(first_gregorian.days() + 77)), (1582, 12, 31));
    assert_eq!(ymd(&cal, OrdinalDate::new(first_gregorian.days() + 78)), (1583, 1, 1));
    assert_eq!(Calendar::day_of_week(last_julian), 4, "Thursday");
    assert_eq!(Calendar::day_of_week(first_gregorian), 5, "Friday");

    let british = Calendar::british();
    assert_eq!(british.reform().missing_days(), 11);
    assert_eq!(
        british.ordinal(1752, 9, 2).unwrap().days() + 1,
        british.ordinal(1752, 9, 14).unwrap().days()
    );
    assert!(!british.is_valid(1752, 9, 10));
    assert!(british.is_valid(1582, 10, 10));
    assert_eq!(british.ordinal(1970, 1, 1).unwrap(), OrdinalDate::EPOCH);
}

#[test]
fn test_custom_reform() {
    let reform = CalendarReform::adopted(1752, 9, 14).unwrap();
    assert_eq!(reform, CalendarReform::BRITISH);
    assert_eq!(reform.last_julian(), (1752, 9, 2));
    assert!(CalendarReform::adopted(1500, 10, 15).is_err());
    assert!(CalendarReform::adopted(1700, 3, 1).is_err());
}

#[test]
fn test_custom_reform_round_trip() {
    for (year, month, day) in [(1582, 12, 20), (1583, 10, 22), (1601, 5, 25), (1899, 7, 30), (1923, 3, 20)] {
        let cal = Calendar::new(CalendarReform::adopted(year, month, day).unwrap());

        // Every day from two years before the reform to three years after.
        let start = cal.jan01_of_year(year - 2).days();
        let end = cal.jan01_of_year(year + 3).days();
        for days in start..end {
            let ordinal = OrdinalDate::new(days);
            let date = cal.to_date(ordinal).unwrap();
            assert_eq!(cal.to_ordinal(date), ordinal, "reform {}-{}-{}: {}", year, month, day, date);
        }
        for y in year - 1..=year + 2 {
            assert_eq!(ymd(&cal, cal.jan01_of_year(y)), (y, 1, 1), "reform {}-{}-{}", year, month, day);
        }

        let mut days = OrdinalDate::MIN.days();
        while days <= OrdinalDate::MAX.days() {
            let ordinal = OrdinalDate::new(days);
            assert_eq!(cal.to_ordinal(cal.to_date(ordinal).unwrap()), ordinal);
            days += 99_991;
        }
    }
}

#[test]
fn test_validation() {
    let cal = Calendar::default();
    assert!(cal.is_valid(0, 0, 0));
    assert!(!cal.is_valid(0, 1, 1));
    assert!(!cal.is_valid(2021, 2, 29));
    assert!(cal.is_valid(2020, 2, 29));
    assert!(!cal.is_valid(2021, 13, 1));
    assert!(!cal.is_valid(1_000_000, 1, 1));
    assert!(cal.is_valid(-999_999, 1, 1));
    assert_eq!(cal.to_ordinal(cal.date(0, 0, 0).unwrap()), OrdinalDate::NULL);
    assert!(cal.to_date(OrdinalDate::NULL).unwrap().is_null());
}

#[test]
fn test_bounds() {
    let cal = Calendar::default();
    assert_eq!(cal.min_ordinal(), OrdinalDate::MIN);
    assert_eq!(cal.max_ordinal(), OrdinalDate::MAX);
    assert_eq!(ymd(&cal, OrdinalDate::MIN), (-999_999, 1, 1));
    assert_eq!(ymd(&cal, OrdinalDate::MAX), (999_999, 12, 31));
    assert_eq!(
        cal.to_date(OrdinalDate::new(OrdinalDate::MAX.days() + 1)),
        Err(CalendarError::InvalidOrdinal(OrdinalDate::MAX.days() + 1))
    );
    assert!(cal.to_date(OrdinalDate::new(OrdinalDate::MIN.days() - 1)).is_err());
    assert!(OrdinalDate::checked(OrdinalDate::MAX.days() + 1).is_err());
    assert_eq!(OrdinalDate::checked(i32::MIN), Ok(OrdinalDate::NULL));
}

#[test]
fn test_normalize() {
    let cal = Calendar::default();
    let norm = |y, m, d| {
        let date = cal.normalize(y, m, d).unwrap();
        (date.year(), date.month(), date.day())
    };
    assert_eq!(norm(1954, 9, 31), (1954, 10, 1));
    assert_eq!(norm(1954, 10, -1), (1954, 9, 29));
    assert_eq!(norm(1954, 13, 1), (1955, 1, 1));
    assert_eq!(norm(1954, 0, 1), (1953, 12, 1));
    assert_eq!(norm(1954, -12, 1), (1952, 12, 1));
    assert_eq!(norm(2020, 2, 30), (2020, 3, 1));
    assert_eq!(norm(1582, 10, 5), (1582, 10, 15), "gap days roll forward");
    assert!(cal.normalize(0, 5, 1).is_err());
}

#[test]
fn test_iso_week_number() {
    let cal = Calendar::default();
    let week = |y, m, d| cal.iso_week_number(cal.ordinal(y, m, d).unwrap());
    assert_eq!(week(2016, 1, 1), 53);
    assert_eq!(week(2015, 1, 1), 1);
    assert_eq!(week(2008, 12, 29), 1);
    assert_eq!(week(2010, 1, 3), 53);
    assert_eq!(week(2010, 1, 4), 1);
    assert_eq!(week(2021, 12, 31), 52);
    assert_eq!(cal.iso_week_number(OrdinalDate::NULL), 0);
    assert_eq!(week(1500, 6, 1), 0, "undefined before the mod 100 rule year");
}

#[test]
fn test_day_of_week_and_year() {
    let cal = Calendar::default();
    assert_eq!(Calendar::day_of_week(OrdinalDate::EPOCH), 4);
    assert_eq!(Calendar::iso_day_of_week(OrdinalDate::EPOCH), 4);
    assert_eq!(Calendar::day_of_week(OrdinalDate::new(-1)), 3);
    assert_eq!(Calendar::iso_day_of_week(OrdinalDate::new(3)), 7, "1970-01-04 was a Sunday");
    assert_eq!(Calendar::day_of_week(OrdinalDate::new(3)), 0);
    assert_eq!(Calendar::iso_day_of_week(OrdinalDate::NULL), 0);

    assert_eq!(cal.day_of_year(cal.ordinal(2020, 12, 31).unwrap()), Ok(366));
    assert_eq!(cal.day_of_year(cal.ordinal(1582, 10, 15).unwrap()), Ok(278));
    assert_eq!(cal.jan01_of_year(1971).days(), 365);
}

#[test]
fn test_age() {
    let cal = Calendar::default();
    let d = |y, m, dd| cal.date(y, m, dd).unwrap();
    assert_eq!(
        cal.age(d(2000, 1, 1), d(2020, 6, 15)),
        Age {
            years: 20,
            months: 5,
            days: 14
        }
    );
    assert_eq!(
        cal.age(d(1980, 3, 15), d(2020, 3, 14)),
        Age {
            years: 39,
            months: 11,
            days: 30
        }
    );
    assert_eq!(cal.age(d(2020, 1, 1), d(2000, 1, 1)), Age::default());
}

#[test]
fn test_display_and_timestamp() {
    let cal = Calendar::default();
    let date = cal.date(1999, 12, 31).unwrap();
    assert_eq!(date.to_string(), "1999/12/31");
    assert_eq!(date.to_dmy(), "31-12-1999");
    assert_eq!(cal.date(-44, 3, 15).unwrap().to_string(), "-0044/03/15");
    assert_eq!(cal.date(0, 0, 0).unwrap().to_string(), "");

    assert_eq!(OrdinalDate::new(1).timestamp_millis(), 86_400_000);
    assert_eq!(OrdinalDate::NULL.timestamp_millis(), i64::MIN);
}

#[test]
fn test_serde_preserves_null() {
    let json = serde_json::to_string(&OrdinalDate::NULL).unwrap();
    assert_eq!(json, "-2147483648");
    let back: OrdinalDate = serde_json::from_str(&json).unwrap();
    assert!(back.is_null());

    let epoch: OrdinalDate = serde_json::from_str("0").unwrap();
    assert_eq!(epoch, OrdinalDate::EPOCH);
    assert!(serde_json::from_str::<OrdinalDate>("364522972").is_err());
    assert!(serde_json::from_str::<OrdinalDate>("4294967296").is_err());
}
