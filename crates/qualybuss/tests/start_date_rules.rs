use chrono::{Datelike, Duration, NaiveDate, Weekday};
use qualybuss::calendar::{is_blocked_for_start, BlockReason, Holiday, StartDateRules};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn every_day_of(year: i32) -> impl Iterator<Item = NaiveDate> {
    date(year, 1, 1)
        .iter_days()
        .take_while(move |day| day.year() == year)
}

#[test]
fn every_sunday_is_a_rest_day() {
    for day in every_day_of(2025).filter(|day| day.weekday() == Weekday::Sun) {
        let check = is_blocked_for_start(day, &[]);
        assert!(check.blocked, "{day} should be blocked");
        assert!(check.reasons.contains(&BlockReason::RestDay));
    }
}

#[test]
fn mid_week_days_without_holidays_are_open() {
    for day in every_day_of(2025)
        .filter(|day| matches!(day.weekday(), Weekday::Mon | Weekday::Tue | Weekday::Wed))
    {
        let check = is_blocked_for_start(day, &[]);
        assert!(!check.blocked, "{day} should be allowed: {}", check.summary());
    }
}

#[test]
fn days_shortly_before_any_holiday_name_it() {
    let holidays = vec![
        Holiday::national(date(2025, 4, 21), "Tiradentes"),
        Holiday::national(date(2025, 9, 7), "Independência do Brasil"),
        Holiday::national(date(2025, 11, 20), "Dia da Consciência Negra"),
    ];

    for holiday in &holidays {
        for offset in [1, 2] {
            let candidate = holiday.date - Duration::days(offset);
            let check = is_blocked_for_start(candidate, &holidays);
            let expected = format!("precedes holiday: {}", holiday.name);
            assert!(
                check.reasons.iter().any(|reason| reason.to_string() == expected),
                "{candidate} should mention {}",
                holiday.name
            );
        }
    }
}

#[test]
fn christmas_and_christmas_eve() {
    let holidays = vec![Holiday::national(date(2025, 12, 25), "Natal")];

    let christmas = is_blocked_for_start(date(2025, 12, 25), &holidays);
    assert!(christmas.blocked);
    assert!(christmas
        .reasons
        .iter()
        .any(|reason| reason.to_string() == "is holiday: Natal"));

    let eve = is_blocked_for_start(date(2025, 12, 24), &holidays);
    assert!(eve.blocked);
    assert!(eve
        .reasons
        .iter()
        .any(|reason| reason.to_string() == "precedes holiday: Natal"));
}

#[test]
fn reasons_accumulate_instead_of_stopping_at_the_first() {
    // Saturday 2026-04-04, the day before Easter Sunday
    let holidays = vec![
        Holiday::national(date(2026, 4, 4), "Sábado de Aleluia"),
        Holiday::national(date(2026, 4, 5), "Páscoa"),
    ];
    let check = is_blocked_for_start(date(2026, 4, 4), &holidays);
    let rendered: Vec<String> = check.reasons.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "precedes weekly rest",
            "is holiday: Sábado de Aleluia",
            "precedes holiday: Páscoa",
        ]
    );
}

#[test]
fn custom_rest_day_moves_the_weekly_rules() {
    let rules = StartDateRules::new(Weekday::Sat);
    // Thursday 2025-11-06 and Friday 2025-11-07 lead into Saturday
    assert!(rules.evaluate(date(2025, 11, 6), &[]).blocked);
    assert!(rules.evaluate(date(2025, 11, 8), &[]).reasons[0] == BlockReason::RestDay);
    // Sunday is an ordinary day under this rule set
    assert!(!rules.evaluate(date(2025, 11, 9), &[]).blocked);
}
