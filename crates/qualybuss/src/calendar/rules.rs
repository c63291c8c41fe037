use super::Holiday;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Serialize, Serializer};
use std::fmt;

/// Why a vacation period may not start on a given date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    RestDay,
    PrecedesWeeklyRest { days_before: u8 },
    IsHoliday { name: String },
    PrecedesHoliday { name: String, days_before: u8 },
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::RestDay => write!(f, "rest day"),
            BlockReason::PrecedesWeeklyRest { .. } => write!(f, "precedes weekly rest"),
            BlockReason::IsHoliday { name } => write!(f, "is holiday: {name}"),
            BlockReason::PrecedesHoliday { name, .. } => write!(f, "precedes holiday: {name}"),
        }
    }
}

impl Serialize for BlockReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accumulated verdict for a candidate start date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartDateCheck {
    pub blocked: bool,
    pub reasons: Vec<BlockReason>,
}

impl StartDateCheck {
    fn from_reasons(reasons: Vec<BlockReason>) -> Self {
        Self {
            blocked: !reasons.is_empty(),
            reasons,
        }
    }

    pub fn summary(&self) -> String {
        self.reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Start-date evaluator parameterised by the weekly rest day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartDateRules {
    rest_day: Weekday,
}

impl Default for StartDateRules {
    fn default() -> Self {
        Self::new(Weekday::Sun)
    }
}

impl StartDateRules {
    pub fn new(rest_day: Weekday) -> Self {
        Self { rest_day }
    }

    pub fn rest_day(&self) -> Weekday {
        self.rest_day
    }

    /// Every rule runs; reasons accumulate in rule order.
    pub fn evaluate(&self, date: NaiveDate, holidays: &[Holiday]) -> StartDateCheck {
        let mut reasons = Vec::new();

        if date.weekday() == self.rest_day {
            reasons.push(BlockReason::RestDay);
        }

        let days_to_rest = days_until(date.weekday(), self.rest_day);
        if days_to_rest == 1 || days_to_rest == 2 {
            reasons.push(BlockReason::PrecedesWeeklyRest {
                days_before: days_to_rest,
            });
        }

        for holiday in holidays.iter().filter(|holiday| holiday.date == date) {
            reasons.push(BlockReason::IsHoliday {
                name: holiday.name.clone(),
            });
        }

        for days_before in [1u8, 2] {
            // Nothing lies past the last representable date.
            let Some(ahead) = date.checked_add_days(Days::new(u64::from(days_before))) else {
                continue;
            };
            for holiday in holidays.iter().filter(|holiday| holiday.date == ahead) {
                reasons.push(BlockReason::PrecedesHoliday {
                    name: holiday.name.clone(),
                    days_before,
                });
            }
        }

        StartDateCheck::from_reasons(reasons)
    }
}

/// Evaluates `date` with Sunday as the weekly rest day.
pub fn is_blocked_for_start(date: NaiveDate, holidays: &[Holiday]) -> StartDateCheck {
    StartDateRules::default().evaluate(date, holidays)
}

fn days_until(from: Weekday, to: Weekday) -> u8 {
    let from = from.num_days_from_monday();
    let to = to.num_days_from_monday();
    ((to + 7 - from) % 7) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn christmas() -> Vec<Holiday> {
        vec![Holiday::national(date(2025, 12, 25), "Natal")]
    }

    #[test]
    fn last_representable_date_is_evaluated() {
        let check = is_blocked_for_start(NaiveDate::MAX, &[]);
        assert_eq!(check.blocked, !check.reasons.is_empty());

        let eve = NaiveDate::MAX.pred_opt().expect("day before max");
        let holidays = vec![Holiday::national(NaiveDate::MAX, "Último dia")];
        assert!(is_blocked_for_start(eve, &holidays)
            .reasons
            .iter()
            .any(|reason| reason.to_string() == "precedes holiday: Último dia"));
    }

    #[test]
    fn sunday_is_a_rest_day() {
        // 2025-12-07 is a Sunday
        let check = is_blocked_for_start(date(2025, 12, 7), &[]);
        assert!(check.blocked);
        assert_eq!(check.reasons, vec![BlockReason::RestDay]);
    }

    #[test]
    fn friday_and_saturday_precede_weekly_rest() {
        let friday = is_blocked_for_start(date(2025, 12, 5), &[]);
        assert_eq!(
            friday.reasons,
            vec![BlockReason::PrecedesWeeklyRest { days_before: 2 }]
        );

        let saturday = is_blocked_for_start(date(2025, 12, 6), &[]);
        assert_eq!(
            saturday.reasons,
            vec![BlockReason::PrecedesWeeklyRest { days_before: 1 }]
        );
    }

    #[test]
    fn plain_weekday_is_allowed() {
        let check = is_blocked_for_start(date(2025, 12, 3), &christmas());
        assert!(!check.blocked);
        assert!(check.reasons.is_empty());
        assert_eq!(check.summary(), "");
    }

    #[test]
    fn holiday_itself_is_blocked() {
        let check = is_blocked_for_start(date(2025, 12, 25), &christmas());
        assert!(check.blocked);
        assert!(check
            .reasons
            .iter()
            .any(|reason| reason.to_string() == "is holiday: Natal"));
    }

    #[test]
    fn day_before_holiday_is_blocked() {
        let check = is_blocked_for_start(date(2025, 12, 24), &christmas());
        assert_eq!(
            check.reasons,
            vec![BlockReason::PrecedesHoliday {
                name: "Natal".to_string(),
                days_before: 1
            }]
        );
        assert_eq!(check.summary(), "precedes holiday: Natal");
    }

    #[test]
    fn two_days_before_holiday_is_blocked_three_is_not() {
        assert!(is_blocked_for_start(date(2025, 12, 23), &christmas()).blocked);
        assert!(!is_blocked_for_start(date(2025, 12, 22), &christmas()).blocked);
    }

    #[test]
    fn reasons_accumulate_across_rules() {
        // Saturday 2026-11-14 precedes Sunday, and the 15th is Proclamação da República.
        let holidays = vec![
            Holiday::national(date(2026, 11, 15), "Proclamação da República"),
            Holiday::national(date(2026, 11, 14), "Feriado municipal"),
        ];
        let check = is_blocked_for_start(date(2026, 11, 14), &holidays);
        assert_eq!(
            check.reasons,
            vec![
                BlockReason::PrecedesWeeklyRest { days_before: 1 },
                BlockReason::IsHoliday {
                    name: "Feriado municipal".to_string()
                },
                BlockReason::PrecedesHoliday {
                    name: "Proclamação da República".to_string(),
                    days_before: 1
                },
            ]
        );
    }

    #[test]
    fn custom_rest_day_shifts_the_weekly_rules() {
        let rules = StartDateRules::new(Weekday::Sat);
        // Thursday 2025-12-04 is two days before Saturday
        let check = rules.evaluate(date(2025, 12, 4), &[]);
        assert_eq!(
            check.reasons,
            vec![BlockReason::PrecedesWeeklyRest { days_before: 2 }]
        );
        assert!(!rules.evaluate(date(2025, 12, 7), &[]).blocked);
    }

    #[test]
    fn every_rest_day_in_a_year_is_blocked() {
        let mut day = date(2025, 1, 1);
        while day.year() == 2025 {
            if day.weekday() == Weekday::Sun {
                let check = is_blocked_for_start(day, &[]);
                assert!(check.reasons.contains(&BlockReason::RestDay), "{day}");
            }
            day += Duration::days(1);
        }
    }

    #[test]
    fn reasons_serialize_as_display_strings() {
        let check = is_blocked_for_start(date(2025, 12, 24), &christmas());
        let json = serde_json::to_value(&check).expect("serialize");
        assert_eq!(json["blocked"], true);
        assert_eq!(json["reasons"][0], "precedes holiday: Natal");
    }
}
