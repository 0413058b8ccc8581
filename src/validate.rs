use serde::Serialize;
use std::collections::HashSet;

use crate::model::ScheduleConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    EmptySchedule,
    MissingDate,
    DuplicateDate,
    EmptyDateEntry,
    IncompleteTime,
    NoYearSelected,
    MissingSubject,
    DuplicateSubject,
}

/// Points at the offending field in document order: the date block, the shift
/// within it, and for assignment-level rules the cohort year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub kind: ViolationKind,
    pub location: ViolationLocation,
    /// The offending date or subject string, for duplicate rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Violation {
    fn at(kind: ViolationKind, location: ViolationLocation) -> Self {
        Violation {
            kind,
            location,
            value: None,
        }
    }
}

fn date_loc(date_index: usize) -> ViolationLocation {
    ViolationLocation {
        date_index: Some(date_index),
        ..Default::default()
    }
}

fn shift_loc(date_index: usize, shift_index: usize) -> ViolationLocation {
    ViolationLocation {
        date_index: Some(date_index),
        shift_index: Some(shift_index),
        year: None,
    }
}

/// Checks a schedule against the global uniqueness and completeness rules.
///
/// All rules are evaluated; every violation is collected in document order so
/// the caller can focus the first one and still list the rest. The config is
/// never mutated or normalized, and an unchanged config re-validates to an
/// identical violation list.
pub fn validate(config: &ScheduleConfig) -> Result<(), Vec<Violation>> {
    // An empty schedule is rejected outright, before any per-entry rules.
    if config.is_empty() {
        return Err(vec![Violation::at(
            ViolationKind::EmptySchedule,
            ViolationLocation::default(),
        )]);
    }

    let mut violations: Vec<Violation> = Vec::new();
    let mut seen_dates: HashSet<String> = HashSet::new();
    let mut seen_subjects: HashSet<String> = HashSet::new();

    for (date_index, entry) in config.0.iter().enumerate() {
        let date = entry.date.trim();
        if date.is_empty() {
            violations.push(Violation::at(ViolationKind::MissingDate, date_loc(date_index)));
        } else if !seen_dates.insert(date.to_string()) {
            // First occurrence is canonical; only repeats are flagged.
            violations.push(Violation {
                kind: ViolationKind::DuplicateDate,
                location: date_loc(date_index),
                value: Some(date.to_string()),
            });
        }

        if entry.shifts.is_empty() {
            violations.push(Violation::at(
                ViolationKind::EmptyDateEntry,
                date_loc(date_index),
            ));
        }

        for (shift_index, shift) in entry.shifts.iter().enumerate() {
            if !shift.time_range.is_complete() {
                violations.push(Violation::at(
                    ViolationKind::IncompleteTime,
                    shift_loc(date_index, shift_index),
                ));
            }

            if shift.assignments.is_empty() {
                violations.push(Violation::at(
                    ViolationKind::NoYearSelected,
                    shift_loc(date_index, shift_index),
                ));
            }

            for assignment in &shift.assignments {
                let location = ViolationLocation {
                    date_index: Some(date_index),
                    shift_index: Some(shift_index),
                    year: Some(assignment.year.clone()),
                };
                let subject = assignment.subject.trim();
                if subject.is_empty() {
                    violations.push(Violation::at(ViolationKind::MissingSubject, location));
                } else if !seen_subjects.insert(subject.to_string()) {
                    // Subject uniqueness is global across the whole schedule,
                    // not per date or per shift.
                    violations.push(Violation {
                        kind: ViolationKind::DuplicateSubject,
                        location,
                        value: Some(subject.to_string()),
                    });
                }
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Assignment, DateEntry, ScheduleConfig, ShiftEntry, TimeParts, TimeRange};

    fn time(h: u32, m: u32, mer: &str) -> TimeParts {
        TimeParts {
            hour: Some(h),
            minute: Some(m),
            meridiem: Some(mer.to_string()),
        }
    }

    fn full_range() -> TimeRange {
        TimeRange {
            start: time(9, 0, "AM"),
            end: time(12, 0, "PM"),
        }
    }

    fn shift(subjects: &[(&str, &str)]) -> ShiftEntry {
        ShiftEntry {
            time_range: full_range(),
            assignments: subjects
                .iter()
                .map(|(year, subject)| Assignment {
                    year: year.to_string(),
                    subject: subject.to_string(),
                })
                .collect(),
        }
    }

    fn entry(date: &str, shifts: Vec<ShiftEntry>) -> DateEntry {
        DateEntry {
            date: date.to_string(),
            shifts,
        }
    }

    #[test]
    fn accepts_a_clean_schedule() {
        let config = ScheduleConfig(vec![
            entry("2024-05-01", vec![shift(&[("II Yr", "CS201")])]),
            entry("2024-05-02", vec![shift(&[("III Yr", "CS301")])]),
        ]);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn empty_schedule_is_rejected_before_per_entry_rules() {
        let violations = validate(&ScheduleConfig(vec![])).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::EmptySchedule);
    }

    #[test]
    fn flags_second_occurrence_of_a_date_only() {
        let config = ScheduleConfig(vec![
            entry("2024-05-01", vec![shift(&[("I Yr", "MA101")])]),
            entry("2024-05-01", vec![shift(&[("II Yr", "MA201")])]),
        ]);
        let violations = validate(&config).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::DuplicateDate);
        assert_eq!(violations[0].location.date_index, Some(1));
        assert_eq!(violations[0].value.as_deref(), Some("2024-05-01"));
    }

    #[test]
    fn subject_uniqueness_is_global_across_dates_and_shifts() {
        let config = ScheduleConfig(vec![
            entry("2024-05-01", vec![shift(&[("III Yr", "CS301")])]),
            entry("2024-05-02", vec![shift(&[("III Yr", "CS301")])]),
        ]);
        let violations = validate(&config).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::DuplicateSubject);
        assert_eq!(violations[0].location.date_index, Some(1));
        assert_eq!(violations[0].location.year.as_deref(), Some("III Yr"));
        assert_eq!(violations[0].value.as_deref(), Some("CS301"));
    }

    #[test]
    fn collects_all_violations_in_document_order() {
        let incomplete = ShiftEntry {
            time_range: TimeRange {
                start: time(9, 0, "AM"),
                end: TimeParts::default(),
            },
            assignments: vec![],
        };
        let config = ScheduleConfig(vec![
            entry("", vec![incomplete]),
            entry("2024-05-02", vec![]),
            entry(
                "2024-05-02",
                vec![shift(&[("I Yr", ""), ("II Yr", "PH201")])],
            ),
        ]);
        let violations = validate(&config).unwrap_err();
        let kinds: Vec<ViolationKind> = violations.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::MissingDate,
                ViolationKind::IncompleteTime,
                ViolationKind::NoYearSelected,
                ViolationKind::EmptyDateEntry,
                ViolationKind::DuplicateDate,
                ViolationKind::MissingSubject,
            ]
        );
    }

    #[test]
    fn date_and_subject_comparison_trims_whitespace() {
        let config = ScheduleConfig(vec![
            entry("2024-05-01", vec![shift(&[("I Yr", "CS101")])]),
            entry(" 2024-05-01 ", vec![shift(&[("II Yr", " CS101 ")])]),
        ]);
        let violations = validate(&config).unwrap_err();
        let kinds: Vec<ViolationKind> = violations.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![ViolationKind::DuplicateDate, ViolationKind::DuplicateSubject]
        );
    }

    #[test]
    fn validation_is_idempotent_and_does_not_mutate() {
        let config = ScheduleConfig(vec![
            entry("2024-05-01", vec![shift(&[("I Yr", "CS101")])]),
            entry("2024-05-01", vec![shift(&[("I Yr", "CS101")])]),
        ]);
        let before = serde_json::to_value(&config).expect("serialize");
        let first = validate(&config).unwrap_err();
        let second = validate(&config).unwrap_err();
        assert_eq!(first, second);
        assert_eq!(before, serde_json::to_value(&config).expect("serialize"));
    }
}
