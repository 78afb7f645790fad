//! Validation and formatting of `homework_statuses` payloads.
//!
//! Everything here is pure: no I/O, no clock.

use std::{fmt, str::FromStr};

use serde_json::Value;

use crate::errors::{JsonKind, ResponseError, StatusError};

/// Review status of a homework submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [
        HomeworkStatus::Approved,
        HomeworkStatus::Reviewing,
        HomeworkStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Human-readable verdict shown to the user.
    pub fn verdict(self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(StatusError::EmptyStatus);
        }
        HomeworkStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| StatusError::UnknownStatus(s.to_string()))
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One homework entry, as far as the bot cares about it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HomeworkRecord {
    pub name: String,
    pub status: HomeworkStatus,
}

impl HomeworkRecord {
    /// Notification text for this record.
    pub fn message(&self) -> String {
        format!(
            "Изменился статус проверки работы \"{}\". {}",
            self.name,
            self.status.verdict()
        )
    }
}

/// Check the payload shape and return the `homeworks` list unchanged.
pub fn check_response(response: &Value) -> Result<&[Value], ResponseError> {
    let Value::Object(map) = response else {
        return Err(ResponseError::NotAnObject(JsonKind::of(response)));
    };
    if map.is_empty() {
        return Err(ResponseError::Empty);
    }
    let Some(homeworks) = map.get("homeworks") else {
        return Err(ResponseError::MissingHomeworks);
    };
    match homeworks {
        Value::Array(items) => Ok(items.as_slice()),
        other => Err(ResponseError::HomeworksNotAList(JsonKind::of(other))),
    }
}

/// Extract name and status from one record.
pub fn parse_homework(homework: &Value) -> Result<HomeworkRecord, StatusError> {
    let Some(name) = homework.get("homework_name") else {
        tracing::error!("homework record has no `homework_name`");
        return Err(StatusError::MissingField("homework_name"));
    };
    let Value::String(name) = name else {
        return Err(StatusError::WrongFieldType {
            field: "homework_name",
            kind: JsonKind::of(name),
        });
    };

    let status = match homework.get("status") {
        None => return Err(StatusError::MissingField("status")),
        Some(Value::Null) => return Err(StatusError::EmptyStatus),
        Some(Value::String(s)) => s.parse::<HomeworkStatus>()?,
        Some(other) => return Err(StatusError::UnknownStatus(other.to_string())),
    };

    Ok(HomeworkRecord {
        name: name.clone(),
        status,
    })
}

/// Render the notification text for one record.
pub fn parse_status(homework: &Value) -> Result<String, StatusError> {
    parse_homework(homework).map(|hw| hw.message())
}

/// Text of the alert sent when a cycle fails.
pub fn failure_message(error: &dyn fmt::Display) -> String {
    format!("Сбой в работе: {error}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn verdict_table_is_exact() {
        let expected = [
            ("approved", "Работа проверена: ревьюеру всё понравилось. Ура!"),
            ("reviewing", "Работа взята на проверку ревьюером."),
            ("rejected", "Работа проверена: у ревьюера есть замечания."),
        ];
        for (status, verdict) in expected {
            let hw = json!({"homework_name": "hw1", "status": status});
            assert_eq!(
                parse_status(&hw).unwrap(),
                format!("Изменился статус проверки работы \"hw1\". {verdict}")
            );
        }
    }

    #[test]
    fn approved_message_matches_reference_text() {
        let hw = json!({"homework_name": "hw1", "status": "approved"});
        assert_eq!(
            parse_status(&hw).unwrap(),
            "Изменился статус проверки работы \"hw1\". Работа проверена: ревьюеру всё понравилось. Ура!"
        );
    }

    #[test]
    fn extra_fields_are_ignored() {
        let hw = json!({
            "id": 7,
            "homework_name": "user__sprint7.zip",
            "status": "rejected",
            "reviewer_comment": "see notes",
        });
        let rec = parse_homework(&hw).unwrap();
        assert_eq!(rec.name, "user__sprint7.zip");
        assert_eq!(rec.status, HomeworkStatus::Rejected);
    }

    #[test]
    fn bad_status_values() {
        let cases = [
            (json!({"homework_name": "a", "status": ""}), StatusError::EmptyStatus),
            (json!({"homework_name": "a", "status": null}), StatusError::EmptyStatus),
            (
                json!({"homework_name": "a", "status": "Approved"}),
                StatusError::UnknownStatus("Approved".into()),
            ),
            (
                json!({"homework_name": "a", "status": "done"}),
                StatusError::UnknownStatus("done".into()),
            ),
            (
                json!({"homework_name": "a", "status": 3}),
                StatusError::UnknownStatus("3".into()),
            ),
        ];
        for (hw, want) in cases {
            assert_eq!(parse_status(&hw).unwrap_err(), want, "case {hw}");
        }
    }

    #[test]
    fn missing_keys_fail_before_formatting() {
        assert_eq!(
            parse_status(&json!({"status": "approved"})).unwrap_err(),
            StatusError::MissingField("homework_name")
        );
        assert_eq!(
            parse_status(&json!({"homework_name": "a"})).unwrap_err(),
            StatusError::MissingField("status")
        );
        assert_eq!(
            parse_status(&json!("not an object")).unwrap_err(),
            StatusError::MissingField("homework_name")
        );
        assert_eq!(
            parse_status(&json!({"homework_name": 1, "status": "approved"})).unwrap_err(),
            StatusError::WrongFieldType {
                field: "homework_name",
                kind: JsonKind::Number
            }
        );
    }

    #[test]
    fn response_shape_errors_are_distinct() {
        assert_eq!(
            check_response(&json!([])).unwrap_err(),
            ResponseError::NotAnObject(JsonKind::Array)
        );
        assert_eq!(
            check_response(&Value::Null).unwrap_err(),
            ResponseError::NotAnObject(JsonKind::Null)
        );
        assert_eq!(check_response(&json!({})).unwrap_err(), ResponseError::Empty);
        assert_eq!(
            check_response(&json!({"current_date": 1})).unwrap_err(),
            ResponseError::MissingHomeworks
        );
        assert_eq!(
            check_response(&json!({"homeworks": {"homework_name": "a"}})).unwrap_err(),
            ResponseError::HomeworksNotAList(JsonKind::Object)
        );
    }

    #[test]
    fn valid_response_returns_homeworks_unchanged() {
        let resp = json!({
            "homeworks": [{"homework_name": "a", "status": "reviewing"}, {"x": 1}],
            "current_date": 1_700_000_000,
        });
        let hws = check_response(&resp).unwrap();
        assert_eq!(hws.len(), 2);
        assert_eq!(hws[1], json!({"x": 1}));

        assert!(check_response(&json!({"homeworks": []})).unwrap().is_empty());
    }

    #[test]
    fn status_names_round_trip_through_from_str() {
        for st in HomeworkStatus::ALL {
            assert_eq!(st.as_str().parse::<HomeworkStatus>().unwrap(), st);
            assert_eq!(st.to_string(), st.as_str());
        }
    }

    #[test]
    fn failure_message_embeds_error_text() {
        let msg = failure_message(&ResponseError::MissingHomeworks);
        assert_eq!(msg, "Сбой в работе: response has no `homeworks` key");
    }
}
