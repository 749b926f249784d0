//! Request validation rule sets.
//!
//! Every field owns an ordered chain of rules. All fields are checked, but a
//! field's chain stops at its first failure, so each field reports at most one
//! message. Successful validation yields a fully populated service request.

use std::collections::HashMap;

use serde_json::Value;

use super::error::ApiError;
use crate::task::domain::{FieldViolation, TaskId, TaskStatus, TaskTitle};
use crate::task::services::{CreateTaskRequest, ListTasksRequest, MAX_LIMIT, UpdateTaskRequest};

const TITLE_REQUIRED: &str = "Title is required";
const TITLE_NOT_STRING: &str = "Title must be a string";
const TITLE_EMPTY: &str = "Title cannot be empty";
const TITLE_LENGTH: &str = "Title must be between 1 and 255 characters";
const DESCRIPTION_NOT_STRING: &str = "Description must be a string";
const STATUS_INVALID: &str = "Status must be one of: pending, in-progress, completed";
const ID_INVALID: &str = "Invalid task ID";
const PAGE_INVALID: &str = "Page must be a positive integer";
const LIMIT_INVALID: &str = "Limit must be between 1 and 100";

static NULL_VALUE: Value = Value::Null;

/// A single predicate and the message reported when it fails.
#[derive(Clone, Copy)]
struct Rule {
    check: fn(&Value) -> bool,
    message: &'static str,
}

/// How a missing field is treated.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Presence {
    /// Absent fields are checked as `null`.
    Required,
    /// Absent fields skip the chain; `null` is checked.
    Optional,
    /// Absent and `null` fields both skip the chain.
    Nullable,
}

struct FieldRules {
    field: &'static str,
    presence: Presence,
    rules: &'static [Rule],
}

impl FieldRules {
    fn violation(&self, source: &Value) -> Option<FieldViolation> {
        let value = match (source.get(self.field), self.presence) {
            (None, Presence::Required) => &NULL_VALUE,
            (None, Presence::Optional | Presence::Nullable)
            | (Some(Value::Null), Presence::Nullable) => return None,
            (Some(value), _) => value,
        };
        self.rules
            .iter()
            .find(|rule| !(rule.check)(value))
            .map(|rule| FieldViolation::new(self.field, rule.message))
    }
}

const CREATE_RULES: [FieldRules; 3] = [
    FieldRules {
        field: "title",
        presence: Presence::Required,
        rules: &[
            Rule {
                check: not_blank,
                message: TITLE_REQUIRED,
            },
            Rule {
                check: is_string,
                message: TITLE_NOT_STRING,
            },
            Rule {
                check: title_length,
                message: TITLE_LENGTH,
            },
        ],
    },
    FieldRules {
        field: "description",
        presence: Presence::Nullable,
        rules: &[Rule {
            check: is_string,
            message: DESCRIPTION_NOT_STRING,
        }],
    },
    FieldRules {
        field: "status",
        presence: Presence::Optional,
        rules: &[Rule {
            check: is_status,
            message: STATUS_INVALID,
        }],
    },
];

const UPDATE_RULES: [FieldRules; 2] = [
    FieldRules {
        field: "title",
        presence: Presence::Optional,
        rules: &[
            Rule {
                check: is_string,
                message: TITLE_NOT_STRING,
            },
            Rule {
                check: not_blank,
                message: TITLE_EMPTY,
            },
            Rule {
                check: title_length,
                message: TITLE_LENGTH,
            },
        ],
    },
    FieldRules {
        field: "status",
        presence: Presence::Optional,
        rules: &[Rule {
            check: is_status,
            message: STATUS_INVALID,
        }],
    },
];

fn is_string(value: &Value) -> bool {
    value.is_string()
}

/// Fails for `null` and for strings that are empty after trimming.
fn not_blank(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        _ => true,
    }
}

fn title_length(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|text| (1..=TaskTitle::MAX_CHARS).contains(&text.trim().chars().count()))
}

fn is_status(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|text| TaskStatus::try_from(text).is_ok())
}

fn collect(rules: &[FieldRules], source: &Value) -> Vec<FieldViolation> {
    rules
        .iter()
        .filter_map(|field| field.violation(source))
        .collect()
}

fn string_field(source: &Value, field: &str) -> Option<String> {
    source
        .get(field)
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

fn status_field(source: &Value) -> Option<TaskStatus> {
    source
        .get("status")
        .and_then(Value::as_str)
        .and_then(|text| TaskStatus::try_from(text).ok())
}

/// Validates a create body and builds the service request.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] listing every failing field.
pub fn validate_create(body: &Value) -> Result<CreateTaskRequest, ApiError> {
    let violations = collect(&CREATE_RULES, body);
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }

    let title = string_field(body, "title").unwrap_or_default();
    let mut request = CreateTaskRequest::new(title.trim());
    if let Some(description) = string_field(body, "description") {
        request = request.with_description(description);
    }
    if let Some(status) = status_field(body) {
        request = request.with_status(status);
    }
    Ok(request)
}

/// Validates an update path identifier and body together.
///
/// Only `title` and `status` are read; other fields are ignored.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] listing every failing field, including
/// the path identifier.
pub fn validate_update(raw_id: &str, body: &Value) -> Result<UpdateTaskRequest, ApiError> {
    let id = TaskId::parse(raw_id);
    let mut violations = Vec::new();
    if id.is_err() {
        violations.push(FieldViolation::new("id", ID_INVALID));
    }
    violations.extend(collect(&UPDATE_RULES, body));

    match id {
        Ok(id) if violations.is_empty() => {
            let mut request = UpdateTaskRequest::new(id);
            if let Some(title) = string_field(body, "title") {
                request = request.with_title(title.trim());
            }
            if let Some(status) = status_field(body) {
                request = request.with_status(status);
            }
            Ok(request)
        }
        _ => Err(ApiError::Validation(violations)),
    }
}

/// Validates a path task identifier.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when the value is not a canonical UUID.
pub fn validate_task_id(raw_id: &str) -> Result<TaskId, ApiError> {
    TaskId::parse(raw_id)
        .map_err(|_| ApiError::Validation(vec![FieldViolation::new("id", ID_INVALID)]))
}

/// Validates `page` and `limit` query parameters.
///
/// Values that are present must be integers in range, even when empty.
/// `page` must fit in a `u32` so the reported page matches the request.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] listing every failing parameter.
pub fn validate_list<S: std::hash::BuildHasher>(
    query: &HashMap<String, String, S>,
) -> Result<ListTasksRequest, ApiError> {
    let page = query
        .get("page")
        .map(|raw| parse_bounded(raw, 1, i64::from(u32::MAX)));
    let limit = query
        .get("limit")
        .map(|raw| parse_bounded(raw, 1, i64::from(MAX_LIMIT)));

    let mut violations = Vec::new();
    if matches!(page, Some(None)) {
        violations.push(FieldViolation::new("page", PAGE_INVALID));
    }
    if matches!(limit, Some(None)) {
        violations.push(FieldViolation::new("limit", LIMIT_INVALID));
    }
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }

    Ok(ListTasksRequest::new(page.flatten(), limit.flatten()))
}

fn parse_bounded(raw: &str, min: i64, max: i64) -> Option<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|value| (min..=max).contains(value))
}
