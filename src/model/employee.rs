use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::Display;
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::validation::{self, Validate};

use super::{opt_text, text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Pending,
    Approved,
    Rejected,
}

/// Marks a pending record that proposes changes to an existing employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Update,
}

/// Employee profile as persisted in `employeeData` / `pendingEmployees`.
///
/// Fields the service does not know about are kept in `extra` and written
/// back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default)]
    pub id: String,

    #[serde(default, deserialize_with = "text")]
    pub first_name: String,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub last_name: String,

    #[serde(default, deserialize_with = "text")]
    pub department: String,
    #[serde(default, deserialize_with = "text")]
    pub position: String,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub date_hired: String,
    #[serde(default, deserialize_with = "text")]
    pub salary: String,

    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub bank_details: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub trn: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub attendance_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    #[serde(default)]
    pub status: EmployeeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub change: Option<ChangeKind>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keys owned by the service; a client patch may not set them.
pub const MANAGED_KEYS: &[&str] = &[
    "id",
    "status",
    "dateCreated",
    "lastModified",
    "approvalDate",
    "rejectionDate",
    "approvalComments",
    "decidedBy",
    "originalId",
    "type",
];

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    pub fn is_update_proposal(&self) -> bool {
        self.change == Some(ChangeKind::Update) && self.original_id.is_some()
    }

    /// When the record was last decided on, whichever way it went.
    pub fn decided_at(&self) -> Option<DateTime<Utc>> {
        self.approval_date.or(self.rejection_date)
    }

    pub(crate) fn clear_decision(&mut self) {
        self.approval_date = None;
        self.rejection_date = None;
        self.approval_comments = None;
        self.decided_by = None;
    }

    /// Case-insensitive substring match over the searchable columns.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [
            self.id.as_str(),
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.department.as_str(),
            self.position.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

impl Validate for Employee {
    fn validate(&self) -> AppResult<()> {
        validation::require(&[
            ("firstName", Some(self.first_name.as_str())),
            ("lastName", Some(self.last_name.as_str())),
            ("department", Some(self.department.as_str())),
            ("position", Some(self.position.as_str())),
            ("dateHired", Some(self.date_hired.as_str())),
            ("salary", Some(self.salary.as_str())),
        ])?;
        validation::check_amount("salary", &self.salary)?;
        validation::check_email("email", self.email.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use serde_json::json;

    fn ada() -> Value {
        json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "department": "Engineering",
            "position": "Analyst",
            "dateHired": "2024-01-01",
            "salary": "50000"
        })
    }

    #[test]
    fn unknown_fields_round_trip() {
        let mut input = ada();
        input["favouriteColour"] = json!("green");
        input["badge"] = json!({"floor": 3});

        let employee: Employee = serde_json::from_value(input).unwrap();
        assert_eq!(employee.extra.get("favouriteColour"), Some(&json!("green")));

        let out = serde_json::to_value(&employee).unwrap();
        assert_eq!(out["badge"], json!({"floor": 3}));
        assert_eq!(out["firstName"], json!("Ada"));
    }

    #[test]
    fn numeric_salary_is_accepted_as_text() {
        let mut input = ada();
        input["salary"] = json!(50000);
        let employee: Employee = serde_json::from_value(input).unwrap();
        assert_eq!(employee.salary, "50000");
    }

    #[test]
    fn status_defaults_to_active_and_serializes_lowercase() {
        let employee: Employee = serde_json::from_value(ada()).unwrap();
        assert_eq!(employee.status, EmployeeStatus::Active);

        let out = serde_json::to_value(&employee).unwrap();
        assert_eq!(out["status"], json!("active"));
    }

    #[test]
    fn validation_reports_missing_required_fields() {
        let mut input = ada();
        input["position"] = json!("   ");
        input.as_object_mut().unwrap().remove("salary");

        let employee: Employee = serde_json::from_value(input).unwrap();
        match employee.validate() {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "Missing required fields: position, salary")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn validation_checks_email_and_salary_format() {
        let mut input = ada();
        input["email"] = json!("not-an-email");
        let employee: Employee = serde_json::from_value(input).unwrap();
        assert!(employee.validate().is_err());

        let mut input = ada();
        input["salary"] = json!("-10");
        let employee: Employee = serde_json::from_value(input).unwrap();
        assert!(employee.validate().is_err());
    }

    #[test]
    fn search_matches_any_column() {
        let mut employee: Employee = serde_json::from_value(ada()).unwrap();
        employee.id = "EMP1001".into();

        assert!(employee.matches("love"));
        assert!(employee.matches("emp1001"));
        assert!(employee.matches("ENGINEER"));
        assert!(!employee.matches("finance"));
    }
}
