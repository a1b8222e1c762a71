use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::ids::IdKind;
use crate::model::employee::Employee;
use crate::notify::MailtoLink;
use crate::store::Collection;
use crate::validation::{self, Validate};
use crate::workflow::requests::ReviewableRequest;

use super::{RequestStatus, non_blank, opt_text, text};

/// One row of the overtime sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeSlot {
    #[serde(default, deserialize_with = "text")]
    pub start_date: String,
    #[serde(default, deserialize_with = "text")]
    pub end_date: String,
    #[serde(default, deserialize_with = "text")]
    pub start_time: String,
    #[serde(default, deserialize_with = "text")]
    pub end_time: String,
}

impl OvertimeSlot {
    fn is_complete(&self) -> bool {
        validation::missing_fields(&[
            ("startDate", Some(self.start_date.as_str())),
            ("endDate", Some(self.end_date.as_str())),
            ("startTime", Some(self.start_time.as_str())),
            ("endTime", Some(self.end_time.as_str())),
        ])
        .is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeRequest {
    #[serde(rename = "requestNo", default)]
    pub id: String,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub employee_id: String,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub supervisor: String,
    #[serde(default)]
    pub overtime_details: Vec<OvertimeSlot>,

    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Validate for OvertimeRequest {
    fn validate(&self) -> AppResult<()> {
        validation::require(&[
            ("employeeId", Some(self.employee_id.as_str())),
            ("supervisor", Some(self.supervisor.as_str())),
        ])?;

        if self.overtime_details.is_empty() {
            return Err(AppError::validation(
                "At least one overtime entry is required",
            ));
        }

        for (row, slot) in self.overtime_details.iter().enumerate() {
            if !slot.is_complete() {
                return Err(AppError::validation(format!(
                    "Overtime entry {} is incomplete",
                    row + 1
                )));
            }
            let start = NaiveDate::parse_from_str(slot.start_date.trim(), "%Y-%m-%d");
            let end = NaiveDate::parse_from_str(slot.end_date.trim(), "%Y-%m-%d");
            if let (Ok(start), Ok(end)) = (start, end) {
                validation::check_date_range(start, end)?;
            }
        }

        validation::check_email("email", self.email.as_deref())
    }
}

impl ReviewableRequest for OvertimeRequest {
    const COLLECTION: Collection = Collection::OvertimeRequests;
    const ID_KIND: IdKind = IdKind::OvertimeRequest;
    const LABEL: &'static str = "Overtime request";

    fn id(&self) -> &str {
        &self.id
    }

    fn employee_id(&self) -> &str {
        &self.employee_id
    }

    fn status(&self) -> RequestStatus {
        self.status
    }

    fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_date
    }

    fn decided_at(&self) -> Option<DateTime<Utc>> {
        self.approved_date
    }

    fn open(&mut self, id: String, employee: &Employee, at: DateTime<Utc>) {
        self.id = id;
        self.date = non_blank(self.date.take()).or_else(|| Some(at.date_naive().to_string()));
        self.full_name = Some(employee.full_name());
        self.department = Some(employee.department.clone());
        self.email = non_blank(self.email.take()).or_else(|| employee.email.clone());
        self.supervisor = self.supervisor.trim().to_string();
        self.status = RequestStatus::Pending;
        self.submitted_date = Some(at);
        self.approved_date = None;
        self.approved_by = None;
        self.comments = None;
    }

    fn close(
        &mut self,
        status: RequestStatus,
        decided_by: &str,
        comments: Option<String>,
        at: DateTime<Utc>,
    ) {
        self.status = status;
        self.approved_date = Some(at);
        self.approved_by = Some(decided_by.to_string());
        self.comments = comments;
    }

    fn decision_notice(&self) -> Option<MailtoLink> {
        MailtoLink::to_address(
            self.email.as_deref(),
            format!("Overtime Request {}", self.status),
            format!(
                "Your overtime request {} has been {}.",
                self.id,
                self.status.to_string().to_lowercase()
            ),
        )
    }
}
