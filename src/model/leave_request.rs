use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppResult;
use crate::ids::IdKind;
use crate::model::employee::Employee;
use crate::notify::MailtoLink;
use crate::store::Collection;
use crate::validation::{self, Validate};
use crate::workflow::requests::ReviewableRequest;

use super::{RequestStatus, non_blank, opt_date, opt_text, text};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    #[serde(default)]
    pub id: String,
    /// Weak reference into the live employee collection.
    #[serde(default, deserialize_with = "text")]
    pub employee_id: String,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "opt_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "opt_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "text")]
    pub reason: String,

    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LeaveRequest {
    /// Calendar days covered, both ends included.
    pub fn days(&self) -> Option<i64> {
        let (start, end) = (self.start_date?, self.end_date?);
        Some((end - start).num_days() + 1)
    }
}

impl Validate for LeaveRequest {
    fn validate(&self) -> AppResult<()> {
        let start = self.start_date.map(|d| d.to_string());
        let end = self.end_date.map(|d| d.to_string());
        validation::require(&[
            ("employeeId", Some(self.employee_id.as_str())),
            ("startDate", start.as_deref()),
            ("endDate", end.as_deref()),
            ("reason", Some(self.reason.as_str())),
        ])?;

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            validation::check_date_range(start, end)?;
        }
        validation::check_email("email", self.email.as_deref())
    }
}

impl ReviewableRequest for LeaveRequest {
    const COLLECTION: Collection = Collection::LeaveRequests;
    const ID_KIND: IdKind = IdKind::LeaveRequest;
    const LABEL: &'static str = "Leave request";

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
        self.decision_date
    }

    fn open(&mut self, id: String, employee: &Employee, at: DateTime<Utc>) {
        self.id = id;
        self.employee_name = Some(employee.full_name());
        self.department = Some(employee.department.clone());
        self.email = non_blank(self.email.take()).or_else(|| employee.email.clone());
        self.reason = self.reason.trim().to_string();
        self.status = RequestStatus::Pending;
        self.submitted_date = Some(at);
        self.decision_date = None;
        self.decided_by = None;
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
        self.decision_date = Some(at);
        self.decided_by = Some(decided_by.to_string());
        self.comments = comments;
    }

    fn decision_notice(&self) -> Option<MailtoLink> {
        let (start, end) = (self.start_date?, self.end_date?);
        MailtoLink::to_address(
            self.email.as_deref(),
            format!("Leave Request {}", self.status),
            format!(
                "Your leave request from {} to {} has been {}.",
                start,
                end,
                self.status.to_string().to_lowercase()
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use serde_json::json;

    fn request(start: &str, end: &str) -> LeaveRequest {
        serde_json::from_value(json!({
            "employeeId": "EMP1001",
            "startDate": start,
            "endDate": end,
            "reason": "Family visit"
        }))
        .unwrap()
    }

    #[test]
    fn empty_dates_are_reported_missing() {
        let leave = request("", "2026-02-03");
        match leave.validate() {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "Missing required fields: startDate"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn start_after_end_is_rejected() {
        assert!(request("2026-02-05", "2026-02-03").validate().is_err());
        assert!(request("2026-02-03", "2026-02-05").validate().is_ok());
    }

    #[test]
    fn counts_days_inclusively() {
        assert_eq!(request("2026-02-03", "2026-02-05").days(), Some(3));
    }

    #[test]
    fn notice_reads_like_a_sentence() {
        let mut leave = request("2026-02-03", "2026-02-05");
        leave.email = Some("ada@example.com".into());
        leave.status = RequestStatus::Approved;

        let notice = leave.decision_notice().unwrap();
        assert_eq!(notice.subject, "Leave Request APPROVED");
        assert_eq!(
            notice.body,
            "Your leave request from 2026-02-03 to 2026-02-05 has been approved."
        );
    }

    #[test]
    fn serializes_with_stored_field_names() {
        let leave = request("2026-02-03", "2026-02-05");
        let out = serde_json::to_value(&leave).unwrap();
        assert_eq!(out["startDate"], json!("2026-02-03"));
        assert_eq!(out["status"], json!("PENDING"));
    }
}
