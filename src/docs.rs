use crate::api::DecisionBody;
use crate::api::PageQuery;
use crate::api::attendance::{AttendanceQuery, PunchRequest};
use crate::api::employee::{EmployeeQuery, PendingQuery};
use crate::api::payroll::{PaymentQuery, PayrollRequest};
use crate::api::report::CreateReport;
use crate::api::review::RequestQuery;
use crate::auth::session::ROLE_HEADER;
use crate::model::RequestStatus;
use crate::model::employee::EmployeeStatus;
use crate::model::payroll::PayrollSummary;
use crate::model::role::Role;
use crate::notify::MailtoLink;
use crate::workflow::finance::PaymentInput;
use crate::workflow::{Submission, Verdict};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Record Keeper API",
        version = "1.0.0",
        description = r#"
## HR Record Keeper

Employee roster, attendance, leave and overtime requests, payroll, cheques
and salary reports over a single local record store.

### Approval workflow
- Employees submitted by **employees** or **accountants** wait in a pending
  queue until a **manager** or **admin** approves or rejects them.
- Managers and admins add employees directly.
- Leave and overtime requests start `PENDING` and are decided once.

### Session
Every `/api` call carries the session role in the `X-User-Role` header
(`employee`, `manager`, `accountant` or `admin`) and the user name in
`X-User-Name`. Unknown roles are treated as `employee`.

### Response Format
- JSON bodies; errors are `{"message": "..."}`
- Pagination on list endpoints via `page` / `per_page`
"#,
    ),
    paths(
        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::list_pending,
        crate::api::employee::pending_count,
        crate::api::employee::employee_history,
        crate::api::employee::approve_employee,
        crate::api::employee::reject_employee,
        crate::api::employee::export_employees,

        crate::api::leave_request::create_leave,
        crate::api::leave_request::leave_list,
        crate::api::leave_request::pending_leaves,
        crate::api::leave_request::current_leaves,
        crate::api::leave_request::leave_history,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::overtime::create_overtime,
        crate::api::overtime::overtime_list,
        crate::api::overtime::pending_overtime,
        crate::api::overtime::current_overtime,
        crate::api::overtime::overtime_history,
        crate::api::overtime::get_overtime,
        crate::api::overtime::approve_overtime,
        crate::api::overtime::reject_overtime,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::attendance_list,
        crate::api::attendance::total_hours,

        crate::api::payroll::payroll_summary,
        crate::api::payroll::create_payment,
        crate::api::payroll::list_payments,

        crate::api::cheque::create_cheque,
        crate::api::cheque::list_cheques,
        crate::api::cheque::get_cheque,
        crate::api::cheque::delete_cheque,

        crate::api::report::create_report,
        crate::api::report::list_reports,
        crate::api::report::get_report,
        crate::api::report::delete_report
    ),
    components(
        schemas(
            PageQuery,
            EmployeeQuery,
            PendingQuery,
            EmployeeStatus,
            RequestQuery,
            RequestStatus,
            DecisionBody,
            Verdict,
            Submission,
            MailtoLink,
            Role,
            PunchRequest,
            AttendanceQuery,
            PayrollRequest,
            PayrollSummary,
            PaymentInput,
            PaymentQuery,
            CreateReport
        )
    ),
    modifiers(&SessionAddon),
    tags(
        (name = "Employee", description = "Employee roster and approval queue"),
        (name = "Leave", description = "Leave requests"),
        (name = "Overtime", description = "Overtime requests"),
        (name = "Attendance", description = "Clock-in / clock-out"),
        (name = "Payroll", description = "Payroll summaries and payments"),
        (name = "Cheque", description = "Cheque issuing"),
        (name = "Report", description = "Salary reports"),
    )
)]
pub struct ApiDoc;

struct SessionAddon;

impl Modify for SessionAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_role",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ROLE_HEADER))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_workflow_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/employee/pending/{employee_id}/approve"));
        assert!(doc.paths.paths.contains_key("/api/leave/{id}/reject"));
        assert!(
            doc.components
                .as_ref()
                .is_some_and(|c| c.security_schemes.contains_key("session_role"))
        );
    }
}
