use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::validation::{self, Validate};

use super::{RequestStatus, opt_text, text};

/// Accounts cheques can be drawn on: (value, display name).
pub const BANK_ACCOUNTS: &[(&str, &str)] = &[
    ("1", "Main Account - 1234"),
    ("2", "Payroll Account - 5678"),
];

/// Salary cheques are always drawn on the payroll account.
pub const PAYROLL_ACCOUNT: &str = "2";

pub fn bank_account_name(account: &str) -> Option<&'static str> {
    BANK_ACCOUNTS
        .iter()
        .find(|(value, _)| *value == account)
        .map(|(_, name)| *name)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cheque {
    #[serde(default)]
    pub cheque_no: String,
    #[serde(default, deserialize_with = "text")]
    pub date: String,
    #[serde(default, deserialize_with = "text")]
    pub amount: String,
    #[serde(default)]
    pub payee: String,
    #[serde(default, deserialize_with = "text")]
    pub payee_id: String,
    #[serde(default, deserialize_with = "text")]
    pub bank_account: String,
    #[serde(default)]
    pub bank_account_name: String,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Validate for Cheque {
    fn validate(&self) -> AppResult<()> {
        validation::require(&[
            ("payeeId", Some(self.payee_id.as_str())),
            ("amount", Some(self.amount.as_str())),
            ("bankAccount", Some(self.bank_account.as_str())),
            ("date", Some(self.date.as_str())),
        ])?;

        if validation::check_amount("amount", &self.amount)? <= 0.0 {
            return Err(AppError::validation("amount must be greater than zero"));
        }
        if bank_account_name(self.bank_account.trim()).is_none() {
            return Err(AppError::validation(format!(
                "Unknown bank account {}",
                self.bank_account
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cheque(amount: &str, account: &str) -> Cheque {
        serde_json::from_value(json!({
            "payeeId": "EMP1001",
            "amount": amount,
            "bankAccount": account,
            "date": "2026-03-31"
        }))
        .unwrap()
    }

    #[test]
    fn amount_must_be_positive() {
        assert!(cheque("0", "2").validate().is_err());
        assert!(cheque("125.50", "2").validate().is_ok());
    }

    #[test]
    fn account_must_be_known() {
        assert!(cheque("10", "9").validate().is_err());
        assert_eq!(bank_account_name("1"), Some("Main Account - 1234"));
    }
}
