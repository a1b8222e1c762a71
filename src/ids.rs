//! Human-readable identity generation (`EMP1001`, `LR1001`, ...).
//!
//! Each kind owns one counter key inside the store. A counter is bumped in
//! the same transaction that writes the record it names, so an id is either
//! persisted together with its record or not handed out at all.

use serde_json::Value;
use strum_macros::{Display, EnumIter};

use crate::store::{StoreError, Transaction};

pub const ID_SEED: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum IdKind {
    Employee,
    LeaveRequest,
    OvertimeRequest,
    Cheque,
    Report,
    Payment,
}

impl IdKind {
    pub fn prefix(self) -> &'static str {
        match self {
            IdKind::Employee => "EMP",
            IdKind::LeaveRequest => "LR",
            IdKind::OvertimeRequest => "OT",
            IdKind::Cheque => "CHQ",
            IdKind::Report => "RPT",
            IdKind::Payment => "PAY",
        }
    }

    pub fn counter_key(self) -> &'static str {
        match self {
            IdKind::Employee => "lastEmployeeId",
            IdKind::LeaveRequest => "lastLeaveRequestId",
            IdKind::OvertimeRequest => "lastOvertimeRequestId",
            IdKind::Cheque => "lastChequeNo",
            IdKind::Report => "lastReportNo",
            IdKind::Payment => "lastPaymentNo",
        }
    }

    /// Numeric part of an id of this kind, if it has the right prefix.
    pub fn sequence_of(self, id: &str) -> Option<u64> {
        id.strip_prefix(self.prefix())?.parse().ok()
    }
}

pub(crate) fn next_id(tx: &mut Transaction, kind: IdKind) -> Result<String, StoreError> {
    let key = kind.counter_key();
    let corrupt = |reason: &str| StoreError::Corrupt {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    let last = match tx.raw(key) {
        None | Some(Value::Null) => ID_SEED,
        Some(Value::String(text)) => text
            .trim()
            .parse::<u64>()
            .map_err(|_| corrupt("counter is not a number"))?,
        Some(Value::Number(n)) => n.as_u64().ok_or_else(|| corrupt("counter is negative"))?,
        Some(_) => return Err(corrupt("counter is not a number")),
    };

    let next = last
        .checked_add(1)
        .ok_or_else(|| corrupt("counter overflow"))?;

    // stored as text, matching how the counters were always kept
    tx.set_raw(key, Value::String(next.to_string()));

    Ok(format!("{}{}", kind.prefix(), next))
}
