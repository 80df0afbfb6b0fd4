// crates/sirsi-core/src/contract.rs
//
// Contract ledger records. The control plane only needs counts and revenue
// totals from the contracts domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AdminError;
use crate::validate;

/// Currency every ledger total is reported in.
pub const BASE_CURRENCY: &str = "USD";

/// An amount of money in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount_cents: i64,
    pub currency: String,
}

impl Money {
    pub fn zero(currency: &str) -> Self {
        Self {
            amount_cents: 0,
            currency: currency.to_string(),
        }
    }

    pub fn usd(amount_cents: i64) -> Self {
        Self {
            amount_cents,
            currency: BASE_CURRENCY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRecord {
    pub id: Uuid,
    /// Human reference, e.g. "FW-992".
    pub reference: String,
    #[serde(default)]
    pub tenant_id: Option<Uuid>,
    pub amount: Money,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContractDraft {
    pub reference: String,
    #[serde(default)]
    pub tenant_id: Option<Uuid>,
    pub amount: Money,
}

impl ContractRecord {
    pub fn from_draft(id: Uuid, draft: ContractDraft, now: DateTime<Utc>) -> Result<Self, AdminError> {
        validate::non_empty("reference", &draft.reference)?;
        if draft.amount.currency != BASE_CURRENCY {
            return Err(AdminError::Validation(format!(
                "Unsupported currency {}; ledger currency is {}",
                draft.amount.currency, BASE_CURRENCY
            )));
        }
        if draft.amount.amount_cents < 0 {
            return Err(AdminError::Validation(
                "Contract amount must not be negative".to_string(),
            ));
        }
        Ok(ContractRecord {
            id,
            reference: draft.reference,
            tenant_id: draft.tenant_id,
            amount: draft.amount,
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_currency_rejected() {
        let draft = ContractDraft {
            reference: "FW-992".to_string(),
            tenant_id: None,
            amount: Money {
                amount_cents: 100,
                currency: "EUR".to_string(),
            },
        };
        let res = ContractRecord::from_draft(Uuid::now_v7(), draft, Utc::now());
        assert!(matches!(res, Err(AdminError::Validation(_))));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let draft = ContractDraft {
            reference: "FW-993".to_string(),
            tenant_id: None,
            amount: Money::usd(-1),
        };
        assert!(ContractRecord::from_draft(Uuid::now_v7(), draft, Utc::now()).is_err());
    }
}
