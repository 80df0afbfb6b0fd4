// crates/sirsi-store/src/ledger.rs
//
// In-memory contract ledger implementing `ContractLedger`.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use sirsi_core::contract::{ContractDraft, ContractRecord, Money, BASE_CURRENCY};
use sirsi_core::error::AdminError;
use sirsi_core::pagination::{paginate, Page, PageRequest};
use sirsi_core::traits::ContractLedger;

use crate::poisoned;

#[derive(Debug, Default)]
pub struct MemoryContractLedger {
    records: RwLock<Vec<ContractRecord>>,
}

impl MemoryContractLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContractLedger for MemoryContractLedger {
    async fn record(&self, draft: ContractDraft) -> Result<ContractRecord, AdminError> {
        let record = ContractRecord::from_draft(Uuid::now_v7(), draft, Utc::now())?;
        self.records
            .write()
            .map_err(poisoned)?
            .push(record.clone());
        Ok(record)
    }

    async fn list(&self, page: &PageRequest) -> Result<Page<ContractRecord>, AdminError> {
        let records = self.records.read().map_err(poisoned)?;
        paginate(
            records
                .iter()
                .enumerate()
                .map(|(i, r)| (i as u64 + 1, r.clone())),
            page,
            records.len() as u64,
        )
    }

    async fn count(&self) -> Result<u64, AdminError> {
        Ok(self.records.read().map_err(poisoned)?.len() as u64)
    }

    async fn revenue_since(&self, since: DateTime<Utc>) -> Result<Money, AdminError> {
        let records = self.records.read().map_err(poisoned)?;
        let amount_cents = records
            .iter()
            .filter(|r| r.created_at >= since)
            .try_fold(0i64, |acc, r| acc.checked_add(r.amount.amount_cents))
            .ok_or_else(|| AdminError::Internal("Revenue total overflowed".to_string()))?;
        Ok(Money {
            amount_cents,
            currency: BASE_CURRENCY.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft(reference: &str, cents: i64) -> ContractDraft {
        ContractDraft {
            reference: reference.to_string(),
            tenant_id: None,
            amount: Money::usd(cents),
        }
    }

    #[tokio::test]
    async fn test_revenue_sums_window() {
        let ledger = MemoryContractLedger::new();
        ledger.record(draft("FW-1", 1_000)).await.unwrap();
        ledger.record(draft("FW-2", 2_500)).await.unwrap();

        let all = ledger
            .revenue_since(Utc::now() - Duration::days(1))
            .await
            .unwrap();
        assert_eq!(all, Money::usd(3_500));

        let none = ledger
            .revenue_since(Utc::now() + Duration::days(1))
            .await
            .unwrap();
        assert_eq!(none, Money::usd(0));
        assert_eq!(ledger.count().await.unwrap(), 2);
    }
}
