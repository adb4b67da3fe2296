//! Stamp Ledger
//!
//! Non-negative stamp count per customer. Counts change only through
//! single-statement SQL increments/decrements, each paired with its audit
//! record in one transaction.

use sqlx::SqlitePool;

use crate::audit::{AuditLogStore, LogEntry};
use crate::db::repository::{RepoError, customer, stamp};
use crate::services::begin_audited;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    Actor, COUPON_STAMPS, LogAction, LogPayload, PaymentType, StampCount, StampDetails,
};
use shared::util::now_millis;

#[derive(Clone, Debug)]
pub struct StampLedger {
    pool: SqlitePool,
}

/// How a debit treats a customer without a ledger row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MissingLedger {
    NotFound,
    Empty,
}

impl StampLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Current count (0 before the first add)
    pub async fn count(&self, customer_id: i64) -> AppResult<StampCount> {
        if !customer::exists(&self.pool, customer_id).await? {
            return Err(AppError::customer_not_found(customer_id));
        }
        let count = stamp::find_count(&self.pool, customer_id)
            .await?
            .unwrap_or(0);
        Ok(StampCount { customer_id, count })
    }

    /// Add stamps, creating the ledger row on first use
    pub async fn add(
        &self,
        actor: &Actor,
        customer_id: i64,
        amount: i64,
        note: &str,
        payment_type: Option<PaymentType>,
    ) -> AppResult<StampCount> {
        ensure_positive(amount)?;

        let mut tx = begin_audited(&self.pool, actor).await?;
        if !customer::exists(&mut *tx, customer_id).await? {
            return Err(AppError::customer_not_found(customer_id));
        }

        let count = stamp::increment(&mut *tx, customer_id, amount, now_millis()).await?;

        let action = LogAction::AddStamps(amount);
        AuditLogStore::append(
            &mut tx,
            LogEntry {
                actor,
                customer_id: Some(customer_id),
                after_service_id: None,
                action,
                note,
                payload: LogPayload::Stamp(StampDetails {
                    payment_type,
                    balance: count,
                }),
            },
        )
        .await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(customer_id, action = %action, count, "Stamps added");
        Ok(StampCount { customer_id, count })
    }

    /// Remove stamps; fails without touching the count when not enough remain
    pub async fn remove(
        &self,
        actor: &Actor,
        customer_id: i64,
        amount: i64,
        note: &str,
    ) -> AppResult<StampCount> {
        ensure_positive(amount)?;
        self.debit(
            actor,
            customer_id,
            amount,
            LogAction::RemoveStamps(amount),
            note,
            MissingLedger::NotFound,
        )
        .await
    }

    /// Spend one coupon's worth of stamps
    pub async fn redeem(&self, actor: &Actor, customer_id: i64, note: &str) -> AppResult<StampCount> {
        self.debit(
            actor,
            customer_id,
            COUPON_STAMPS,
            LogAction::RedeemCoupon(COUPON_STAMPS),
            note,
            MissingLedger::Empty,
        )
        .await
    }

    async fn debit(
        &self,
        actor: &Actor,
        customer_id: i64,
        amount: i64,
        action: LogAction,
        note: &str,
        missing: MissingLedger,
    ) -> AppResult<StampCount> {
        let mut tx = begin_audited(&self.pool, actor).await?;
        if !customer::exists(&mut *tx, customer_id).await? {
            return Err(AppError::customer_not_found(customer_id));
        }

        let count =
            match stamp::decrement_if_enough(&mut *tx, customer_id, amount, now_millis()).await? {
                Some(count) => count,
                None => {
                    let available = stamp::find_count(&mut *tx, customer_id).await?;
                    return Err(match (available, missing) {
                        (None, MissingLedger::NotFound) => AppError::ledger_not_found(customer_id),
                        (None, MissingLedger::Empty) => AppError::insufficient_stamps(amount, 0),
                        (Some(available), _) => AppError::insufficient_stamps(amount, available),
                    });
                }
            };

        AuditLogStore::append(
            &mut tx,
            LogEntry {
                actor,
                customer_id: Some(customer_id),
                after_service_id: None,
                action,
                note,
                payload: LogPayload::Stamp(StampDetails {
                    payment_type: None,
                    balance: count,
                }),
            },
        )
        .await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(customer_id, action = %action, count, "Stamps removed");
        Ok(StampCount { customer_id, count })
    }
}

fn ensure_positive(amount: i64) -> AppResult<()> {
    if amount <= 0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidStampAmount,
            format!("amount must be positive (got {amount})"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::audit_log::Subject;
    use crate::services::test_support::{
        break_audit_log, create_customer, file_pool, log_count, pool, staff,
    };
    use shared::PageRequest;
    use shared::models::LogCategory;

    async fn setup() -> (SqlitePool, StampLedger, i64) {
        let pool = pool().await;
        let customer_id = create_customer(&pool, "김민수", "01012345678").await;
        (pool.clone(), StampLedger::new(pool), customer_id)
    }

    async fn stamp_logs(pool: &SqlitePool, customer_id: i64) -> Vec<String> {
        AuditLogStore::new(pool.clone())
            .list_by_subject(
                Subject::Customer(customer_id),
                Some(LogCategory::Stamp),
                PageRequest::new(100, 0),
            )
            .await
            .unwrap()
            .records
            .into_iter()
            .map(|item| item.record.action.to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_kim_end_to_end() {
        let (pool, ledger, kim) = setup().await;
        let actor = staff();

        let after_add = ledger.add(&actor, kim, 5, "review bonus", None).await.unwrap();
        assert_eq!(after_add.count, 5);
        assert_eq!(stamp_logs(&pool, kim).await, vec!["add-5"]);

        let after_remove = ledger.remove(&actor, kim, 3, "refund").await.unwrap();
        assert_eq!(after_remove.count, 2);
        assert_eq!(stamp_logs(&pool, kim).await, vec!["remove-3", "add-5"]);

        let err = ledger.redeem(&actor, kim, "").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStamps);
        assert_eq!(ledger.count(kim).await.unwrap().count, 2);
        assert_eq!(stamp_logs(&pool, kim).await.len(), 2);
    }

    #[tokio::test]
    async fn test_add_is_additive_with_one_log_per_call() {
        let (pool, ledger, a) = setup().await;
        let b = create_customer(&pool, "이영희", "01099998888").await;
        let actor = staff();

        ledger.add(&actor, a, 3, "", None).await.unwrap();
        ledger.add(&actor, a, 4, "", None).await.unwrap();
        ledger.add(&actor, b, 7, "", None).await.unwrap();

        assert_eq!(ledger.count(a).await.unwrap().count, 7);
        assert_eq!(ledger.count(b).await.unwrap().count, 7);
        assert_eq!(stamp_logs(&pool, a).await, vec!["add-4", "add-3"]);
    }

    #[tokio::test]
    async fn test_add_records_payment_type_and_balance() {
        let (pool, ledger, kim) = setup().await;
        ledger
            .add(&staff(), kim, 2, "", Some(PaymentType::Cash))
            .await
            .unwrap();

        let page = AuditLogStore::new(pool)
            .list_by_subject(Subject::Customer(kim), Some(LogCategory::Stamp), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(
            page.records[0].record.payload,
            LogPayload::Stamp(StampDetails {
                payment_type: Some(PaymentType::Cash),
                balance: 2,
            })
        );
        assert_eq!(page.records[0].actor_name.as_deref(), Some("박직원"));
    }

    #[tokio::test]
    async fn test_ledger_rejects_non_positive_amounts() {
        let (pool, ledger, kim) = setup().await;
        let before = log_count(&pool).await;

        for amount in [0, -5] {
            let err = ledger.add(&staff(), kim, amount, "", None).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidStampAmount);
            let err = ledger.remove(&staff(), kim, amount, "").await.unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidStampAmount);
        }
        assert_eq!(log_count(&pool).await, before);
    }

    #[tokio::test]
    async fn test_remove_more_than_available_leaves_count_unchanged() {
        let (pool, ledger, kim) = setup().await;
        ledger.add(&staff(), kim, 4, "", None).await.unwrap();
        let before = log_count(&pool).await;

        let err = ledger.remove(&staff(), kim, 5, "").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStamps);
        assert_eq!(err.details.unwrap().get("available").unwrap(), 4);
        assert_eq!(ledger.count(kim).await.unwrap().count, 4);
        assert_eq!(log_count(&pool).await, before);
    }

    #[tokio::test]
    async fn test_remove_to_exactly_zero_keeps_row() {
        let (pool, ledger, kim) = setup().await;
        ledger.add(&staff(), kim, 3, "", None).await.unwrap();
        assert_eq!(ledger.remove(&staff(), kim, 3, "").await.unwrap().count, 0);

        let row = stamp::find_by_customer(&pool, kim).await.unwrap();
        assert_eq!(row.map(|r| r.count), Some(0));
    }

    #[tokio::test]
    async fn test_remove_without_ledger_row_is_not_found() {
        let (_pool, ledger, kim) = setup().await;
        let err = ledger.remove(&staff(), kim, 1, "").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StampLedgerNotFound);
    }

    #[tokio::test]
    async fn test_unknown_customer() {
        let (_pool, ledger, _) = setup().await;
        let err = ledger.add(&staff(), 424242, 1, "", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CustomerNotFound);
        let err = ledger.count(424242).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CustomerNotFound);
    }

    #[tokio::test]
    async fn test_redeem_threshold() {
        let (pool, ledger, kim) = setup().await;

        let err = ledger.redeem(&staff(), kim, "").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStamps);

        ledger.add(&staff(), kim, 9, "", None).await.unwrap();
        let err = ledger.redeem(&staff(), kim, "").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStamps);
        assert_eq!(ledger.count(kim).await.unwrap().count, 9);

        ledger.add(&staff(), kim, 3, "", None).await.unwrap();
        let after = ledger.redeem(&staff(), kim, "쿠폰").await.unwrap();
        assert_eq!(after.count, 2);
        assert_eq!(stamp_logs(&pool, kim).await[0], "coupon-10");
    }

    #[tokio::test]
    async fn test_audit_failure_rolls_back_ledger_write() {
        let (pool, ledger, kim) = setup().await;
        ledger.add(&staff(), kim, 5, "", None).await.unwrap();
        let logs_before = log_count(&pool).await;

        break_audit_log(&pool).await;

        let err = ledger.add(&staff(), kim, 3, "", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AuditAppendFailed);
        assert_eq!(err.details.as_ref().unwrap().get("action").unwrap(), "add-3");

        let err = ledger.remove(&staff(), kim, 2, "").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AuditAppendFailed);

        assert_eq!(ledger.count(kim).await.unwrap().count, 5);
        assert_eq!(log_count(&pool).await, logs_before);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_and_removes_do_not_lose_updates() {
        let dir = tempfile::tempdir().unwrap();
        let pool = file_pool(&dir, 5).await;
        let kim = create_customer(&pool, "김민수", "01012345678").await;
        let ledger = StampLedger::new(pool.clone());
        ledger.add(&staff(), kim, 100, "seed", None).await.unwrap();

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..60 {
            let ledger = ledger.clone();
            tasks.spawn(async move {
                if i % 2 == 0 {
                    ledger.add(&staff(), kim, 1, "", None).await
                } else {
                    ledger.remove(&staff(), kim, 1, "").await
                }
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }

        assert_eq!(ledger.count(kim).await.unwrap().count, 100);
        let actions = stamp_logs(&pool, kim).await;
        assert_eq!(actions.len(), 61);
        assert_eq!(actions.iter().filter(|a| *a == "add-1").count(), 30);
        assert_eq!(actions.iter().filter(|a| *a == "remove-1").count(), 30);
    }
}
