//! Audit Log Store
//!
//! Owns every audit record. Mutating services call [`AuditLogStore::append`]
//! with their open transaction so a change and its record commit together.

use sqlx::{SqliteConnection, SqlitePool};

use crate::audit::export_line;
use crate::db::repository::audit_log::{self, NewLog, Subject};
use crate::db::repository::{RepoError, after_service, customer};
use crate::services::begin_audited;
use crate::utils::validation::{MAX_NOTE_LEN, validate_max_len, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    Actor, AuditLogRecord, LogAction, LogCategory, LogExport, LogFilter, LogListItem,
    LogNoteUpdate, LogPayload, RemarkCreate, RemarkDetails,
};
use shared::util::now_millis;
use shared::{Page, PageRequest};

/// One record to append
#[derive(Debug, Clone)]
pub struct LogEntry<'a> {
    pub actor: &'a Actor,
    pub customer_id: Option<i64>,
    pub after_service_id: Option<i64>,
    pub action: LogAction,
    pub note: &'a str,
    pub payload: LogPayload,
}

#[derive(Clone, Debug)]
pub struct AuditLogStore {
    pool: SqlitePool,
}

impl AuditLogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a record inside the caller's transaction; returns the new id.
    ///
    /// Any failure is reported as `AuditAppendFailed`. The caller must
    /// propagate it without committing so the paired mutation rolls back.
    pub async fn append(conn: &mut SqliteConnection, entry: LogEntry<'_>) -> AppResult<i64> {
        let action = entry.action;
        if entry.payload.category() != action.category() {
            return Err(AppError::with_message(
                ErrorCode::LogPayloadMismatch,
                format!(
                    "payload '{}' cannot be filed under action '{action}'",
                    entry.payload.category().as_str()
                ),
            ));
        }

        let log = NewLog {
            admin_id: &entry.actor.id,
            customer_id: entry.customer_id,
            after_service_id: entry.after_service_id,
            action,
            note: entry.note,
            payload: &entry.payload,
        };

        match audit_log::insert(conn, log, now_millis()).await {
            Ok(id) => Ok(id),
            Err(e) => {
                tracing::error!(
                    action = %action,
                    actor_id = %entry.actor.id,
                    customer_id = ?entry.customer_id,
                    after_service_id = ?entry.after_service_id,
                    error = %e,
                    "Audit append failed, rolling back mutation"
                );
                Err(AppError::audit_append_failed(action.to_string(), e.to_string()))
            }
        }
    }

    /// Single record with display info
    pub async fn get(&self, id: i64) -> AppResult<LogListItem> {
        audit_log::find_item(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::log_not_found(id))
    }

    /// Correct the note (and optionally the payment type) of a record.
    ///
    /// Actor, category, action and created_at are never touched.
    pub async fn update_note(&self, id: i64, update: LogNoteUpdate) -> AppResult<AuditLogRecord> {
        validate_max_len(&update.note, "note", MAX_NOTE_LEN)?;

        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;

        let mut record = audit_log::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::log_not_found(id))?;

        if let Some(patch) = update.payload_patch.filter(|p| !p.is_empty()) {
            match &mut record.payload {
                LogPayload::Stamp(details) => {
                    if patch.payment_type.is_some() {
                        details.payment_type = patch.payment_type;
                    }
                }
                other => {
                    return Err(AppError::with_message(
                        ErrorCode::LogPayloadMismatch,
                        format!(
                            "payment type can only be set on stamp logs, not '{}'",
                            other.category().as_str()
                        ),
                    )
                    .with_detail("log_id", id));
                }
            }
        }
        record.note = update.note;

        let affected = audit_log::update_note(&mut *tx, id, &record.note, &record.payload).await?;
        if affected == 0 {
            return Err(AppError::log_not_found(id));
        }
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(log_id = id, action = %record.action, "Log note updated");
        Ok(record)
    }

    /// Records about one customer or ticket, newest first
    pub async fn list_by_subject(
        &self,
        subject: Subject,
        category: Option<LogCategory>,
        page: PageRequest,
    ) -> AppResult<Page<LogListItem>> {
        let records = audit_log::list(&self.pool, Some(subject), category, None, page).await?;
        Ok(Page::new(records))
    }

    /// Records across all subjects, newest first
    pub async fn list_all(&self, filter: &LogFilter, page: PageRequest) -> AppResult<Page<LogListItem>> {
        let records = audit_log::list(
            &self.pool,
            None,
            filter.category,
            filter.actor_id.as_deref(),
            page,
        )
        .await?;
        Ok(Page::new(records))
    }

    /// Free-text staff remark on a customer and/or ticket
    pub async fn add_remark(&self, actor: &Actor, remark: RemarkCreate) -> AppResult<LogListItem> {
        validate_required_text(&remark.note, "note", MAX_NOTE_LEN)?;
        if remark.customer_id.is_none() && remark.after_service_id.is_none() {
            return Err(AppError::validation(
                "remark needs a customer_id or an after_service_id",
            ));
        }

        let mut tx = begin_audited(&self.pool, actor).await?;

        let mut customer_id = remark.customer_id;
        if let Some(ticket_id) = remark.after_service_id {
            let ticket = after_service::find_by_id(&mut *tx, ticket_id)
                .await?
                .ok_or_else(|| AppError::ticket_not_found(ticket_id))?;
            customer_id.get_or_insert(ticket.customer_id);
        }
        if let Some(id) = customer_id {
            if !customer::exists(&mut *tx, id).await? {
                return Err(AppError::customer_not_found(id));
            }
        }

        let id = Self::append(
            &mut tx,
            LogEntry {
                actor,
                customer_id,
                after_service_id: remark.after_service_id,
                action: LogAction::Remark,
                note: remark.note.trim(),
                payload: LogPayload::Remark(RemarkDetails {}),
            },
        )
        .await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(log_id = id, customer_id = ?customer_id, "Remark added");
        self.get(id).await
    }

    /// Ledger-sheet line for a stamp record
    pub async fn export(&self, id: i64) -> AppResult<LogExport> {
        let item = self.get(id).await?;
        if item.record.category != LogCategory::Stamp {
            return Err(AppError::with_message(
                ErrorCode::LogPayloadMismatch,
                "only stamp logs can be exported",
            )
            .with_detail("log_id", id));
        }
        Ok(LogExport {
            log_id: id,
            line: export_line(
                &item.record,
                item.customer_name.as_deref(),
                item.customer_phone.as_deref(),
            ),
        })
    }
}
