//! After-Service Ticket Store
//!
//! Tickets start in `received`. Each status change appends an
//! `after-service-{status}` log; which changes are legal depends on the
//! configured [`TransitionPolicy`].

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::audit::{AuditLogStore, LogEntry};
use crate::db::repository::after_service::{self, NewTicket};
use crate::db::repository::{RepoError, customer};
use crate::services::begin_audited;
use crate::utils::validation::{
    MAX_ITEM_NAME_LEN, MAX_NOTE_LEN, validate_max_len, validate_optional_text, validate_quantity,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    Actor, AfterServiceCreate, AfterServiceDetails, AfterServiceFilter, AfterServiceListItem,
    AfterServiceStatus, AfterServiceTicket, LogAction, LogPayload, StatusTransition,
};
use shared::util::now_millis;
use shared::{Page, PageRequest};

/// Which status changes are allowed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Any status to any other status
    #[default]
    Open,
    /// Forward workflow only, see [`AfterServiceStatus::can_transition_to`]
    Strict,
}

impl TransitionPolicy {
    pub fn allows(&self, from: AfterServiceStatus, to: AfterServiceStatus) -> bool {
        match self {
            Self::Open => from != to,
            Self::Strict => from.can_transition_to(to),
        }
    }
}

impl FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown transition policy: {other}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TicketStore {
    pool: SqlitePool,
    policy: TransitionPolicy,
}

impl TicketStore {
    pub fn new(pool: SqlitePool, policy: TransitionPolicy) -> Self {
        Self { pool, policy }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    pub async fn create(&self, actor: &Actor, input: AfterServiceCreate) -> AppResult<AfterServiceTicket> {
        validate_required_text(&input.item_name, "item_name", MAX_ITEM_NAME_LEN)?;
        validate_required_text(&input.symptom, "symptom", MAX_NOTE_LEN)?;
        validate_optional_text(&input.note, "note", MAX_NOTE_LEN)?;
        validate_quantity(input.quantity)?;

        let note = input
            .note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        let mut tx = begin_audited(&self.pool, actor).await?;
        if !customer::exists(&mut *tx, input.customer_id).await? {
            return Err(AppError::customer_not_found(input.customer_id));
        }

        let ticket = after_service::insert(
            &mut *tx,
            NewTicket {
                customer_id: input.customer_id,
                admin_id: &actor.id,
                item_type: input.item_type,
                item_name: input.item_name.trim(),
                quantity: input.quantity,
                symptom: input.symptom.trim(),
                note,
            },
            now_millis(),
        )
        .await?;

        AuditLogStore::append(
            &mut tx,
            LogEntry {
                actor,
                customer_id: Some(ticket.customer_id),
                after_service_id: Some(ticket.id),
                action: LogAction::AfterService(AfterServiceStatus::Received),
                note: note.unwrap_or(""),
                payload: LogPayload::AfterService(AfterServiceDetails {
                    status: AfterServiceStatus::Received,
                    previous_status: None,
                }),
            },
        )
        .await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            ticket_id = ticket.id,
            customer_id = ticket.customer_id,
            "After-service ticket received"
        );
        Ok(ticket)
    }

    /// Ticket with customer and staff display info
    pub async fn get(&self, id: i64) -> AppResult<AfterServiceListItem> {
        after_service::find_item(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::ticket_not_found(id))
    }

    /// Newest first; a blank keyword is ignored
    pub async fn list(
        &self,
        filter: &AfterServiceFilter,
        page: PageRequest,
    ) -> AppResult<Page<AfterServiceListItem>> {
        let keyword = filter
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty());
        let records =
            after_service::list(&self.pool, filter.status, filter.target, keyword, page).await?;
        Ok(Page::new(records))
    }

    pub async fn transition(
        &self,
        actor: &Actor,
        id: i64,
        change: StatusTransition,
    ) -> AppResult<AfterServiceTicket> {
        validate_max_len(&change.note, "note", MAX_NOTE_LEN)?;
        let next = change.status;

        let mut tx = begin_audited(&self.pool, actor).await?;
        let current = after_service::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::ticket_not_found(id))?;

        if current.status == next {
            return Err(AppError::validation(format!("ticket is already '{next}'"))
                .with_detail("status", next.as_str()));
        }
        if !self.policy.allows(current.status, next) {
            return Err(AppError::with_message(
                ErrorCode::IllegalStatusTransition,
                format!("cannot move ticket from '{}' to '{next}'", current.status),
            )
            .with_detail("from", current.status.as_str())
            .with_detail("to", next.as_str()));
        }

        let ticket = after_service::update_status(&mut *tx, id, next, now_millis())
            .await?
            .ok_or_else(|| AppError::ticket_not_found(id))?;

        AuditLogStore::append(
            &mut tx,
            LogEntry {
                actor,
                customer_id: Some(ticket.customer_id),
                after_service_id: Some(id),
                action: LogAction::AfterService(next),
                note: change.note.trim(),
                payload: LogPayload::AfterService(AfterServiceDetails {
                    status: next,
                    previous_status: Some(current.status),
                }),
            },
        )
        .await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            ticket_id = id,
            from = %current.status,
            to = %next,
            "After-service status changed"
        );
        Ok(ticket)
    }
}
