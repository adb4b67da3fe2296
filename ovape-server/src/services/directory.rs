//! Customer Directory
//!
//! Phone uniqueness is the store's `UNIQUE` constraint; a violation comes
//! back as `DuplicatePhone`. Every create/update/delete appends a customer
//! log whose payload is the field diff.

use sqlx::SqlitePool;

use crate::audit::{AuditLogStore, LogEntry, customer_created, customer_deleted, customer_diff};
use crate::db::repository::{RepoError, customer};
use crate::services::begin_audited;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, normalize_phone, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    Actor, Customer, CustomerCreate, CustomerSearch, CustomerSearchTarget, CustomerUpdate,
    CustomerWithStamps, LogAction, LogPayload,
};
use shared::util::{now_millis, phone_digits, snowflake_id};
use shared::{Page, PageRequest};

#[derive(Clone, Debug)]
pub struct CustomerDirectory {
    pool: SqlitePool,
}

/// Trimmed note; blank means none
fn clean_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// Unique-violation on insert/update of a customer can only be the phone
fn map_duplicate(phone: &str) -> impl FnOnce(RepoError) -> AppError + '_ {
    move |err| match err {
        RepoError::Duplicate(_) => AppError::duplicate_phone(phone),
        other => other.into(),
    }
}

impl CustomerDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, actor: &Actor, input: CustomerCreate) -> AppResult<Customer> {
        validate_required_text(&input.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&input.note, "note", MAX_NOTE_LEN)?;
        let phone = normalize_phone(&input.phone)?;

        let now = now_millis();
        let created = Customer {
            id: snowflake_id(),
            name: input.name.trim().to_string(),
            phone,
            gender: input.gender,
            note: clean_note(input.note),
            created_at: now,
            updated_at: now,
        };

        let mut tx = begin_audited(&self.pool, actor).await?;
        customer::insert(&mut *tx, &created)
            .await
            .map_err(map_duplicate(&created.phone))?;

        AuditLogStore::append(
            &mut tx,
            LogEntry {
                actor,
                customer_id: Some(created.id),
                after_service_id: None,
                action: LogAction::CreateCustomer,
                note: "",
                payload: LogPayload::Customer(customer_created(&created)),
            },
        )
        .await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(customer_id = created.id, "Customer created");
        Ok(created)
    }

    /// Customer with current stamp count
    pub async fn get(&self, id: i64) -> AppResult<CustomerWithStamps> {
        customer::find_with_stamps(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::customer_not_found(id))
    }

    /// Newest customers first
    pub async fn list(&self, page: PageRequest) -> AppResult<Page<CustomerWithStamps>> {
        let records = customer::list(&self.pool, page).await?;
        Ok(Page::new(records))
    }

    /// Substring search; a blank keyword matches nothing
    pub async fn search(
        &self,
        search: &CustomerSearch,
        page: PageRequest,
    ) -> AppResult<Page<CustomerWithStamps>> {
        let keyword = search.keyword.trim();
        if keyword.is_empty() {
            return Ok(Page::new(Vec::new()));
        }
        let digits = phone_digits(keyword);
        let digits = (!digits.is_empty()).then_some(digits.as_str());

        let (name, phone) = match search.target {
            CustomerSearchTarget::All => (Some(keyword), digits),
            CustomerSearchTarget::Name => (Some(keyword), None),
            CustomerSearchTarget::Phone => (None, digits),
        };
        let records = customer::search(&self.pool, name, phone, page).await?;
        Ok(Page::new(records))
    }

    /// Apply the present fields; an empty note clears it
    pub async fn update(&self, actor: &Actor, id: i64, patch: CustomerUpdate) -> AppResult<Customer> {
        if let Some(name) = &patch.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        validate_optional_text(&patch.note, "note", MAX_NOTE_LEN)?;
        let phone = patch.phone.as_deref().map(normalize_phone).transpose()?;

        let mut tx = begin_audited(&self.pool, actor).await?;
        let old = customer::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::customer_not_found(id))?;

        let mut new = old.clone();
        if let Some(name) = patch.name {
            new.name = name.trim().to_string();
        }
        if let Some(phone) = phone {
            new.phone = phone;
        }
        if let Some(gender) = patch.gender {
            new.gender = gender;
        }
        if patch.note.is_some() {
            new.note = clean_note(patch.note);
        }

        let changes = customer_diff(&old, &new);
        if changes.is_empty() {
            return Ok(old);
        }
        new.updated_at = now_millis();

        let affected = customer::update(&mut *tx, &new)
            .await
            .map_err(map_duplicate(&new.phone))?;
        if affected == 0 {
            return Err(AppError::customer_not_found(id));
        }

        let fields = changes.fields().join(",");
        AuditLogStore::append(
            &mut tx,
            LogEntry {
                actor,
                customer_id: Some(id),
                after_service_id: None,
                action: LogAction::UpdateCustomerInfo,
                note: "",
                payload: LogPayload::Customer(changes),
            },
        )
        .await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(customer_id = id, fields = %fields, "Customer updated");
        Ok(new)
    }

    /// Hard delete (admin only). Ledger and tickets cascade; logs stay.
    pub async fn delete(&self, actor: &Actor, id: i64) -> AppResult<()> {
        if !actor.is_admin() {
            return Err(AppError::new(ErrorCode::AdminRequired));
        }

        let mut tx = begin_audited(&self.pool, actor).await?;
        let old = customer::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::customer_not_found(id))?;

        // Logged first: the FK to customers is nulled by the delete
        AuditLogStore::append(
            &mut tx,
            LogEntry {
                actor,
                customer_id: Some(id),
                after_service_id: None,
                action: LogAction::DeleteCustomer,
                note: "",
                payload: LogPayload::Customer(customer_deleted(&old)),
            },
        )
        .await?;

        customer::delete(&mut *tx, id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::warn!(customer_id = id, actor_id = %actor.id, "Customer deleted");
        Ok(())
    }
}
