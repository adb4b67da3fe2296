//! Typed stamp server API

use serde::Serialize;
use shared::models::{
    AfterServiceCreate, AfterServiceFilter, AfterServiceListItem, AfterServiceSearchTarget,
    AfterServiceStatus, AfterServiceTicket, AuditLogRecord, Customer, CustomerCreate,
    CustomerSearch, CustomerSearchTarget, CustomerUpdate, CustomerWithStamps, LogCategory,
    LogExport, LogFilter, LogListItem, LogNoteUpdate, RemarkCreate, StampAdd, StampCount,
    StampRedeem, StampRemove,
};
use shared::{Page, PageRequest};

use crate::{ClientConfig, ClientResult, HttpClient};

/// Which records a log listing covers
#[derive(Debug, Clone)]
pub enum LogScope {
    /// Every record, optionally filtered by actor
    All { actor_id: Option<String> },
    Customer(i64),
    AfterService(i64),
}

#[derive(Serialize)]
struct PageQuery {
    limit: u32,
    offset: u32,
}

impl From<PageRequest> for PageQuery {
    fn from(page: PageRequest) -> Self {
        Self {
            limit: page.limit,
            offset: page.offset,
        }
    }
}

#[derive(Serialize)]
struct LogQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<LogCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    actor_id: Option<&'a str>,
    #[serde(flatten)]
    page: PageQuery,
}

#[derive(Serialize)]
struct CustomerQuery<'a> {
    target: CustomerSearchTarget,
    keyword: &'a str,
    #[serde(flatten)]
    page: PageQuery,
}

#[derive(Serialize)]
struct TicketQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<AfterServiceStatus>,
    target: AfterServiceSearchTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyword: Option<&'a str>,
    #[serde(flatten)]
    page: PageQuery,
}

/// Client for the counter app
#[derive(Debug, Clone)]
pub struct OvapeClient {
    http: HttpClient,
}

impl OvapeClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    // ========== Stamp ledger ==========

    pub async fn stamp_count(&self, customer_id: i64) -> ClientResult<StampCount> {
        self.http
            .get(&format!("/api/customers/{customer_id}/stamps"))
            .await
    }

    pub async fn add_stamp(&self, customer_id: i64, request: &StampAdd) -> ClientResult<StampCount> {
        self.http
            .post(&format!("/api/customers/{customer_id}/stamps/add"), request)
            .await
    }

    pub async fn remove_stamp(
        &self,
        customer_id: i64,
        request: &StampRemove,
    ) -> ClientResult<StampCount> {
        self.http
            .post(&format!("/api/customers/{customer_id}/stamps/remove"), request)
            .await
    }

    pub async fn redeem_coupon(
        &self,
        customer_id: i64,
        request: &StampRedeem,
    ) -> ClientResult<StampCount> {
        self.http
            .post(&format!("/api/customers/{customer_id}/stamps/redeem"), request)
            .await
    }

    // ========== Audit log ==========

    /// Newest first, one page
    pub async fn list_logs(
        &self,
        scope: &LogScope,
        category: Option<LogCategory>,
        page: PageRequest,
    ) -> ClientResult<Page<LogListItem>> {
        let (path, actor_id) = match scope {
            LogScope::All { actor_id } => ("/api/logs".to_string(), actor_id.as_deref()),
            LogScope::Customer(id) => (format!("/api/customers/{id}/logs"), None),
            LogScope::AfterService(id) => (format!("/api/after-services/{id}/logs"), None),
        };
        let query = LogQuery {
            category,
            actor_id,
            page: page.into(),
        };
        self.http.get_with_query(&path, &query).await
    }

    /// All-subjects listing with a [`LogFilter`]
    pub async fn list_all_logs(
        &self,
        filter: &LogFilter,
        page: PageRequest,
    ) -> ClientResult<Page<LogListItem>> {
        let scope = LogScope::All {
            actor_id: filter.actor_id.clone(),
        };
        self.list_logs(&scope, filter.category, page).await
    }

    pub async fn get_log(&self, id: i64) -> ClientResult<LogListItem> {
        self.http.get(&format!("/api/logs/{id}")).await
    }

    pub async fn update_log_note(
        &self,
        id: i64,
        update: &LogNoteUpdate,
    ) -> ClientResult<AuditLogRecord> {
        self.http.put(&format!("/api/logs/{id}/note"), update).await
    }

    pub async fn add_remark(&self, remark: &RemarkCreate) -> ClientResult<LogListItem> {
        self.http.post("/api/logs/remarks", remark).await
    }

    /// Ledger-sheet line for the clipboard
    pub async fn export_log(&self, id: i64) -> ClientResult<LogExport> {
        self.http.get(&format!("/api/logs/{id}/export")).await
    }

    // ========== Customers ==========

    pub async fn create_customer(&self, input: &CustomerCreate) -> ClientResult<Customer> {
        self.http.post("/api/customers", input).await
    }

    pub async fn get_customer(&self, id: i64) -> ClientResult<CustomerWithStamps> {
        self.http.get(&format!("/api/customers/{id}")).await
    }

    pub async fn update_customer(&self, id: i64, patch: &CustomerUpdate) -> ClientResult<Customer> {
        self.http.put(&format!("/api/customers/{id}"), patch).await
    }

    /// Admin only
    pub async fn delete_customer(&self, id: i64) -> ClientResult<bool> {
        self.http.delete(&format!("/api/customers/{id}")).await
    }

    pub async fn search_customers(
        &self,
        search: &CustomerSearch,
        page: PageRequest,
    ) -> ClientResult<Page<CustomerWithStamps>> {
        let query = CustomerQuery {
            target: search.target,
            keyword: &search.keyword,
            page: page.into(),
        };
        self.http.get_with_query("/api/customers", &query).await
    }

    // ========== After-service tickets ==========

    pub async fn create_ticket(&self, input: &AfterServiceCreate) -> ClientResult<AfterServiceTicket> {
        self.http.post("/api/after-services", input).await
    }

    pub async fn get_ticket(&self, id: i64) -> ClientResult<AfterServiceListItem> {
        self.http.get(&format!("/api/after-services/{id}")).await
    }

    pub async fn list_tickets(
        &self,
        filter: &AfterServiceFilter,
        page: PageRequest,
    ) -> ClientResult<Page<AfterServiceListItem>> {
        let query = TicketQuery {
            status: filter.status,
            target: filter.target,
            keyword: filter.keyword.as_deref(),
            page: page.into(),
        };
        self.http.get_with_query("/api/after-services", &query).await
    }

    pub async fn transition_ticket(
        &self,
        id: i64,
        status: AfterServiceStatus,
        note: &str,
    ) -> ClientResult<AfterServiceTicket> {
        let change = shared::models::StatusTransition {
            status,
            note: note.to_string(),
        };
        self.http
            .put(&format!("/api/after-services/{id}/status"), &change)
            .await
    }
}
