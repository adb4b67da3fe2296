//! Client against a live server on an ephemeral port

use std::collections::HashSet;

use ovape_client::{ClientConfig, ClientError, ErrorCode, LogScope, OvapeClient, Pager, SubmitGuard};
use ovape_server::core::build_app;
use ovape_server::db::DbService;
use ovape_server::{Config, ServerState};
use shared::PageRequest;
use shared::models::{
    Actor, AfterServiceCreate, AfterServiceFilter, AfterServiceItemType, AfterServiceStatus,
    CustomerCreate, CustomerSearch, CustomerSearchTarget, CustomerUpdate, Gender, LogCategory,
    LogNoteUpdate, LogPayloadPatch, PaymentType, Role, StampAdd, StampRedeem, StampRemove,
};

async fn spawn_server() -> (String, ServerState) {
    let db = DbService::in_memory().await.unwrap();
    let state = ServerState::new(Config::for_tests(), db);
    let app = build_app(&state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

async fn staff_client() -> OvapeClient {
    let (base_url, state) = spawn_server().await;
    let token = state
        .jwt_service
        .generate_token(&Actor {
            id: "staff-1".into(),
            name: "박직원".into(),
            email: "staff@ovape.kr".into(),
            role: Role::Staff,
        })
        .unwrap();
    OvapeClient::new(&ClientConfig::new(base_url).with_token(token).with_timeout(5)).unwrap()
}

fn kim() -> CustomerCreate {
    CustomerCreate {
        name: "김민수".into(),
        phone: "010-1234-5678".into(),
        gender: Gender::Male,
        note: None,
    }
}

#[tokio::test]
async fn test_stamp_flow_and_typed_errors() {
    let client = staff_client().await;
    let customer = client.create_customer(&kim()).await.unwrap();

    let add = StampAdd {
        amount: 12,
        note: String::new(),
        payment_type: Some(PaymentType::Card),
    };
    assert_eq!(client.add_stamp(customer.id, &add).await.unwrap().count, 12);
    assert_eq!(
        client
            .redeem_coupon(customer.id, &StampRedeem::default())
            .await
            .unwrap()
            .count,
        2
    );

    let err = client
        .remove_stamp(
            customer.id,
            &StampRemove {
                amount: 3,
                note: String::new(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InsufficientStamps));
    assert!(!err.is_retryable());
    assert_eq!(client.stamp_count(customer.id).await.unwrap().count, 2);

    let err = client.create_customer(&kim()).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::DuplicatePhone));

    // staff cannot delete
    let err = client.delete_customer(customer.id).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::AdminRequired));
}

#[tokio::test]
async fn test_load_more_over_fifteen_logs() {
    let client = staff_client().await;
    let customer = client.create_customer(&kim()).await.unwrap();
    let add = StampAdd {
        amount: 1,
        note: String::new(),
        payment_type: None,
    };
    for _ in 0..14 {
        client.add_stamp(customer.id, &add).await.unwrap();
    }

    let scope = LogScope::Customer(customer.id);
    let mut pager = Pager::new(10);
    let mut seen = HashSet::new();
    while pager.has_more() {
        let page = client.list_logs(&scope, None, pager.request()).await.unwrap();
        for record in &page.records {
            assert!(seen.insert(record.record.id), "duplicate record across pages");
        }
        pager.advance(page.returned_count);
    }
    assert_eq!(seen.len(), 15);
    assert_eq!(pager.offset(), 15);
}

#[tokio::test]
async fn test_edit_note_and_search() {
    let client = staff_client().await;
    let customer = client.create_customer(&kim()).await.unwrap();
    client
        .add_stamp(
            customer.id,
            &StampAdd {
                amount: 2,
                note: String::new(),
                payment_type: Some(PaymentType::Cash),
            },
        )
        .await
        .unwrap();

    let logs = client
        .list_logs(
            &LogScope::All { actor_id: Some("staff-1".into()) },
            Some(LogCategory::Stamp),
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(logs.returned_count, 1);
    let log_id = logs.records[0].record.id;

    let record = client
        .update_log_note(
            log_id,
            &LogNoteUpdate {
                note: "현금영수증 발행".into(),
                payload_patch: Some(LogPayloadPatch {
                    payment_type: Some(PaymentType::CashReceipt),
                }),
            },
        )
        .await
        .unwrap();
    assert_eq!(record.note, "현금영수증 발행");
    assert_eq!(record.payload.payment_type(), Some(PaymentType::CashReceipt));

    let export = client.export_log(log_id).await.unwrap();
    assert!(export.line.contains("현금영수증"));

    client
        .update_customer(
            customer.id,
            &CustomerUpdate {
                name: Some("김민준".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let found = client
        .search_customers(
            &CustomerSearch {
                target: CustomerSearchTarget::Name,
                keyword: "민준".into(),
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(found.returned_count, 1);
    assert_eq!(found.records[0].stamp_count, 2);
}

#[tokio::test]
async fn test_ticket_lifecycle() {
    let client = staff_client().await;
    let customer = client.create_customer(&kim()).await.unwrap();

    let ticket = client
        .create_ticket(&AfterServiceCreate {
            customer_id: customer.id,
            item_type: AfterServiceItemType::Liquid,
            item_name: "망고 30ml".into(),
            quantity: 2,
            symptom: "누액".into(),
            note: None,
        })
        .await
        .unwrap();
    assert_eq!(ticket.status, AfterServiceStatus::Received);

    let moved = client
        .transition_ticket(ticket.id, AfterServiceStatus::Exchange, "새 제품 교환")
        .await
        .unwrap();
    assert_eq!(moved.status, AfterServiceStatus::Exchange);

    let err = client
        .transition_ticket(ticket.id, AfterServiceStatus::Exchange, "")
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::ValidationFailed));

    let item = client.get_ticket(ticket.id).await.unwrap();
    assert_eq!(item.customer_name.as_deref(), Some("김민수"));

    let listed = client
        .list_tickets(
            &AfterServiceFilter {
                keyword: Some("망고".into()),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(listed.returned_count, 1);

    let logs = client
        .list_logs(&LogScope::AfterService(ticket.id), None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(logs.returned_count, 2);
}

#[tokio::test]
async fn test_submit_guard_releases_on_api_error() {
    let client = staff_client().await;
    let guard = SubmitGuard::new();

    let result = guard
        .run(client.redeem_coupon(424242, &StampRedeem::default()))
        .await;
    assert!(matches!(result, Err(ClientError::Api(_))));
    assert!(!guard.is_busy());

    let customer = guard.run(client.create_customer(&kim())).await.unwrap();
    assert_eq!(customer.phone, "01012345678");
}
