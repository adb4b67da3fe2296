//! HTTP API tests
//!
//! Drive the full router (auth middleware, handlers, services, SQLite) with
//! `tower::ServiceExt::oneshot` against an in-memory database.

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use ovape_server::core::build_app;
use ovape_server::db::DbService;
use ovape_server::{Config, ServerState};
use shared::models::{Actor, Role};

struct TestApp {
    router: Router,
    state: ServerState,
}

impl TestApp {
    async fn new() -> Self {
        let db = DbService::in_memory().await.unwrap();
        let state = ServerState::new(Config::for_tests(), db);
        Self {
            router: build_app(&state),
            state,
        }
    }

    fn token(&self, role: Role) -> String {
        let actor = match role {
            Role::Admin => Actor {
                id: "admin-1".into(),
                name: "관리자".into(),
                email: "admin@ovape.kr".into(),
                role,
            },
            Role::Staff => Actor {
                id: "staff-1".into(),
                name: "박직원".into(),
                email: "staff@ovape.kr".into(),
                role,
            },
        };
        self.state.jwt_service.generate_token(&actor).unwrap()
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_customer(&self, token: &str, name: &str, phone: &str) -> i64 {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/customers",
                Some(token),
                Some(json!({ "name": name, "phone": phone, "gender": "male" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_missing_or_bad_token_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/api/customers", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, body) = app
        .send(Method::GET, "/api/customers", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);
}

#[tokio::test]
async fn test_stamp_flow_over_http() {
    let app = TestApp::new().await;
    let staff = app.token(Role::Staff);
    let id = app.create_customer(&staff, "김고객", "010-1234-5678").await;

    let add = |amount: i64| {
        json!({ "amount": amount, "note": "구매", "payment_type": "card" })
    };
    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/customers/{id}/stamps/add"),
            Some(&staff),
            Some(add(5)),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["count"], 5);

    let (_, body) = app
        .send(
            Method::POST,
            &format!("/api/customers/{id}/stamps/add"),
            Some(&staff),
            Some(add(7)),
        )
        .await;
    assert_eq!(body["count"], 12);

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/customers/{id}/stamps/redeem"),
            Some(&staff),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["count"], 2);

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/customers/{id}/stamps/remove"),
            Some(&staff),
            Some(json!({ "amount": 3 })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 4002);

    let (_, body) = app
        .send(
            Method::GET,
            &format!("/api/customers/{id}/stamps"),
            Some(&staff),
            None,
        )
        .await;
    assert_eq!(body["count"], 2);

    let (_, body) = app
        .send(Method::GET, &format!("/api/customers/{id}"), Some(&staff), None)
        .await;
    assert_eq!(body["stamp_count"], 2);
    assert_eq!(body["phone"], "01012345678");

    // create + 3 successful stamp operations
    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/customers/{id}/logs"),
            Some(&staff),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["returned_count"], 4);
    assert_eq!(body["records"].as_array().unwrap().len(), 4);

    let (_, body) = app
        .send(
            Method::GET,
            &format!("/api/customers/{id}/logs?category=stamp&limit=2"),
            Some(&staff),
            None,
        )
        .await;
    assert_eq!(body["returned_count"], 2);
    let first = &body["records"][0];
    assert_eq!(first["action"], "coupon-10");
    assert_eq!(first["actor_name"], "박직원");
    assert_eq!(first["payload"]["kind"], "stamp");
    assert_eq!(first["payload"]["data"]["balance"], 2);
}

#[tokio::test]
async fn test_stamp_amount_bounds() {
    let app = TestApp::new().await;
    let staff = app.token(Role::Staff);
    let id = app.create_customer(&staff, "이고객", "010-2222-3333").await;

    for amount in [0, -1, 101] {
        let (status, body) = app
            .send(
                Method::POST,
                &format!("/api/customers/{id}/stamps/add"),
                Some(&staff),
                Some(json!({ "amount": amount })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "amount {amount}");
        assert_eq!(body["code"], 4003);
    }

    let (status, body) = app
        .send(
            Method::POST,
            "/api/customers/999/stamps/add",
            Some(&staff),
            Some(json!({ "amount": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3001);
}

#[tokio::test]
async fn test_duplicate_phone_conflict() {
    let app = TestApp::new().await;
    let staff = app.token(Role::Staff);
    app.create_customer(&staff, "김고객", "010-1234-5678").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/customers",
            Some(&staff),
            Some(json!({ "name": "다른고객", "phone": "01012345678", "gender": "female" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 3002);
}

#[tokio::test]
async fn test_delete_requires_admin() {
    let app = TestApp::new().await;
    let staff = app.token(Role::Staff);
    let admin = app.token(Role::Admin);
    let id = app.create_customer(&staff, "김고객", "010-1234-5678").await;

    let (status, body) = app
        .send(Method::DELETE, &format!("/api/customers/{id}"), Some(&staff), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/customers/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(Method::GET, &format!("/api/customers/{id}"), Some(&staff), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3001);

    // history survives the delete
    let (_, body) = app
        .send(Method::GET, "/api/logs?category=customer", Some(&admin), None)
        .await;
    assert_eq!(body["returned_count"], 2);
    assert_eq!(body["records"][0]["action"], "delete-customer");
}

#[tokio::test]
async fn test_customer_search_and_update() {
    let app = TestApp::new().await;
    let staff = app.token(Role::Staff);
    let id = app.create_customer(&staff, "김고객", "010-1234-5678").await;
    app.create_customer(&staff, "박손님", "010-9999-0000").await;

    let (_, body) = app
        .send(
            Method::GET,
            "/api/customers?target=phone&keyword=5678",
            Some(&staff),
            None,
        )
        .await;
    assert_eq!(body["returned_count"], 1);
    assert_eq!(body["records"][0]["id"], id);

    let (_, body) = app
        .send(Method::GET, "/api/customers", Some(&staff), None)
        .await;
    assert_eq!(body["returned_count"], 2);

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/customers/{id}"),
            Some(&staff),
            Some(json!({ "phone": "010-1111-2222" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["phone"], "01011112222");

    let (_, body) = app
        .send(
            Method::GET,
            &format!("/api/customers/{id}/logs?category=customer"),
            Some(&staff),
            None,
        )
        .await;
    let update = &body["records"][0];
    assert_eq!(update["action"], "update-customer-info");
    assert_eq!(update["payload"]["data"]["phone"]["old"], "01012345678");
    assert_eq!(update["payload"]["data"]["phone"]["new"], "01011112222");
}

#[tokio::test]
async fn test_log_note_edit_and_export() {
    let app = TestApp::new().await;
    let staff = app.token(Role::Staff);
    let id = app.create_customer(&staff, "김고객", "010-1234-5678").await;
    app.send(
        Method::POST,
        &format!("/api/customers/{id}/stamps/add"),
        Some(&staff),
        Some(json!({ "amount": 3, "payment_type": "cash" })),
    )
    .await;

    let (_, body) = app
        .send(Method::GET, "/api/logs?category=stamp", Some(&staff), None)
        .await;
    let log_id = body["records"][0]["id"].as_i64().unwrap();

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/logs/{log_id}/note"),
            Some(&staff),
            Some(json!({ "note": "영수증 확인", "payload_patch": { "payment_type": "card" } })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["note"], "영수증 확인");
    assert_eq!(body["payload"]["data"]["payment_type"], "card");
    assert_eq!(body["action"], "add-3");

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/logs/{log_id}/export"),
            Some(&staff),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let line = body["line"].as_str().unwrap();
    assert!(line.contains("영수증 확인"));
    assert!(line.contains("카드"));
    assert!(line.contains("김고객"));

    let (status, body) = app
        .send(Method::PUT, "/api/logs/424242/note", Some(&staff), Some(json!({ "note": "x" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);
}

#[tokio::test]
async fn test_remark_requires_subject() {
    let app = TestApp::new().await;
    let staff = app.token(Role::Staff);
    let id = app.create_customer(&staff, "김고객", "010-1234-5678").await;

    let (status, _) = app
        .send(Method::POST, "/api/logs/remarks", Some(&staff), Some(json!({ "note": "메모" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/logs/remarks",
            Some(&staff),
            Some(json!({ "customer_id": id, "note": "단골" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["category"], "remark");
    assert_eq!(body["customer_name"], "김고객");
}

#[tokio::test]
async fn test_after_service_flow_over_http() {
    let app = TestApp::new().await;
    let staff = app.token(Role::Staff);
    let id = app.create_customer(&staff, "김고객", "010-1234-5678").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/after-services",
            Some(&staff),
            Some(json!({
                "customer_id": id,
                "item_type": "device",
                "item_name": "Pod X",
                "quantity": 1,
                "symptom": "전원 불량"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "received");
    let ticket_id = body["id"].as_i64().unwrap();

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/after-services/{ticket_id}/status"),
            Some(&staff),
            Some(json!({ "status": "sent_for_repair", "note": "본사 발송" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "sent_for_repair");

    let (_, body) = app
        .send(
            Method::GET,
            "/api/after-services?status=sent_for_repair",
            Some(&staff),
            None,
        )
        .await;
    assert_eq!(body["returned_count"], 1);
    assert_eq!(body["records"][0]["customer_name"], "김고객");

    let (_, body) = app
        .send(
            Method::GET,
            &format!("/api/after-services/{ticket_id}/logs"),
            Some(&staff),
            None,
        )
        .await;
    assert_eq!(body["returned_count"], 2);
    assert_eq!(body["records"][0]["action"], "after-service-sent_for_repair");

    let (status, _) = app
        .send(Method::GET, "/api/after-services/777", Some(&staff), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
