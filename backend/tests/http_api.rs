//! End-to-end HTTP tests over the in-memory adapters.
//!
//! The app is assembled the way the server binary does it: one shared user
//! store behind both the account service and the user collection.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test, web};
use ci_tender::Trace;
use ci_tender::domain::{
    AdRotationService, Advertisement, RecordService, Supplier, TRACE_ID_HEADER, Tender, User,
};
use ci_tender::inbound::http::routes::configure;
use ci_tender::inbound::http::state::HttpState;
use ci_tender::outbound::memory::{InMemoryAccounts, InMemoryRecordStore};
use ci_tender::test_support::{FixtureClock, tender_input};
use mockable::Clock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const ADMIN_EMAIL: &str = "admin@ci-tender.ci";
const ADMIN_PASSWORD: &str = "admin123";

struct Stack {
    http: HttpState,
    accounts: Arc<InMemoryAccounts>,
}

#[fixture]
fn stack() -> Stack {
    let clock: Arc<dyn Clock> = Arc::new(FixtureClock::default());
    let users = InMemoryRecordStore::<User>::default();
    let advertisements = InMemoryRecordStore::<Advertisement>::default();
    let accounts = Arc::new(InMemoryAccounts::new(users.clone(), clock.clone()));
    let http = HttpState {
        login: accounts.clone(),
        tenders: Arc::new(RecordService::<Tender, _>::new(
            Arc::new(InMemoryRecordStore::<Tender>::default()),
            clock.clone(),
        )),
        suppliers: Arc::new(RecordService::<Supplier, _>::new(
            Arc::new(InMemoryRecordStore::<Supplier>::default()),
            clock.clone(),
        )),
        users: Arc::new(RecordService::<User, _>::new(Arc::new(users), clock.clone())),
        advertisements: Arc::new(RecordService::<Advertisement, _>::new(
            Arc::new(advertisements.clone()),
            clock.clone(),
        )),
        placements: Arc::new(AdRotationService::new(Arc::new(advertisements), clock)),
    };
    Stack { http, accounts }
}

macro_rules! service {
    ($stack:expr) => {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new($stack.http.clone()))
                .wrap(Trace)
                .configure(configure),
        )
        .await
    };
}

fn bearer(token: &Value) -> (actix_web::http::header::HeaderName, String) {
    let token = token.as_str().expect("token is a string");
    (AUTHORIZATION, format!("Bearer {token}"))
}

#[rstest]
#[actix_web::test]
async fn admin_publishes_and_visitors_list(stack: Stack) {
    stack
        .accounts
        .bootstrap_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("bootstrap administrator");
    let app = service!(stack);

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .to_request();
    let session: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(session["user"]["role"], "admin");

    for index in 0..3 {
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/tenders")
            .insert_header(bearer(&session["token"]))
            .set_json(tender_input(index))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/tenders?location=Abidjan")
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["location"], "Abidjan");
}

#[rstest]
#[actix_web::test]
async fn registered_members_cannot_publish(stack: Stack) {
    let app = service!(stack);

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "firstName": "Awa",
            "lastName": "Koné",
            "email": "awa@example.ci",
            "password": "Abcdefg1",
        }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let session: Value = actix_test::read_body_json(res).await;
    assert_eq!(session["user"]["role"], "user");

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/tenders")
        .insert_header(bearer(&session["token"]))
        .set_json(tender_input(1))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "forbidden");
    assert!(body["traceId"].is_string());
}

#[rstest]
#[actix_web::test]
async fn duplicate_registration_reports_the_email(stack: Stack) {
    let app = service!(stack);
    let payload = json!({
        "firstName": "Awa",
        "lastName": "Koné",
        "email": "awa@example.ci",
        "password": "Abcdefg1",
    });

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(&payload)
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(&payload)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["fields"]["email"], json!(["taken"]));
}

#[rstest]
#[actix_web::test]
async fn logout_invalidates_the_token(stack: Stack) {
    stack
        .accounts
        .bootstrap_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("bootstrap administrator");
    let app = service!(stack);

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .to_request();
    let session: Value = actix_test::call_and_read_body_json(&app, req).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(bearer(&session["token"]))
        .to_request();
    let me: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["email"], ADMIN_EMAIL);

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header(bearer(&session["token"]))
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(bearer(&session["token"]))
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[rstest]
#[actix_web::test]
async fn users_are_visible_to_the_administrator_only(stack: Stack) {
    stack
        .accounts
        .bootstrap_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("bootstrap administrator");
    let app = service!(stack);

    let req = actix_test::TestRequest::get().uri("/api/v1/users").to_request();
    assert_eq!(
        actix_test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .to_request();
    let session: Value = actix_test::call_and_read_body_json(&app, req).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/users")
        .insert_header(bearer(&session["token"]))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["email"], ADMIN_EMAIL);
}
