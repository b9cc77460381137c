//! Authentication handlers and bearer-token extractors.
//!
//! ```text
//! POST /api/v1/auth/login {"email":"admin@ci-tender.ci","password":"admin123"}
//! POST /api/v1/auth/register {"firstName":"Awa",...}
//! POST /api/v1/auth/logout   Authorization: Bearer <token>
//! GET  /api/v1/auth/me       Authorization: Bearer <token>
//! ```

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::ApiResult;
use super::state::HttpState;
use crate::domain::form::FormValues;
use crate::domain::{
    AuthSession, Error, LoginCredentials, LoginValidationError, Registration, SessionToken, User,
};

/// Login request body.
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Plain-text password, checked then dropped.
    pub password: String,
}

impl TryFrom<&LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: &LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::validation_failed("email must not be empty")
            .with_details(json!({ "fields": { "email": ["missing_value"] } })),
        LoginValidationError::EmptyPassword => {
            Error::validation_failed("password must not be empty")
                .with_details(json!({ "fields": { "password": ["missing_value"] } }))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Result<Option<SessionToken>, Error> {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        return Ok(None);
    };
    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("malformed Authorization header"))?;
    Ok(Some(SessionToken::new(token)))
}

fn http_state(req: &HttpRequest) -> Result<web::Data<HttpState>, Error> {
    req.app_data::<web::Data<HttpState>>()
        .cloned()
        .ok_or_else(|| Error::server_error("HTTP state is not configured"))
}

async fn resolve_bearer(req: HttpRequest) -> Result<Option<(User, SessionToken)>, Error> {
    let Some(token) = bearer_token(&req)? else {
        return Ok(None);
    };
    let state = http_state(&req)?;
    let user = state.login.resolve(&token).await?;
    Ok(Some((user, token)))
}

/// Caller identity resolved from an optional bearer token.
///
/// A missing header yields an anonymous viewer; a present but unknown token
/// is rejected with `Unauthorized`.
#[derive(Debug, Clone)]
pub struct Viewer(Option<User>);

impl Viewer {
    /// Signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }

    /// Require an administrator.
    ///
    /// # Errors
    /// `Unauthorized` when anonymous, `Forbidden` for other roles.
    pub fn require_admin(&self) -> Result<&User, Error> {
        let user = self
            .user()
            .ok_or_else(|| Error::unauthorized("authentication required"))?;
        if user.is_admin() {
            Ok(user)
        } else {
            Err(Error::forbidden("administrator role required"))
        }
    }
}

impl FromRequest for Viewer {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let resolved = resolve_bearer(req).await?;
            Ok(Self(resolved.map(|(user, _)| user)))
        })
    }
}

/// Signed-in caller; rejects anonymous requests.
#[derive(Debug, Clone)]
pub struct Authenticated {
    /// Account behind the bearer token.
    pub user: User,
    /// Token presented by the caller.
    pub token: SessionToken,
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let (user, token) = resolve_bearer(req)
                .await?
                .ok_or_else(|| Error::unauthorized("authentication required"))?;
            Ok(Self { user, token })
        })
    }
}

/// Administrator caller; rejects anonymous and non-admin requests.
#[derive(Debug, Clone)]
pub struct AdminSession(pub User);

impl FromRequest for AdminSession {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let viewer = Viewer::from_request(req, payload);
        Box::pin(async move {
            let viewer = viewer.await?;
            viewer.require_admin().cloned().map(Self)
        })
    }
}

/// Sign in with email and password.
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthSession>> {
    let credentials =
        LoginCredentials::try_from(&payload.into_inner()).map_err(map_login_validation_error)?;
    let session = state.login.authenticate(&credentials).await?;
    Ok(web::Json(session))
}

/// Create an account from registration form values and sign in.
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<FormValues>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from_values(&payload)?;
    let session = state.login.register(&registration).await?;
    Ok(HttpResponse::Created().json(session))
}

/// Revoke the caller's token.
pub async fn logout(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    state.login.revoke(&caller.token).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Return the signed-in user.
pub async fn current_user(caller: Authenticated) -> web::Json<User> {
    web::Json(caller.user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockLoginService;
    use crate::inbound::http::test_utils::{TestPorts, admin_user};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;

    fn app_with(
        service: MockLoginService,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = TestPorts::default().with_login(service).into_state();
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/v1/auth")
                .route("/login", web::post().to(login))
                .route("/logout", web::post().to(logout))
                .route("/me", web::get().to(current_user)),
        )
    }

    #[rstest]
    #[actix_web::test]
    async fn login_returns_the_session() {
        let mut service = MockLoginService::new();
        service
            .expect_authenticate()
            .withf(|creds| creds.email() == "admin@ci-tender.ci")
            .return_once(|_| {
                Ok(AuthSession {
                    user: admin_user(),
                    token: SessionToken::new("tok"),
                })
            });
        let app = actix_test::init_service(app_with(service)).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": "Admin@CI-Tender.ci", "password": "admin123"}))
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["token"], "tok");
        assert_eq!(body["user"]["role"], "admin");
    }

    #[rstest]
    #[case(json!({"email": " ", "password": "x"}), "email")]
    #[case(json!({"email": "a@b.ci", "password": ""}), "password")]
    #[actix_web::test]
    async fn blank_login_fields_are_rejected(
        #[case] payload: serde_json::Value,
        #[case] field: &str,
    ) {
        let mut service = MockLoginService::new();
        service.expect_authenticate().never();
        let app = actix_test::init_service(app_with(service)).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(payload)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Error = actix_test::read_body_json(res).await;
        assert_eq!(body.code(), ErrorCode::ValidationFailed);
        assert!(body.details().expect("details")["fields"].get(field).is_some());
    }

    #[rstest]
    #[case(None, StatusCode::UNAUTHORIZED)]
    #[case(Some("Basic abc"), StatusCode::UNAUTHORIZED)]
    #[case(Some("Bearer unknown"), StatusCode::UNAUTHORIZED)]
    #[case(Some("Bearer tok"), StatusCode::OK)]
    #[actix_web::test]
    async fn me_requires_a_known_bearer_token(
        #[case] header: Option<&str>,
        #[case] expected: StatusCode,
    ) {
        let mut service = MockLoginService::new();
        service.expect_resolve().returning(|token| {
            if token.as_str() == "tok" {
                Ok(admin_user())
            } else {
                Err(Error::unauthorized("unknown or expired session"))
            }
        });
        let app = actix_test::init_service(app_with(service)).await;
        let mut req = actix_test::TestRequest::get().uri("/api/v1/auth/me");
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }
        let res = actix_test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), expected);
    }

    #[rstest]
    #[actix_web::test]
    async fn logout_revokes_the_token() {
        let mut service = MockLoginService::new();
        service.expect_resolve().returning(|_| Ok(admin_user()));
        service
            .expect_revoke()
            .withf(|token| token.as_str() == "tok")
            .times(1)
            .returning(|_| Ok(()));
        let app = actix_test::init_service(app_with(service)).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .insert_header((AUTHORIZATION, "Bearer tok"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}
