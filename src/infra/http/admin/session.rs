use std::time::Duration;

use axum::extract::{FromRequest, Query, Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use branford_api_types::LoginRequest;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::application::error::ErrorReport;
use crate::application::session::SessionError;
use crate::config::RuntimeEnvironment;
use crate::infra::http::api::ApiState;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::middleware::{LOGIN_PATH, SESSION_COOKIE};

const SOURCE: &str = "infra::http::admin::session";
const DASHBOARD_PATH: &str = "/admin";
const LOGIN_FAILED_PATH: &str = "/admin/login?error=invalid";

const LOGIN_FORM: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Admin login</title></head>
<body>
<main>
<h1>Admin login</h1>
{error}
<form method="post" action="/admin/login">
<label for="password">Password</label>
<input id="password" name="password" type="password" autocomplete="current-password" required autofocus>
<button type="submit">Sign in</button>
</form>
</main>
</body>
</html>
"#;

#[derive(Debug, Deserialize)]
pub struct LoginFormQuery {
    error: Option<String>,
}

pub async fn login_form(Query(query): Query<LoginFormQuery>) -> Html<String> {
    let error = if query.error.is_some() {
        r#"<p role="alert">Incorrect password.</p>"#
    } else {
        ""
    };
    Html(LOGIN_FORM.replace("{error}", error))
}

/// Accepts `password` as a urlencoded form or a JSON body.
///
/// Form submissions are answered with redirects; JSON callers get `{success}` or `{error}`.
pub async fn login(State(state): State<ApiState>, jar: CookieJar, request: Request) -> Response {
    let wants_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    let password = if wants_json {
        match Json::<LoginRequest>::from_request(request, &()).await {
            Ok(Json(body)) => body.password,
            Err(rejection) => {
                return ApiError::bad_request(
                    "Invalid login request",
                    Some(json!({ "reason": rejection.body_text() })),
                )
                .into_response();
            }
        }
    } else {
        match Form::<LoginRequest>::from_request(request, &()).await {
            Ok(Form(body)) => body.password,
            Err(_) => return Redirect::to(LOGIN_FAILED_PATH).into_response(),
        }
    };

    match state.sessions.login(&password) {
        Ok(issued) => {
            info!(
                target = "branford::admin::session",
                expires_at = %issued.expires_at,
                "admin signed in",
            );
            let jar = jar.add(session_cookie(
                issued.token,
                state.sessions.ttl(),
                state.environment,
            ));
            if wants_json {
                (jar, Json(json!({ "success": true }))).into_response()
            } else {
                (jar, Redirect::to(DASHBOARD_PATH)).into_response()
            }
        }
        Err(SessionError::Signing(err)) => ApiError::internal("Failed to sign in")
            .with_report(ErrorReport::from_error(
                SOURCE,
                StatusCode::INTERNAL_SERVER_ERROR,
                &err,
            ))
            .into_response(),
        Err(err) => {
            warn!(target = "branford::admin::session", error = %err, "admin login rejected");
            if wants_json {
                ApiError::new(StatusCode::UNAUTHORIZED, "Invalid password", None)
                    .with_report(ErrorReport::from_error(
                        SOURCE,
                        StatusCode::UNAUTHORIZED,
                        &err,
                    ))
                    .into_response()
            } else {
                Redirect::to(LOGIN_FAILED_PATH).into_response()
            }
        }
    }
}

pub async fn logout(jar: CookieJar) -> Response {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to(LOGIN_PATH)).into_response()
}

fn session_cookie(
    token: String,
    ttl: Duration,
    environment: RuntimeEnvironment,
) -> Cookie<'static> {
    let max_age = time::Duration::try_from(ttl).unwrap_or(time::Duration::DAY);
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(!environment.is_development())
        .max_age(max_age)
        .build()
}
