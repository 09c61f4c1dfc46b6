//! HTTP handlers for the login page, the generator form and the JSON API.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use journalist_rs::agent::AgentConfig;
use journalist_rs::agent::newsroom::Newsroom;
use journalist_rs::agent::request::ArticleRequest;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::Credentials;
use crate::error::AppError;
use crate::form::{FormState, GenerateForm, LoginForm};
use crate::pages;
use crate::session::{Flash, SessionStore, session_cookie, session_id};

pub const LOGIN_FAILED: &str = "Invalid username or password";
pub const LOGIN_OK: &str = "Login successful!";

/// Shared application state passed to all handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub newsroom: Newsroom,
    pub roster: Arc<Vec<AgentConfig>>,
    pub credentials: Arc<Credentials>,
    pub sessions: SessionStore,
}

fn with_cookie(id: Uuid, response: impl IntoResponse) -> Response {
    ([(SET_COOKIE, session_cookie(id))], response).into_response()
}

fn see_home() -> Response {
    Redirect::to("/").into_response()
}

/// GET /: Login page, or the generator once logged in.
///
/// Visitors without a live session get the login page and no cookie.
pub async fn index(State(app): State<AppState>, headers: HeaderMap) -> Response {
    let Some(id) = app.sessions.lookup(session_id(&headers)) else {
        return Html(pages::login_page(None)).into_response();
    };
    let body = app
        .sessions
        .with(id, |s| {
            let flash = s.take_flash();
            if s.logged_in {
                pages::generator_page(&s.form, s.drafts.as_ref(), flash.as_ref(), s.in_flight)
            } else {
                pages::login_page(flash.as_ref())
            }
        })
        .unwrap_or_else(|| pages::login_page(None));
    with_cookie(id, Html(body))
}

/// POST /login: Check credentials.
///
/// Success stores the session (reusing the browser's live one, if any) and
/// redirects to `/`; failure re-renders the login page with 401.
pub async fn login(
    State(app): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    if app.credentials.check(&form.username, &form.password) {
        let id = app.sessions.open(session_id(&headers));
        app.sessions.with(id, |s| {
            s.login();
            s.flash = Some(Flash::Success(LOGIN_OK.into()));
        });
        info!("Session {id} logged in");
        return with_cookie(id, see_home());
    }

    warn!("Rejected login for user {:?}", form.username);
    let flash = Flash::Error(LOGIN_FAILED.into());
    (StatusCode::UNAUTHORIZED, Html(pages::login_page(Some(&flash)))).into_response()
}

/// POST /logout: Reset the session and return to the login page.
pub async fn logout(State(app): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(id) = app.sessions.lookup(session_id(&headers)) {
        app.sessions.with(id, |s| s.logout());
        info!("Session {id} logged out");
    }
    see_home()
}

/// Outcome of checking a submit against the session, under the lock.
enum Admission {
    LoggedOut,
    Busy,
    Invalid(String),
    Start { epoch: u64, request: ArticleRequest },
}

/// POST /generate: Validate the form and run the newsroom once.
///
/// Invalid input re-renders the form with 422 and runs nothing. A browser has
/// at most one run going, even across logout and login; further submits get
/// 409. The result is stored only if the session has not logged out (or in
/// again) meanwhile.
pub async fn generate(
    State(app): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<GenerateForm>,
) -> Result<Response, AppError> {
    let Some(id) = app.sessions.lookup(session_id(&headers)) else {
        return Ok(see_home());
    };
    let form = FormState::from(form);

    let admission = app
        .sessions
        .with(id, |s| {
            if !s.logged_in {
                return Admission::LoggedOut;
            }
            if s.in_flight {
                return Admission::Busy;
            }
            s.form = form.clone();
            match form.to_request() {
                Ok(request) => {
                    s.in_flight = true;
                    Admission::Start {
                        epoch: s.epoch,
                        request,
                    }
                }
                Err(e) => {
                    let flash = Flash::Error(e.to_string());
                    Admission::Invalid(pages::generator_page(
                        &s.form,
                        s.drafts.as_ref(),
                        Some(&flash),
                        false,
                    ))
                }
            }
        })
        .unwrap_or(Admission::LoggedOut);

    let (epoch, request) = match admission {
        Admission::LoggedOut => return Ok(see_home()),
        Admission::Busy => return Err(AppError::Busy),
        Admission::Invalid(body) => {
            return Ok(with_cookie(id, (StatusCode::UNPROCESSABLE_ENTITY, Html(body))));
        }
        Admission::Start { epoch, request } => (epoch, request),
    };

    // Spawned so a dropped connection cannot leave the session stuck in flight.
    let sessions = app.sessions.clone();
    let newsroom = app.newsroom.clone();
    let task = tokio::spawn(async move {
        let result = newsroom.generate(&request).await;
        let accepted = sessions
            .with(id, |s| {
                s.in_flight = false;
                if !s.accepts_result(epoch) {
                    return false;
                }
                if let Ok(drafts) = &result {
                    s.drafts = Some(drafts.clone());
                }
                true
            })
            .unwrap_or(false);
        (accepted, result)
    });

    let (accepted, result) = match task.await {
        Ok(outcome) => outcome,
        Err(e) => {
            app.sessions.with(id, |s| s.in_flight = false);
            return Err(AppError::Interrupted(e));
        }
    };

    if !accepted {
        info!("Session {id} left before its article was ready; result discarded");
        return Ok(see_home());
    }
    result?;
    Ok(see_home())
}

/// One configured role, as listed by `GET /api/agents`.
#[derive(Serialize)]
pub struct AgentSummary {
    pub name: String,
    pub role: String,
    pub model: String,
    pub description: String,
    pub instructions: Vec<String>,
    pub tools: Vec<String>,
}

impl From<&AgentConfig> for AgentSummary {
    fn from(config: &AgentConfig) -> Self {
        Self {
            name: config.name().to_string(),
            role: config.role().to_string(),
            model: config.model().to_string(),
            description: config.description().to_string(),
            instructions: config.instructions().to_vec(),
            tools: config.tools().names().into_iter().map(String::from).collect(),
        }
    }
}

/// GET /api/agents: Every configured role.
pub async fn api_agents(State(app): State<AppState>) -> Json<Vec<AgentSummary>> {
    Json(app.roster.iter().map(AgentSummary::from).collect())
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_form_deserializes() {
        let form: LoginForm = serde_json::from_str(r#"{"username":"u"}"#).unwrap();
        assert_eq!(form.username, "u");
        assert_eq!(form.password, "");
    }

    #[test]
    fn agent_summary_lists_tools() {
        let config = AgentConfig::new("Writer", "Writes", "You write.", vec!["Write.".into()])
            .unwrap()
            .with_model("gpt-4o-mini");
        let json = serde_json::to_value(AgentSummary::from(&config)).unwrap();
        assert_eq!(json["name"], "Writer");
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["tools"], serde_json::json!([]));
        assert_eq!(json["instructions"][0], "Write.");
    }
}
