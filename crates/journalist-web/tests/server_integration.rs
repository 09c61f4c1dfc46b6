//! Integration tests for the journalist-web server.
//!
//! These tests start a real axum server on a random port with stub agents in
//! place of the chat API and drive it the way a browser would: form posts,
//! a session cookie, and no automatic redirects.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use journalist_rs::Error;
use journalist_rs::agent::{Agent, RunFuture};
use journalist_rs::prelude::*;
use journalist_web::{Credentials, LOGIN_FAILED, LOGIN_OK, WebConfig, spawn_web};
use reqwest::StatusCode;
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use tokio::sync::Notify;

const USER: &str = "editor";
const PASS: &str = "s3cret";

/// Agent stand-in that records its inputs and replies with fixed text.
struct Stub {
    name: &'static str,
    reply: Result<&'static str, &'static str>,
    gate: Option<Arc<Notify>>,
    inputs: Mutex<Vec<String>>,
    started: AtomicUsize,
}

impl Stub {
    fn build(
        name: &'static str,
        reply: Result<&'static str, &'static str>,
        gate: Option<Arc<Notify>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply,
            gate,
            inputs: Mutex::new(Vec::new()),
            started: AtomicUsize::new(0),
        })
    }

    fn ok(name: &'static str, reply: &'static str) -> Arc<Self> {
        Self::build(name, Ok(reply), None)
    }

    fn failing(name: &'static str, message: &'static str) -> Arc<Self> {
        Self::build(name, Err(message), None)
    }

    /// Replies only after `gate` is notified.
    fn gated(name: &'static str, reply: &'static str, gate: Arc<Notify>) -> Arc<Self> {
        Self::build(name, Ok(reply), Some(gate))
    }

    fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }

    fn calls(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

impl Agent for Stub {
    fn name(&self) -> &str {
        self.name
    }

    fn run<'a>(&'a self, input: &'a str) -> RunFuture<'a> {
        Box::pin(async move {
            self.inputs.lock().unwrap().push(input.to_string());
            self.started.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(message) => Err(Error::Provider(message.to_string())),
            }
        })
    }
}

struct Stubs {
    planner: Arc<Stub>,
    writer: Arc<Stub>,
    editor: Arc<Stub>,
}

impl Stubs {
    fn standard() -> Self {
        Self {
            planner: Stub::ok("Planner", "OUTLINE"),
            writer: Stub::ok("Writer", "DRAFT"),
            editor: Stub::ok("Editor", "# Final\n\nThe edited *article*."),
        }
    }

    fn total_calls(&self) -> usize {
        self.planner.calls() + self.writer.calls() + self.editor.calls()
    }
}

/// Helper: spawn a test server on port 0 (random available port).
async fn spawn_test_server(stubs: &Stubs, credentials: Credentials) -> String {
    let newsroom = Newsroom::new(
        stubs.planner.clone(),
        stubs.writer.clone(),
        stubs.editor.clone(),
    );
    let extractor: Arc<dyn LinkExtractor> = Arc::new(HttpLinkExtractor::new().unwrap());
    let roster = presets::roster(extractor).unwrap();
    let config = WebConfig {
        bind_addr: ([127, 0, 0, 1], 0).into(),
        ..Default::default()
    };
    let addr = spawn_web(newsroom, roster, credentials, config).await.unwrap();
    format!("http://{addr}")
}

/// A cookie-keeping client that does not follow redirects.
#[derive(Clone)]
struct Browser {
    client: reqwest::Client,
    base: String,
    cookie: Arc<Mutex<Option<String>>>,
}

impl Browser {
    async fn open(base: &str) -> Self {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();
        let browser = Self {
            client,
            base: base.to_string(),
            cookie: Arc::new(Mutex::new(None)),
        };
        let (status, _) = browser.page().await;
        assert_eq!(status, StatusCode::OK);
        browser
    }

    fn cookie(&self) -> Option<String> {
        self.cookie.lock().unwrap().clone()
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.cookie() {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        }
    }

    fn remember(&self, resp: &reqwest::Response) {
        if let Some(cookie) = set_cookie(resp) {
            assert!(cookie.starts_with("journalist_session="));
            *self.cookie.lock().unwrap() = Some(cookie);
        }
    }

    async fn page(&self) -> (StatusCode, String) {
        let resp = self
            .request(self.client.get(format!("{}/", self.base)))
            .send()
            .await
            .unwrap();
        self.remember(&resp);
        (resp.status(), resp.text().await.unwrap())
    }

    async fn post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        let resp = self
            .request(self.client.post(format!("{}{path}", self.base)))
            .form(form)
            .send()
            .await
            .unwrap();
        self.remember(&resp);
        resp
    }

    async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/login", &[("username", username), ("password", password)])
            .await
    }
}

fn set_cookie(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

fn assert_redirect_home(resp: &reqwest::Response) {
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[LOCATION], "/");
}

async fn logged_in(stubs: &Stubs) -> Browser {
    let base = spawn_test_server(stubs, Credentials::new(USER, PASS)).await;
    let browser = Browser::open(&base).await;
    assert_redirect_home(&browser.login(USER, PASS).await);
    browser
}

async fn wait_for(stub: &Stub) {
    for _ in 0..200 {
        if stub.calls() > 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{} was never called", stub.name);
}

// ── Login ────────────────────────────────────────────────────────────

#[tokio::test]
async fn first_visit_shows_login_page() {
    let stubs = Stubs::standard();
    let base = spawn_test_server(&stubs, Credentials::new(USER, PASS)).await;
    let browser = Browser::open(&base).await;

    let (status, body) = browser.page().await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"action="/login""#));
    assert!(!body.contains("Generate Article"));
}

#[tokio::test]
async fn anonymous_visitors_get_no_session() {
    let stubs = Stubs::standard();
    let base = spawn_test_server(&stubs, Credentials::new(USER, PASS)).await;

    for _ in 0..50 {
        let resp = reqwest::get(format!("{base}/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(set_cookie(&resp), None);
    }

    let browser = Browser::open(&base).await;
    let resp = browser.login(USER, "nope").await;
    assert_eq!(set_cookie(&resp), None);
    let resp = browser.post("/logout", &[]).await;
    assert_eq!(set_cookie(&resp), None);
    assert_eq!(browser.cookie(), None);

    let resp = browser.login(USER, PASS).await;
    assert!(set_cookie(&resp).is_some());
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let stubs = Stubs::standard();
    let base = spawn_test_server(&stubs, Credentials::new(USER, PASS)).await;
    let browser = Browser::open(&base).await;

    let resp = browser.login(USER, "nope").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.text().await.unwrap().contains(LOGIN_FAILED));

    let (_, body) = browser.page().await;
    assert!(!body.contains("Generate Article"));
}

#[tokio::test]
async fn unset_credentials_reject_everyone() {
    let stubs = Stubs::standard();
    let base = spawn_test_server(&stubs, Credentials::default()).await;
    let browser = Browser::open(&base).await;

    let resp = browser.login("", "").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_shows_generator_with_placeholder() {
    let stubs = Stubs::standard();
    let browser = logged_in(&stubs).await;

    let (status, body) = browser.page().await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(LOGIN_OK));
    assert!(body.contains("Generate Article"));
    assert!(body.contains("Your generated article will be displayed here."));

    // The success message is shown once.
    let (_, again) = browser.page().await;
    assert!(!again.contains(LOGIN_OK));
}

#[tokio::test]
async fn sessions_are_per_browser() {
    let stubs = Stubs::standard();
    let browser = logged_in(&stubs).await;
    let other = Browser::open(&browser.base).await;

    let (_, body) = other.page().await;
    assert!(!body.contains("Generate Article"));
}

// ── Generation ───────────────────────────────────────────────────────

#[tokio::test]
async fn generate_runs_each_stage_once_and_shows_article() {
    let stubs = Stubs::standard();
    let browser = logged_in(&stubs).await;

    let resp = browser
        .post(
            "/generate",
            &[
                ("topic", "  Solar power  "),
                ("word_limit", "500"),
                ("use_links", "yes"),
                ("num_links", "1"),
                ("link_1", "https://a.example/story"),
                ("link_2", "https://ignored.example"),
            ],
        )
        .await;
    assert_redirect_home(&resp);

    let instructions = "Topic: Solar power\nReference Links:\nhttps://a.example/story\nWord Limit:500";
    assert_eq!(stubs.planner.inputs(), [instructions]);
    assert_eq!(stubs.writer.calls(), 1);
    assert_eq!(stubs.editor.calls(), 1);
    assert!(stubs.writer.inputs()[0].starts_with(instructions));
    assert!(stubs.writer.inputs()[0].contains("OUTLINE"));
    assert!(stubs.editor.inputs()[0].contains("DRAFT"));

    let (_, body) = browser.page().await;
    assert!(body.contains("<h1>Final</h1>"));
    assert!(body.contains("<em>article</em>"));
    assert!(body.contains(">Copy</button>"));
    assert!(!body.contains("Your generated article will be displayed here."));
    // The form keeps what was entered.
    assert!(body.contains(r#"value="  Solar power  ""#));
}

#[tokio::test]
async fn no_links_uses_the_fallback_line() {
    let stubs = Stubs::standard();
    let browser = logged_in(&stubs).await;

    let resp = browser
        .post(
            "/generate",
            &[("topic", "Tides"), ("word_limit", "250"), ("use_links", "no")],
        )
        .await;
    assert_redirect_home(&resp);
    assert_eq!(
        stubs.planner.inputs(),
        ["Topic: Tides\nReference Links:\nNo reference links provided.\nWord Limit:250"]
    );
}

#[tokio::test]
async fn empty_topic_is_not_dispatched() {
    let stubs = Stubs::standard();
    let browser = logged_in(&stubs).await;

    let resp = browser
        .post("/generate", &[("topic", "   "), ("word_limit", "300")])
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Please provide a topic to write an article on."));
    assert_eq!(stubs.total_calls(), 0);
}

#[tokio::test]
async fn empty_link_is_not_dispatched() {
    let stubs = Stubs::standard();
    let browser = logged_in(&stubs).await;

    let resp = browser
        .post(
            "/generate",
            &[
                ("topic", "Tides"),
                ("use_links", "yes"),
                ("num_links", "2"),
                ("link_1", "https://a.example"),
                ("link_2", ""),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        resp.text()
            .await
            .unwrap()
            .contains("Please fill in every reference link")
    );
    assert_eq!(stubs.total_calls(), 0);
}

#[tokio::test]
async fn generate_requires_login() {
    let stubs = Stubs::standard();
    let base = spawn_test_server(&stubs, Credentials::new(USER, PASS)).await;
    let browser = Browser::open(&base).await;

    let resp = browser.post("/generate", &[("topic", "Tides")]).await;
    assert_redirect_home(&resp);
    assert_eq!(stubs.total_calls(), 0);
}

#[tokio::test]
async fn agent_failure_is_reported_and_session_recovers() {
    let stubs = Stubs {
        writer: Stub::failing("Writer", "model overloaded"),
        ..Stubs::standard()
    };
    let browser = logged_in(&stubs).await;

    let resp = browser.post("/generate", &[("topic", "Tides")]).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert!(
        resp.text()
            .await
            .unwrap()
            .contains("chat API error: model overloaded")
    );
    assert_eq!(stubs.editor.calls(), 0);

    // Not stuck in the generating state.
    let resp = browser.post("/generate", &[("topic", "Tides")]).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(stubs.planner.calls(), 2);
}

#[tokio::test]
async fn second_submit_while_generating_is_rejected() {
    let gate = Arc::new(Notify::new());
    let stubs = Stubs {
        writer: Stub::gated("Writer", "DRAFT", gate.clone()),
        ..Stubs::standard()
    };
    let browser = logged_in(&stubs).await;

    let first = {
        let browser = browser.clone();
        tokio::spawn(async move { browser.post("/generate", &[("topic", "Tides")]).await })
    };
    wait_for(&stubs.writer).await;

    let second = browser.post("/generate", &[("topic", "Other")]).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    gate.notify_one();
    assert_redirect_home(&first.await.unwrap());
    assert_eq!(stubs.planner.calls(), 1);

    let (_, body) = browser.page().await;
    assert!(body.contains("<h1>Final</h1>"));
}

#[tokio::test]
async fn logout_mid_generation_discards_the_result() {
    let gate = Arc::new(Notify::new());
    let stubs = Stubs {
        writer: Stub::gated("Writer", "DRAFT", gate.clone()),
        ..Stubs::standard()
    };
    let browser = logged_in(&stubs).await;

    let pending = {
        let browser = browser.clone();
        tokio::spawn(async move { browser.post("/generate", &[("topic", "Tides")]).await })
    };
    wait_for(&stubs.writer).await;

    assert_redirect_home(&browser.post("/logout", &[]).await);
    assert_redirect_home(&browser.login(USER, PASS).await);

    gate.notify_one();
    assert_redirect_home(&pending.await.unwrap());

    let (_, body) = browser.page().await;
    assert!(body.contains("Your generated article will be displayed here."));
    assert!(!body.contains("<h1>Final</h1>"));
}

#[tokio::test]
async fn logging_back_in_does_not_start_a_second_run() {
    let gate = Arc::new(Notify::new());
    let stubs = Stubs {
        writer: Stub::gated("Writer", "DRAFT", gate.clone()),
        ..Stubs::standard()
    };
    let browser = logged_in(&stubs).await;
    let cookie = browser.cookie();

    let pending = {
        let browser = browser.clone();
        tokio::spawn(async move { browser.post("/generate", &[("topic", "Tides")]).await })
    };
    wait_for(&stubs.writer).await;

    assert_redirect_home(&browser.post("/logout", &[]).await);
    assert_redirect_home(&browser.login(USER, PASS).await);
    assert_eq!(browser.cookie(), cookie);

    let again = browser.post("/generate", &[("topic", "Other")]).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
    assert_eq!(stubs.planner.calls(), 1);
    assert_eq!(stubs.writer.calls(), 1);

    gate.notify_one();
    assert_redirect_home(&pending.await.unwrap());
    let (_, body) = browser.page().await;
    assert!(body.contains("Your generated article will be displayed here."));
    assert!(!body.contains("<h1>Final</h1>"));
}

#[tokio::test]
async fn logout_returns_to_login_page() {
    let stubs = Stubs::standard();
    let browser = logged_in(&stubs).await;

    assert_redirect_home(&browser.post("/logout", &[]).await);
    let (_, body) = browser.page().await;
    assert!(body.contains(r#"action="/login""#));
    assert!(!body.contains("Generate Article"));
}

// ── JSON & assets ────────────────────────────────────────────────────

#[tokio::test]
async fn api_agents_lists_the_roster() {
    let stubs = Stubs::standard();
    let base = spawn_test_server(&stubs, Credentials::new(USER, PASS)).await;

    let resp = reqwest::get(format!("{base}/api/agents")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = resp.json().await.unwrap();
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Planner", "Writer", "Editor", "Publisher"]);
    assert_eq!(json[0]["tools"], serde_json::json!(["read_article"]));
    assert_eq!(json[0]["model"], "gpt-4o");
}

#[tokio::test]
async fn healthz_and_assets_are_served() {
    let stubs = Stubs::standard();
    let base = spawn_test_server(&stubs, Credentials::new(USER, PASS)).await;

    let health = reqwest::get(format!("{base}/healthz")).await.unwrap();
    assert_eq!(health.text().await.unwrap(), "ok");

    let logo = reqwest::get(format!("{base}/assets/logo.svg")).await.unwrap();
    assert_eq!(logo.status(), StatusCode::OK);
    assert!(logo.text().await.unwrap().contains("<svg"));
}

#[tokio::test]
async fn assets_come_from_the_configured_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("logo.svg"), "<svg id=\"custom\"/>").unwrap();

    let stubs = Stubs::standard();
    let newsroom = Newsroom::new(stubs.planner, stubs.writer, stubs.editor);
    let config = WebConfig {
        bind_addr: ([127, 0, 0, 1], 0).into(),
        static_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    let addr = spawn_web(newsroom, Vec::new(), Credentials::default(), config)
        .await
        .unwrap();

    let logo = reqwest::get(format!("http://{addr}/assets/logo.svg"))
        .await
        .unwrap();
    assert_eq!(logo.text().await.unwrap(), "<svg id=\"custom\"/>");
    let missing = reqwest::get(format!("http://{addr}/assets/stock.svg"))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
