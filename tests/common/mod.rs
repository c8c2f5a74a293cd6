// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use racetrack_session::config::Config;
use racetrack_session::error::{AppError, Result};
use racetrack_session::routes::Navigator;
use racetrack_session::services::{ApiMessage, AuthApi, LoginResponse};
use racetrack_session::session::SessionContext;
use racetrack_session::store::{keys, KeyValueStore, MemoryStore};
use racetrack_session::AppState;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Notify;

/// Create an unsigned-by-us JWT expiring `exp_offset_secs` from now.
#[allow(dead_code)]
pub fn mint_token(exp_offset_secs: i64) -> String {
    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: i64,
        iat: i64,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: "12345".to_string(),
        exp: now + exp_offset_secs,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"server_only_signing_key"),
    )
    .unwrap()
}

/// Login reply body as the API sends it.
#[allow(dead_code)]
pub fn login_body(token: &str, admin: bool, races: Value) -> Value {
    json!({
        "accessToken": token,
        "refreshToken": "refresh-token",
        "user": {
            "id": 12345,
            "email": "runner@example.com",
            "name": "Runner",
            "isAdministrator": admin
        },
        "signedRaces": races
    })
}

/// What the fake API answers to `login`.
#[derive(Clone)]
#[allow(dead_code)]
pub enum LoginReply {
    Success(Value),
    Rejected(String),
}

/// Scriptable API double.
#[allow(dead_code)]
pub struct FakeAuthApi {
    login_reply: Mutex<LoginReply>,
    /// When set, `login` waits for a notification before answering
    gate: Option<Arc<Notify>>,
    pub login_calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeAuthApi {
    pub fn new(reply: LoginReply) -> Self {
        Self {
            login_reply: Mutex::new(reply),
            gate: None,
            login_calls: AtomicUsize::new(0),
        }
    }

    pub fn gated(reply: LoginReply, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(reply)
        }
    }

    pub fn calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<LoginResponse> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let reply = self.login_reply.lock().unwrap().clone();
        match reply {
            LoginReply::Success(body) => Ok(serde_json::from_value(body).unwrap()),
            LoginReply::Rejected(msg) => Err(AppError::Network(msg)),
        }
    }

    async fn request_password_reset(&self, _email: &str) -> Result<ApiMessage> {
        Ok(ApiMessage {
            msg: Some("Check your inbox".to_string()),
        })
    }

    async fn reset_password(&self, token: &str, _new_password: &str) -> Result<ApiMessage> {
        if token == "expired" {
            return Err(AppError::Network(String::new()));
        }
        Ok(ApiMessage::default())
    }
}

/// One recorded navigation.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct NavEvent {
    pub path: String,
    pub replace: bool,
    /// Whether an access token was still stored when navigation happened
    pub token_present: bool,
    /// Number of signed races in the session context at that moment
    pub races_in_context: Option<usize>,
}

/// Navigator that records what the store and context looked like at each
/// navigation.
pub struct RecordingNavigator {
    kv: Arc<MemoryStore>,
    context: OnceLock<SessionContext>,
    events: Mutex<Vec<NavEvent>>,
    current: Mutex<String>,
}

#[allow(dead_code)]
impl RecordingNavigator {
    pub fn new(kv: Arc<MemoryStore>, initial: &str) -> Self {
        Self {
            kv,
            context: OnceLock::new(),
            events: Mutex::new(Vec::new()),
            current: Mutex::new(initial.to_string()),
        }
    }

    pub fn events(&self) -> Vec<NavEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count_to(&self, path: &str) -> usize {
        self.events().iter().filter(|e| e.path == path).count()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str, replace: bool) {
        let event = NavEvent {
            path: path.to_string(),
            replace,
            token_present: self.kv.get(keys::ACCESS_TOKEN).is_some(),
            races_in_context: self.context.get().map(|c| c.signed_races().len()),
        };
        self.events.lock().unwrap().push(event);
        *self.current.lock().unwrap() = path.to_string();
    }

    fn current_path(&self) -> String {
        self.current.lock().unwrap().clone()
    }
}

/// Fully wired app over in-memory collaborators.
#[allow(dead_code)]
pub struct TestApp {
    pub state: Arc<AppState>,
    pub kv: Arc<MemoryStore>,
    pub nav: Arc<RecordingNavigator>,
    pub api: Arc<FakeAuthApi>,
}

/// Create a test app over `kv`, which may already hold a session.
#[allow(dead_code)]
pub fn create_test_app_with(kv: Arc<MemoryStore>, api: FakeAuthApi) -> TestApp {
    let config = Config::default();
    let nav = Arc::new(RecordingNavigator::new(kv.clone(), "/"));
    let api = Arc::new(api);

    let state = Arc::new(AppState::new(config, kv.clone(), api.clone(), nav.clone()));
    let _ = nav.context.set(state.context().clone());

    TestApp {
        state,
        kv,
        nav,
        api,
    }
}

/// Create a test app with an empty store.
#[allow(dead_code)]
pub fn create_test_app(reply: LoginReply) -> TestApp {
    create_test_app_with(Arc::new(MemoryStore::new()), FakeAuthApi::new(reply))
}

/// Store a session as a previous run would have left it.
#[allow(dead_code)]
pub fn seed_session(kv: &MemoryStore, token: &str, admin: bool, races: Value) {
    kv.set(keys::ACCESS_TOKEN, token).unwrap();
    kv.set(keys::REFRESH_TOKEN, "refresh-token").unwrap();
    kv.set(
        keys::USER,
        &json!({
            "id": "12345",
            "email": "runner@example.com",
            "name": "Runner",
            "is_administrator": admin
        })
        .to_string(),
    )
    .unwrap();
    kv.set(keys::SIGNED_RACES, &races.to_string()).unwrap();
}
