//! Scripted transport for unit tests
//!
//! Replays canned responses keyed by method and path and records every
//! request it sees. The last scripted response for a route is sticky, so a
//! route scripted once answers any number of calls; scripting the route again
//! replaces responses that were already served.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::api::{ApiGateway, HttpRequest, HttpResponse, Method, Transport};
use crate::auth::AuthSession;
use crate::error::{ClientError, ClientResult};
use crate::session::MemorySessionStore;

pub const TEST_BASE: &str = "http://backend.test";

type RouteKey = (Method, String);

struct Scripted {
    response: HttpResponse,
    served: bool,
}

#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<RouteKey, VecDeque<Scripted>>>,
    gates: Mutex<HashMap<RouteKey, Arc<Notify>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.respond_bytes(method, path, status, body.to_string().into_bytes());
    }

    pub fn respond_bytes(&self, method: Method, path: &str, status: u16, body: Vec<u8>) {
        let mut routes = self.routes.lock().unwrap();
        let queue = routes.entry((method, path.to_string())).or_default();
        queue.retain(|s| !s.served);
        queue.push_back(Scripted {
            response: HttpResponse { status, body },
            served: false,
        });
    }

    /// Hold requests to a route until the returned handle is notified
    pub fn hold(&self, method: Method, path: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert((method, path.to_string()), notify.clone());
        notify
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Number of requests sent to one path
    pub fn calls_to(&self, path: &str) -> usize {
        let url = format!("{}{}", TEST_BASE, path);
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url == url)
            .count()
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let path = request
            .url
            .strip_prefix(TEST_BASE)
            .unwrap_or(&request.url)
            .to_string();
        let key = (request.method, path.clone());
        self.requests.lock().unwrap().push(request);

        let gate = self.gates.lock().unwrap().get(&key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut routes = self.routes.lock().unwrap();
        let queue = routes
            .get_mut(&key)
            .ok_or_else(|| ClientError::Transport(format!("no scripted response for {}", path)))?;

        let front = queue
            .front_mut()
            .ok_or_else(|| ClientError::Transport("empty script".to_string()))?;
        front.served = true;
        let response = front.response.clone();
        if queue.len() > 1 {
            queue.pop_front();
        }
        Ok(response)
    }
}

pub fn user_json(credits: u32) -> Value {
    json!({"id": "1", "name": "Ann", "email": "a@b.com", "credits": credits})
}

/// Gateway over a fake transport plus the store it reads from
pub fn gateway(
    transport: &Arc<FakeTransport>,
    token: Option<&str>,
) -> (ApiGateway, Arc<MemorySessionStore>) {
    let store = Arc::new(match token {
        Some(t) => MemorySessionStore::with_token(t),
        None => MemorySessionStore::new(),
    });
    let gateway = ApiGateway::new(TEST_BASE, transport.clone(), store.clone());
    (gateway, store)
}

/// Auth session already resolved to a user holding `credits`
pub async fn signed_in(transport: &Arc<FakeTransport>, credits: u32) -> Arc<AuthSession> {
    transport.respond(Method::Get, "/api/auth/me", 200, user_json(credits));
    let (gateway, _store) = gateway(transport, Some("tok"));
    let auth = Arc::new(AuthSession::new(gateway));
    auth.initialize().await;
    auth
}
