#![allow(dead_code)]

use std::sync::Mutex;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{json, Value};
use wildwelcome_core::Navigator;
use wildwelcome_domain::ApiConfig;
use wiremock::MockServer;

/// API prefix mounted on every mock server, mirroring the deployed layout.
pub const API_PREFIX: &str = "/api";

/// Client configuration pointing at `server`.
pub fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig { base_url: format!("{}{API_PREFIX}", server.uri()), timeout_secs: 2 }
}

/// Full request path for an endpoint under [`API_PREFIX`].
pub fn endpoint(path: &str) -> String {
    format!("{API_PREFIX}{path}")
}

/// Unsigned JWT carrying `sub`.
pub fn jwt_with_sub(sub: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "sub": sub, "exp": 4_102_444_800_i64 }).to_string());
    format!("{header}.{payload}.signature")
}

pub fn profile_json(email: &str, user_type: &str) -> Value {
    json!({
        "id": "42",
        "email": email,
        "first_name": "Robin",
        "last_name": "Reyes",
        "user_type": user_type,
        "phone": null,
        "is_active": true,
        "is_verified": true
    })
}

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.paths.lock().unwrap().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}
