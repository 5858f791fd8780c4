// SPDX-License-Identifier: MIT

use readstack::config::Config;
use readstack::db::FirestoreDb;
use readstack::routes::create_router;
use readstack::services::CoverStore;
use readstack::AppState;
use std::path::Path;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let covers_root = std::env::temp_dir().join("readstack-test-covers");
    create_test_app_with(test_db_offline(), &covers_root)
}

/// Create a test app around a specific database and cover directory.
#[allow(dead_code)]
pub fn create_test_app_with(db: FirestoreDb, covers_root: &Path) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let covers = CoverStore::new(covers_root);

    let state = Arc::new(AppState { config, db, covers });

    (create_router(state.clone()), state)
}

/// Create a test JWT token (mirrors middleware/auth.rs).
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, email: &str, signing_key: &[u8]) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    create_test_jwt_with_exp(user_id, email, signing_key, now + 86400)
}

/// Create a test JWT with an explicit expiry timestamp.
#[allow(dead_code)]
pub fn create_test_jwt_with_exp(
    user_id: &str,
    email: &str,
    signing_key: &[u8],
    exp: usize,
) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde::Serialize;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        email: String,
        exp: usize,
        iat: usize,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .expect("Failed to create JWT")
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body should be JSON")
}

/// Fixed boundary for hand-built multipart bodies.
#[allow(dead_code)]
pub const MULTIPART_BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Content-Type header value matching [`multipart_body`].
#[allow(dead_code)]
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}")
}

/// Build a multipart body from text fields plus an optional `cover`
/// file part with the given content type.
#[allow(dead_code)]
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{name}\"\r\n\r\n\
                 {value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((content_type, data)) = file {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"cover\"; filename=\"cover.png\"\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}
