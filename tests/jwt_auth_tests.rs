// SPDX-License-Identifier: MIT

//! JWT authentication tests.
//!
//! These tests verify that tokens created by the login flow can be
//! decoded by the auth middleware, catching compatibility issues early.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use readstack::middleware::auth::{create_jwt, Claims};

const SIGNING_KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

#[test]
fn test_jwt_roundtrip() {
    // A token created by the auth flow must decode with the same
    // Claims structure the middleware uses.
    let token = create_jwt("user-123", "ada@example.com", SIGNING_KEY).unwrap();

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(&token, &key, &validation)
        .expect("Failed to decode JWT - check Claims struct compatibility");

    assert_eq!(token_data.claims.sub, "user-123");
    assert_eq!(token_data.claims.email, "ada@example.com");
    assert!(token_data.claims.exp > token_data.claims.iat);
}

#[test]
fn test_jwt_expiration_is_future() {
    use std::time::{SystemTime, UNIX_EPOCH};

    let token = create_jwt("user-123", "ada@example.com", SIGNING_KEY).unwrap();

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false; // We'll check manually

    let token_data = decode::<Claims>(&token, &key, &validation).unwrap();

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    // Token should expire at least 29 days in the future
    assert!(
        token_data.claims.exp > now + 86400 * 29,
        "Token expiration should be ~30 days in the future"
    );
}

#[test]
fn test_jwt_rejects_wrong_key() {
    let token = create_jwt("user-123", "ada@example.com", SIGNING_KEY).unwrap();

    let key = DecodingKey::from_secret(b"a_different_signing_key_here!!!!");
    let validation = Validation::new(Algorithm::HS256);

    assert!(decode::<Claims>(&token, &key, &validation).is_err());
}

#[test]
fn test_jwt_rejects_tampered_payload() {
    let token = create_jwt("user-123", "ada@example.com", SIGNING_KEY).unwrap();

    // Swap the payload segment for a different one
    let mut parts: Vec<&str> = token.split('.').collect();
    let other = create_jwt("user-456", "eve@example.com", SIGNING_KEY).unwrap();
    let other_parts: Vec<&str> = other.split('.').collect();
    parts[1] = other_parts[1];
    let tampered = parts.join(".");

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let validation = Validation::new(Algorithm::HS256);

    assert!(decode::<Claims>(&tampered, &key, &validation).is_err());
}
