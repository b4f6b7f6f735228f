use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::state::AppState;

/// Axum middleware gating the function endpoints behind the service
/// credential.
///
/// Accepted bearer values, checked in order:
/// 1. The exact provisioned service secret.
/// 2. An HS256 JWT whose signature verifies against that same secret and
///    whose payload carries `role == "service_role"`. The signature is
///    verified before any claim is read; an unverifiable token never
///    gets to assert a role.
///
/// Missing header → 401. Anything else unrecognized → 403. Both are
/// decided before a single backend request is made.
pub async fn require_service_role(
    State(app): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let header = req
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok());

    let Some(header) = header else {
        return json_error(401, "missing authorization header");
    };
    let token = header.strip_prefix("Bearer ").unwrap_or(header);

    if verify_credential(token, &app.config.backend.service_role_key) {
        next.run(req).await
    } else {
        json_error(403, "credential is not service_role")
    }
}

/// Exact-secret match, or verified service-role JWT.
pub fn verify_credential(token: &str, secret: &str) -> bool {
    if !secret.is_empty() && token == secret {
        return true;
    }
    verify_service_jwt(token, secret)
}

fn verify_service_jwt(token: &str, secret: &str) -> bool {
    let mut parts = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    // Refuse anything but HS256 so an attacker can't pick the algorithm.
    let Some(header_json) = decode_segment(header) else {
        return false;
    };
    let Ok(header_value) = serde_json::from_slice::<serde_json::Value>(&header_json) else {
        return false;
    };
    if header_value.get("alg").and_then(|a| a.as_str()) != Some("HS256") {
        return false;
    }

    let Some(sig_bytes) = decode_segment(signature) else {
        return false;
    };
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(header.as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    if mac.verify_slice(&sig_bytes).is_err() {
        return false;
    }

    let Some(payload_json) = decode_segment(payload) else {
        return false;
    };
    let Ok(claims) = serde_json::from_slice::<serde_json::Value>(&payload_json) else {
        return false;
    };
    claims.get("role").and_then(|r| r.as_str()) == Some("service_role")
}

/// Base64url decode tolerating both padded and unpadded segments.
fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .ok()
}

fn json_error(status: u16, message: &str) -> Response {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::from(
            serde_json::json!({ "error": message }).to_string(),
        ))
        .expect("infallible: all header values are valid ASCII")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn sign_jwt(payload: &serde_json::Value, secret: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{header}.{payload}").as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        format!("{header}.{payload}.{signature}")
    }

    #[test]
    fn exact_secret_is_accepted() {
        assert!(verify_credential(SECRET, SECRET));
    }

    #[test]
    fn random_token_is_rejected() {
        assert!(!verify_credential("not-the-secret", SECRET));
    }

    #[test]
    fn empty_secret_never_matches_empty_token() {
        assert!(!verify_credential("", ""));
    }

    #[test]
    fn signed_service_role_jwt_is_accepted() {
        let token = sign_jwt(&serde_json::json!({ "role": "service_role" }), SECRET);
        assert!(verify_credential(&token, SECRET));
    }

    #[test]
    fn jwt_with_wrong_role_is_rejected() {
        let token = sign_jwt(&serde_json::json!({ "role": "authenticated" }), SECRET);
        assert!(!verify_credential(&token, SECRET));
    }

    #[test]
    fn jwt_signed_with_wrong_key_is_rejected_despite_role_claim() {
        let token = sign_jwt(&serde_json::json!({ "role": "service_role" }), "other-key");
        assert!(!verify_credential(&token, SECRET));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let token = sign_jwt(&serde_json::json!({ "role": "authenticated" }), SECRET);
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = URL_SAFE_NO_PAD.encode(br#"{"role":"service_role"}"#);
        parts[1] = &forged;
        let forged_token = parts.join(".");
        assert!(!verify_credential(&forged_token, SECRET));
    }

    #[test]
    fn non_hs256_alg_is_rejected() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"role":"service_role"}"#);
        let token = format!("{header}.{payload}.");
        assert!(!verify_credential(&token, SECRET));
    }

    #[test]
    fn padded_segments_decode() {
        // Same JWT with explicit padding on the payload segment.
        let token = sign_jwt(&serde_json::json!({ "role": "service_role" }), SECRET);
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        while parts[1].len() % 4 != 0 {
            parts[1].push('=');
        }
        let padded = parts.join(".");
        assert!(verify_credential(&padded, SECRET));
    }

    #[test]
    fn garbage_segments_are_rejected() {
        assert!(!verify_credential("a.b", SECRET));
        assert!(!verify_credential("a.b.c.d", SECRET));
        assert!(!verify_credential("!!!.???.###", SECRET));
    }
}
