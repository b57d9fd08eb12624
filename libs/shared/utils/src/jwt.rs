use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use shared_models::auth::{IdentityClaim, JwtClaims, JwtHeader};
use shared_models::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Session tokens are valid for one hour from issuance.
pub const TOKEN_TTL_SECONDS: i64 = 60 * 60;

pub fn issue_token(claim: &IdentityClaim, jwt_secret: &str) -> Result<String, AppError> {
    issue_token_at(claim, jwt_secret, Utc::now().timestamp())
}

pub fn issue_token_at(claim: &IdentityClaim, jwt_secret: &str, now: i64) -> Result<String, AppError> {
    let header = JwtHeader {
        alg: "HS256".to_string(),
        typ: "JWT".to_string(),
    };
    let payload = JwtClaims {
        email: claim.email.clone(),
        role: claim.role,
        iat: now,
        exp: now + TOKEN_TTL_SECONDS,
    };

    let header_b64 = encode_part(&header)?;
    let payload_b64 = encode_part(&payload)?;
    let signing_input = format!("{}.{}", header_b64, payload_b64);

    let signature = URL_SAFE_NO_PAD.encode(sign(&signing_input, jwt_secret)?);

    debug!("Issued session token for {}", claim.email);
    Ok(format!("{}.{}", signing_input, signature))
}

pub fn verify_token(token: Option<&str>, jwt_secret: &str) -> Result<IdentityClaim, AppError> {
    verify_token_at(token, jwt_secret, Utc::now().timestamp())
}

pub fn verify_token_at(token: Option<&str>, jwt_secret: &str, now: i64) -> Result<IdentityClaim, AppError> {
    let token = match token.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return Err(AppError::MissingToken),
    };

    // Split token into parts
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        debug!("Invalid token format");
        return Err(AppError::InvalidOrExpiredToken);
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|e| {
        debug!("Failed to decode signature: {}", e);
        AppError::InvalidOrExpiredToken
    })?;

    let mut mac = mac_for(jwt_secret)?;
    mac.update(format!("{}.{}", header_b64, claims_b64).as_bytes());
    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err(AppError::InvalidOrExpiredToken);
    }

    let header: JwtHeader = decode_part(header_b64)?;
    if header.alg != "HS256" {
        debug!("Unsupported token algorithm: {}", header.alg);
        return Err(AppError::InvalidOrExpiredToken);
    }

    let claims: JwtClaims = decode_part(claims_b64)?;
    if now >= claims.exp {
        debug!("Token expired at {} (now: {})", claims.exp, now);
        return Err(AppError::InvalidOrExpiredToken);
    }

    debug!("Token validated successfully for user: {}", claims.email);
    Ok(IdentityClaim {
        email: claims.email,
        role: claims.role,
    })
}

fn mac_for(jwt_secret: &str) -> Result<HmacSha256, AppError> {
    if jwt_secret.is_empty() {
        return Err(AppError::Internal("JWT secret is not set".to_string()));
    }
    HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| AppError::Internal("Failed to create HMAC".to_string()))
}

fn sign(signing_input: &str, jwt_secret: &str) -> Result<Vec<u8>, AppError> {
    let mut mac = mac_for(jwt_secret)?;
    mac.update(signing_input.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

fn encode_part<T: serde::Serialize>(part: &T) -> Result<String, AppError> {
    let json = serde_json::to_vec(part).map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_part<T: serde::de::DeserializeOwned>(part_b64: &str) -> Result<T, AppError> {
    let bytes = URL_SAFE_NO_PAD.decode(part_b64).map_err(|_| {
        debug!("Invalid token part encoding");
        AppError::InvalidOrExpiredToken
    })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        debug!("Failed to parse token part: {}", e);
        AppError::InvalidOrExpiredToken
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_models::auth::Role;

    const SECRET: &str = "test-secret-key-for-jwt-validation-must-be-long-enough";
    const ISSUED_AT: i64 = 1_700_000_000;

    fn member() -> IdentityClaim {
        IdentityClaim::new("m@x.com", Role::Member)
    }

    #[test]
    fn test_round_trip_within_validity_window() {
        let token = issue_token_at(&member(), SECRET, ISSUED_AT).unwrap();

        for now in [ISSUED_AT, ISSUED_AT + 1, ISSUED_AT + TOKEN_TTL_SECONDS - 1] {
            let claim = verify_token_at(Some(&token), SECRET, now).unwrap();
            assert_eq!(claim, member());
        }
    }

    #[test]
    fn test_expires_exactly_after_one_hour() {
        let token = issue_token_at(&member(), SECRET, ISSUED_AT).unwrap();

        let result = verify_token_at(Some(&token), SECRET, ISSUED_AT + TOKEN_TTL_SECONDS);
        assert_matches!(result, Err(AppError::InvalidOrExpiredToken));

        let result = verify_token_at(Some(&token), SECRET, ISSUED_AT + 2 * TOKEN_TTL_SECONDS);
        assert_matches!(result, Err(AppError::InvalidOrExpiredToken));
    }

    #[test]
    fn test_other_secret_is_rejected() {
        let token = issue_token_at(&member(), "another-secret", ISSUED_AT).unwrap();
        let result = verify_token_at(Some(&token), SECRET, ISSUED_AT + 10);
        assert_matches!(result, Err(AppError::InvalidOrExpiredToken));
    }

    #[test]
    fn test_missing_token() {
        assert_matches!(verify_token(None, SECRET), Err(AppError::MissingToken));
        assert_matches!(verify_token(Some("  "), SECRET), Err(AppError::MissingToken));
    }

    #[test]
    fn test_malformed_tokens() {
        for token in ["invalid.token.format", "a.b", "not-a-token", "...."] {
            assert_matches!(
                verify_token(Some(token), SECRET),
                Err(AppError::InvalidOrExpiredToken)
            );
        }
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let token = issue_token_at(&member(), SECRET, ISSUED_AT).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let forged_claims = JwtClaims {
            email: "m@x.com".to_string(),
            role: Role::Admin,
            iat: ISSUED_AT,
            exp: ISSUED_AT + TOKEN_TTL_SECONDS,
        };
        let forged = format!("{}.{}.{}", parts[0], encode_part(&forged_claims).unwrap(), parts[2]);

        let result = verify_token_at(Some(&forged), SECRET, ISSUED_AT);
        assert_matches!(result, Err(AppError::InvalidOrExpiredToken));
    }

    #[test]
    fn test_empty_secret_is_a_server_error() {
        assert_matches!(issue_token(&member(), ""), Err(AppError::Internal(_)));
    }

    #[test]
    fn test_token_has_three_parts() {
        let token = issue_token(&member(), SECRET).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }
}
