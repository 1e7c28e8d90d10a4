use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::storage::KeyValueStore;

pub const USER_KEY: &str = "auth_user";
pub const LAST_LOGIN_KEY: &str = "last_login_time";

/// Claims read from the token payload. Signatures are never verified client-side.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

fn timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let secs = value?.as_i64()?;
    Utc.timestamp_opt(secs, 0).single()
}

pub fn decode_token_claims(token: &str) -> Option<TokenClaims> {
    let mut parts = token.split('.');
    parts.next()?;
    let payload = parts.next()?;
    let decoded = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let value: Value = serde_json::from_slice(&decoded).ok()?;
    let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
    Some(TokenClaims {
        user_id: text("userId").or_else(|| text("sub")),
        name: text("name"),
        issued_at: timestamp(value.get("iat")),
        expires_at: timestamp(value.get("exp")),
    })
}

/// Profile persisted next to the token so a reload can rebuild the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub user_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub display_name: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub token: String,
}

/// Public part of the session handed to views.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub user_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionInfo {
    pub user: CurrentUser,
    pub issued_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
}

impl Session {
    /// Builds a session from a fresh token. Profile fields from the login
    /// response win over token claims.
    pub fn from_token(
        token: &str,
        profile: Option<&StoredUser>,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let claims = decode_token_claims(token);
        let user_id = profile
            .map(|p| p.user_id.clone())
            .or_else(|| claims.as_ref().and_then(|c| c.user_id.clone()))?;
        let display_name = profile
            .map(|p| p.name.clone())
            .or_else(|| claims.as_ref().and_then(|c| c.name.clone()))
            .unwrap_or_else(|| user_id.clone());
        Some(Self {
            user_id,
            display_name,
            issued_at: claims.as_ref().and_then(|c| c.issued_at).unwrap_or(now),
            expires_at: claims.and_then(|c| c.expires_at),
            token: token.to_string(),
        })
    }

    /// A token without `exp` never expires here; the server has the last word.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| now >= exp).unwrap_or(false)
    }

    pub fn user(&self) -> CurrentUser {
        CurrentUser {
            user_id: self.user_id.clone(),
            name: self.display_name.clone(),
        }
    }
}

pub fn store_profile(storage: &dyn KeyValueStore, session: &Session, now: DateTime<Utc>) {
    let profile = StoredUser {
        user_id: session.user_id.clone(),
        name: session.display_name.clone(),
    };
    match serde_json::to_string(&profile) {
        Ok(raw) => {
            if let Err(err) = storage.set(USER_KEY, &raw) {
                log::warn!("failed to persist profile: {}", err);
            }
        }
        Err(err) => log::warn!("failed to serialize profile: {}", err),
    }
    if let Err(err) = storage.set(LAST_LOGIN_KEY, &now.timestamp_millis().to_string()) {
        log::warn!("failed to persist last login time: {}", err);
    }
}

pub fn load_profile(storage: &dyn KeyValueStore) -> Option<StoredUser> {
    let raw = storage.get(USER_KEY)?;
    serde_json::from_str(&raw).ok()
}

pub fn last_login(storage: &dyn KeyValueStore) -> Option<DateTime<Utc>> {
    let millis = storage.get(LAST_LOGIN_KEY)?.parse::<i64>().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

pub fn clear_profile(storage: &dyn KeyValueStore) {
    storage.remove(USER_KEY);
    storage.remove(LAST_LOGIN_KEY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{token_for, token_with_claims};
    use crate::utils::storage::MemoryStorage;
    use chrono::Duration;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn decodes_user_and_timestamps() {
        let token = token_for("user-1", 1_700_000_000, Some(1_700_003_600));
        let claims = decode_token_claims(&token).unwrap();
        assert_eq!(claims.user_id.as_deref(), Some("user-1"));
        assert_eq!(claims.issued_at, Some(now()));
        assert_eq!(claims.expires_at, Some(now() + Duration::hours(1)));
    }

    #[test]
    fn garbage_tokens_do_not_decode() {
        assert!(decode_token_claims("not-a-token").is_none());
        assert!(decode_token_claims("a.!!!.c").is_none());
    }

    #[test]
    fn session_prefers_profile_over_claims() {
        let token = token_with_claims(json!({"userId": "from-token", "name": "Token Name"}));
        let profile = StoredUser {
            user_id: "user-1".into(),
            name: "Arif".into(),
        };
        let session = Session::from_token(&token, Some(&profile), now()).unwrap();
        assert_eq!(session.user_id, "user-1");
        assert_eq!(session.display_name, "Arif");
        assert_eq!(session.issued_at, now());
        assert!(session.expires_at.is_none());
        assert!(!session.is_expired(now() + Duration::days(365)));
    }

    #[test]
    fn session_without_any_user_id_is_rejected() {
        let token = token_with_claims(json!({"iat": 1}));
        assert!(Session::from_token(&token, None, now()).is_none());
    }

    #[test]
    fn expiry_is_inclusive() {
        let token = token_for("user-1", 1_700_000_000, Some(1_700_000_060));
        let session = Session::from_token(&token, None, now()).unwrap();
        assert!(!session.is_expired(now() + Duration::seconds(59)));
        assert!(session.is_expired(now() + Duration::seconds(60)));
    }

    /// Accepts the profile but refuses the login timestamp.
    struct QuotaLimited(MemoryStorage);

    impl KeyValueStore for QuotaLimited {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), String> {
            if key == LAST_LOGIN_KEY {
                return Err("quota exceeded".into());
            }
            self.0.set(key, value)
        }

        fn remove(&self, key: &str) {
            self.0.remove(key)
        }
    }

    #[test]
    fn failed_login_time_write_keeps_profile() {
        let storage = QuotaLimited(MemoryStorage::new());
        let token = token_for("user-1", 1_700_000_000, None);
        let session = Session::from_token(&token, None, now()).unwrap();
        store_profile(&storage, &session, now());
        assert_eq!(load_profile(&storage).unwrap().user_id, "user-1");
        assert!(last_login(&storage).is_none());
    }

    #[test]
    fn profile_round_trips_through_storage() {
        let storage = MemoryStorage::new();
        let token = token_for("user-1", 1_700_000_000, None);
        let session = Session::from_token(&token, None, now()).unwrap();
        store_profile(&storage, &session, now());
        assert_eq!(load_profile(&storage).unwrap().user_id, "user-1");
        assert_eq!(last_login(&storage), Some(now()));
        clear_profile(&storage);
        assert!(load_profile(&storage).is_none());
        assert!(last_login(&storage).is_none());
    }
}
