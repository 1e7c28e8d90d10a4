#[cfg(all(test, not(target_arch = "wasm32")))]
pub mod host;
#[cfg(all(test, not(target_arch = "wasm32")))]
pub mod ssr;

#[cfg(test)]
pub mod helpers {
    use crate::api::{PhotoFile, Story};
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::{json, Value};

    pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 8, 0, 0).unwrap()
    }

    pub fn story(id: &str, author: &str, description: &str, created_at: DateTime<Utc>) -> Story {
        Story {
            id: id.into(),
            author_name: author.into(),
            description: description.into(),
            photo_url: format!("https://story-api.dicoding.dev/images/{}.jpg", id),
            created_at,
            lat: None,
            lon: None,
        }
    }

    pub fn story_at(id: &str, author: &str, lat: f64, lon: f64) -> Story {
        Story {
            lat: Some(lat),
            lon: Some(lon),
            ..story(id, author, "Cerita dengan lokasi", at(2025, 1, 10))
        }
    }

    pub fn story_json(id: &str, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": "Jalan-jalan sore di Kota Tua",
            "photoUrl": format!("https://story-api.dicoding.dev/images/{}.jpg", id),
            "createdAt": "2025-01-10T08:00:00.000Z",
            "lat": -6.1352,
            "lon": 106.8133
        })
    }

    pub fn story_list_json(ids: &[&str]) -> Value {
        json!({
            "error": false,
            "message": "Stories fetched successfully",
            "listStory": ids.iter().map(|id| story_json(id, "Dimas")).collect::<Vec<_>>()
        })
    }

    /// Unsigned compact token with the given claims, enough for client-side decoding.
    pub fn token_with_claims(claims: Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{}.{}.signature", header, payload)
    }

    pub fn token_for(user_id: &str, iat: i64, exp: Option<i64>) -> String {
        let mut claims = json!({ "userId": user_id, "iat": iat });
        if let Some(exp) = exp {
            claims["exp"] = json!(exp);
        }
        token_with_claims(claims)
    }

    pub fn login_json(user_id: &str, name: &str, token: &str) -> Value {
        json!({
            "error": false,
            "message": "success",
            "loginResult": { "userId": user_id, "name": name, "token": token }
        })
    }

    pub fn jpeg(size: usize) -> PhotoFile {
        PhotoFile::new("foto.jpg", "image/jpeg", vec![0xFF; size])
    }
}
