use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::PositionOptions;

use super::{leaflet::js_value, LocationProvider};
use crate::utils::geo::Coordinates;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Akses lokasi ditolak. Silakan izinkan akses lokasi di browser")]
    PermissionDenied,
    #[error("Lokasi tidak tersedia")]
    PositionUnavailable,
    #[error("Waktu tunggu lokasi habis")]
    Timeout,
    #[error("Geolocation tidak didukung oleh browser ini")]
    Unsupported,
    #[error("Gagal mendapatkan lokasi")]
    Other(String),
}

impl GeolocationError {
    /// `GeolocationPositionError.code`: 1 denied, 2 unavailable, 3 timeout.
    pub fn from_code(code: u16, message: &str) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            _ => Self::Other(message.to_string()),
        }
    }
}

pub const POSITION_TIMEOUT_MS: u32 = 10_000;
pub const POSITION_MAX_AGE_MS: u32 = 60_000;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserGeolocation;

fn read(target: &JsValue, key: &str) -> JsValue {
    js_sys::Reflect::get(target, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

/// `GeolocationPosition` read structurally: `{ coords: { latitude, longitude } }`.
fn coordinates_of(position: &JsValue) -> Result<Coordinates, GeolocationError> {
    let coords = read(position, "coords");
    match (read(&coords, "latitude").as_f64(), read(&coords, "longitude").as_f64()) {
        (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
        _ => Err(GeolocationError::PositionUnavailable),
    }
}

fn error_of(error: &JsValue) -> GeolocationError {
    let code = read(error, "code").as_f64().unwrap_or(0.0) as u16;
    let message = read(error, "message").as_string().unwrap_or_default();
    GeolocationError::from_code(code, &message)
}

type Reply = Rc<RefCell<Option<oneshot::Sender<Result<Coordinates, GeolocationError>>>>>;

fn reply(sender: &Reply, value: Result<Coordinates, GeolocationError>) {
    if let Some(tx) = sender.borrow_mut().take() {
        let _ = tx.send(value);
    }
}

#[async_trait(?Send)]
impl LocationProvider for BrowserGeolocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        let geolocation = web_sys::window()
            .ok_or(GeolocationError::Unsupported)?
            .navigator()
            .geolocation()
            .map_err(|_| GeolocationError::Unsupported)?;

        let (tx, rx) = oneshot::channel();
        let sender: Reply = Rc::new(RefCell::new(Some(tx)));

        let on_success_sender = Rc::clone(&sender);
        let on_success: Closure<dyn FnMut(JsValue)> = Closure::once(move |position: JsValue| {
            reply(&on_success_sender, coordinates_of(&position));
        });
        let on_error_sender = Rc::clone(&sender);
        let on_error: Closure<dyn FnMut(JsValue)> = Closure::once(move |error: JsValue| {
            reply(&on_error_sender, Err(error_of(&error)));
        });

        let options: PositionOptions = js_value(json!({
            "enableHighAccuracy": true,
            "timeout": POSITION_TIMEOUT_MS,
            "maximumAge": POSITION_MAX_AGE_MS
        }))
        .unchecked_into();

        geolocation
            .get_current_position_with_error_callback_and_options(
                on_success.as_ref().unchecked_ref(),
                Some(on_error.as_ref().unchecked_ref()),
                &options,
            )
            .map_err(|e| GeolocationError::Other(format!("{:?}", e)))?;

        // Both closures must outlive the browser callback.
        let result = rx
            .await
            .unwrap_or_else(|_| Err(GeolocationError::Other("dibatalkan".into())));
        drop(on_success);
        drop(on_error);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_error_codes_map_to_messages() {
        assert_eq!(
            GeolocationError::from_code(1, "").to_string(),
            "Akses lokasi ditolak. Silakan izinkan akses lokasi di browser"
        );
        assert_eq!(GeolocationError::from_code(2, ""), GeolocationError::PositionUnavailable);
        assert_eq!(
            GeolocationError::from_code(3, "").to_string(),
            "Waktu tunggu lokasi habis"
        );
        assert_eq!(
            GeolocationError::from_code(9, "weird").to_string(),
            "Gagal mendapatkan lokasi"
        );
    }
}
