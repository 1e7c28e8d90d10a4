use async_trait::async_trait;
use serde_json::json;
use std::cell::{Cell, RefCell};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};

use super::{leaflet::js_value, photo, CameraDevice};
use crate::api::PhotoFile;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("Akses kamera ditolak. Silakan berikan izin untuk menggunakan kamera.")]
    PermissionDenied,
    #[error("Kamera tidak ditemukan pada perangkat ini.")]
    NotFound,
    #[error("Kamera sedang digunakan oleh aplikasi lain.")]
    InUse,
    #[error("Kamera tidak mendukung pengaturan yang diminta.")]
    Overconstrained,
    #[error("Browser tidak mendukung akses kamera.")]
    Unsupported,
    #[error("Kamera belum aktif.")]
    NotActive,
    #[error("Gagal mengambil foto: {0}")]
    Capture(String),
    #[error("Gagal mengakses kamera")]
    Other(String),
}

impl CameraError {
    /// Maps a `DOMException` name from `getUserMedia`.
    pub fn from_dom_name(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" | "SecurityError" => Self::PermissionDenied,
            "NotFoundError" => Self::NotFound,
            "NotReadableError" | "AbortError" => Self::InUse,
            "OverconstrainedError" => Self::Overconstrained,
            _ => Self::Other(message.to_string()),
        }
    }

    fn from_js(value: wasm_bindgen::JsValue) -> Self {
        match value.dyn_into::<web_sys::DomException>() {
            Ok(dom) => Self::from_dom_name(&dom.name(), &dom.message()),
            Err(other) => Self::Other(format!("{:?}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    User,
    Environment,
}

impl FacingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Environment => "environment",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::User => Self::Environment,
            Self::Environment => Self::User,
        }
    }
}

const CAPTURE_QUALITY: f64 = 0.8;

/// Camera preview bound to a `<video>` element looked up by id on start.
pub struct BrowserCamera {
    video_id: String,
    stream: RefCell<Option<MediaStream>>,
    facing: Cell<FacingMode>,
}

impl BrowserCamera {
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            stream: RefCell::new(None),
            facing: Cell::new(FacingMode::Environment),
        }
    }

    fn video_element(&self) -> Result<HtmlVideoElement, CameraError> {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(&self.video_id))
            .and_then(|el| el.dyn_into::<HtmlVideoElement>().ok())
            .ok_or_else(|| CameraError::Other(format!("#{} not found", self.video_id)))
    }

    fn stop_tracks(stream: &MediaStream) {
        for track in stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
    }
}

#[async_trait(?Send)]
impl CameraDevice for BrowserCamera {
    async fn start(&self, facing: FacingMode) -> Result<(), CameraError> {
        self.stop();
        let devices = web_sys::window()
            .ok_or(CameraError::Unsupported)?
            .navigator()
            .media_devices()
            .map_err(|_| CameraError::Unsupported)?;

        let constraints: MediaStreamConstraints = js_value(json!({
            "video": {
                "width": { "ideal": 640 },
                "height": { "ideal": 480 },
                "facingMode": facing.as_str()
            },
            "audio": false
        }))
        .unchecked_into();
        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(CameraError::from_js)?;
        let stream: MediaStream = JsFuture::from(promise)
            .await
            .map_err(CameraError::from_js)?
            .unchecked_into();

        let video = match self.video_element() {
            Ok(video) => video,
            Err(err) => {
                Self::stop_tracks(&stream);
                return Err(err);
            }
        };
        video.set_src_object(Some(&stream));
        if let Ok(play) = video.play() {
            let _ = JsFuture::from(play).await;
        }
        self.stream.replace(Some(stream));
        self.facing.set(facing);
        log::debug!("camera started ({})", facing.as_str());
        Ok(())
    }

    async fn capture(&self) -> Result<PhotoFile, CameraError> {
        if !self.is_active() {
            return Err(CameraError::NotActive);
        }
        let video = self.video_element()?;
        let (width, height) = (video.video_width(), video.video_height());
        if width == 0 || height == 0 {
            return Err(CameraError::Capture("video belum siap".into()));
        }
        let canvas: HtmlCanvasElement = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.create_element("canvas").ok())
            .and_then(|el| el.dyn_into().ok())
            .ok_or_else(|| CameraError::Capture("canvas tidak tersedia".into()))?;
        canvas.set_width(width);
        canvas.set_height(height);
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into().ok())
            .ok_or_else(|| CameraError::Capture("context 2d tidak tersedia".into()))?;
        context
            .draw_image_with_html_video_element_and_dw_and_dh(
                &video,
                0.0,
                0.0,
                f64::from(width),
                f64::from(height),
            )
            .map_err(|e| CameraError::Capture(format!("{:?}", e)))?;
        let data_url = canvas
            .to_data_url_with_type_and_encoder_options(
                "image/jpeg",
                &wasm_bindgen::JsValue::from_f64(CAPTURE_QUALITY),
            )
            .map_err(|e| CameraError::Capture(format!("{:?}", e)))?;
        let file_name = format!("story-{}.jpg", chrono::Utc::now().timestamp_millis());
        photo::photo_from_data_url(&data_url, &file_name)
            .map_err(CameraError::Capture)
    }

    fn stop(&self) {
        if let Some(stream) = self.stream.borrow_mut().take() {
            Self::stop_tracks(&stream);
            if let Ok(video) = self.video_element() {
                video.set_src_object(None);
            }
            log::debug!("camera stopped");
        }
    }

    fn is_active(&self) -> bool {
        self.stream.borrow().is_some()
    }

    fn facing(&self) -> FacingMode {
        self.facing.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_error_names_map_to_messages() {
        assert_eq!(
            CameraError::from_dom_name("NotAllowedError", "").to_string(),
            "Akses kamera ditolak. Silakan berikan izin untuk menggunakan kamera."
        );
        assert_eq!(CameraError::from_dom_name("NotFoundError", ""), CameraError::NotFound);
        assert_eq!(CameraError::from_dom_name("NotReadableError", ""), CameraError::InUse);
        assert_eq!(
            CameraError::from_dom_name("OverconstrainedError", ""),
            CameraError::Overconstrained
        );
        assert_eq!(
            CameraError::from_dom_name("TypeError", "bad").to_string(),
            "Gagal mengakses kamera"
        );
    }

    #[test]
    fn facing_mode_toggles() {
        assert_eq!(FacingMode::User.toggled(), FacingMode::Environment);
        assert_eq!(FacingMode::Environment.toggled().as_str(), "user");
    }
}
