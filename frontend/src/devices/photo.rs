use base64::{engine::general_purpose::STANDARD, Engine as _};
use wasm_bindgen_futures::JsFuture;

use crate::api::PhotoFile;
use crate::error::AppError;

/// Decodes a `data:<mime>;base64,<payload>` URL produced by a canvas.
pub fn photo_from_data_url(data_url: &str, file_name: &str) -> Result<PhotoFile, String> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| "format data URL tidak valid".to_string())?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| "format data URL tidak valid".to_string())?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| "data URL bukan base64".to_string())?;
    if mime_type.is_empty() {
        return Err("tipe file tidak diketahui".into());
    }
    let bytes = STANDARD.decode(payload).map_err(|e| e.to_string())?;
    if bytes.is_empty() {
        return Err("foto kosong".into());
    }
    Ok(PhotoFile::new(file_name, mime_type, bytes))
}

/// Reads a file picked from an `<input type="file">` into memory.
pub async fn read_file(file: web_sys::File) -> Result<PhotoFile, AppError> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| AppError::Device(format!("Gagal membaca file: {:?}", e)))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(PhotoFile::new(file.name(), file.type_(), bytes))
}
