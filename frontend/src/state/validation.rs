//! Local input checks run before anything reaches the network. Each function
//! returns every failed rule, in form order, as user-facing messages.

use crate::api::PhotoFile;
use crate::utils::geo::Coordinates;

pub const DESCRIPTION_MIN_CHARS: usize = 10;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
pub const PHOTO_MAX_BYTES: usize = 1024 * 1024;
pub const ALLOWED_PHOTO_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

/// `local@domain.tld`: no whitespace, exactly one `@`, and a dot inside the domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

pub fn email_error(email: &str) -> Option<String> {
    let email = email.trim();
    if email.is_empty() {
        Some("Email tidak boleh kosong".into())
    } else if !is_valid_email(email) {
        Some("Format email tidak valid".into())
    } else {
        None
    }
}

/// Letters and spaces only, 2 to 50 characters after trimming.
pub fn name_error(name: &str) -> Option<String> {
    let name = name.trim();
    let len = name.chars().count();
    if name.is_empty() {
        Some("Nama tidak boleh kosong".into())
    } else if len < 2 {
        Some("Nama harus minimal 2 karakter".into())
    } else if len > 50 {
        Some("Nama maksimal 50 karakter".into())
    } else if !name
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
    {
        Some("Nama hanya boleh mengandung huruf dan spasi".into())
    } else {
        None
    }
}

pub fn validate_password_strength(password: &str) -> Vec<String> {
    if password.is_empty() {
        return vec!["Password tidak boleh kosong".into()];
    }
    let mut errors = Vec::new();
    if password.chars().count() < 8 {
        errors.push("Password harus minimal 8 karakter".into());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password harus mengandung setidaknya satu huruf kapital".into());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password harus mengandung setidaknya satu huruf kecil".into());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password harus mengandung setidaknya satu angka".into());
    }
    if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        errors.push("Password harus mengandung setidaknya satu karakter khusus".into());
    }
    errors
}

pub fn validate_login(email: &str, password: &str) -> Vec<String> {
    let mut errors: Vec<String> = email_error(email).into_iter().collect();
    if password.is_empty() {
        errors.push("Password tidak boleh kosong".into());
    }
    errors
}

pub fn validate_registration(name: &str, email: &str, password: &str) -> Vec<String> {
    let mut errors: Vec<String> = name_error(name).into_iter().collect();
    errors.extend(email_error(email));
    errors.extend(validate_password_strength(password));
    errors
}

pub fn validate_description(description: &str) -> Vec<String> {
    let trimmed = description.trim();
    let len = trimmed.chars().count();
    if trimmed.is_empty() {
        vec!["Deskripsi story tidak boleh kosong".into()]
    } else if len < DESCRIPTION_MIN_CHARS {
        vec!["Deskripsi story harus minimal 10 karakter".into()]
    } else if len > DESCRIPTION_MAX_CHARS {
        vec!["Deskripsi story maksimal 1000 karakter".into()]
    } else {
        Vec::new()
    }
}

pub fn validate_photo(photo: Option<&PhotoFile>) -> Vec<String> {
    let Some(photo) = photo else {
        return vec!["Foto harus disertakan".into()];
    };
    let mut errors = Vec::new();
    if !ALLOWED_PHOTO_TYPES.contains(&photo.mime_type.as_str()) {
        errors.push("Format foto harus JPEG, PNG, atau WebP".into());
    }
    if photo.size() > PHOTO_MAX_BYTES {
        errors.push("Ukuran foto maksimal 1MB".into());
    }
    errors
}

pub fn validate_location(location: Option<Coordinates>) -> Vec<String> {
    let Some(location) = location else {
        return Vec::new();
    };
    let mut errors = Vec::new();
    if !location.lat.is_finite() || !location.lon.is_finite() {
        errors.push("Koordinat harus berupa angka".into());
        return errors;
    }
    if !(-90.0..=90.0).contains(&location.lat) {
        errors.push("Latitude harus antara -90 dan 90".into());
    }
    if !(-180.0..=180.0).contains(&location.lon) {
        errors.push("Longitude harus antara -180 dan 180".into());
    }
    errors
}

pub fn validate_new_story(
    description: &str,
    photo: Option<&PhotoFile>,
    location: Option<Coordinates>,
) -> Vec<String> {
    let mut errors = validate_description(description);
    errors.extend(validate_photo(photo));
    errors.extend(validate_location(location));
    errors
}
