/// Image upload rules and inline storage encoding
use base64::{engine::general_purpose::STANDARD, Engine as _};
use mime::Mime;

use crate::error::{AppError, Result};

/// Uploads above this size are rejected
pub const MAX_IMAGE_BYTES: usize = 1024 * 1024;

pub const IMAGE_TOO_LARGE_MESSAGE: &str = "Image size must be less than 1 MB";
pub const IMAGE_BAD_TYPE_MESSAGE: &str = "Image must be of type png, jpg, jpeg, svg, webp or gif";

/// Avatar used when registration carries no image
pub const DEFAULT_AVATAR_URL: &str =
    "https://media.istockphoto.com/id/1341046662/vector/picture-profile-icon-human-or-people-sign-and-symbol-for-template-design.jpg?s=612x612&w=0&k=20&c=A7z3OK0fElK3tFntKObma-3a7PyO8_2xxW0jtmjzT78=";

/// Cover image used when blog creation carries no image
pub const DEFAULT_BLOG_IMAGE_URL: &str = "https://formfees.com/wp-content/uploads/dummy.webp";

const SUPPORTED_MIMES: &[&str] = &[
    "image/png",
    "image/jpg",
    "image/jpeg",
    "image/svg+xml",
    "image/webp",
    "image/gif",
];

/// Check an uploaded image against the size and MIME rules
pub fn validate_image(size_bytes: usize, content_type: &Mime) -> Result<()> {
    if size_bytes > MAX_IMAGE_BYTES {
        return Err(AppError::Validation(IMAGE_TOO_LARGE_MESSAGE.to_string()));
    }

    if !SUPPORTED_MIMES.contains(&content_type.essence_str()) {
        return Err(AppError::Validation(IMAGE_BAD_TYPE_MESSAGE.to_string()));
    }

    Ok(())
}

/// Encode image bytes as a `data:` URL with the MIME type prepended,
/// the form the frontend renders directly
pub fn to_data_url(content_type: &Mime, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        content_type.essence_str(),
        STANDARD.encode(bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_small_png() {
        let png: Mime = "image/png".parse().unwrap();
        assert!(validate_image(512, &png).is_ok());
    }

    #[test]
    fn test_rejects_oversized_image() {
        let png: Mime = "image/png".parse().unwrap();
        let err = validate_image(MAX_IMAGE_BYTES + 1, &png).unwrap_err();
        assert_eq!(err.to_string(), IMAGE_TOO_LARGE_MESSAGE);
    }

    #[test]
    fn test_rejects_unsupported_type() {
        let pdf: Mime = "application/pdf".parse().unwrap();
        let err = validate_image(512, &pdf).unwrap_err();
        assert_eq!(err.to_string(), IMAGE_BAD_TYPE_MESSAGE);
    }

    #[test]
    fn test_data_url_shape() {
        let gif: Mime = "image/gif".parse().unwrap();
        let url = to_data_url(&gif, b"GIF89a");
        assert!(url.starts_with("data:image/gif;base64,"));
        assert_eq!(url, format!("data:image/gif;base64,{}", STANDARD.encode(b"GIF89a")));
    }
}
