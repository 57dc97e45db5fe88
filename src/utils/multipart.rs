/// Multipart form reading for the upload-accepting endpoints
use std::collections::HashMap;

use actix_multipart::Multipart;
use futures::StreamExt;
use mime::Mime;

use crate::error::{AppError, Result};
use crate::utils::images::{IMAGE_TOO_LARGE_MESSAGE, MAX_IMAGE_BYTES};

/// Text fields are bounded well above any validated length
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// A file part pulled out of a multipart form
#[derive(Debug)]
pub struct UploadedImage {
    pub filename: String,
    pub content_type: Mime,
    pub data: Vec<u8>,
}

/// All parts of a multipart form, split into text fields and file parts
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    images: HashMap<String, UploadedImage>,
}

impl FormData {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Text field that the endpoint requires; missing → validation error
    pub fn required_text(&self, name: &str) -> Result<String> {
        self.text(name)
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation(format!("{}: is required", name)))
    }

    pub fn take_image(&mut self, name: &str) -> Option<UploadedImage> {
        self.images.remove(name)
    }
}

/// Drain a multipart payload into memory.
///
/// File parts are capped at the image size limit so an oversized upload is
/// rejected without buffering the whole stream.
pub async fn read_form(payload: &mut Multipart) -> Result<FormData> {
    let mut form = FormData::default();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?;

        let disposition = field.content_disposition();
        let name = disposition
            .get_name()
            .unwrap_or_default()
            .to_string();
        let filename = disposition.get_filename().map(str::to_string);

        match filename {
            Some(filename) => {
                let content_type = field
                    .content_type()
                    .cloned()
                    .unwrap_or(mime::APPLICATION_OCTET_STREAM);

                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(|e| {
                        AppError::BadRequest(format!("Error reading upload: {}", e))
                    })?;
                    if data.len() + chunk.len() > MAX_IMAGE_BYTES {
                        return Err(AppError::Validation(IMAGE_TOO_LARGE_MESSAGE.to_string()));
                    }
                    data.extend_from_slice(&chunk);
                }

                form.images.insert(
                    name,
                    UploadedImage {
                        filename,
                        content_type,
                        data,
                    },
                );
            }
            None => {
                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(|e| {
                        AppError::BadRequest(format!("Error reading form field: {}", e))
                    })?;
                    if data.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
                        return Err(AppError::Validation(format!("{}: value too long", name)));
                    }
                    data.extend_from_slice(&chunk);
                }

                let value = String::from_utf8(data).map_err(|_| {
                    AppError::Validation(format!("{}: must be valid UTF-8", name))
                })?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_missing() {
        let form = FormData::default();
        let err = form.required_text("title").unwrap_err();
        assert_eq!(err.to_string(), "title: is required");
    }

    #[test]
    fn test_take_image_removes_entry() {
        let mut form = FormData::default();
        form.images.insert(
            "avatar".into(),
            UploadedImage {
                filename: "me.png".into(),
                content_type: mime::IMAGE_PNG,
                data: vec![1, 2, 3],
            },
        );

        assert!(form.take_image("avatar").is_some());
        assert!(form.take_image("avatar").is_none());
    }
}
