use bson::oid::ObjectId;

use crate::error::{AppError, Result};

pub mod auth;
pub mod authors;
pub mod blogs;
pub mod comments;
pub mod health;
pub mod likes;

/// Parse a path id, rejecting malformed values with the given message
pub(crate) fn parse_object_id(value: &str, message: &str) -> Result<ObjectId> {
    ObjectId::parse_str(value).map_err(|_| AppError::BadRequest(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id_accepts_hex() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex(), "Invalid blog ID").unwrap(), id);
    }

    #[test]
    fn test_parse_object_id_rejects_garbage() {
        let err = parse_object_id("not-an-id", "Invalid blog ID").unwrap_err();
        assert_eq!(err.to_string(), "Invalid blog ID");
    }
}
