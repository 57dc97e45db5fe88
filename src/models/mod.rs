use bson::serde_helpers::{
    serialize_bson_datetime_as_rfc3339_string, serialize_object_id_as_hex_string,
};
use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

// ============================================
// Collection documents
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub image: String,
    pub author: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub content: String,
    pub blog_id: ObjectId,
    pub user_id: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub blog_id: ObjectId,
    pub user_id: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

// ============================================
// Aggregation read models
// ============================================
// These deserialize straight from pipeline output documents and
// serialize to the wire with hex ids and RFC 3339 timestamps.

/// Author fields joined into blog and comment reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorDetails {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub name: String,
    pub avatar: String,
}

/// Element of the public blog listing
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSummary {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub title: String,
    pub image: String,
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub author: ObjectId,
    pub author_details: AuthorDetails,
}

/// A single blog with its author joined in
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogDetail {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub image: String,
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub author: ObjectId,
    #[serde(serialize_with = "serialize_bson_datetime_as_rfc3339_string")]
    pub created_at: DateTime,
    #[serde(serialize_with = "serialize_bson_datetime_as_rfc3339_string")]
    pub updated_at: DateTime,
    pub author_details: AuthorDetails,
}

/// Blog fields carried inside a liked-blogs entry
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedBlogDetails {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub title: String,
    pub image: String,
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub author: ObjectId,
    pub author_details: AuthorDetails,
}

/// Element of the liked-blogs listing, in like order
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedBlog {
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub blog_id: ObjectId,
    pub blog_details: LikedBlogDetails,
}

/// Blog fields shown on an author profile
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthorBlog {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub title: String,
    pub image: String,
}

/// An author with their blogs, newest first
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorProfile {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub name: String,
    pub avatar: String,
    pub blog_count: i32,
    pub blogs: Vec<AuthorBlog>,
}

/// Element of the author directory (users with at least one blog)
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorListItem {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub name: String,
    pub avatar: String,
    pub blog_count: i32,
}

/// Like state of a blog for the requesting user
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeSummary {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub author_details: AuthorDetails,
    pub like_count: i32,
    pub user_liked: bool,
}

/// Element of a blog's comment listing; `user` is absent when the
/// commenting account no longer resolves
#[derive(Debug, Serialize, Deserialize)]
pub struct CommentEntry {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthorDetails>,
}
