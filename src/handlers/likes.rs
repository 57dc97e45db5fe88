use actix_web::{web, HttpResponse};
use bson::oid::ObjectId;
use mongodb::Database;
use serde::Serialize;
use tracing::{info, warn};

use crate::db::{blog_repo, is_duplicate_key_error, like_repo, user_repo};
use crate::error::{AppError, Result};
use crate::handlers::parse_object_id;
use crate::middleware::UserId;
use crate::models::LikeSummary;

// ============================================
// Response Structs
// ============================================

/// Created like as stored, with ids and timestamps flattened to strings
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub blog_id: String,
    pub user_id: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct AddLikeResponse {
    pub success: bool,
    pub message: String,
    pub like: LikeResponse,
}

#[derive(Debug, Serialize)]
pub struct RemoveLikeResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LikeSummaryResponse {
    pub success: bool,
    pub message: String,
    pub result: LikeSummary,
}

// ============================================
// Handler Functions
// ============================================

async fn ensure_blog_and_user(
    db: &Database,
    blog_id: ObjectId,
    user_id: ObjectId,
    tag: &str,
) -> Result<()> {
    if blog_repo::find_by_id(db, blog_id).await?.is_none() {
        warn!("[{}] Blog does not exist - Blog ID: {}", tag, blog_id.to_hex());
        return Err(AppError::BadRequest("Blog does not exist".to_string()));
    }

    if user_repo::find_by_id(db, user_id).await?.is_none() {
        warn!("[{}] User does not exist - User ID: {}", tag, user_id.to_hex());
        return Err(AppError::BadRequest("User does not exist".to_string()));
    }

    Ok(())
}

/// Like a blog
/// POST /api/v1/blogs/{blog_id}/like
pub async fn add_like(
    user_id: UserId,
    db: web::Data<Database>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let blog_id_str = path.into_inner();
    info!(
        "[ADD LIKE] Request received - User ID: {}, Blog ID: {}",
        user_id.0.to_hex(),
        blog_id_str
    );

    let blog_id = parse_object_id(&blog_id_str, "Invalid blog ID")?;
    ensure_blog_and_user(&db, blog_id, user_id.0, "ADD LIKE").await?;

    if like_repo::find_like(&db, blog_id, user_id.0).await?.is_some() {
        warn!(
            "[ADD LIKE] Already liked - User ID: {}, Blog ID: {}",
            user_id.0.to_hex(),
            blog_id_str
        );
        return Err(AppError::BadRequest("Already liked".to_string()));
    }

    // The unique (blogId, userId) index backs the check above; a racing
    // insert surfaces here as a duplicate key
    let like = match like_repo::create_like(&db, blog_id, user_id.0).await {
        Ok(like) => like,
        Err(AppError::Database(ref e)) if is_duplicate_key_error(e) => {
            return Err(AppError::BadRequest("Already liked".to_string()));
        }
        Err(e) => return Err(e),
    };

    info!(
        "[ADD LIKE] Like added successfully - User ID: {}, Blog ID: {}",
        user_id.0.to_hex(),
        blog_id_str
    );
    Ok(HttpResponse::Created().json(AddLikeResponse {
        success: true,
        message: "Like added".to_string(),
        like: LikeResponse {
            id: like.id.to_hex(),
            blog_id: like.blog_id.to_hex(),
            user_id: like.user_id.to_hex(),
            created_at: like.created_at.try_to_rfc3339_string().unwrap_or_default(),
        },
    }))
}

/// Remove a like from a blog
/// DELETE /api/v1/blogs/{blog_id}/like
pub async fn remove_like(
    user_id: UserId,
    db: web::Data<Database>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let blog_id_str = path.into_inner();
    info!(
        "[REMOVE LIKE] Request received - User ID: {}, Blog ID: {}",
        user_id.0.to_hex(),
        blog_id_str
    );

    let blog_id = parse_object_id(&blog_id_str, "Invalid blog ID")?;
    ensure_blog_and_user(&db, blog_id, user_id.0, "REMOVE LIKE").await?;

    if !like_repo::delete_like(&db, blog_id, user_id.0).await? {
        warn!(
            "[REMOVE LIKE] Like not found - User ID: {}, Blog ID: {}",
            user_id.0.to_hex(),
            blog_id_str
        );
        return Err(AppError::BadRequest("Like not found".to_string()));
    }

    info!(
        "[REMOVE LIKE] Like removed successfully - User ID: {}, Blog ID: {}",
        user_id.0.to_hex(),
        blog_id_str
    );
    Ok(HttpResponse::Ok().json(RemoveLikeResponse {
        success: true,
        message: "Like removed successfully".to_string(),
    }))
}

/// Like state of a blog for the caller
/// GET /api/v1/blogs/{blog_id}/like
pub async fn get_like(
    user_id: UserId,
    db: web::Data<Database>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let blog_id_str = path.into_inner();
    info!(
        "[GET LIKE] Request received - User ID: {}, Blog ID: {}",
        user_id.0.to_hex(),
        blog_id_str
    );

    let blog_id = parse_object_id(&blog_id_str, "Invalid blog ID")?;
    ensure_blog_and_user(&db, blog_id, user_id.0, "GET LIKE").await?;

    let result = match like_repo::like_summary(&db, blog_id, user_id.0).await? {
        Some(summary) => summary,
        None => {
            warn!("[GET LIKE] Blog does not exist - Blog ID: {}", blog_id_str);
            return Err(AppError::BadRequest("Blog does not exist".to_string()));
        }
    };

    info!(
        "[GET LIKE] Fetch successful - Blog ID: {}, Likes: {}",
        blog_id_str, result.like_count
    );
    Ok(HttpResponse::Ok().json(LikeSummaryResponse {
        success: true,
        message: "Fetch like".to_string(),
        result,
    }))
}
