use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use mongodb::Database;
use serde::Serialize;
use tracing::{info, warn};
use validator::Validate;

use crate::db::{blog_repo, like_repo, user_repo};
use crate::error::{AppError, Result};
use crate::handlers::parse_object_id;
use crate::middleware::UserId;
use crate::models::{AuthorProfile, BlogDetail, BlogSummary, LikedBlog};
use crate::utils::images::{self, DEFAULT_BLOG_IMAGE_URL};
use crate::utils::multipart::read_form;

// ============================================
// Request/Response Structs
// ============================================

#[derive(Debug, Validate)]
pub struct CreateBlogRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "is required"))]
    pub description: String,
}

/// Created blog as stored, with ids and timestamps flattened to strings
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub author: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct CreateBlogResponse {
    pub success: bool,
    pub message: String,
    pub blog: BlogResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogListResponse {
    pub success: bool,
    pub message: String,
    pub blog_count: usize,
    pub blogs: Vec<BlogSummary>,
}

#[derive(Debug, Serialize)]
pub struct BlogDetailResponse {
    pub success: bool,
    pub message: String,
    pub blog: BlogDetail,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedBlogsResponse {
    pub success: bool,
    pub message: String,
    pub blog_count: usize,
    pub blogs: Vec<LikedBlog>,
}

#[derive(Debug, Serialize)]
pub struct AuthorBlogsResponse {
    pub success: bool,
    pub message: String,
    pub author: AuthorProfile,
}

// ============================================
// Handler Functions
// ============================================

/// Create a blog
/// POST /api/v1/blogs (multipart; optional `img` file part)
pub async fn create_blog(
    user_id: UserId,
    db: web::Data<Database>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    info!("[CREATE BLOG] Request received - User ID: {}", user_id.0.to_hex());

    let mut form = read_form(&mut payload).await?;

    let request = CreateBlogRequest {
        title: form.required_text("title")?,
        description: form.required_text("description")?,
    };
    request.validate()?;

    let mut image = DEFAULT_BLOG_IMAGE_URL.to_string();
    if let Some(upload) = form.take_image("img") {
        images::validate_image(upload.data.len(), &upload.content_type)?;
        image = images::to_data_url(&upload.content_type, &upload.data);
        info!("[CREATE BLOG] Cover image accepted - File: {}", upload.filename);
    }

    if user_repo::find_by_id(&db, user_id.0).await?.is_none() {
        warn!(
            "[CREATE BLOG] User does not exist - User ID: {}",
            user_id.0.to_hex()
        );
        return Err(AppError::BadRequest("User does not exist".to_string()));
    }

    let blog =
        blog_repo::create_blog(&db, &request.title, &request.description, &image, user_id.0)
            .await?;

    info!(
        "[CREATE BLOG] Blog created successfully - Blog ID: {}",
        blog.id.to_hex()
    );
    Ok(HttpResponse::Created().json(CreateBlogResponse {
        success: true,
        message: "Blog created".to_string(),
        blog: BlogResponse {
            id: blog.id.to_hex(),
            title: blog.title,
            description: blog.description,
            image: blog.image,
            author: blog.author.to_hex(),
            created_at: blog.created_at.try_to_rfc3339_string().unwrap_or_default(),
            updated_at: blog.updated_at.try_to_rfc3339_string().unwrap_or_default(),
        },
    }))
}

/// List all blogs, newest first, with author details
/// GET /api/v1/blogs
pub async fn get_all_blogs(db: web::Data<Database>) -> Result<HttpResponse> {
    info!("[GET ALL BLOGS] Request received");

    let blogs = blog_repo::list_with_authors(&db).await?;

    info!("[GET ALL BLOGS] Fetch successful - Total Blogs: {}", blogs.len());
    Ok(HttpResponse::Ok().json(BlogListResponse {
        success: true,
        message: "All blogs fetched successfully".to_string(),
        blog_count: blogs.len(),
        blogs,
    }))
}

/// Fetch a single blog with its author details
/// GET /api/v1/blogs/{blog_id}
pub async fn get_blog(db: web::Data<Database>, path: web::Path<String>) -> Result<HttpResponse> {
    let blog_id_str = path.into_inner();
    info!("[GET BLOG] Request received - Blog ID: {}", blog_id_str);

    let blog_id = parse_object_id(&blog_id_str, "Invalid blog ID")?;

    let blog = match blog_repo::find_detail(&db, blog_id).await? {
        Some(blog) => blog,
        None => {
            warn!("[GET BLOG] Blog does not exist - Blog ID: {}", blog_id_str);
            return Err(AppError::BadRequest("Blog does not exist".to_string()));
        }
    };

    info!("[GET BLOG] Fetch successful - Blog ID: {}", blog_id_str);
    Ok(HttpResponse::Ok().json(BlogDetailResponse {
        success: true,
        message: "Blog fetched successfully".to_string(),
        blog,
    }))
}

/// List the blogs the caller has liked, most recent like first
/// GET /api/v1/blogs/liked
pub async fn get_liked_blogs(user_id: UserId, db: web::Data<Database>) -> Result<HttpResponse> {
    info!(
        "[GET LIKED BLOGS] Request received - User ID: {}",
        user_id.0.to_hex()
    );

    if user_repo::find_by_id(&db, user_id.0).await?.is_none() {
        warn!(
            "[GET LIKED BLOGS] User does not exist - User ID: {}",
            user_id.0.to_hex()
        );
        return Err(AppError::BadRequest("User does not exist".to_string()));
    }

    let blogs = like_repo::liked_blogs(&db, user_id.0).await?;

    info!(
        "[GET LIKED BLOGS] Fetch successful - User ID: {}, Total Liked Blogs: {}",
        user_id.0.to_hex(),
        blogs.len()
    );
    Ok(HttpResponse::Ok().json(LikedBlogsResponse {
        success: true,
        message: "Fetch liked blogs".to_string(),
        blog_count: blogs.len(),
        blogs,
    }))
}

/// The caller's author profile with their blogs
/// GET /api/v1/blogs/mine
pub async fn get_your_blogs(user_id: UserId, db: web::Data<Database>) -> Result<HttpResponse> {
    info!(
        "[GET YOUR BLOGS] Request received - User ID: {}",
        user_id.0.to_hex()
    );

    let author = match user_repo::author_profile(&db, user_id.0).await? {
        Some(author) => author,
        None => {
            warn!(
                "[GET YOUR BLOGS] User does not exist - User ID: {}",
                user_id.0.to_hex()
            );
            return Err(AppError::BadRequest("User does not exist".to_string()));
        }
    };

    info!(
        "[GET YOUR BLOGS] Fetch successful - User ID: {}, Total Blogs: {}",
        user_id.0.to_hex(),
        author.blog_count
    );
    Ok(HttpResponse::Ok().json(AuthorBlogsResponse {
        success: true,
        message: "Fetch author blogs".to_string(),
        author,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_blog_request_requires_title() {
        let request = CreateBlogRequest {
            title: String::new(),
            description: "body".into(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_blog_request_accepts_valid_input() {
        let request = CreateBlogRequest {
            title: "A day in the life".into(),
            description: "Longer form text".into(),
        };
        assert!(request.validate().is_ok());
    }
}
