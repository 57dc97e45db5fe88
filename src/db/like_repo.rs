use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;

use crate::db::{aggregate_typed, blogs, likes, BLOGS_COLLECTION, LIKES_COLLECTION, USERS_COLLECTION};
use crate::error::Result;
use crate::models::{Like, LikeSummary, LikedBlog};

/// Insert a like for a blog by a user
pub async fn create_like(db: &Database, blog_id: ObjectId, user_id: ObjectId) -> Result<Like> {
    let now = DateTime::now();
    let like = Like {
        id: ObjectId::new(),
        blog_id,
        user_id,
        created_at: now,
        updated_at: now,
    };

    likes(db).insert_one(&like).await?;
    Ok(like)
}

/// Find a like by blog and user
pub async fn find_like(db: &Database, blog_id: ObjectId, user_id: ObjectId) -> Result<Option<Like>> {
    Ok(likes(db)
        .find_one(doc! { "blogId": blog_id, "userId": user_id })
        .await?)
}

/// Delete a like; returns whether one existed
pub async fn delete_like(db: &Database, blog_id: ObjectId, user_id: ObjectId) -> Result<bool> {
    let result = likes(db)
        .delete_one(doc! { "blogId": blog_id, "userId": user_id })
        .await?;

    Ok(result.deleted_count > 0)
}

/// Like state of one blog for one user: author details, total like
/// count and whether this user is among the likers
pub async fn like_summary(
    db: &Database,
    blog_id: ObjectId,
    user_id: ObjectId,
) -> Result<Option<LikeSummary>> {
    let pipeline = vec![
        doc! { "$match": { "_id": blog_id } },
        doc! { "$lookup": {
            "from": USERS_COLLECTION,
            "localField": "author",
            "foreignField": "_id",
            "as": "authorDetails",
            "pipeline": [
                { "$project": { "name": 1, "avatar": 1, "_id": 1 } },
            ],
        }},
        doc! { "$unwind": "$authorDetails" },
        doc! { "$lookup": {
            "from": LIKES_COLLECTION,
            "localField": "_id",
            "foreignField": "blogId",
            "as": "likes",
        }},
        doc! { "$addFields": {
            "likeCount": { "$size": "$likes" },
            "userLiked": { "$in": [user_id, "$likes.userId"] },
        }},
        doc! { "$project": {
            "authorDetails.name": 1,
            "authorDetails.avatar": 1,
            "authorDetails._id": 1,
            "likeCount": 1,
            "userLiked": 1,
        }},
    ];

    let mut summaries: Vec<LikeSummary> = aggregate_typed(&blogs(db), pipeline).await?;
    Ok(summaries.pop())
}

/// Blogs a user has liked, most recent like first, each joined with
/// the blog summary and that blog's author
pub async fn liked_blogs(db: &Database, user_id: ObjectId) -> Result<Vec<LikedBlog>> {
    let pipeline = vec![
        doc! { "$match": { "userId": user_id } },
        doc! { "$sort": { "createdAt": -1 } },
        doc! { "$project": { "blogId": 1, "_id": 0 } },
        doc! { "$lookup": {
            "from": BLOGS_COLLECTION,
            "let": { "blogId": "$blogId" },
            "pipeline": [
                { "$match": { "$expr": { "$eq": ["$_id", "$$blogId"] } } },
                { "$project": { "_id": 1, "title": 1, "image": 1, "author": 1 } },
            ],
            "as": "blogDetails",
        }},
        doc! { "$unwind": { "path": "$blogDetails" } },
        doc! { "$lookup": {
            "from": USERS_COLLECTION,
            "let": { "authorId": "$blogDetails.author" },
            "pipeline": [
                { "$match": { "$expr": { "$eq": ["$_id", "$$authorId"] } } },
                { "$project": { "name": 1, "avatar": 1 } },
            ],
            "as": "blogDetails.authorDetails",
        }},
        doc! { "$unwind": { "path": "$blogDetails.authorDetails" } },
    ];

    aggregate_typed(&likes(db), pipeline).await
}
