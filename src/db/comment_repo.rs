use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;

use crate::db::{aggregate_typed, comments, USERS_COLLECTION};
use crate::error::Result;
use crate::models::{Comment, CommentEntry};

/// Insert a comment on a blog
pub async fn create_comment(
    db: &Database,
    blog_id: ObjectId,
    user_id: ObjectId,
    content: &str,
) -> Result<Comment> {
    let now = DateTime::now();
    let comment = Comment {
        id: ObjectId::new(),
        content: content.to_string(),
        blog_id,
        user_id,
        created_at: now,
        updated_at: now,
    };

    comments(db).insert_one(&comment).await?;
    Ok(comment)
}

/// Comments on a blog, newest first, each joined with the commenting
/// user's name and avatar. A comment whose user no longer resolves is
/// still returned, without user details.
pub async fn list_for_blog(db: &Database, blog_id: ObjectId) -> Result<Vec<CommentEntry>> {
    let pipeline = vec![
        doc! { "$match": { "blogId": blog_id } },
        doc! { "$sort": { "createdAt": -1 } },
        doc! { "$lookup": {
            "from": USERS_COLLECTION,
            "localField": "userId",
            "foreignField": "_id",
            "as": "user",
            "pipeline": [
                { "$project": { "name": 1, "avatar": 1, "_id": 1 } },
            ],
        }},
        doc! { "$unwind": { "path": "$user", "preserveNullAndEmptyArrays": true } },
        doc! { "$project": { "_id": 1, "content": 1, "user": 1 } },
    ];

    aggregate_typed(&comments(db), pipeline).await
}
