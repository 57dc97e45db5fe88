use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;

use crate::db::{aggregate_typed, blogs, USERS_COLLECTION};
use crate::error::Result;
use crate::models::{Blog, BlogDetail, BlogSummary};

/// Insert a new blog
pub async fn create_blog(
    db: &Database,
    title: &str,
    description: &str,
    image: &str,
    author: ObjectId,
) -> Result<Blog> {
    let now = DateTime::now();
    let blog = Blog {
        id: ObjectId::new(),
        title: title.to_string(),
        description: description.to_string(),
        image: image.to_string(),
        author,
        created_at: now,
        updated_at: now,
    };

    blogs(db).insert_one(&blog).await?;
    Ok(blog)
}

/// Find a blog by id
pub async fn find_by_id(db: &Database, blog_id: ObjectId) -> Result<Option<Blog>> {
    Ok(blogs(db).find_one(doc! { "_id": blog_id }).await?)
}

/// All blogs newest first, joined with author name and avatar.
/// The description and timestamps are projected away to keep the
/// listing payload small.
pub async fn list_with_authors(db: &Database) -> Result<Vec<BlogSummary>> {
    let pipeline = vec![
        doc! { "$sort": { "createdAt": -1 } },
        doc! { "$project": { "description": 0, "createdAt": 0, "updatedAt": 0 } },
        doc! { "$lookup": {
            "from": USERS_COLLECTION,
            "let": { "authorId": "$author" },
            "pipeline": [
                { "$match": { "$expr": { "$eq": ["$_id", "$$authorId"] } } },
                { "$project": { "name": 1, "avatar": 1 } },
            ],
            "as": "authorDetails",
        }},
        doc! { "$unwind": "$authorDetails" },
    ];

    aggregate_typed(&blogs(db), pipeline).await
}

/// One blog with its author joined in
pub async fn find_detail(db: &Database, blog_id: ObjectId) -> Result<Option<BlogDetail>> {
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
        doc! { "$unwind": { "path": "$authorDetails" } },
    ];

    let mut details: Vec<BlogDetail> = aggregate_typed(&blogs(db), pipeline).await?;
    Ok(details.pop())
}
