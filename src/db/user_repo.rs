use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;

use crate::db::{aggregate_typed, users, BLOGS_COLLECTION};
use crate::error::Result;
use crate::models::{AuthorListItem, AuthorProfile, User};

/// Insert a new user
pub async fn create_user(
    db: &Database,
    name: &str,
    email: &str,
    password_hash: &str,
    avatar: &str,
) -> Result<User> {
    let now = DateTime::now();
    let user = User {
        id: ObjectId::new(),
        name: name.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        avatar: avatar.to_string(),
        created_at: now,
        updated_at: now,
    };

    users(db).insert_one(&user).await?;
    Ok(user)
}

/// Find a user by email
pub async fn find_by_email(db: &Database, email: &str) -> Result<Option<User>> {
    Ok(users(db).find_one(doc! { "email": email }).await?)
}

/// Find a user by id
pub async fn find_by_id(db: &Database, user_id: ObjectId) -> Result<Option<User>> {
    Ok(users(db).find_one(doc! { "_id": user_id }).await?)
}

/// All users with at least one blog, with their blog counts
pub async fn authors_with_blogs(db: &Database) -> Result<Vec<AuthorListItem>> {
    let pipeline = vec![
        doc! { "$project": { "_id": 1, "name": 1, "avatar": 1 } },
        doc! { "$lookup": {
            "from": BLOGS_COLLECTION,
            "let": { "userId": "$_id" },
            "pipeline": [
                { "$match": { "$expr": { "$eq": ["$author", "$$userId"] } } },
                { "$project": { "_id": 1 } },
            ],
            "as": "blogs",
        }},
        doc! { "$match": { "blogs": { "$ne": [] } } },
        doc! { "$project": {
            "name": 1,
            "avatar": 1,
            "blogCount": { "$size": "$blogs" },
        }},
    ];

    aggregate_typed(&users(db), pipeline).await
}

/// One author joined with their blogs, newest blog first
pub async fn author_profile(db: &Database, author_id: ObjectId) -> Result<Option<AuthorProfile>> {
    let pipeline = vec![
        doc! { "$match": { "_id": author_id } },
        doc! { "$lookup": {
            "from": BLOGS_COLLECTION,
            "localField": "_id",
            "foreignField": "author",
            "as": "blogs",
            "pipeline": [
                { "$project": { "title": 1, "image": 1 } },
                { "$sort": { "createdAt": -1 } },
            ],
        }},
        doc! { "$project": {
            "name": 1,
            "avatar": 1,
            "blogCount": { "$size": "$blogs" },
            "blogs": 1,
        }},
    ];

    let mut profiles: Vec<AuthorProfile> = aggregate_typed(&users(db), pipeline).await?;
    Ok(profiles.pop())
}
