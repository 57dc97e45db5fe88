//! MongoDB client bootstrap and typed collection access

use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::Result;
use crate::models::{Blog, Comment, Like, User};

pub mod blog_repo;
pub mod comment_repo;
pub mod like_repo;
pub mod user_repo;

pub const USERS_COLLECTION: &str = "users";
pub const BLOGS_COLLECTION: &str = "blogs";
pub const COMMENTS_COLLECTION: &str = "comments";
pub const LIKES_COLLECTION: &str = "likes";

/// Connect to MongoDB and verify the connection with a ping
pub async fn connect(uri: &str, db_name: &str) -> std::result::Result<Database, mongodb::error::Error> {
    info!("Connecting to MongoDB");

    // Bounded server selection so startup fails fast when MongoDB is unreachable
    let timeout_uri = if uri.contains('?') {
        format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
    } else {
        format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
    };

    let client = Client::with_uri_str(&timeout_uri).await?;
    let database = client.database(db_name);
    database.run_command(doc! { "ping": 1 }).await?;

    info!("Connected to MongoDB database '{}'", db_name);
    Ok(database)
}

/// Create the indexes the queries rely on: unique user emails and
/// one like per user per blog
pub async fn ensure_indexes(db: &Database) -> std::result::Result<(), mongodb::error::Error> {
    users(db)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        )
        .await?;

    likes(db)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "blogId": 1, "userId": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        )
        .await?;

    blogs(db)
        .create_index(IndexModel::builder().keys(doc! { "author": 1 }).build())
        .await?;

    comments(db)
        .create_index(IndexModel::builder().keys(doc! { "blogId": 1 }).build())
        .await?;

    Ok(())
}

pub fn users(db: &Database) -> Collection<User> {
    db.collection(USERS_COLLECTION)
}

pub fn blogs(db: &Database) -> Collection<Blog> {
    db.collection(BLOGS_COLLECTION)
}

pub fn comments(db: &Database) -> Collection<Comment> {
    db.collection(COMMENTS_COLLECTION)
}

pub fn likes(db: &Database) -> Collection<Like> {
    db.collection(LIKES_COLLECTION)
}

/// True when an insert was rejected by a unique index
pub fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) if write_error.code == 11000
    )
}

/// Run an aggregation pipeline and map each output document into `T`
pub async fn aggregate_typed<C, T>(
    collection: &Collection<C>,
    pipeline: Vec<Document>,
) -> Result<Vec<T>>
where
    C: Send + Sync,
    T: DeserializeOwned,
{
    let mut cursor = collection.aggregate(pipeline).await?;

    let mut items = Vec::new();
    while let Some(document) = cursor.try_next().await? {
        items.push(bson::from_document(document)?);
    }

    Ok(items)
}
