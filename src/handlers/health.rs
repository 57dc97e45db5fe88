use actix_web::{web, HttpResponse};
use bson::doc;
use mongodb::Database;
use serde_json::json;
use tracing::error;

/// Liveness plus a MongoDB ping
/// GET /api/v1/health
pub async fn health_check(db: web::Data<Database>) -> HttpResponse {
    match db.run_command(doc! { "ping": 1 }).await {
        Ok(_) => HttpResponse::Ok().json(json!({
            "status": "healthy",
            "database": "connected",
        })),
        Err(e) => {
            error!("Health check failed - MongoDB ping error: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unhealthy",
                "database": "unreachable",
            }))
        }
    }
}
