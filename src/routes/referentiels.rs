use actix_web::{get, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::models::category::Entity as Category;
use crate::models::etat::Entity as Etat;

/// GET /api/categories - Liste des catégories (PUBLIC)
#[get("/categories")]
pub async fn list_categories(db: web::Data<DatabaseConnection>) -> HttpResponse {
    match Category::find().all(db.get_ref()).await {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch categories: {}", e)
        })),
    }
}

/// GET /api/etats - Liste des états de livre (PUBLIC)
#[get("/etats")]
pub async fn list_etats(db: web::Data<DatabaseConnection>) -> HttpResponse {
    match Etat::find().all(db.get_ref()).await {
        Ok(etats) => HttpResponse::Ok().json(etats),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch etats: {}", e)
        })),
    }
}

pub fn referentiel_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_categories).service(list_etats);
}
