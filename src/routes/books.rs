use actix_web::{post, get, patch, delete, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::models::dto::{CreateBookRequest, UpdateBookRequest};
use crate::services::book_service::BookService;
use crate::middleware::AuthUser;

/// GET /api/books - Liste de tous les livres (PUBLIC)
#[get("/books")]
pub async fn list_books(db: web::Data<DatabaseConnection>) -> HttpResponse {
    match BookService::list(db.get_ref()).await {
        Ok(books) => HttpResponse::Ok().json(books),
        Err(e) => e.to_response(),
    }
}

/// GET /api/books/{id} - Détail d'un livre (PUBLIC)
#[get("/books/{id}")]
pub async fn book_detail(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match BookService::detail(db.get_ref(), path.into_inner()).await {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(e) => e.to_response(),
    }
}

/// POST /api/books - Créer un livre (VENDEUR; le vendeur du livre est
/// toujours le profil de l'acteur)
#[post("/books")]
pub async fn create_book(
    auth_user: AuthUser,
    body: web::Json<CreateBookRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(e) = body.validate() {
        return HttpResponse::UnprocessableEntity().json(serde_json::json!({
            "error": format!("Validation failed: {}", e)
        }));
    }

    match BookService::create(db.get_ref(), auth_user.user_id, body.into_inner()).await {
        Ok(book) => HttpResponse::Created().json(book),
        Err(e) => e.to_response(),
    }
}

/// PATCH /api/books/{id} - Modifier un livre (propriétaire uniquement)
#[patch("/books/{id}")]
pub async fn update_book(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<UpdateBookRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(e) = body.validate() {
        return HttpResponse::UnprocessableEntity().json(serde_json::json!({
            "error": format!("Validation failed: {}", e)
        }));
    }

    match BookService::update(db.get_ref(), auth_user.user_id, path.into_inner(), body.into_inner())
        .await
    {
        Ok(book) => HttpResponse::Ok().json(book),
        Err(e) => e.to_response(),
    }
}

/// DELETE /api/books/{id} - Supprimer un livre (propriétaire uniquement)
#[delete("/books/{id}")]
pub async fn delete_book(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match BookService::delete(db.get_ref(), auth_user.user_id, path.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => e.to_response(),
    }
}

/// GET /api/mes-livres - Vue de gestion des livres de son propre profil
/// vendeur (PROTÉGÉE, distincte de la vitrine publique)
#[get("/mes-livres")]
pub async fn mes_livres(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    match BookService::mes_livres(db.get_ref(), auth_user.user_id).await {
        Ok(books) => HttpResponse::Ok().json(books),
        Err(e) => e.to_response(),
    }
}

pub fn book_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_books)
        .service(book_detail)
        .service(create_book)
        .service(update_book)
        .service(delete_book)
        .service(mes_livres);
}
