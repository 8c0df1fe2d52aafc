use actix_web::{post, get, delete, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::models::dto::{CreateVendeurRequest, VendeurDto};
use crate::services::book_service::BookService;
use crate::services::vendeur_service::VendeurService;
use crate::middleware::AuthUser;

/// POST /api/vendeurs - Créer son profil vendeur (PROTÉGÉE).
/// C'est l'opération qui promeut les rôles de l'acteur à {USER, VENDEUR}.
#[post("/vendeurs")]
pub async fn create_vendeur(
    auth_user: AuthUser,
    body: web::Json<CreateVendeurRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(e) = body.validate() {
        return HttpResponse::UnprocessableEntity().json(serde_json::json!({
            "error": format!("Validation failed: {}", e)
        }));
    }

    match VendeurService::create(db.get_ref(), auth_user.user_id, body.into_inner()).await {
        Ok(profil) => HttpResponse::Created().json(profil),
        Err(e) => e.to_response(),
    }
}

/// GET /api/vendeurs/{id} - Profil public d'un vendeur (PROTÉGÉE)
#[get("/vendeurs/{id}")]
pub async fn vendeur_detail(
    _auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match VendeurService::find_by_id(db.get_ref(), path.into_inner()).await {
        Ok(profil) => HttpResponse::Ok().json(VendeurDto {
            id: profil.id,
            nom_entreprise: profil.nom_entreprise,
            adresse_entreprise: profil.adresse_entreprise,
        }),
        Err(e) => e.to_response(),
    }
}

/// GET /api/vendeurs/{id}/books - Vitrine publique d'un vendeur (PUBLIC;
/// la vue de gestion du vendeur est /api/mes-livres)
#[get("/vendeurs/{id}/books")]
pub async fn vendeur_books(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match BookService::by_vendeur(db.get_ref(), path.into_inner()).await {
        Ok(books) => HttpResponse::Ok().json(books),
        Err(e) => e.to_response(),
    }
}

/// DELETE /api/vendeurs/{id} - Supprimer son profil vendeur (propriétaire
/// uniquement; retire le rôle VENDEUR)
#[delete("/vendeurs/{id}")]
pub async fn delete_vendeur(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match VendeurService::delete(db.get_ref(), auth_user.user_id, path.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => e.to_response(),
    }
}

pub fn vendeur_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_vendeur)
        .service(vendeur_books)
        .service(vendeur_detail)
        .service(delete_vendeur);
}
