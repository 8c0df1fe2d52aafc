use actix_web::{post, get, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::models::dto::CreateAchatRequest;
use crate::services::achat_service::AchatService;
use crate::middleware::AuthUser;

/// POST /api/achats - Acheter un livre (PROTÉGÉE). Acheteur = acteur,
/// vendeur dérivé du livre; l'enregistrement est immuable.
#[post("/achats")]
pub async fn create_achat(
    auth_user: AuthUser,
    body: web::Json<CreateAchatRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match AchatService::create(db.get_ref(), auth_user.user_id, body.into_inner()).await {
        Ok(achat) => HttpResponse::Created().json(achat),
        Err(e) => e.to_response(),
    }
}

/// GET /api/mes-achats - Ses propres achats, vue enrichie (PROTÉGÉE)
#[get("/mes-achats")]
pub async fn mes_achats(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    match AchatService::mes_achats(db.get_ref(), auth_user.user_id).await {
        Ok(achats) => HttpResponse::Ok().json(achats),
        Err(e) => e.to_response(),
    }
}

/// GET /api/mes-ventes - Ses propres ventes, vue étroite (PROTÉGÉE,
/// nécessite un profil vendeur)
#[get("/mes-ventes")]
pub async fn mes_ventes(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    match AchatService::mes_ventes(db.get_ref(), auth_user.user_id).await {
        Ok(ventes) => HttpResponse::Ok().json(ventes),
        Err(e) => e.to_response(),
    }
}

pub fn achat_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_achat)
        .service(mes_achats)
        .service(mes_ventes);
}
