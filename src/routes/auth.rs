use actix_web::{post, get, patch, delete, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::dto::{RegisterRequest, UpdateMeRequest};
use crate::models::users::{Entity as Users, Column as UserColumn};
use crate::services::user_service::UserService;
use crate::utils::{password, jwt};
use crate::middleware::AuthUser;

// DTO pour la connexion
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Réponse après login
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i32,
    pub email: String,
}

/// POST /api/register - Créer un compte (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Valider le payload (format email, longueurs)
    if let Err(e) = body.validate() {
        return HttpResponse::UnprocessableEntity().json(serde_json::json!({
            "error": format!("Validation failed: {}", e)
        }));
    }

    // 2. Déléguer au processeur (unicité, hash, roles = [USER])
    match UserService::register(db.get_ref(), body.into_inner()).await {
        Ok(user) => HttpResponse::Created().json(user),
        Err(e) => e.to_response(),
    }
}

/// POST /api/login_check - Se connecter (PUBLIC)
#[post("/login_check")]
pub async fn login_check(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Trouver l'utilisateur par email
    let user = Users::find()
        .filter(UserColumn::Email.eq(&body.email))
        .one(db.get_ref())
        .await;

    let user = match user {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Invalid email or password"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    };

    // 2. Vérifier le mot de passe
    let is_valid = match password::verify_password(&body.password, &user.password) {
        Ok(valid) => valid,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Password verification error: {}", e)
            }));
        }
    };

    if !is_valid {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Invalid email or password"
        }));
    }

    // 3. Générer le JWT
    let token = match jwt::generate_token(user.id, &user.email) {
        Ok(token) => token,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to generate token: {}", e)
            }));
        }
    };

    HttpResponse::Ok().json(AuthResponse {
        token,
        user_id: user.id,
        email: user.email,
    })
}

/// GET /api/me - Son propre compte (PROTÉGÉE)
#[get("/me")]
pub async fn me(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    match UserService::me(db.get_ref(), auth_user.user_id).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => e.to_response(),
    }
}

/// PATCH /api/update_me - Modifier son propre compte (PROTÉGÉE)
#[patch("/update_me")]
pub async fn update_me(
    auth_user: AuthUser,
    body: web::Json<UpdateMeRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(e) = body.validate() {
        return HttpResponse::UnprocessableEntity().json(serde_json::json!({
            "error": format!("Validation failed: {}", e)
        }));
    }

    match UserService::update_me(db.get_ref(), auth_user.user_id, body.into_inner()).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => e.to_response(),
    }
}

/// DELETE /api/users/{id} - Supprimer un compte (soi-même uniquement)
#[delete("/users/{id}")]
pub async fn delete_user(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match UserService::delete(db.get_ref(), auth_user.user_id, path.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => e.to_response(),
    }
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login_check)
        .service(me)
        .service(update_me)
        .service(delete_user);
}
