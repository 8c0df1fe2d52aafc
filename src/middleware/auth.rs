use actix_web::{dev::Payload, Error, FromRequest, HttpRequest, HttpResponse};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::utils::jwt;

/// Identité de l'utilisateur authentifié, extraite du JWT.
/// Utilisée comme extracteur dans les routes protégées. Ce n'est qu'une
/// identité: les rôles et le profil vendeur sont toujours rechargés depuis
/// la base au moment de la décision d'autorisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
}

/// Implémentation de FromRequest pour AuthUser
/// Permet à Actix-Web d'extraire automatiquement AuthUser des requêtes
impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // 1. Extraire le header Authorization
        let auth_header = match req.headers().get("Authorization") {
            Some(header) => header,
            None => {
                return ready(Err(unauthorized("Missing Authorization header")));
            }
        };

        // 2. Convertir le header en string
        let auth_str = match auth_header.to_str() {
            Ok(s) => s,
            Err(_) => {
                return ready(Err(unauthorized("Invalid Authorization header")));
            }
        };

        // 3. Extraire le token (format: "Bearer <token>")
        let token = match auth_str.strip_prefix("Bearer ") {
            Some(token) => token,
            None => {
                return ready(Err(unauthorized(
                    "Invalid Authorization format (expected: Bearer <token>)",
                )));
            }
        };

        // 4. Vérifier le token JWT
        let claims = match jwt::verify_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                return ready(Err(unauthorized(&format!("Invalid token: {}", e))));
            }
        };

        // 5. Créer et retourner AuthUser
        ready(Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
        }))
    }
}

fn unauthorized(message: &str) -> Error {
    let response = HttpResponse::Unauthorized().json(serde_json::json!({
        "error": message
    }));
    actix_web::error::InternalError::from_response("", response).into()
}
