// ============================================================================
// SERVICES - LOGIQUE MÉTIER
// ============================================================================
//
// Description:
//   Processeurs d'écriture (inscription, création de profil vendeur, cycle de
//   vie des livres, achats) et fournisseurs de lecture (mes-achats,
//   mes-ventes, livres d'un vendeur). Les routes ne font que désérialiser,
//   extraire l'acteur et mapper ServiceError vers un statut HTTP.
//
// Points d'attention:
//   - L'acteur est toujours passé en paramètre explicite (jamais d'état
//     ambiant), et les décisions d'autorisation passent par security::voter
//   - Une seule écriture d'agrégat par requête; toutes les vérifications
//     d'invariants ont lieu avant la persistance
//
// ============================================================================

pub mod user_service;
pub mod vendeur_service;
pub mod book_service;
pub mod achat_service;

use actix_web::HttpResponse;
use sea_orm::DbErr;

/// Taxonomie des échecs métier, mappée vers HTTP en bordure de route.
/// L'absence d'authentification (401) est produite plus tôt, par
/// l'extracteur AuthUser.
#[derive(Debug)]
pub enum ServiceError {
    /// Acteur résolu mais refusé par un prédicat d'autorisation (403)
    AccessDenied(String),
    /// Ressource absente, ou précondition manquante comme l'absence de
    /// profil vendeur (404)
    NotFound(String),
    /// Donnée soumise violant un invariant d'entité (422)
    Validation(String),
    /// Conflit d'unicité ou de référence (email déjà pris, historique
    /// d'achats existant) (409)
    Conflict(String),
    /// Erreur de la couche de persistance (500)
    Db(DbErr),
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        ServiceError::Db(e)
    }
}

impl ServiceError {
    pub fn to_response(&self) -> HttpResponse {
        match self {
            ServiceError::AccessDenied(msg) => {
                HttpResponse::Forbidden().json(serde_json::json!({ "error": msg }))
            }
            ServiceError::NotFound(msg) => {
                HttpResponse::NotFound().json(serde_json::json!({ "error": msg }))
            }
            ServiceError::Validation(msg) => {
                HttpResponse::UnprocessableEntity().json(serde_json::json!({ "error": msg }))
            }
            ServiceError::Conflict(msg) => {
                HttpResponse::Conflict().json(serde_json::json!({ "error": msg }))
            }
            ServiceError::Db(e) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            })),
        }
    }
}
