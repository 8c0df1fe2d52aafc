// DTOs des requêtes et des réponses structurées (vues jointes)
use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use validator::Validate;

use super::{book, category, etat};

// ---------------------------------------------------------------------------
// Requêtes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Email invalide"))]
    pub email: String,
    #[validate(length(min = 8, message = "Le mot de passe doit faire au moins 8 caractères"))]
    pub password: String,
    #[validate(length(min = 1, message = "Le nom est obligatoire"))]
    pub user_nom: String,
    #[validate(length(min = 1, message = "Le prénom est obligatoire"))]
    pub user_prenom: String,
    #[validate(length(min = 1, message = "Le téléphone est obligatoire"))]
    pub tel: String,
}

// Mise à jour partielle du compte: seuls les champs présents sont modifiés
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMeRequest {
    #[validate(email(message = "Email invalide"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Le mot de passe doit faire au moins 8 caractères"))]
    pub password: Option<String>,
    pub user_nom: Option<String>,
    pub user_prenom: Option<String>,
    pub tel: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVendeurRequest {
    #[validate(length(min = 1, message = "Le nom d'entreprise est obligatoire"))]
    pub nom_entreprise: String,
    #[validate(length(min = 1, message = "L'adresse d'entreprise est obligatoire"))]
    pub adresse_entreprise: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookRequest {
    #[validate(length(min = 1, message = "Le titre est obligatoire"))]
    pub title: String,
    #[validate(length(min = 1, message = "L'auteur est obligatoire"))]
    pub author: String,
    #[validate(range(min = 0, message = "Le prix doit être positif"))]
    pub prix: i64, // centimes
    pub image: String,
    pub description_courte: String,
    pub description_longue: String,
    pub etat_id: i32,
    #[serde(default)]
    pub category_ids: Vec<i32>,
    // Accepté dans le payload mais volontairement ignoré: le vendeur est
    // toujours le profil de l'acteur, jamais une référence fournie par le
    // client
    #[serde(default)]
    pub vendeur_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBookRequest {
    #[validate(length(min = 1, message = "Le titre est obligatoire"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "L'auteur est obligatoire"))]
    pub author: Option<String>,
    #[validate(range(min = 0, message = "Le prix doit être positif"))]
    pub prix: Option<i64>, // centimes
    pub image: Option<String>,
    pub description_courte: Option<String>,
    pub description_longue: Option<String>,
    pub etat_id: Option<i32>,
    // Si présent, remplace l'ensemble des catégories du livre
    pub category_ids: Option<Vec<i32>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAchatRequest {
    pub livre_id: i32,
}

// ---------------------------------------------------------------------------
// Réponses
// ---------------------------------------------------------------------------

// 1 ligne de "mes achats" : livre + coordonnées du vendeur
#[derive(Debug, Serialize)]
pub struct AchatAcheteurDto {
    pub title: String,
    pub prix: i64, // centimes
    pub user_prenom: String,
    pub nom_entreprise: String,
    pub adresse_entreprise: String,
    pub achat_at: DateTime<Utc>,
}

// 1 ligne de "mes ventes" : volontairement plus étroit que "mes achats",
// aucune donnée de l'acheteur n'est exposée au vendeur
#[derive(Debug, Serialize)]
pub struct VenteVendeurDto {
    pub title: String,
    pub prix: i64, // centimes
    pub achat_at: DateTime<Utc>,
}

// Détail d'un livre avec état et catégories développés
#[derive(Debug, Serialize)]
pub struct BookDetailDto {
    #[serde(flatten)]
    pub book: book::Model,
    pub etat: Option<etat::Model>,
    pub categories: Vec<category::Model>,
}

// Profil vendeur public (pas de user_id exposé)
#[derive(Debug, Serialize)]
pub struct VendeurDto {
    pub id: i32,
    pub nom_entreprise: String,
    pub adresse_entreprise: String,
}
