use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::models::achat::{self, Column as AchatColumn, Entity as Achat};
use crate::models::book::Entity as Book;
use crate::models::dto::{AchatAcheteurDto, CreateAchatRequest, VenteVendeurDto};
use crate::models::users::Entity as Users;
use crate::models::vendeur::Entity as Vendeur;
use crate::services::ServiceError;
use crate::services::vendeur_service::VendeurService;

pub struct AchatService;

impl AchatService {
    /// Achat d'un livre. Le vendeur est dérivé du livre et l'acheteur est
    /// l'acteur: aucune des deux références ne vient du client.
    /// L'enregistrement est immuable, il n'existe aucune opération de
    /// modification.
    pub async fn create(
        db: &DatabaseConnection,
        actor_id: i32,
        request: CreateAchatRequest,
    ) -> Result<achat::Model, ServiceError> {
        let book = Book::find_by_id(request.livre_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Livre introuvable".to_string()))?;

        let new_achat = achat::ActiveModel {
            achat_at: Set(Utc::now()),
            acheteur_id: Set(actor_id),
            vendeur_id: Set(book.vendeur_id),
            livre_id: Set(book.id),
            ..Default::default()
        };

        Ok(new_achat.insert(db).await?)
    }

    /// "Mes achats": les achats de l'acteur, enrichis du livre et des
    /// coordonnées du vendeur. Tri: date d'achat décroissante puis id.
    pub async fn mes_achats(
        db: &DatabaseConnection,
        actor_id: i32,
    ) -> Result<Vec<AchatAcheteurDto>, ServiceError> {
        let achats = Achat::find()
            .filter(AchatColumn::AcheteurId.eq(actor_id))
            .order_by_desc(AchatColumn::AchatAt)
            .order_by_desc(AchatColumn::Id)
            .all(db)
            .await?;

        let mut lignes = Vec::with_capacity(achats.len());

        for achat in achats {
            // Liens manquants: ligne ignorée plutôt qu'erreur globale
            let Some(book) = Book::find_by_id(achat.livre_id).one(db).await? else {
                eprintln!("⚠️  Achat {} sans livre, ignoré", achat.id);
                continue;
            };
            let Some(vendeur) = Vendeur::find_by_id(achat.vendeur_id).one(db).await? else {
                eprintln!("⚠️  Achat {} sans vendeur, ignoré", achat.id);
                continue;
            };
            let Some(user) = Users::find_by_id(vendeur.user_id).one(db).await? else {
                eprintln!("⚠️  Vendeur {} sans utilisateur, ignoré", vendeur.id);
                continue;
            };

            lignes.push(AchatAcheteurDto {
                title: book.title,
                prix: book.prix,
                user_prenom: user.user_prenom,
                nom_entreprise: vendeur.nom_entreprise,
                adresse_entreprise: vendeur.adresse_entreprise,
                achat_at: achat.achat_at,
            });
        }

        Ok(lignes)
    }

    /// "Mes ventes": les achats dont l'acteur est le vendeur. Vue plus
    /// étroite que "mes achats": titre et prix seulement, rien sur
    /// l'acheteur. Sans profil vendeur, échec de précondition (404).
    pub async fn mes_ventes(
        db: &DatabaseConnection,
        actor_id: i32,
    ) -> Result<Vec<VenteVendeurDto>, ServiceError> {
        let profil = VendeurService::find_by_user(db, actor_id).await?;

        let achats = Achat::find()
            .filter(AchatColumn::VendeurId.eq(profil.id))
            .order_by_desc(AchatColumn::AchatAt)
            .order_by_desc(AchatColumn::Id)
            .all(db)
            .await?;

        let mut lignes = Vec::with_capacity(achats.len());

        for achat in achats {
            let Some(book) = Book::find_by_id(achat.livre_id).one(db).await? else {
                eprintln!("⚠️  Achat {} sans livre, ignoré", achat.id);
                continue;
            };

            lignes.push(VenteVendeurDto {
                title: book.title,
                prix: book.prix,
                achat_at: achat.achat_at,
            });
        }

        Ok(lignes)
    }
}
