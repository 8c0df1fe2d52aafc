use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};

use crate::models::achat::{Column as AchatColumn, Entity as Achat};
use crate::models::book::{Column as BookColumn, Entity as Book};
use crate::models::book_category::{Column as BookCategoryColumn, Entity as BookCategory};
use crate::models::dto::CreateVendeurRequest;
use crate::models::users::{self, Entity as Users};
use crate::models::vendeur::{self, Column as VendeurColumn, Entity as Vendeur};
use crate::security::roles::{self, Role};
use crate::services::ServiceError;

pub struct VendeurService;

impl VendeurService {
    /// Création du profil vendeur de l'acteur.
    /// C'est l'unique mécanisme d'obtention du rôle ROLE_VENDEUR: l'insertion
    /// du profil promeut l'ensemble de rôles de l'utilisateur à
    /// {USER, VENDEUR} (sans doublon).
    pub async fn create(
        db: &DatabaseConnection,
        actor_id: i32,
        request: CreateVendeurRequest,
    ) -> Result<vendeur::Model, ServiceError> {
        // 1. L'acteur doit exister en base
        let user = Users::find_by_id(actor_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Utilisateur introuvable".to_string()))?;

        // 2. Un seul profil vendeur par utilisateur
        let existing = Vendeur::find()
            .filter(VendeurColumn::UserId.eq(user.id))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "Vous avez déjà un profil vendeur".to_string(),
            ));
        }

        // 3. Insérer le profil et promouvoir les rôles dans la même
        // transaction: un profil vendeur sans ROLE_VENDEUR ne doit jamais
        // être observable
        let txn = db.begin().await?;

        let new_vendeur = vendeur::ActiveModel {
            nom_entreprise: Set(request.nom_entreprise),
            adresse_entreprise: Set(request.adresse_entreprise),
            user_id: Set(user.id),
            ..Default::default()
        };
        let profil = new_vendeur.insert(&txn).await?;

        let promoted = roles::promote(&user.roles, Role::Vendeur);
        let mut active: users::ActiveModel = user.into();
        active.roles = Set(promoted);
        active.update(&txn).await?;

        txn.commit().await?;

        Ok(profil)
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        vendeur_id: i32,
    ) -> Result<vendeur::Model, ServiceError> {
        Vendeur::find_by_id(vendeur_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Vendeur introuvable".to_string()))
    }

    /// Profil vendeur de l'acteur. L'absence de profil est une précondition
    /// manquante (404), distincte d'un refus d'autorisation.
    pub async fn find_by_user(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<vendeur::Model, ServiceError> {
        Vendeur::find()
            .filter(VendeurColumn::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(
                    "Aucun profil vendeur: créez d'abord votre profil vendeur".to_string(),
                )
            })
    }

    /// Suppression du profil vendeur (propriétaire uniquement).
    /// Refusée tant que l'historique de ventes référence le profil; sinon les
    /// livres du vendeur sont supprimés et le rôle VENDEUR est retiré.
    pub async fn delete(
        db: &DatabaseConnection,
        actor_id: i32,
        vendeur_id: i32,
    ) -> Result<(), ServiceError> {
        let profil = Self::find_by_id(db, vendeur_id).await?;

        if profil.user_id != actor_id {
            return Err(ServiceError::AccessDenied(
                "Vous ne pouvez supprimer que votre propre profil vendeur".to_string(),
            ));
        }

        let ventes = Achat::find()
            .filter(AchatColumn::VendeurId.eq(profil.id))
            .count(db)
            .await?;
        if ventes > 0 {
            return Err(ServiceError::Conflict(
                "Profil référencé par un historique de ventes, suppression refusée".to_string(),
            ));
        }

        // Cascade dans une seule transaction:
        // liens catégories -> livres -> profil -> rôles
        let txn = db.begin().await?;

        let books = Book::find()
            .filter(BookColumn::VendeurId.eq(profil.id))
            .all(&txn)
            .await?;
        for book in &books {
            BookCategory::delete_many()
                .filter(BookCategoryColumn::BookId.eq(book.id))
                .exec(&txn)
                .await?;
        }
        Book::delete_many()
            .filter(BookColumn::VendeurId.eq(profil.id))
            .exec(&txn)
            .await?;

        let user_id = profil.user_id;
        profil.delete(&txn).await?;

        // Retirer le rôle vendeur (ROLE_USER est conservé)
        if let Some(user) = Users::find_by_id(user_id).one(&txn).await? {
            let demoted = roles::demote(&user.roles, Role::Vendeur);
            let mut active: users::ActiveModel = user.into();
            active.roles = Set(demoted);
            active.update(&txn).await?;
        }

        txn.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn stored_user(id: i32) -> users::Model {
        users::Model {
            id,
            email: format!("user{}@example.com", id),
            password: "pbkdf2:sha256:600000$c2VsDg$aGFzaA".to_string(),
            roles: "ROLE_USER".to_string(),
            user_nom: "Nom".to_string(),
            user_prenom: "Prenom".to_string(),
            tel: "0606060606".to_string(),
        }
    }

    fn stored_vendeur(id: i32, user_id: i32) -> vendeur::Model {
        vendeur::Model {
            id,
            nom_entreprise: "Bouquinerie Test".to_string(),
            adresse_entreprise: "1 rue des Livres".to_string(),
            user_id,
        }
    }

    fn request() -> CreateVendeurRequest {
        CreateVendeurRequest {
            nom_entreprise: "Bouquinerie Test".to_string(),
            adresse_entreprise: "1 rue des Livres".to_string(),
        }
    }

    // Propriété: la création du profil promeut les rôles à {USER, VENDEUR}
    #[tokio::test]
    async fn test_create_promeut_les_roles() {
        let promoted = stored_user(1);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_user(1)]])          // acteur
            .append_query_results([Vec::<vendeur::Model>::new()])  // pas de profil
            .append_query_results([vec![stored_vendeur(10, 1)]])   // insertion
            .append_query_results([vec![users::Model {
                roles: "ROLE_USER,ROLE_VENDEUR".to_string(),
                ..promoted
            }]]) // update des rôles
            .into_connection();

        let profil = VendeurService::create(&db, 1, request()).await.unwrap();
        assert_eq!(profil.user_id, 1);

        // L'UPDATE émis porte bien l'encodage promu, dédupliqué, et les
        // deux écritures sont encadrées par une transaction validée
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("ROLE_USER,ROLE_VENDEUR"));
        assert!(!log.contains("ROLE_VENDEUR,ROLE_VENDEUR"));
        assert!(log.contains("BEGIN"));
        assert!(log.contains("COMMIT"));
    }

    // Propriété: si la promotion des rôles échoue après l'insertion du
    // profil, la transaction est annulée et aucun profil orphelin (sans
    // ROLE_VENDEUR sur l'utilisateur) n'est observable
    #[tokio::test]
    async fn test_create_annule_tout_si_promotion_echoue() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_user(1)]])          // acteur
            .append_query_results([Vec::<vendeur::Model>::new()])  // pas de profil
            .append_query_results([vec![stored_vendeur(10, 1)]])   // insertion
            .append_query_errors([sea_orm::DbErr::Custom(
                "update roles failed".to_string(),
            )]) // échec de l'UPDATE des rôles
            .into_connection();

        let result = VendeurService::create(&db, 1, request()).await;

        assert!(matches!(result, Err(ServiceError::Db(_))));

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("BEGIN"));
        assert!(log.contains("ROLLBACK"));
        assert!(!log.contains("COMMIT"));
    }

    #[tokio::test]
    async fn test_create_profil_deja_existant() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_user(1)]])
            .append_query_results([vec![stored_vendeur(10, 1)]]) // profil déjà là
            .into_connection();

        let result = VendeurService::create(&db, 1, request()).await;

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_find_by_user_sans_profil() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<vendeur::Model>::new()])
            .into_connection();

        let result = VendeurService::find_by_user(&db, 1).await;

        // Précondition manquante => NotFound, pas AccessDenied
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }
}
