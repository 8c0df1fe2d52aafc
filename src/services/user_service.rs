use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};

use crate::models::achat::{Column as AchatColumn, Entity as Achat};
use crate::models::book::{Column as BookColumn, Entity as Book};
use crate::models::book_category::{Column as BookCategoryColumn, Entity as BookCategory};
use crate::models::dto::{RegisterRequest, UpdateMeRequest};
use crate::models::users::{self, Column as UserColumn, Entity as Users};
use crate::models::vendeur::{Column as VendeurColumn, Entity as Vendeur};
use crate::security::roles::{self, Role};
use crate::security::voter;
use crate::services::ServiceError;
use crate::utils::password;

pub struct UserService;

impl UserService {
    /// Inscription: email unique, mot de passe hashé, rôles fixés à [USER].
    /// Aucun champ de rôle n'est accepté du client.
    pub async fn register(
        db: &DatabaseConnection,
        request: RegisterRequest,
    ) -> Result<users::Model, ServiceError> {
        // 1. L'email doit être libre
        let existing = Users::find()
            .filter(UserColumn::Email.eq(&request.email))
            .one(db)
            .await?;

        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "Un compte existe déjà avec cet email".to_string(),
            ));
        }

        // 2. Hasher le mot de passe (jamais stocké en clair)
        let password_hash = password::hash_password(&request.password)
            .map_err(|e| ServiceError::Db(sea_orm::DbErr::Custom(e)))?;

        // 3. Créer l'utilisateur avec exactement [ROLE_USER]
        let new_user = users::ActiveModel {
            email: Set(request.email),
            password: Set(password_hash),
            roles: Set(roles::encode_roles(&[Role::User])),
            user_nom: Set(request.user_nom),
            user_prenom: Set(request.user_prenom),
            tel: Set(request.tel),
            ..Default::default()
        };

        Ok(new_user.insert(db).await?)
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<users::Model, ServiceError> {
        Users::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Utilisateur introuvable".to_string()))
    }

    /// Lecture de son propre compte. Même chemin de décision que les autres
    /// opérations sur User: le prédicat de lecture est consulté.
    pub async fn me(
        db: &DatabaseConnection,
        actor_id: i32,
    ) -> Result<users::Model, ServiceError> {
        let user = Self::find_by_id(db, actor_id).await?;

        if !voter::can_view_user(Some(&user), &user) {
            return Err(ServiceError::AccessDenied(
                "Vous ne pouvez consulter que votre propre compte".to_string(),
            ));
        }

        Ok(user)
    }

    /// Mise à jour partielle de son propre compte
    pub async fn update_me(
        db: &DatabaseConnection,
        actor_id: i32,
        request: UpdateMeRequest,
    ) -> Result<users::Model, ServiceError> {
        let user = Self::find_by_id(db, actor_id).await?;

        // Le sujet est l'acteur par construction, mais la décision reste
        // celle du prédicat
        if !voter::can_edit_user(Some(&user), &user) {
            return Err(ServiceError::AccessDenied(
                "Vous ne pouvez modifier que votre propre compte".to_string(),
            ));
        }

        // Changement d'email: re-vérifier l'unicité
        if let Some(ref email) = request.email {
            if *email != user.email {
                let taken = Users::find()
                    .filter(UserColumn::Email.eq(email))
                    .filter(UserColumn::Id.ne(user.id))
                    .one(db)
                    .await?;
                if taken.is_some() {
                    return Err(ServiceError::Conflict(
                        "Un compte existe déjà avec cet email".to_string(),
                    ));
                }
            }
        }

        let mut active: users::ActiveModel = user.into();

        if let Some(email) = request.email {
            active.email = Set(email);
        }
        if let Some(plaintext) = request.password {
            let hash = password::hash_password(&plaintext)
                .map_err(|e| ServiceError::Db(sea_orm::DbErr::Custom(e)))?;
            active.password = Set(hash);
        }
        if let Some(nom) = request.user_nom {
            active.user_nom = Set(nom);
        }
        if let Some(prenom) = request.user_prenom {
            active.user_prenom = Set(prenom);
        }
        if let Some(tel) = request.tel {
            active.tel = Set(tel);
        }

        Ok(active.update(db).await?)
    }

    /// Suppression de compte (soi-même uniquement).
    /// Rétention: refusée tant que l'historique d'achats référence ce compte,
    /// côté acheteur comme côté vendeur. Sinon, le profil vendeur et ses
    /// livres sont supprimés en cascade avant le compte.
    pub async fn delete(
        db: &DatabaseConnection,
        actor_id: i32,
        target_id: i32,
    ) -> Result<(), ServiceError> {
        let actor = Users::find_by_id(actor_id).one(db).await?;
        let subject = Users::find_by_id(target_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Utilisateur introuvable".to_string()))?;

        if !voter::can_delete_user(actor.as_ref(), &subject) {
            return Err(ServiceError::AccessDenied(
                "Vous ne pouvez supprimer que votre propre compte".to_string(),
            ));
        }

        // Historique côté acheteur
        let achats = Achat::find()
            .filter(AchatColumn::AcheteurId.eq(subject.id))
            .count(db)
            .await?;
        if achats > 0 {
            return Err(ServiceError::Conflict(
                "Compte référencé par un historique d'achats, suppression refusée".to_string(),
            ));
        }

        let profil = Vendeur::find()
            .filter(VendeurColumn::UserId.eq(subject.id))
            .one(db)
            .await?;

        if let Some(ref profil) = profil {
            // Historique côté vendeur
            let ventes = Achat::find()
                .filter(AchatColumn::VendeurId.eq(profil.id))
                .count(db)
                .await?;
            if ventes > 0 {
                return Err(ServiceError::Conflict(
                    "Compte référencé par un historique de ventes, suppression refusée"
                        .to_string(),
                ));
            }
        }

        // Cascade dans une seule transaction: aucun état intermédiaire
        // (profil sans compte, livre sans profil) n'est observable
        let txn = db.begin().await?;

        if let Some(profil) = profil {
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
            profil.delete(&txn).await?;
        }

        subject.delete(&txn).await?;
        txn.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn stored_user(id: i32, email: &str) -> users::Model {
        users::Model {
            id,
            email: email.to_string(),
            password: "pbkdf2:sha256:600000$c2VsDg$aGFzaA".to_string(),
            roles: "ROLE_USER".to_string(),
            user_nom: "Nom".to_string(),
            user_prenom: "Prenom".to_string(),
            tel: "0606060606".to_string(),
        }
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "motdepasse".to_string(),
            user_nom: "Nom".to_string(),
            user_prenom: "Prenom".to_string(),
            tel: "0606060606".to_string(),
        }
    }

    // Propriété: un email déjà pris est refusé avant toute écriture
    #[tokio::test]
    async fn test_register_email_deja_utilise() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_user(1, "a@x.com")]])
            .into_connection();

        let result = UserService::register(&db, register_request("a@x.com")).await;

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    // La lecture de son propre compte passe par le prédicat de lecture
    // et aboutit pour le couple (acteur, sujet) identique
    #[tokio::test]
    async fn test_me_renvoie_son_propre_compte() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_user(1, "a@x.com")]])
            .into_connection();

        let user = UserService::me(&db, 1).await.unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_me_compte_disparu() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();

        let result = UserService::me(&db, 1).await;

        // Jeton valide mais compte supprimé entre temps
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_register_roles_et_hash() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                Vec::<users::Model>::new(),       // email libre
                vec![stored_user(1, "a@x.com")],  // ligne insérée
            ])
            .into_connection();

        let user = UserService::register(&db, register_request("a@x.com"))
            .await
            .unwrap();

        assert_eq!(user.roles, "ROLE_USER");

        // Le mot de passe en clair n'apparaît dans aucune requête SQL émise
        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("motdepasse"));
        assert!(log.contains("pbkdf2:sha256:"));
        // Et les rôles insérés sont exactement [ROLE_USER]
        assert!(log.contains("ROLE_USER"));
        assert!(!log.contains("ROLE_VENDEUR"));
    }
}
