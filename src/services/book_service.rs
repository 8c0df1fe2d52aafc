use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, Set, TransactionTrait,
};

use crate::models::achat::{Column as AchatColumn, Entity as Achat};
use crate::models::book::{self, Column as BookColumn, Entity as Book};
use crate::models::book_category::{self, Column as BookCategoryColumn, Entity as BookCategory};
use crate::models::category::{Column as CategoryColumn, Entity as Category};
use crate::models::dto::{BookDetailDto, CreateBookRequest, UpdateBookRequest};
use crate::models::etat::Entity as Etat;
use crate::models::users::Entity as Users;
use crate::models::vendeur::{self, Entity as Vendeur};
use crate::security::voter;
use crate::services::ServiceError;
use crate::services::vendeur_service::VendeurService;

pub struct BookService;

impl BookService {
    /// Liste publique de tous les livres
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<book::Model>, ServiceError> {
        Ok(Book::find().all(db).await?)
    }

    /// Détail public d'un livre, état et catégories développés
    pub async fn detail(
        db: &DatabaseConnection,
        book_id: i32,
    ) -> Result<BookDetailDto, ServiceError> {
        let book = Book::find_by_id(book_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Livre introuvable".to_string()))?;

        let etat = book.find_related(Etat).one(db).await?;
        let categories = book.find_related(Category).all(db).await?;

        Ok(BookDetailDto {
            book,
            etat,
            categories,
        })
    }

    /// Vitrine publique: les livres d'un vendeur donné
    pub async fn by_vendeur(
        db: &DatabaseConnection,
        vendeur_id: i32,
    ) -> Result<Vec<book::Model>, ServiceError> {
        // Vérifier que le vendeur existe pour distinguer 404 de liste vide
        VendeurService::find_by_id(db, vendeur_id).await?;

        Ok(Book::find()
            .filter(BookColumn::VendeurId.eq(vendeur_id))
            .all(db)
            .await?)
    }

    /// Vue de gestion: les livres du profil vendeur de l'acteur
    pub async fn mes_livres(
        db: &DatabaseConnection,
        actor_id: i32,
    ) -> Result<Vec<book::Model>, ServiceError> {
        let profil = VendeurService::find_by_user(db, actor_id).await?;

        Ok(Book::find()
            .filter(BookColumn::VendeurId.eq(profil.id))
            .all(db)
            .await?)
    }

    /// Création d'un livre: le vendeur est TOUJOURS le profil de l'acteur,
    /// toute référence vendeur fournie par le client est ignorée.
    pub async fn create(
        db: &DatabaseConnection,
        actor_id: i32,
        request: CreateBookRequest,
    ) -> Result<book::Model, ServiceError> {
        // 1. L'acteur doit avoir un profil vendeur (précondition, 404 sinon)
        let profil = VendeurService::find_by_user(db, actor_id).await?;

        // 2. L'état doit exister (un livre a toujours exactement un état)
        Self::check_etat(db, request.etat_id).await?;

        // 3. Les catégories doivent exister (doublons du payload écartés)
        let category_ids = dedup_ids(&request.category_ids);
        Self::check_categories(db, &category_ids).await?;

        // 4. Insérer puis lier les catégories dans la même transaction,
        // vendeur forcé au profil de l'acteur
        let txn = db.begin().await?;
        let book = Self::build_book(request, &profil).insert(&txn).await?;
        Self::link_categories(&txn, book.id, &category_ids).await?;
        txn.commit().await?;

        Ok(book)
    }

    /// Construit l'ActiveModel d'un livre neuf. Le `vendeur_id` du payload
    /// est délibérément écarté au profit du profil passé en paramètre.
    fn build_book(request: CreateBookRequest, profil: &vendeur::Model) -> book::ActiveModel {
        book::ActiveModel {
            title: Set(request.title),
            author: Set(request.author),
            prix: Set(request.prix),
            image: Set(request.image),
            description_courte: Set(request.description_courte),
            description_longue: Set(request.description_longue),
            etat_id: Set(request.etat_id),
            vendeur_id: Set(profil.id),
            ..Default::default()
        }
    }

    /// Modification d'un livre (propriétaire uniquement, via le voter)
    pub async fn update(
        db: &DatabaseConnection,
        actor_id: i32,
        book_id: i32,
        request: UpdateBookRequest,
    ) -> Result<book::Model, ServiceError> {
        let book = Book::find_by_id(book_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Livre introuvable".to_string()))?;

        Self::check_ownership(db, actor_id, &book, "modifier").await?;

        if let Some(etat_id) = request.etat_id {
            Self::check_etat(db, etat_id).await?;
        }
        let category_ids = request.category_ids.as_deref().map(dedup_ids);
        if let Some(ref category_ids) = category_ids {
            Self::check_categories(db, category_ids).await?;
        }

        let book_id = book.id;
        let mut active: book::ActiveModel = book.into();

        if let Some(title) = request.title {
            active.title = Set(title);
        }
        if let Some(author) = request.author {
            active.author = Set(author);
        }
        if let Some(prix) = request.prix {
            active.prix = Set(prix);
        }
        if let Some(image) = request.image {
            active.image = Set(image);
        }
        if let Some(courte) = request.description_courte {
            active.description_courte = Set(courte);
        }
        if let Some(longue) = request.description_longue {
            active.description_longue = Set(longue);
        }
        if let Some(etat_id) = request.etat_id {
            active.etat_id = Set(etat_id);
        }

        // Mise à jour et remplacement éventuel des catégories dans la même
        // transaction
        let txn = db.begin().await?;

        let updated = active.update(&txn).await?;

        if let Some(category_ids) = category_ids {
            BookCategory::delete_many()
                .filter(BookCategoryColumn::BookId.eq(book_id))
                .exec(&txn)
                .await?;
            Self::link_categories(&txn, book_id, &category_ids).await?;
        }

        txn.commit().await?;

        Ok(updated)
    }

    /// Suppression d'un livre (propriétaire uniquement).
    /// Les liens de catégories sont détachés; un livre référencé par un
    /// historique d'achats ne peut pas être supprimé.
    pub async fn delete(
        db: &DatabaseConnection,
        actor_id: i32,
        book_id: i32,
    ) -> Result<(), ServiceError> {
        let book = Book::find_by_id(book_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Livre introuvable".to_string()))?;

        Self::check_ownership(db, actor_id, &book, "supprimer").await?;

        let achats = Achat::find()
            .filter(AchatColumn::LivreId.eq(book.id))
            .count(db)
            .await?;
        if achats > 0 {
            return Err(ServiceError::Conflict(
                "Livre référencé par un historique d'achats, suppression refusée".to_string(),
            ));
        }

        // Détacher les catégories et supprimer le livre atomiquement
        let txn = db.begin().await?;
        BookCategory::delete_many()
            .filter(BookCategoryColumn::BookId.eq(book.id))
            .exec(&txn)
            .await?;
        book.delete(&txn).await?;
        txn.commit().await?;

        Ok(())
    }

    /// Charge l'acteur et le vendeur propriétaire puis interroge le voter.
    /// Un acteur absent de la base ou un livre sans vendeur sont des refus.
    async fn check_ownership(
        db: &DatabaseConnection,
        actor_id: i32,
        book: &book::Model,
        action: &str,
    ) -> Result<(), ServiceError> {
        let actor = Users::find_by_id(actor_id).one(db).await?;
        let owner = Vendeur::find_by_id(book.vendeur_id).one(db).await?;

        if !voter::can_edit_book(actor.as_ref(), owner.as_ref()) {
            return Err(ServiceError::AccessDenied(format!(
                "Vous ne pouvez {} que vos propres livres",
                action
            )));
        }
        Ok(())
    }

    async fn check_etat(db: &DatabaseConnection, etat_id: i32) -> Result<(), ServiceError> {
        Etat::find_by_id(etat_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::Validation("État inconnu".to_string()))?;
        Ok(())
    }

    async fn check_categories(
        db: &DatabaseConnection,
        category_ids: &[i32],
    ) -> Result<(), ServiceError> {
        if category_ids.is_empty() {
            return Ok(());
        }
        let found = Category::find()
            .filter(CategoryColumn::Id.is_in(category_ids.to_vec()))
            .count(db)
            .await?;
        if found as usize != category_ids.len() {
            return Err(ServiceError::Validation(
                "Une ou plusieurs catégories sont inconnues".to_string(),
            ));
        }
        Ok(())
    }

    async fn link_categories<C: ConnectionTrait>(
        db: &C,
        book_id: i32,
        category_ids: &[i32],
    ) -> Result<(), ServiceError> {
        for category_id in category_ids {
            let link = book_category::ActiveModel {
                book_id: Set(book_id),
                category_id: Set(*category_id),
            };
            BookCategory::insert(link).exec(db).await?;
        }
        Ok(())
    }
}

/// Écarte les doublons en conservant l'ordre d'apparition. Un payload avec
/// deux fois la même catégorie reste valide et ne produit qu'un seul lien.
fn dedup_ids(ids: &[i32]) -> Vec<i32> {
    let mut uniques = Vec::new();
    for id in ids {
        if !uniques.contains(id) {
            uniques.push(*id);
        }
    }
    uniques
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{etat, users};
    use sea_orm::{ActiveValue, DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;

    fn stored_vendeur(id: i32, user_id: i32) -> vendeur::Model {
        vendeur::Model {
            id,
            nom_entreprise: "Bouquinerie Test".to_string(),
            adresse_entreprise: "1 rue des Livres".to_string(),
            user_id,
        }
    }

    fn stored_user(id: i32, roles: &str) -> users::Model {
        users::Model {
            id,
            email: format!("user{}@example.com", id),
            password: "pbkdf2:sha256:600000$c2VsDg$aGFzaA".to_string(),
            roles: roles.to_string(),
            user_nom: "Nom".to_string(),
            user_prenom: "Prenom".to_string(),
            tel: "0606060606".to_string(),
        }
    }

    fn stored_book(id: i32, vendeur_id: i32) -> book::Model {
        book::Model {
            id,
            title: "Germinal".to_string(),
            author: "Émile Zola".to_string(),
            prix: 1250,
            image: "https://example.com/germinal.jpg".to_string(),
            description_courte: "Courte".to_string(),
            description_longue: "Longue".to_string(),
            vendeur_id,
            etat_id: 1,
        }
    }

    // Propriété: le vendeur du livre est celui de l'acteur, même si le
    // payload en désigne un autre
    #[test]
    fn test_build_book_force_le_vendeur() {
        let profil = stored_vendeur(10, 1);
        let request = CreateBookRequest {
            title: "Germinal".to_string(),
            author: "Émile Zola".to_string(),
            prix: 1250,
            image: "https://example.com/germinal.jpg".to_string(),
            description_courte: "Courte".to_string(),
            description_longue: "Longue".to_string(),
            etat_id: 1,
            category_ids: vec![],
            vendeur_id: Some(99), // référence client, à ignorer
        };

        let active = BookService::build_book(request, &profil);

        assert_eq!(active.vendeur_id, ActiveValue::Set(10));
        assert_eq!(active.prix, ActiveValue::Set(1250)); // centimes, intacts
    }

    fn update_title_request(title: &str) -> UpdateBookRequest {
        UpdateBookRequest {
            title: Some(title.to_string()),
            author: None,
            prix: None,
            image: None,
            description_courte: None,
            description_longue: None,
            etat_id: None,
            category_ids: None,
        }
    }

    // Propriété: un utilisateur authentifié qui n'est pas le vendeur
    // propriétaire ne peut pas modifier le livre
    #[tokio::test]
    async fn test_update_refuse_pour_non_proprietaire() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_book(7, 10)]])
            // l'acteur 2 a le rôle vendeur, mais le profil 10 appartient à 1
            .append_query_results([vec![stored_user(2, "ROLE_USER,ROLE_VENDEUR")]])
            .append_query_results([vec![stored_vendeur(10, 1)]])
            .into_connection();

        let result = BookService::update(&db, 2, 7, update_title_request("Nana")).await;

        assert!(matches!(result, Err(ServiceError::AccessDenied(_))));

        // Refusé avant toute écriture
        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("UPDATE"));
    }

    #[tokio::test]
    async fn test_update_accepte_pour_proprietaire() {
        let updated = book::Model {
            title: "Nana".to_string(),
            ..stored_book(7, 10)
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_book(7, 10)]])
            .append_query_results([vec![stored_user(1, "ROLE_USER,ROLE_VENDEUR")]])
            .append_query_results([vec![stored_vendeur(10, 1)]])
            .append_query_results([vec![updated]])
            .into_connection();

        let book = BookService::update(&db, 1, 7, update_title_request("Nana"))
            .await
            .unwrap();

        assert_eq!(book.title, "Nana");
    }

    // Propriété: des catégories dupliquées dans le payload ne sont ni
    // rejetées comme inconnues, ni liées deux fois
    #[tokio::test]
    async fn test_create_categories_dupliquees() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_vendeur(10, 1)]])
            .append_query_results([vec![etat::Model {
                id: 1,
                etat: "Neuf".to_string(),
            }]])
            // une seule catégorie distincte à compter
            .append_query_results([vec![BTreeMap::from([(
                "num_items",
                Value::BigInt(Some(1)),
            )])]])
            .append_query_results([vec![stored_book(7, 10)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let request = CreateBookRequest {
            title: "Germinal".to_string(),
            author: "Émile Zola".to_string(),
            prix: 1250,
            image: "https://example.com/germinal.jpg".to_string(),
            description_courte: "Courte".to_string(),
            description_longue: "Longue".to_string(),
            etat_id: 1,
            category_ids: vec![5, 5],
            vendeur_id: None,
        };

        let book = BookService::create(&db, 1, request).await.unwrap();
        assert_eq!(book.id, 7);

        // Un seul lien book_category inséré malgré le doublon
        let log = format!("{:?}", db.into_transaction_log());
        assert_eq!(log.matches("book_category").count(), 1);
    }

    #[test]
    fn test_dedup_ids_conserve_l_ordre() {
        assert_eq!(dedup_ids(&[5, 3, 5, 3, 8]), vec![5, 3, 8]);
        assert_eq!(dedup_ids(&[]), Vec::<i32>::new());
    }

    #[tokio::test]
    async fn test_detail_livre_inexistant() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<book::Model>::new()])
            .into_connection();

        let result = BookService::detail(&db, 404).await;

        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_by_vendeur_inexistant() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<vendeur::Model>::new()])
            .into_connection();

        let result = BookService::by_vendeur(&db, 404).await;

        // Vendeur inconnu => 404, pas une liste vide
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mes_livres_sans_profil_vendeur() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<vendeur::Model>::new()])
            .into_connection();

        let result = BookService::mes_livres(&db, 1).await;

        // Précondition manquante, distincte d'un refus d'autorisation
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }
}
