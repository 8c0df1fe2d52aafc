// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - users : Utilisateurs (identité racine, email unique, rôles)
//   - vendeur : Profil vendeur (extension 1-1 d'un utilisateur)
//   - book : Livres en vente (prix en centimes, propriété d'un vendeur)
//   - category : Catégories de livres (many-to-many avec book)
//   - book_category : Table de jointure book <-> category
//   - etat : État/condition d'un livre (Neuf, Usagé, ...)
//   - achat : Transactions d'achat (immuables après création)
//   - dto : Data Transfer Objects pour les réponses API
//
// Points d'attention:
//   - Tous les modèles utilisent SeaORM (pas de SQL brut)
//   - Les relations entre tables sont définies dans chaque modèle
//   - Les prix sont des entiers en unité mineure (centimes), jamais divisés
//     côté backend
//
// ============================================================================

pub mod users;
pub mod vendeur;
pub mod book;
pub mod category;
pub mod book_category;
pub mod etat;
pub mod achat;
pub mod dto;
