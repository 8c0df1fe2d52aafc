//! Prédicats d'autorisation (policy engine).
//!
//! Des fonctions pures: (acteur, ressource) -> bool, sans effet de bord.
//! L'acteur est toujours passé explicitement (jamais lu depuis un état
//! global) et `None` représente une requête anonyme. Une liaison manquante
//! (livre sans vendeur chargé) est un refus, jamais une erreur.

use crate::models::{users, vendeur};
use crate::security::roles::Role;

/// Un utilisateur peut-il modifier un livre ?
/// `book_owner` est le profil vendeur propriétaire du livre (s'il existe).
pub fn can_edit_book(actor: Option<&users::Model>, book_owner: Option<&vendeur::Model>) -> bool {
    is_book_owner(actor, book_owner)
}

/// Un utilisateur peut-il supprimer un livre ? Même règle que l'édition.
pub fn can_delete_book(actor: Option<&users::Model>, book_owner: Option<&vendeur::Model>) -> bool {
    is_book_owner(actor, book_owner)
}

fn is_book_owner(actor: Option<&users::Model>, book_owner: Option<&vendeur::Model>) -> bool {
    // Anonyme: refus
    let Some(user) = actor else {
        return false;
    };

    // Sans le rôle vendeur: refus
    if !user.has_role(Role::Vendeur) {
        return false;
    }

    // Livre orphelin (pas de vendeur): refus, pas une erreur
    let Some(owner) = book_owner else {
        return false;
    };

    owner.user_id == user.id
}

/// Un utilisateur ne peut voir que son propre compte
pub fn can_view_user(actor: Option<&users::Model>, subject: &users::Model) -> bool {
    is_self(actor, subject)
}

/// Un utilisateur ne peut modifier que son propre compte
pub fn can_edit_user(actor: Option<&users::Model>, subject: &users::Model) -> bool {
    is_self(actor, subject)
}

/// Un utilisateur ne peut supprimer que son propre compte
pub fn can_delete_user(actor: Option<&users::Model>, subject: &users::Model) -> bool {
    is_self(actor, subject)
}

fn is_self(actor: Option<&users::Model>, subject: &users::Model) -> bool {
    // Pas de passe-droit admin: décision explicite, voir DESIGN.md
    match actor {
        Some(user) => user.id == subject.id,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::roles;

    fn user(id: i32, roles: &[Role]) -> users::Model {
        users::Model {
            id,
            email: format!("user{}@example.com", id),
            password: "pbkdf2:sha256:600000$x$y".to_string(),
            roles: roles::encode_roles(roles),
            user_nom: "Nom".to_string(),
            user_prenom: "Prenom".to_string(),
            tel: "0606060606".to_string(),
        }
    }

    fn vendeur(id: i32, user_id: i32) -> vendeur::Model {
        vendeur::Model {
            id,
            nom_entreprise: "Bouquinerie Test".to_string(),
            adresse_entreprise: "1 rue des Livres".to_string(),
            user_id,
        }
    }

    // Le propriétaire du livre (avec rôle vendeur) peut le modifier
    #[test]
    fn test_edit_book_proprietaire() {
        let actor = user(1, &[Role::User, Role::Vendeur]);
        let owner = vendeur(10, 1);

        assert!(can_edit_book(Some(&actor), Some(&owner)));
        assert!(can_delete_book(Some(&actor), Some(&owner)));
    }

    #[test]
    fn test_edit_book_anonyme_refuse() {
        let owner = vendeur(10, 1);

        assert!(!can_edit_book(None, Some(&owner)));
        assert!(!can_delete_book(None, Some(&owner)));
    }

    // Authentifié mais pas propriétaire: refus
    #[test]
    fn test_edit_book_autre_vendeur_refuse() {
        let actor = user(2, &[Role::User, Role::Vendeur]);
        let owner = vendeur(10, 1); // appartient à l'utilisateur 1

        assert!(!can_edit_book(Some(&actor), Some(&owner)));
        assert!(!can_delete_book(Some(&actor), Some(&owner)));
    }

    // Propriétaire en base mais sans le rôle vendeur: refus
    #[test]
    fn test_edit_book_sans_role_vendeur_refuse() {
        let actor = user(1, &[Role::User]);
        let owner = vendeur(10, 1);

        assert!(!can_edit_book(Some(&actor), Some(&owner)));
    }

    // Livre sans vendeur: refus et non pas panique
    #[test]
    fn test_edit_book_sans_vendeur_refuse() {
        let actor = user(1, &[Role::User, Role::Vendeur]);

        assert!(!can_edit_book(Some(&actor), None));
        assert!(!can_delete_book(Some(&actor), None));
    }

    #[test]
    fn test_user_predicats_soi_meme() {
        let actor = user(1, &[Role::User]);
        let subject = user(1, &[Role::User]);

        assert!(can_view_user(Some(&actor), &subject));
        assert!(can_edit_user(Some(&actor), &subject));
        assert!(can_delete_user(Some(&actor), &subject));
    }

    #[test]
    fn test_user_predicats_autre_compte_refuse() {
        let actor = user(1, &[Role::User]);
        let subject = user(2, &[Role::User]);

        assert!(!can_view_user(Some(&actor), &subject));
        assert!(!can_edit_user(Some(&actor), &subject));
        assert!(!can_delete_user(Some(&actor), &subject));
    }

    #[test]
    fn test_user_predicats_anonyme_refuse() {
        let subject = user(1, &[Role::User]);

        assert!(!can_view_user(None, &subject));
        assert!(!can_edit_user(None, &subject));
        assert!(!can_delete_user(None, &subject));
    }

    // L'admin n'a PAS de passe-droit sur les comptes des autres
    #[test]
    fn test_admin_sans_passe_droit() {
        let admin = user(1, &[Role::User, Role::Admin]);
        let subject = user(2, &[Role::User]);

        assert!(!can_view_user(Some(&admin), &subject));
        assert!(!can_edit_user(Some(&admin), &subject));
        assert!(!can_delete_user(Some(&admin), &subject));
    }
}
