//! Ensemble fermé de rôles.
//!
//! Les rôles sont stockés en base dans une colonne texte avec un encodage
//! canonique ("ROLE_USER,ROLE_VENDEUR"), dédupliqué et sans ordre
//! significatif. Les tags inconnus sont ignorés au décodage.

use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Vendeur,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Vendeur => "ROLE_VENDEUR",
            Role::Admin => "ROLE_ADMIN",
        }
    }

    pub fn from_str(tag: &str) -> Option<Role> {
        match tag {
            "ROLE_USER" => Some(Role::User),
            "ROLE_VENDEUR" => Some(Role::Vendeur),
            "ROLE_ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Décode "ROLE_USER,ROLE_VENDEUR" en liste de rôles (dédupliquée)
pub fn parse_roles(encoded: &str) -> Vec<Role> {
    let mut roles = Vec::new();
    for tag in encoded.split(',') {
        if let Some(role) = Role::from_str(tag.trim()) {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
    }
    roles
}

/// Encode une liste de rôles vers la forme canonique stockée en base
pub fn encode_roles(roles: &[Role]) -> String {
    let mut uniques: Vec<Role> = Vec::new();
    for role in roles {
        if !uniques.contains(role) {
            uniques.push(*role);
        }
    }
    uniques
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Ajoute un rôle à un encodage existant (sans doublon, ROLE_USER conservé)
pub fn promote(encoded: &str, role: Role) -> String {
    let mut roles = parse_roles(encoded);
    if !roles.contains(&Role::User) {
        roles.push(Role::User);
    }
    if !roles.contains(&role) {
        roles.push(role);
    }
    encode_roles(&roles)
}

/// Retire un rôle d'un encodage existant (ROLE_USER reste toujours présent)
pub fn demote(encoded: &str, role: Role) -> String {
    let mut roles = parse_roles(encoded);
    roles.retain(|r| *r != role);
    if !roles.contains(&Role::User) {
        roles.push(Role::User);
    }
    encode_roles(&roles)
}
