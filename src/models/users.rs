use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use crate::security::roles::{self, Role};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)] // Jamais exposé en JSON
    pub password: String, // Format: pbkdf2:sha256:iterations$salt$hash
    pub roles: String, // Encodage canonique: "ROLE_USER,ROLE_VENDEUR"
    pub user_nom: String,
    pub user_prenom: String,
    pub tel: String,
}

impl Model {
    /// Décode la colonne `roles` vers l'ensemble fermé de rôles
    pub fn role_set(&self) -> Vec<Role> {
        roles::parse_roles(&self.roles)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role_set().contains(&role)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::vendeur::Entity")]
    Vendeur,

    #[sea_orm(has_many = "super::achat::Entity")]
    Achat,
}

impl Related<super::vendeur::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendeur.def()
    }
}

impl Related<super::achat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Achat.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
