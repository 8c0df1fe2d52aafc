use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendeur")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nom_entreprise: String,
    pub adresse_entreprise: String,
    #[sea_orm(unique)] // Un seul profil vendeur par utilisateur
    pub user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,

    #[sea_orm(has_many = "super::book::Entity")]
    Book,

    #[sea_orm(has_many = "super::achat::Entity")]
    Achat,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl Related<super::achat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Achat.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
