use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

/// État (condition) d'un livre: "Neuf", "Très bon état", "Usagé", etc.
/// Un état référencé par au moins un livre ne peut pas être supprimé
/// (un Book a toujours exactement un Etat).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "etat")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub etat: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::book::Entity")]
    Book,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
