use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

/// Achat: enregistrement immuable d'une transaction.
/// Acheteur, vendeur et livre sont fixés à la création et jamais modifiés.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "achat")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub achat_at: DateTimeUtc,
    pub acheteur_id: i32,
    pub vendeur_id: i32,
    pub livre_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AcheteurId",
        to = "super::users::Column::Id"
    )]
    Acheteur,

    #[sea_orm(
        belongs_to = "super::vendeur::Entity",
        from = "Column::VendeurId",
        to = "super::vendeur::Column::Id"
    )]
    Vendeur,

    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::LivreId",
        to = "super::book::Column::Id"
    )]
    Livre,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Acheteur.def()
    }
}

impl Related<super::vendeur::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendeur.def()
    }
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Livre.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
