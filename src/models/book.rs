use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "book")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub author: String,
    // Prix en centimes (unité mineure). Le backend ne divise JAMAIS par 100,
    // le formatage est la responsabilité du client.
    pub prix: i64,
    // URL ou image encodée en data-URI (base64 côté client)
    pub image: String,
    pub description_courte: String,
    pub description_longue: String,
    pub vendeur_id: i32,
    pub etat_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendeur::Entity",
        from = "Column::VendeurId",
        to = "super::vendeur::Column::Id"
    )]
    Vendeur,

    #[sea_orm(
        belongs_to = "super::etat::Entity",
        from = "Column::EtatId",
        to = "super::etat::Column::Id"
    )]
    Etat,

    #[sea_orm(has_many = "super::achat::Entity")]
    Achat,
}

impl Related<super::vendeur::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendeur.def()
    }
}

impl Related<super::etat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Etat.def()
    }
}

impl Related<super::achat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Achat.def()
    }
}

// Many-to-many Book <-> Category via la table de jointure book_category
impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::book_category::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::book_category::Relation::Book.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
