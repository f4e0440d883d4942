use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub nik: String,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,

    // Closed enumerations at the boundary; stored as their wire strings
    pub role: String,
    pub status: String,

    // Profile attributes
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,

    // Opaque master-data reference, never validated here
    pub department_id: Option<String>,

    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::refresh_token::Entity")]
    RefreshToken,
}

impl Related<super::refresh_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RefreshToken.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
