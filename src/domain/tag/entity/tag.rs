use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::domain::prompt::entity::prompt_tag::Entity")]
    PromptTag,
}

impl Related<crate::domain::prompt::entity::prompt_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PromptTag.def()
    }
}

impl Related<crate::domain::prompt::entity::prompt::Entity> for Entity {
    fn to() -> RelationDef {
        crate::domain::prompt::entity::prompt_tag::Relation::Prompt.def()
    }

    fn via() -> Option<RelationDef> {
        Some(crate::domain::prompt::entity::prompt_tag::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
