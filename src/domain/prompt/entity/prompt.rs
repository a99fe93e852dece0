use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use crate::domain::prompt::template::Parameter;

/// JSON 컬럼에 저장되는 파라미터 정의 목록
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ParameterList(pub Vec<Parameter>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "prompts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Json")]
    pub parameters: ParameterList,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::prompt_tag::Entity")]
    PromptTag,
}

impl Related<super::prompt_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PromptTag.def()
    }
}

impl Related<crate::domain::tag::entity::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::prompt_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::prompt_tag::Relation::Prompt.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
