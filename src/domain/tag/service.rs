use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::dto::{CreateTagRequest, TagResponse, UpdateTagRequest};
use super::entity::tag;
use crate::domain::prompt::entity::prompt_tag;
use crate::state::AppState;
use crate::utils::error::{map_unique_violation, AppError};

pub struct TagService;

impl TagService {
    /// 사용자 태그 목록 (이름순, 프롬프트 수 포함)
    pub async fn list_tags(state: AppState, user_id: Uuid) -> Result<Vec<TagResponse>, AppError> {
        let tags = tag::Entity::find()
            .filter(tag::Column::UserId.eq(user_id))
            .order_by_asc(tag::Column::Name)
            .all(&state.db)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let links = prompt_tag::Entity::find()
            .filter(prompt_tag::Column::TagId.is_in(tags.iter().map(|t| t.id)))
            .all(&state.db)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for link in links {
            *counts.entry(link.tag_id).or_insert(0) += 1;
        }

        Ok(tags
            .into_iter()
            .map(|model| {
                let count = counts.get(&model.id).copied().unwrap_or(0);
                TagResponse::from_model(model, count)
            })
            .collect())
    }

    /// 태그 생성
    pub async fn create_tag(
        state: AppState,
        user_id: Uuid,
        req: CreateTagRequest,
    ) -> Result<TagResponse, AppError> {
        let name = normalize_name(&req.name)?;
        Self::ensure_name_available(&state.db, user_id, &name, None).await?;

        let conflict = AppError::TagAlreadyExists(format!("이미 존재하는 태그입니다: {}", name));
        let created = tag::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(name),
            created_at: Set(Utc::now()),
        }
        .insert(&state.db)
        .await
        .map_err(|e| map_unique_violation(e, conflict))?;

        info!(tag_id = %created.id, "Tag created");
        Ok(TagResponse::from_model(created, 0))
    }

    /// 태그 이름 변경
    pub async fn update_tag(
        state: AppState,
        user_id: Uuid,
        tag_id: Uuid,
        req: UpdateTagRequest,
    ) -> Result<TagResponse, AppError> {
        let existing = Self::find_owned_tag(&state.db, user_id, tag_id).await?;
        let name = normalize_name(&req.name)?;
        Self::ensure_name_available(&state.db, user_id, &name, Some(tag_id)).await?;

        let conflict = AppError::TagAlreadyExists(format!("이미 존재하는 태그입니다: {}", name));
        let mut active: tag::ActiveModel = existing.into();
        active.name = Set(name);
        let updated = active
            .update(&state.db)
            .await
            .map_err(|e| map_unique_violation(e, conflict))?;

        let prompt_count = prompt_tag::Entity::find()
            .filter(prompt_tag::Column::TagId.eq(tag_id))
            .count(&state.db)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        Ok(TagResponse::from_model(updated, prompt_count))
    }

    /// 태그 삭제 (프롬프트 연결 포함)
    pub async fn delete_tag(state: AppState, user_id: Uuid, tag_id: Uuid) -> Result<(), AppError> {
        Self::find_owned_tag(&state.db, user_id, tag_id).await?;

        let txn = state
            .db
            .begin()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        prompt_tag::Entity::delete_many()
            .filter(prompt_tag::Column::TagId.eq(tag_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        tag::Entity::delete_by_id(tag_id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        info!(tag_id = %tag_id, "Tag deleted");
        Ok(())
    }

    pub(crate) async fn find_owned_tag<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
        tag_id: Uuid,
    ) -> Result<tag::Model, AppError> {
        tag::Entity::find_by_id(tag_id)
            .filter(tag::Column::UserId.eq(user_id))
            .one(db)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?
            .ok_or_else(|| AppError::TagNotFound("존재하지 않는 태그입니다.".to_string()))
    }

    /// 대소문자를 구분하지 않고 같은 이름의 태그가 있는지 확인합니다.
    async fn ensure_name_available<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        let mut query = tag::Entity::find()
            .filter(tag::Column::UserId.eq(user_id))
            .filter(Expr::expr(Func::lower(Expr::col(tag::Column::Name))).eq(name.to_lowercase()));
        if let Some(id) = exclude_id {
            query = query.filter(tag::Column::Id.ne(id));
        }

        let duplicate = query
            .one(db)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        if duplicate.is_some() {
            return Err(AppError::TagAlreadyExists(format!(
                "이미 존재하는 태그입니다: {}",
                name
            )));
        }
        Ok(())
    }
}

fn normalize_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::validation_error("태그 이름은 비어 있을 수 없습니다."));
    }
    Ok(name.to_string())
}
