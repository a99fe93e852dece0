use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::info;
use uuid::Uuid;

use super::dto::{PromptTagRequest, PromptTagResponse};
use crate::domain::prompt::entity::{prompt, prompt_tag};
use crate::domain::prompt::service::PromptService;
use crate::domain::tag::entity::tag;
use crate::state::AppState;
use crate::utils::error::{map_unique_violation, AppError};

pub struct PromptTagService;

impl PromptTagService {
    /// 프롬프트에 태그 연결
    pub async fn assign_tag(
        state: AppState,
        user_id: Uuid,
        req: PromptTagRequest,
    ) -> Result<PromptTagResponse, AppError> {
        let (prompt_model, tag_model) = Self::find_pair(&state, user_id, &req).await?;

        let existing = prompt_tag::Entity::find_by_id((req.prompt_id, req.tag_id))
            .one(&state.db)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;
        if existing.is_some() {
            return Err(AppError::DuplicateAssociation);
        }

        prompt_tag::ActiveModel {
            prompt_id: Set(req.prompt_id),
            tag_id: Set(req.tag_id),
            created_at: Set(Utc::now()),
        }
        .insert(&state.db)
        .await
        .map_err(|e| map_unique_violation(e, AppError::DuplicateAssociation))?;

        info!(prompt_id = %req.prompt_id, tag_id = %req.tag_id, "Tag assigned to prompt");

        Ok(PromptTagResponse {
            prompt_id: prompt_model.id,
            tag_id: tag_model.id,
            prompt_name: prompt_model.name,
            tag_name: tag_model.name,
        })
    }

    /// 프롬프트에서 태그 연결 해제
    pub async fn remove_tag(
        state: AppState,
        user_id: Uuid,
        req: PromptTagRequest,
    ) -> Result<(), AppError> {
        Self::find_pair(&state, user_id, &req).await?;

        let result = prompt_tag::Entity::delete_many()
            .filter(prompt_tag::Column::PromptId.eq(req.prompt_id))
            .filter(prompt_tag::Column::TagId.eq(req.tag_id))
            .exec(&state.db)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::AssociationNotFound);
        }

        info!(prompt_id = %req.prompt_id, tag_id = %req.tag_id, "Tag removed from prompt");
        Ok(())
    }

    /// 프롬프트는 요청자 소유여야 하고, 태그는 프롬프트와 같은 소유자여야 합니다.
    async fn find_pair(
        state: &AppState,
        user_id: Uuid,
        req: &PromptTagRequest,
    ) -> Result<(prompt::Model, tag::Model), AppError> {
        let prompt_model = PromptService::find_owned_prompt(&state.db, user_id, req.prompt_id).await?;

        let tag_model = tag::Entity::find_by_id(req.tag_id)
            .one(&state.db)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?
            .ok_or_else(|| AppError::TagNotFound("존재하지 않는 태그입니다.".to_string()))?;

        if tag_model.user_id != prompt_model.user_id {
            return Err(AppError::UnauthorizedAssociation);
        }

        Ok((prompt_model, tag_model))
    }
}
