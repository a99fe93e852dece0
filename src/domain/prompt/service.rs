use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::dto::{
    CreatePromptRequest, FillPromptRequest, FillPromptResponse, Pagination, PreviewPromptResponse,
    PromptListQuery, PromptListResponse, PromptResponse, PromptSortBy, SortDirection,
    SyncParametersRequest, SyncParametersResponse, UpdatePromptRequest,
};
use super::entity::prompt::{self, ParameterList};
use super::entity::prompt_tag;
use super::template::{
    fill_strict, fill_with_placeholders, sync_parameters, validate_parameter_definitions,
    Parameter,
};
use crate::domain::tag::dto::TagSummary;
use crate::domain::tag::entity::tag;
use crate::state::AppState;
use crate::utils::error::{map_unique_violation, AppError};

pub struct PromptService;

impl PromptService {
    /// 프롬프트 생성
    pub async fn create_prompt(
        state: AppState,
        user_id: Uuid,
        req: CreatePromptRequest,
    ) -> Result<PromptResponse, AppError> {
        // 1. 파라미터 정의 검증
        let parameters = Self::prepare_parameters(&req.content, req.parameters)?;

        // 2. 이름 중복 확인
        Self::ensure_name_available(&state.db, user_id, &req.name, None).await?;

        // 3. 태그 소유 확인
        let tag_ids = dedupe_ids(req.tags.unwrap_or_default());
        let tags = Self::find_owned_tags(&state.db, user_id, &tag_ids).await?;

        // 4. 프롬프트와 태그 연결을 한 트랜잭션으로 저장
        let txn = state
            .db
            .begin()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let now = Utc::now();
        let prompt_model = prompt::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(req.name),
            description: Set(normalize_description(req.description)),
            content: Set(req.content),
            parameters: Set(ParameterList(parameters)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| map_unique_violation(e, AppError::PromptNameConflict))?;

        Self::insert_tag_links(&txn, prompt_model.id, &tag_ids, now).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        info!(prompt_id = %prompt_model.id, tag_count = tags.len(), "Prompt created");

        let tags = tags.into_iter().map(TagSummary::from).collect();
        Ok(PromptResponse::from_model(prompt_model, tags))
    }

    /// 프롬프트 목록 조회 (검색, 태그 필터, 정렬, 페이지네이션)
    pub async fn list_prompts(
        state: AppState,
        user_id: Uuid,
        query: PromptListQuery,
    ) -> Result<PromptListResponse, AppError> {
        let tag_ids = query.tag_ids()?;
        let page = query.page();
        let page_size = query.page_size();

        let mut select = prompt::Entity::find().filter(prompt::Column::UserId.eq(user_id));

        if let Some(term) = query.search_term() {
            let pattern = format!("%{}%", term.to_lowercase());
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(prompt::Column::Name))).like(pattern),
            );
        }

        if !tag_ids.is_empty() {
            let prompt_ids = Self::find_prompt_ids_with_all_tags(&state.db, &tag_ids).await?;
            if prompt_ids.is_empty() {
                return Ok(PromptListResponse {
                    data: Vec::new(),
                    pagination: Pagination::new(0, page, page_size),
                });
            }
            select = select.filter(prompt::Column::Id.is_in(prompt_ids));
        }

        let sort_column = match query.sort_by.unwrap_or_default() {
            PromptSortBy::Name => prompt::Column::Name,
            PromptSortBy::CreatedAt => prompt::Column::CreatedAt,
            PromptSortBy::UpdatedAt => prompt::Column::UpdatedAt,
        };
        let order = match query.sort_dir.unwrap_or_default() {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };

        let paginator = select
            .order_by(sort_column, order.clone())
            .order_by(prompt::Column::Id, order)
            .paginate(&state.db, page_size);

        let total_items = paginator
            .num_items()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;
        let models = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let prompt_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut tags_by_prompt = Self::find_tags_by_prompt(&state.db, &prompt_ids).await?;

        let data = models
            .into_iter()
            .map(|model| {
                let tags = tags_by_prompt.remove(&model.id).unwrap_or_default();
                PromptResponse::from_model(model, tags)
            })
            .collect();

        Ok(PromptListResponse {
            data,
            pagination: Pagination::new(total_items, page, page_size),
        })
    }

    /// 프롬프트 단건 조회
    pub async fn get_prompt(
        state: AppState,
        user_id: Uuid,
        prompt_id: Uuid,
    ) -> Result<PromptResponse, AppError> {
        let prompt_model = Self::find_owned_prompt(&state.db, user_id, prompt_id).await?;
        let tags = Self::find_tags_by_prompt(&state.db, &[prompt_id])
            .await?
            .remove(&prompt_id)
            .unwrap_or_default();

        Ok(PromptResponse::from_model(prompt_model, tags))
    }

    /// 프롬프트 수정
    ///
    /// `tags`가 주어진 경우에만 태그 연결을 교체합니다.
    pub async fn update_prompt(
        state: AppState,
        user_id: Uuid,
        prompt_id: Uuid,
        req: UpdatePromptRequest,
    ) -> Result<PromptResponse, AppError> {
        let existing = Self::find_owned_prompt(&state.db, user_id, prompt_id).await?;

        let parameters = Self::prepare_parameters(&req.content, req.parameters)?;
        Self::ensure_name_available(&state.db, user_id, &req.name, Some(prompt_id)).await?;

        let replacement = match req.tags {
            Some(ids) => {
                let ids = dedupe_ids(ids);
                let tags = Self::find_owned_tags(&state.db, user_id, &ids).await?;
                Some((ids, tags))
            }
            None => None,
        };

        let txn = state
            .db
            .begin()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let now = Utc::now();
        let mut active: prompt::ActiveModel = existing.into();
        active.name = Set(req.name);
        active.description = Set(normalize_description(req.description));
        active.content = Set(req.content);
        active.parameters = Set(ParameterList(parameters));
        active.updated_at = Set(now);

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| map_unique_violation(e, AppError::PromptNameConflict))?;

        if let Some((ids, _)) = &replacement {
            prompt_tag::Entity::delete_many()
                .filter(prompt_tag::Column::PromptId.eq(prompt_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::InternalError(e.to_string()))?;
            Self::insert_tag_links(&txn, prompt_id, ids, now).await?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let tags = match replacement {
            Some((_, tags)) => tags.into_iter().map(TagSummary::from).collect(),
            None => Self::find_tags_by_prompt(&state.db, &[prompt_id])
                .await?
                .remove(&prompt_id)
                .unwrap_or_default(),
        };

        info!(prompt_id = %prompt_id, "Prompt updated");
        Ok(PromptResponse::from_model(updated, tags))
    }

    /// 프롬프트 삭제 (태그 연결 포함)
    pub async fn delete_prompt(
        state: AppState,
        user_id: Uuid,
        prompt_id: Uuid,
    ) -> Result<(), AppError> {
        Self::find_owned_prompt(&state.db, user_id, prompt_id).await?;

        let txn = state
            .db
            .begin()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        prompt_tag::Entity::delete_many()
            .filter(prompt_tag::Column::PromptId.eq(prompt_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        prompt::Entity::delete_by_id(prompt_id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        info!(prompt_id = %prompt_id, "Prompt deleted");
        Ok(())
    }

    /// 저장된 프롬프트에 파라미터 값을 채웁니다. 하나라도 비어 있으면 실패합니다.
    pub async fn fill_prompt(
        state: AppState,
        user_id: Uuid,
        prompt_id: Uuid,
        req: FillPromptRequest,
    ) -> Result<FillPromptResponse, AppError> {
        let prompt_model = Self::find_owned_prompt(&state.db, user_id, prompt_id).await?;
        let content = fill_strict(&prompt_model.content, &req.values)?;

        Ok(FillPromptResponse { content })
    }

    /// 값이 빠진 파라미터를 표시한 미리보기
    pub async fn preview_prompt(
        state: AppState,
        user_id: Uuid,
        prompt_id: Uuid,
        req: FillPromptRequest,
    ) -> Result<PreviewPromptResponse, AppError> {
        let prompt_model = Self::find_owned_prompt(&state.db, user_id, prompt_id).await?;

        Ok(fill_with_placeholders(&prompt_model.content, &req.values).into())
    }

    /// 작성 중인 본문에 맞춰 파라미터 목록을 갱신합니다. DB를 사용하지 않습니다.
    pub fn sync_draft_parameters(req: SyncParametersRequest) -> SyncParametersResponse {
        SyncParametersResponse {
            parameters: sync_parameters(&req.content, &req.parameters),
        }
    }

    /// 저장할 파라미터 정의를 검증하고 본문 기준으로 정리합니다.
    ///
    /// 본문에서 사라진 정의는 제거됩니다.
    pub(crate) fn prepare_parameters(
        content: &str,
        parameters: Option<Vec<Parameter>>,
    ) -> Result<Vec<Parameter>, AppError> {
        if let Some(definitions) = &parameters {
            let mut seen = HashSet::new();
            for param in definitions {
                if param.name.trim().is_empty() {
                    return Err(AppError::validation_error(
                        "파라미터 이름은 비어 있을 수 없습니다.",
                    ));
                }
                if !seen.insert(param.name.as_str()) {
                    return Err(AppError::validation_error(format!(
                        "중복된 파라미터 이름입니다: {}",
                        param.name
                    )));
                }
            }
        }

        validate_parameter_definitions(content, parameters.as_deref())?;

        Ok(sync_parameters(content, &parameters.unwrap_or_default()))
    }

    pub(crate) async fn find_owned_prompt<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
        prompt_id: Uuid,
    ) -> Result<prompt::Model, AppError> {
        prompt::Entity::find_by_id(prompt_id)
            .filter(prompt::Column::UserId.eq(user_id))
            .one(db)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?
            .ok_or_else(|| AppError::PromptNotFound("존재하지 않는 프롬프트입니다.".to_string()))
    }

    async fn ensure_name_available<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        let mut query = prompt::Entity::find()
            .filter(prompt::Column::UserId.eq(user_id))
            .filter(prompt::Column::Name.eq(name));
        if let Some(id) = exclude_id {
            query = query.filter(prompt::Column::Id.ne(id));
        }

        let duplicate = query
            .one(db)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        if duplicate.is_some() {
            return Err(AppError::PromptNameConflict);
        }
        Ok(())
    }

    /// 요청한 태그가 모두 사용자 소유인지 확인하고 이름순으로 반환합니다.
    async fn find_owned_tags<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<Vec<tag::Model>, AppError> {
        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let tags = tag::Entity::find()
            .filter(tag::Column::Id.is_in(tag_ids.iter().copied()))
            .filter(tag::Column::UserId.eq(user_id))
            .order_by_asc(tag::Column::Name)
            .all(db)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        if let Some(missing) = tag_ids
            .iter()
            .find(|id| !tags.iter().any(|tag| tag.id == **id))
        {
            return Err(AppError::TagNotFound(format!(
                "존재하지 않는 태그입니다: {}",
                missing
            )));
        }

        Ok(tags)
    }

    async fn insert_tag_links<C: ConnectionTrait>(
        db: &C,
        prompt_id: Uuid,
        tag_ids: &[Uuid],
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        if tag_ids.is_empty() {
            return Ok(());
        }

        let links = tag_ids.iter().map(|tag_id| prompt_tag::ActiveModel {
            prompt_id: Set(prompt_id),
            tag_id: Set(*tag_id),
            created_at: Set(now),
        });

        prompt_tag::Entity::insert_many(links)
            .exec_without_returning(db)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;
        Ok(())
    }

    /// 주어진 태그가 모두 붙은 프롬프트 ID
    async fn find_prompt_ids_with_all_tags<C: ConnectionTrait>(
        db: &C,
        tag_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, AppError> {
        let links = prompt_tag::Entity::find()
            .filter(prompt_tag::Column::TagId.is_in(tag_ids.iter().copied()))
            .all(db)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let mut matched: HashMap<Uuid, usize> = HashMap::new();
        for link in links {
            *matched.entry(link.prompt_id).or_insert(0) += 1;
        }

        Ok(matched
            .into_iter()
            .filter(|(_, count)| *count == tag_ids.len())
            .map(|(prompt_id, _)| prompt_id)
            .collect())
    }

    async fn find_tags_by_prompt<C: ConnectionTrait>(
        db: &C,
        prompt_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<TagSummary>>, AppError> {
        let mut tags_by_prompt: HashMap<Uuid, Vec<TagSummary>> = HashMap::new();
        if prompt_ids.is_empty() {
            return Ok(tags_by_prompt);
        }

        let rows = prompt_tag::Entity::find()
            .filter(prompt_tag::Column::PromptId.is_in(prompt_ids.iter().copied()))
            .find_also_related(tag::Entity)
            .all(db)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        for (link, tag_model) in rows {
            if let Some(tag_model) = tag_model {
                tags_by_prompt
                    .entry(link.prompt_id)
                    .or_default()
                    .push(TagSummary::from(tag_model));
            }
        }

        for tags in tags_by_prompt.values_mut() {
            tags.sort_by(|a, b| a.name.cmp(&b.name));
        }

        Ok(tags_by_prompt)
    }
}

fn dedupe_ids(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prompt::template::ParameterType;

    #[test]
    fn should_reject_whitespace_only_token_on_save() {
        // Arrange
        let content = "Hi {{   }} there";

        // Act
        let without_definitions = PromptService::prepare_parameters(content, None);
        let with_other_definitions = PromptService::prepare_parameters(
            content,
            Some(vec![Parameter::new("name", ParameterType::ShortText)]),
        );

        // Assert
        assert!(matches!(
            without_definitions,
            Err(AppError::MissingParameterDefinitions(names)) if names == vec![String::new()]
        ));
        assert!(matches!(
            with_other_definitions,
            Err(AppError::UndefinedParameters(names)) if names == vec![String::new()]
        ));
    }

    #[test]
    fn should_reject_content_tokens_without_definitions() {
        // Arrange
        let content = "Hello {{name}}";

        // Act
        let result = PromptService::prepare_parameters(content, None);

        // Assert
        match result {
            Err(AppError::MissingParameterDefinitions(names)) => assert_eq!(names, vec!["name"]),
            other => panic!("expected missing definitions, got {:?}", other),
        }
    }

    #[test]
    fn should_report_undefined_parameters() {
        let params = vec![Parameter::new("name", ParameterType::ShortText)];

        let result = PromptService::prepare_parameters("{{name}} {{order_id}}", Some(params));

        match result {
            Err(AppError::UndefinedParameters(names)) => assert_eq!(names, vec!["order_id"]),
            other => panic!("expected undefined parameters, got {:?}", other),
        }
    }

    #[test]
    fn should_prune_stale_definitions_on_save() {
        let params = vec![
            Parameter::new("stale", ParameterType::LongText),
            Parameter::new("topic", ParameterType::LongText),
        ];

        let saved = PromptService::prepare_parameters("Write about {{topic}}", Some(params)).unwrap();

        assert_eq!(saved, vec![Parameter::new("topic", ParameterType::LongText)]);
    }

    #[test]
    fn should_reject_duplicate_parameter_names() {
        let params = vec![
            Parameter::new("topic", ParameterType::ShortText),
            Parameter::new("topic", ParameterType::LongText),
        ];

        let result = PromptService::prepare_parameters("{{topic}}", Some(params));

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn should_reject_blank_parameter_names() {
        let params = vec![Parameter::new("  ", ParameterType::ShortText)];

        let result = PromptService::prepare_parameters("no tokens", Some(params));

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn should_accept_plain_content_without_parameters() {
        let saved = PromptService::prepare_parameters("plain text", None).unwrap();

        assert!(saved.is_empty());
    }

    #[test]
    fn should_sync_draft_parameters() {
        let req = SyncParametersRequest {
            content: "{{a}} then {{b}}".to_string(),
            parameters: vec![Parameter::new("b", ParameterType::LongText)],
        };

        let res = PromptService::sync_draft_parameters(req);

        assert_eq!(
            res.parameters,
            vec![
                Parameter::new("b", ParameterType::LongText),
                Parameter::new("a", ParameterType::ShortText),
            ]
        );
    }

    #[test]
    fn should_dedupe_ids_keeping_first_occurrence() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert_eq!(dedupe_ids(vec![a, b, a]), vec![a, b]);
    }

    #[test]
    fn should_drop_blank_description() {
        assert_eq!(normalize_description(Some("   ".to_string())), None);
        assert_eq!(
            normalize_description(Some("desc".to_string())),
            Some("desc".to_string())
        );
    }
}
