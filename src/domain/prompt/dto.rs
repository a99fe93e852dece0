use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::entity::prompt;
use super::template::{FilledPreview, Parameter};
use crate::domain::tag::dto::TagSummary;
use crate::utils::error::AppError;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

// ============== 프롬프트 생성 / 수정 ==============

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromptRequest {
    #[validate(length(min = 1, max = 100, message = "프롬프트 이름은 1~100자여야 합니다."))]
    pub name: String,

    #[validate(length(max = 1000, message = "설명은 1000자를 초과할 수 없습니다."))]
    pub description: Option<String>,

    #[validate(length(min = 1, message = "프롬프트 내용은 비어 있을 수 없습니다."))]
    pub content: String,

    /// 본문의 `{{name}}` 토큰마다 정의가 있어야 합니다.
    pub parameters: Option<Vec<Parameter>>,

    /// 연결할 태그 ID 목록
    pub tags: Option<Vec<Uuid>>,
}

/// 프롬프트 전체 수정 요청
///
/// `tags`가 주어지면 기존 태그 연결을 모두 교체하고, 생략하면 그대로 둡니다.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePromptRequest {
    #[validate(length(min = 1, max = 100, message = "프롬프트 이름은 1~100자여야 합니다."))]
    pub name: String,

    #[validate(length(max = 1000, message = "설명은 1000자를 초과할 수 없습니다."))]
    pub description: Option<String>,

    #[validate(length(min = 1, message = "프롬프트 내용은 비어 있을 수 없습니다."))]
    pub content: String,

    pub parameters: Option<Vec<Parameter>>,

    pub tags: Option<Vec<Uuid>>,
}

// ============== 목록 조회 ==============

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PromptSortBy {
    Name,
    CreatedAt,
    #[default]
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PromptListQuery {
    /// 이름 부분 일치 검색 (대소문자 무시)
    pub search: Option<String>,

    /// 쉼표로 구분된 태그 UUID 목록. 모든 태그가 붙은 프롬프트만 반환합니다.
    pub tags: Option<String>,

    #[validate(range(min = 1, max = 1_000_000, message = "page는 1~1000000 사이여야 합니다."))]
    #[param(minimum = 1, maximum = 1_000_000, default = 1)]
    pub page: Option<u64>,

    #[validate(range(min = 1, max = 100, message = "pageSize는 1~100 사이여야 합니다."))]
    #[param(minimum = 1, maximum = 100, default = 20)]
    pub page_size: Option<u64>,

    #[param(inline)]
    pub sort_by: Option<PromptSortBy>,

    #[param(inline)]
    pub sort_dir: Option<SortDirection>,
}

impl PromptListQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// `tags` 쿼리를 중복 없는 UUID 목록으로 파싱합니다.
    pub fn tag_ids(&self) -> Result<Vec<Uuid>, AppError> {
        let Some(raw) = self.tags.as_deref() else {
            return Ok(Vec::new());
        };

        let mut ids: Vec<Uuid> = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            let id = Uuid::parse_str(part).map_err(|_| {
                AppError::validation_error("tags는 쉼표로 구분된 UUID 목록이어야 합니다.")
            })?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

// ============== 응답 ==============

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub content: String,
    pub parameters: Vec<Parameter>,
    pub tags: Vec<TagSummary>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PromptResponse {
    pub fn from_model(model: prompt::Model, tags: Vec<TagSummary>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            content: model.content,
            parameters: model.parameters.0,
            tags,
            user_id: model.user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub page_size: u64,
}

impl Pagination {
    pub fn new(total_items: u64, current_page: u64, page_size: u64) -> Self {
        Self {
            total_items,
            total_pages: total_items.div_ceil(page_size),
            current_page,
            page_size,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptListResponse {
    pub data: Vec<PromptResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessPromptResponse {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: PromptResponse,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessPromptListResponse {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: PromptListResponse,
}

// ============== 파라미터 채우기 ==============

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FillPromptRequest {
    /// 파라미터 이름 → 값
    #[serde(default)]
    pub values: HashMap<String, String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FillPromptResponse {
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPromptResponse {
    /// 값이 없는 파라미터는 `{{name}}` 형태로 남습니다.
    pub content: String,
    pub missing_parameters: Vec<String>,
    pub missing_count: usize,
}

impl From<FilledPreview> for PreviewPromptResponse {
    fn from(preview: FilledPreview) -> Self {
        let missing_count = preview.missing_count();
        Self {
            content: preview.content,
            missing_parameters: preview.missing_parameters,
            missing_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessFillPromptResponse {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: FillPromptResponse,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessPreviewPromptResponse {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: PreviewPromptResponse,
}

// ============== 파라미터 동기화 (작성 중인 초안) ==============

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncParametersRequest {
    pub content: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncParametersResponse {
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessSyncParametersResponse {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: SyncParametersResponse,
}
