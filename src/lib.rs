pub mod config;
pub mod domain;
pub mod global;
pub mod shutdown;
pub mod state;
pub mod utils;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use domain::{ai, health, prompt, prompt_tag, tag};
use global::{middleware::request_id_middleware, rate_limit::create_ai_rate_limiter};
pub use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::handler::health_check,
        prompt::handler::create_prompt,
        prompt::handler::list_prompts,
        prompt::handler::get_prompt,
        prompt::handler::update_prompt,
        prompt::handler::delete_prompt,
        prompt::handler::sync_parameters,
        prompt::handler::fill_prompt,
        prompt::handler::preview_prompt,
        ai::handler::improve_prompt,
        tag::handler::list_tags,
        tag::handler::create_tag,
        tag::handler::update_tag,
        tag::handler::delete_tag,
        prompt_tag::handler::assign_tag,
        prompt_tag::handler::remove_tag,
    ),
    components(
        schemas(
            health::dto::HealthStatus,
            health::dto::HealthState,
            health::dto::HealthChecks,
            health::dto::CheckStatus,
            health::dto::DependencyCheck,
            prompt::template::Parameter,
            prompt::template::ParameterType,
            prompt::dto::CreatePromptRequest,
            prompt::dto::UpdatePromptRequest,
            prompt::dto::PromptSortBy,
            prompt::dto::SortDirection,
            prompt::dto::PromptResponse,
            prompt::dto::Pagination,
            prompt::dto::PromptListResponse,
            prompt::dto::FillPromptRequest,
            prompt::dto::FillPromptResponse,
            prompt::dto::PreviewPromptResponse,
            prompt::dto::SyncParametersRequest,
            prompt::dto::SyncParametersResponse,
            prompt::dto::SuccessPromptResponse,
            prompt::dto::SuccessPromptListResponse,
            prompt::dto::SuccessFillPromptResponse,
            prompt::dto::SuccessPreviewPromptResponse,
            prompt::dto::SuccessSyncParametersResponse,
            ai::dto::ImprovePromptRequest,
            ai::dto::ImprovePromptResponse,
            ai::dto::SuccessImprovePromptResponse,
            tag::dto::CreateTagRequest,
            tag::dto::UpdateTagRequest,
            tag::dto::TagSummary,
            tag::dto::TagResponse,
            tag::dto::SuccessTagResponse,
            tag::dto::SuccessTagListResponse,
            prompt_tag::dto::PromptTagRequest,
            prompt_tag::dto::PromptTagResponse,
            prompt_tag::dto::SuccessPromptTagResponse,
            utils::response::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "서버 상태 API"),
        (name = "Prompt", description = "프롬프트 관리 API"),
        (name = "AI", description = "AI 프롬프트 개선 API"),
        (name = "Tag", description = "태그 관리 API"),
        (name = "PromptTag", description = "프롬프트-태그 연결 API")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// 전체 라우터 구성
///
/// 프롬프트 개선 라우트에는 설정에 따라 IP 단위 요청 제한이 붙습니다.
/// 요청 제한이 켜져 있으면 `into_make_service_with_connect_info`로 서빙해야 합니다.
pub fn create_router(state: AppState) -> Router {
    let mut improve_routes = Router::new().route(
        "/api/v1/prompts/improve",
        post(ai::handler::improve_prompt),
    );
    if state.config.rate_limit_enabled {
        improve_routes = improve_routes.layer(create_ai_rate_limiter());
    }

    let api_routes = Router::new()
        .route(
            "/api/v1/prompts",
            post(prompt::handler::create_prompt).get(prompt::handler::list_prompts),
        )
        .route(
            "/api/v1/prompts/parameters",
            post(prompt::handler::sync_parameters),
        )
        .route(
            "/api/v1/prompts/:id",
            get(prompt::handler::get_prompt)
                .put(prompt::handler::update_prompt)
                .delete(prompt::handler::delete_prompt),
        )
        .route("/api/v1/prompts/:id/fill", post(prompt::handler::fill_prompt))
        .route(
            "/api/v1/prompts/:id/preview",
            post(prompt::handler::preview_prompt),
        )
        .route(
            "/api/v1/tags",
            get(tag::handler::list_tags).post(tag::handler::create_tag),
        )
        .route(
            "/api/v1/tags/:id",
            patch(tag::handler::update_tag).delete(tag::handler::delete_tag),
        )
        .route(
            "/api/v1/prompt-tags",
            post(prompt_tag::handler::assign_tag).delete(prompt_tag::handler::remove_tag),
        )
        .merge(improve_routes);

    Router::new()
        .route("/health", get(health::handler::health_check))
        .merge(api_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(request_id_middleware))
}
