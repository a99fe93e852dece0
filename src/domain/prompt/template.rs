//! 프롬프트 템플릿 모듈
//!
//! 프롬프트 본문의 `{{name}}` 토큰을 다룹니다.
//!
//! ## 구성
//! - 추출: 본문에서 파라미터 이름 목록을 뽑아냅니다
//! - 채우기: 파라미터 값을 본문에 대입합니다 (`fill_template`, `fill_strict`, `fill_with_placeholders`)
//! - 동기화/검증: 본문과 파라미터 정의 목록을 맞춥니다
//!
//! 모든 함수는 입력만으로 결과가 결정되는 순수 함수입니다.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 토큰 문법: `{{` + 중괄호가 아닌 문자 1개 이상 + `}}`
const TOKEN_PATTERN: &str = r"\{\{([^{}]+)\}\}";

fn token_regex() -> &'static Regex {
    static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
    TOKEN_REGEX.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern must compile"))
}

/// 파라미터 입력 타입
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterType {
    /// 한 줄 입력
    #[default]
    ShortText,
    /// 여러 줄 입력
    LongText,
}

/// 프롬프트 파라미터 정의
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct Parameter {
    /// 파라미터 이름 (토큰 안의 이름과 동일)
    #[schema(example = "order_id")]
    pub name: String,

    /// 입력 타입
    #[serde(rename = "type")]
    pub param_type: ParameterType,
}

impl Parameter {
    pub fn new(name: impl Into<String>, param_type: ParameterType) -> Self {
        Self {
            name: name.into(),
            param_type,
        }
    }
}

/// 템플릿 검증 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// 본문에 토큰이 있지만 파라미터 정의가 전혀 없음
    #[error("Parameters found in content but no parameter definitions provided: {0:?}")]
    MissingParameterDefinitions(Vec<String>),

    /// 일부 토큰에 대응하는 파라미터 정의가 없음
    #[error("Some parameters in content have no definitions: {0:?}")]
    UndefinedParameters(Vec<String>),

    /// 값이 비어 있는 파라미터가 있음
    #[error("Required parameter values are missing: {0:?}")]
    RequiredValueMissing(Vec<String>),
}

/// 미리보기 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilledPreview {
    pub content: String,
    pub missing_parameters: Vec<String>,
}

impl FilledPreview {
    pub fn missing_count(&self) -> usize {
        self.missing_parameters.len()
    }
}

/// 토큰 캡처에서 파라미터 이름을 꺼냅니다. 앞뒤 공백만 제거하므로 빈 이름도 그대로 반환합니다.
fn token_name<'a>(caps: &Captures<'a>) -> &'a str {
    caps.get(1).map_or("", |m| m.as_str().trim())
}

/// 본문에서 파라미터 이름을 추출합니다.
///
/// 처음 등장한 순서를 유지하며 중복은 한 번만 포함합니다.
pub fn extract_parameters(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for caps in token_regex().captures_iter(content) {
        let name = token_name(&caps);
        if seen.insert(name) {
            names.push(name.to_string());
        }
    }

    names
}

/// 값이 있는 토큰만 치환하고 나머지 토큰은 그대로 둡니다.
///
/// 한 번의 스캔으로 치환하므로 값 안에 토큰이 들어 있어도 다시 치환되지 않습니다.
pub fn fill_template(content: &str, values: &HashMap<String, String>) -> String {
    token_regex()
        .replace_all(content, |caps: &Captures| {
            match values.get(token_name(caps)) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// 모든 파라미터 값이 채워졌을 때만 치환합니다.
///
/// 값이 없거나 공백뿐인 파라미터가 있으면 `RequiredValueMissing`을 반환합니다.
pub fn fill_strict(
    content: &str,
    values: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let missing: Vec<String> = extract_parameters(content)
        .into_iter()
        .filter(|name| !has_value(values, name))
        .collect();

    if !missing.is_empty() {
        return Err(TemplateError::RequiredValueMissing(missing));
    }

    Ok(fill_template(content, values))
}

/// 미리보기용 치환
///
/// 값이 없는 토큰은 `{{name}}` 형태로 다시 출력하고 누락된 이름을 함께 반환합니다.
pub fn fill_with_placeholders(content: &str, values: &HashMap<String, String>) -> FilledPreview {
    let mut seen = HashSet::new();
    let mut missing_parameters = Vec::new();

    let filled = token_regex()
        .replace_all(content, |caps: &Captures| {
            let name = token_name(caps);

            if has_value(values, name) {
                return values[name].clone();
            }

            if seen.insert(name.to_string()) {
                missing_parameters.push(name.to_string());
            }
            format!("{{{{{}}}}}", name)
        })
        .into_owned();

    FilledPreview {
        content: filled,
        missing_parameters,
    }
}

fn has_value(values: &HashMap<String, String>, name: &str) -> bool {
    values
        .get(name)
        .map(|value| !value.trim().is_empty())
        .unwrap_or(false)
}

/// 본문 변경에 맞춰 파라미터 정의 목록을 갱신합니다.
///
/// - 기존 정의는 순서와 타입을 유지합니다
/// - 새로 등장한 이름은 `short-text` 타입으로 뒤에 추가합니다
/// - 본문에서 사라진 이름은 제거합니다
pub fn sync_parameters(content: &str, existing: &[Parameter]) -> Vec<Parameter> {
    let extracted = extract_parameters(content);
    let referenced: HashSet<&str> = extracted.iter().map(String::as_str).collect();

    let mut kept = HashSet::new();
    let mut synced: Vec<Parameter> = existing
        .iter()
        .filter(|param| referenced.contains(param.name.as_str()))
        .filter(|param| kept.insert(param.name.clone()))
        .cloned()
        .collect();

    for name in extracted {
        if !kept.contains(&name) {
            synced.push(Parameter::new(name, ParameterType::default()));
        }
    }

    synced
}

/// 저장 전 파라미터 정의 검증
///
/// 본문의 모든 토큰에 대응하는 정의가 있어야 합니다.
pub fn validate_parameter_definitions(
    content: &str,
    parameters: Option<&[Parameter]>,
) -> Result<(), TemplateError> {
    let extracted = extract_parameters(content);
    if extracted.is_empty() {
        return Ok(());
    }

    let Some(parameters) = parameters else {
        return Err(TemplateError::MissingParameterDefinitions(extracted));
    };

    let defined: HashSet<&str> = parameters.iter().map(|p| p.name.as_str()).collect();
    let missing: Vec<String> = extracted
        .into_iter()
        .filter(|name| !defined.contains(name.as_str()))
        .collect();

    if !missing.is_empty() {
        return Err(TemplateError::UndefinedParameters(missing));
    }

    Ok(())
}
