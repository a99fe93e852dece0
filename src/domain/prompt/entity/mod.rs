pub mod prompt;
pub mod prompt_tag;
