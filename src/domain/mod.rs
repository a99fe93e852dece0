pub mod ai;
pub mod health;
pub mod prompt;
pub mod prompt_tag;
pub mod tag;
