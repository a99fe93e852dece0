pub mod client;
pub mod dto;
pub mod handler;
pub mod prompt;
pub mod retry;
pub mod service;
