pub mod logger;
pub mod messages;
pub mod prompt;
