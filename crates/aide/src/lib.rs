pub mod assistant;
pub mod dispatch;
pub mod errors;
pub mod flows;
pub mod models;
pub mod parser;
pub mod prompt;
pub mod prompt_template;
pub mod providers;
