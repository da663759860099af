pub mod db;
pub mod sermon_llm;

pub use db::DbAdapter;
pub use sermon_llm::{OpenAiSermonAdapter, TemplateSermonAdapter};
