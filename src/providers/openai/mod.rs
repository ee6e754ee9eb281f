#[allow(clippy::module_inception)]
pub mod openai;

pub use openai::OpenAIProvider;
