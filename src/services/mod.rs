pub mod prompt;
pub mod providers;
pub mod recommendations;
pub mod validator;

pub use providers::{CompletionProvider, OpenAiProvider};
