pub mod mock;
pub mod openai;

pub use mock::MockVisionProvider;
pub use openai::{OpenAiVisionProvider, DEFAULT_BASE_URL};
