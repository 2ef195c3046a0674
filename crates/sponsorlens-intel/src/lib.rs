//! HTTP clients for the external collaborators: the Twelve Labs video index
//! and an OpenAI-compatible language model with optional web research.

pub mod chat;
pub mod error;
pub mod gateway;
mod http;
mod prompts;
pub mod research;
pub mod retry;
pub mod types;
pub mod video_index;

pub use chat::{ChatClient, Sampling};
pub use error::IntelError;
pub use gateway::OpenAiGateway;
pub use research::WebResearcher;
pub use retry::RetryPolicy;
pub use video_index::VideoIndexClient;
