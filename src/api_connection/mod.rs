pub mod connection;
pub mod endpoints;
mod fake;
mod model_client;

pub use connection::ApiConnectionError;
pub use fake::FakeModelClient;
pub use model_client::{
    extract_as, strip_code_fences, ExtractionRequest, ModelClient, OpenRouterClient, ServiceError,
};
