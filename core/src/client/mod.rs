pub mod endpoint;
pub mod http;

pub use endpoint::{ClientConfig, Endpoint, ServerEndpoint};
pub use http::DetectionClient;
