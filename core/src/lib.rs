//! Client library for a remote object-detection server.
//!
//! The server exposes the closest detected object and the full detection list
//! over plain HTTP+JSON. [`DetectionClient`] issues one request per accessor
//! call and projects the requested field out of a freshly parsed response.

pub mod client;
pub mod detection;
pub mod prelude;
pub mod telemetry;

pub use client::{ClientConfig, DetectionClient, Endpoint, ServerEndpoint};
pub use detection::{DetectedObject, DetectionPayload, FieldValue, ObjectField};
pub use prelude::{ClientError, ClientResult};
