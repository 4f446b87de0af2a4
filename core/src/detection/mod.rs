pub mod object;
pub mod response;

pub use object::{DetectedObject, FieldValue, ObjectField};
pub use response::{DetectionPayload, DetectionResponse, ObjectEntry};
