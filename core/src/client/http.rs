use crate::client::endpoint::{ClientConfig, Endpoint, ServerEndpoint};
use crate::detection::{DetectedObject, DetectionResponse, FieldValue, ObjectEntry, ObjectField};
use crate::prelude::{ClientError, ClientResult};
use crate::telemetry::{MetricsRecorder, MetricsSnapshot, RequestLog};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Blocking client for the detection server.
///
/// Every accessor performs its own GET request and parses a fresh response;
/// nothing is cached between calls, so a failed call leaves the client usable.
#[derive(Debug)]
pub struct DetectionClient {
    endpoint: ServerEndpoint,
    http: Client,
    log: RequestLog,
    metrics: MetricsRecorder,
}

impl DetectionClient {
    pub fn new(host: impl Into<String>, port: u16) -> ClientResult<Self> {
        Self::from_config(ClientConfig::new(host, port))
    }

    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            endpoint: config.endpoint,
            http,
            log: RequestLog::new(),
            metrics: MetricsRecorder::new(),
        })
    }

    pub fn endpoint(&self) -> &ServerEndpoint {
        &self.endpoint
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn closest_object_class(&self) -> ClientResult<String> {
        self.query_closest(|entry| entry.text(ObjectField::ObjectType))
    }

    pub fn closest_object_distance(&self) -> ClientResult<i64> {
        self.query_closest(|entry| entry.integer(ObjectField::DistanceMeters))
    }

    pub fn closest_object_horizontal_angle(&self) -> ClientResult<i64> {
        self.query_closest(|entry| entry.integer(ObjectField::HorizontalAngle))
    }

    pub fn closest_object_vertical_angle(&self) -> ClientResult<i64> {
        self.query_closest(|entry| entry.integer(ObjectField::VerticalAngle))
    }

    pub fn object_class_at_index(&self, index: i64) -> ClientResult<String> {
        self.query_index(index, |entry| entry.text(ObjectField::ObjectType))
    }

    pub fn object_distance_at_index(&self, index: i64) -> ClientResult<i64> {
        self.query_index(index, |entry| entry.integer(ObjectField::DistanceMeters))
    }

    pub fn object_horizontal_angle_at_index(&self, index: i64) -> ClientResult<i64> {
        self.query_index(index, |entry| entry.integer(ObjectField::HorizontalAngle))
    }

    pub fn object_vertical_angle_at_index(&self, index: i64) -> ClientResult<i64> {
        self.query_index(index, |entry| entry.integer(ObjectField::VerticalAngle))
    }

    /// Reads any field of the closest object.
    pub fn closest_field(&self, field: ObjectField) -> ClientResult<FieldValue> {
        self.query_closest(|entry| entry.field(field))
    }

    /// Reads any field of the object at `index` in the full detection list.
    pub fn field_at_index(&self, index: i64, field: ObjectField) -> ClientResult<FieldValue> {
        self.query_index(index, |entry| entry.field(field))
    }

    /// Closest object as a full record; fails if any field is absent.
    pub fn closest_object(&self) -> ClientResult<DetectedObject> {
        self.query_closest(ObjectEntry::into_object)
    }

    /// Every detected object as full records, in server order.
    pub fn all_objects(&self) -> ClientResult<Vec<DetectedObject>> {
        self.query(Endpoint::AllObjects, |response| {
            response
                .into_entries()?
                .into_iter()
                .map(ObjectEntry::into_object)
                .collect()
        })
    }

    fn query_closest<T>(
        &self,
        project: impl FnOnce(ObjectEntry) -> ClientResult<T>,
    ) -> ClientResult<T> {
        self.query(Endpoint::ClosestObject, |response| {
            project(response.into_closest()?)
        })
    }

    fn query_index<T>(
        &self,
        index: i64,
        project: impl FnOnce(ObjectEntry) -> ClientResult<T>,
    ) -> ClientResult<T> {
        self.query(Endpoint::AllObjects, |response| {
            project(response.into_index(index)?)
        })
    }

    fn query<T>(
        &self,
        endpoint: Endpoint,
        project: impl FnOnce(DetectionResponse) -> ClientResult<T>,
    ) -> ClientResult<T> {
        let result = self.fetch(endpoint).and_then(project);
        match result {
            Ok(_) => self.metrics.record_completed(),
            Err(_) => self.metrics.record_failed(),
        }
        result
    }

    fn fetch(&self, endpoint: Endpoint) -> ClientResult<DetectionResponse> {
        let url = self.endpoint.url(endpoint);
        let response = self.http.get(&url).send()?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        self.log
            .record_exchange(&url, status.as_u16(), content_type.as_deref());

        if status != StatusCode::OK || content_type.as_deref() != Some(JSON_CONTENT_TYPE) {
            self.log
                .record_rejection(&url, status.as_u16(), content_type.as_deref());
            return Err(ClientError::Server {
                status: status.as_u16(),
                content_type,
            });
        }

        let body = response.bytes()?;
        self.log.record_body(&url, &String::from_utf8_lossy(&body));
        DetectionResponse::parse(&body)
    }
}
