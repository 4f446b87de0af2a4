use crate::detection::object::{DetectedObject, FieldValue, ObjectField};
use crate::prelude::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const OBJECTS_KEY: &str = "Objects";

/// Body shape served by both detection endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionPayload {
    #[serde(rename = "Objects")]
    pub objects: Vec<DetectedObject>,
}

impl DetectionPayload {
    pub fn new(objects: Vec<DetectedObject>) -> Self {
        Self { objects }
    }
}

/// Parsed `Objects` array of one response.
///
/// Elements stay as raw JSON so that a missing key only fails the accessor
/// that asks for it.
#[derive(Debug, Clone)]
pub struct DetectionResponse {
    objects: Vec<Value>,
}

impl DetectionResponse {
    /// Parses a raw body; bytes that are not valid UTF-8 are malformed.
    pub fn parse(body: impl AsRef<[u8]>) -> ClientResult<Self> {
        let value: Value = serde_json::from_slice(body.as_ref())
            .map_err(|err| ClientError::MalformedResponse(format!("invalid JSON body: {}", err)))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> ClientResult<Self> {
        let Value::Object(mut root) = value else {
            return Err(ClientError::MalformedResponse(
                "top-level JSON value is not an object".into(),
            ));
        };
        match root.remove(OBJECTS_KEY) {
            Some(Value::Array(objects)) => Ok(Self { objects }),
            Some(_) => Err(ClientError::MalformedResponse(
                "the 'Objects' element is not a JSON array".into(),
            )),
            None => Err(ClientError::MalformedResponse(
                "no 'Objects' array found in the JSON response".into(),
            )),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Element 0, which the server defines as the closest object.
    pub fn into_closest(self) -> ClientResult<ObjectEntry> {
        let first = self
            .objects
            .into_iter()
            .next()
            .ok_or(ClientError::EmptyResult)?;
        ObjectEntry::from_value(first)
    }

    pub fn into_index(mut self, index: i64) -> ClientResult<ObjectEntry> {
        let len = self.objects.len();
        let position = usize::try_from(index)
            .ok()
            .filter(|&position| position < len)
            .ok_or(ClientError::IndexOutOfRange { index, len })?;
        ObjectEntry::from_value(self.objects.swap_remove(position))
    }

    pub fn into_entries(self) -> ClientResult<Vec<ObjectEntry>> {
        self.objects.into_iter().map(ObjectEntry::from_value).collect()
    }
}

/// A single element of the `Objects` array.
#[derive(Debug, Clone)]
pub struct ObjectEntry {
    fields: Map<String, Value>,
}

impl ObjectEntry {
    fn from_value(value: Value) -> ClientResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ClientError::MalformedResponse(format!(
                "detected object is not a JSON object: {}",
                other
            ))),
        }
    }

    fn raw(&self, field: ObjectField) -> ClientResult<&Value> {
        self.fields
            .get(field.key())
            .ok_or(ClientError::MissingField(field.key()))
    }

    pub fn text(&self, field: ObjectField) -> ClientResult<String> {
        match self.raw(field)? {
            Value::String(value) => Ok(value.clone()),
            other => Err(ClientError::MalformedResponse(format!(
                "{} is not a string: {}",
                field, other
            ))),
        }
    }

    /// Integral JSON numbers only; `3.0` is accepted, `3.5` is rejected.
    pub fn integer(&self, field: ObjectField) -> ClientResult<i64> {
        let value = self.raw(field)?;
        let integral = value.as_i64().or_else(|| {
            value
                .as_f64()
                .filter(|number| number.fract() == 0.0)
                .filter(|number| *number >= i64::MIN as f64 && *number < i64::MAX as f64)
                .map(|number| number as i64)
        });
        integral.ok_or_else(|| {
            ClientError::MalformedResponse(format!("{} is not an integer: {}", field, value))
        })
    }

    pub fn field(&self, field: ObjectField) -> ClientResult<FieldValue> {
        if field.is_numeric() {
            self.integer(field).map(FieldValue::Integer)
        } else {
            self.text(field).map(FieldValue::Text)
        }
    }

    pub fn into_object(self) -> ClientResult<DetectedObject> {
        Ok(DetectedObject {
            object_type: self.text(ObjectField::ObjectType)?,
            distance_meters: self.integer(ObjectField::DistanceMeters)?,
            horizontal_angle: self.integer(ObjectField::HorizontalAngle)?,
            vertical_angle: self.integer(ObjectField::VerticalAngle)?,
        })
    }
}
