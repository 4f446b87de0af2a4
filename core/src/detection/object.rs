use serde::{Deserialize, Serialize};
use std::fmt;

/// One entity reported by the detection server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub object_type: String,
    pub distance_meters: i64,
    #[serde(rename = "horizontal_angle_relative_to_camera")]
    pub horizontal_angle: i64,
    #[serde(rename = "vertical_angle_relative_to_camera")]
    pub vertical_angle: i64,
}

impl DetectedObject {
    pub fn new(
        object_type: impl Into<String>,
        distance_meters: i64,
        horizontal_angle: i64,
        vertical_angle: i64,
    ) -> Self {
        Self {
            object_type: object_type.into(),
            distance_meters,
            horizontal_angle,
            vertical_angle,
        }
    }
}

/// Selector over the four attributes of a detected object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectField {
    ObjectType,
    DistanceMeters,
    HorizontalAngle,
    VerticalAngle,
}

impl ObjectField {
    pub const ALL: [ObjectField; 4] = [
        ObjectField::ObjectType,
        ObjectField::DistanceMeters,
        ObjectField::HorizontalAngle,
        ObjectField::VerticalAngle,
    ];

    /// Key used for this field in the server's JSON body.
    pub fn key(self) -> &'static str {
        match self {
            ObjectField::ObjectType => "object_type",
            ObjectField::DistanceMeters => "distance_meters",
            ObjectField::HorizontalAngle => "horizontal_angle_relative_to_camera",
            ObjectField::VerticalAngle => "vertical_angle_relative_to_camera",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, ObjectField::ObjectType)
    }
}

impl fmt::Display for ObjectField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Value of a single field, typed by the field it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            FieldValue::Integer(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            FieldValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::Integer(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detected_object_serializes_with_wire_keys() {
        let object = DetectedObject::new("cone", 3, -5, 2);
        let value = serde_json::to_value(&object).unwrap();
        for field in ObjectField::ALL {
            assert!(value.get(field.key()).is_some(), "missing {}", field);
        }
        assert_eq!(value["horizontal_angle_relative_to_camera"], -5);
    }

    #[test]
    fn only_object_type_is_textual() {
        assert!(!ObjectField::ObjectType.is_numeric());
        assert!(ObjectField::DistanceMeters.is_numeric());
        assert_eq!(FieldValue::Integer(4).as_text(), None);
        assert_eq!(FieldValue::Text("car".into()).as_text(), Some("car"));
    }
}
