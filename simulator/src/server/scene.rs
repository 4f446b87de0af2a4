use detection_client::{DetectedObject, DetectionPayload};
use serde::{Deserialize, Serialize};

/// Objects currently "seen" by the simulated camera, in stored order.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SceneModel {
    pub objects: Vec<DetectedObject>,
}

impl SceneModel {
    pub fn new(objects: Vec<DetectedObject>) -> Self {
        Self { objects }
    }

    /// Nearest object only; the first one wins on equal distance.
    pub fn closest_payload(&self) -> DetectionPayload {
        let closest = self
            .objects
            .iter()
            .enumerate()
            .min_by_key(|(position, object)| (object.distance_meters, *position))
            .map(|(_, object)| object.clone());
        DetectionPayload::new(closest.into_iter().collect())
    }

    pub fn all_payload(&self) -> DetectionPayload {
        DetectionPayload::new(self.objects.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closest_payload_picks_nearest_first_on_ties() {
        let scene = SceneModel::new(vec![
            DetectedObject::new("car", 12, 0, 0),
            DetectedObject::new("dog", 3, 5, 0),
            DetectedObject::new("cone", 3, -5, 0),
        ]);
        assert_eq!(
            scene.closest_payload().objects,
            vec![DetectedObject::new("dog", 3, 5, 0)]
        );
        assert_eq!(scene.all_payload().objects.len(), 3);
    }

    #[test]
    fn empty_scene_serves_empty_lists() {
        let scene = SceneModel::default();
        assert!(scene.closest_payload().objects.is_empty());
        assert!(scene.all_payload().objects.is_empty());
    }
}
