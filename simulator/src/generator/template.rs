use detection_client::DetectedObject;

/// Scene served when no generator settings are given: one person ten meters
/// straight ahead.
pub fn reference_scene() -> Vec<DetectedObject> {
    vec![DetectedObject::new("person", 10, 0, 0)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_scene_holds_single_person() {
        let scene = reference_scene();
        assert_eq!(scene.len(), 1);
        assert_eq!(scene[0].object_type, "person");
        assert_eq!(scene[0].distance_meters, 10);
    }
}
