use anyhow::{bail, Context};
use detection_client::DetectedObject;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for generating a synthetic detection scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub object_count: usize,
    pub classes: Vec<String>,
    pub min_distance_meters: i64,
    pub max_distance_meters: i64,
    /// Full horizontal field of view, centred on the camera axis.
    pub horizontal_span_deg: i64,
    pub vertical_span_deg: i64,
    pub seed: u64,
    pub description: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            object_count: 5,
            classes: ["person", "car", "bicycle", "dog", "cone"]
                .into_iter()
                .map(String::from)
                .collect(),
            min_distance_meters: 1,
            max_distance_meters: 50,
            horizontal_span_deg: 90,
            vertical_span_deg: 30,
            seed: 0,
            description: None,
        }
    }
}

impl GeneratorConfig {
    fn distance_range(&self) -> (i64, i64) {
        let low = self.min_distance_meters.max(0);
        (low, self.max_distance_meters.max(low))
    }

    fn half_span(span: i64) -> i64 {
        (span.unsigned_abs() / 2).min(180) as i64
    }
}

/// Builds a deterministic scene for the given config, in generation order.
pub fn build_scene_from_config(config: &GeneratorConfig) -> anyhow::Result<Vec<DetectedObject>> {
    if config.object_count > 0 && config.classes.is_empty() {
        bail!("generator needs at least one object class");
    }

    let (near, far) = config.distance_range();
    let horizontal = GeneratorConfig::half_span(config.horizontal_span_deg);
    let vertical = GeneratorConfig::half_span(config.vertical_span_deg);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut objects = Vec::with_capacity(config.object_count);

    for _ in 0..config.object_count {
        let class = config
            .classes
            .choose(&mut rng)
            .context("choosing object class")?;
        objects.push(DetectedObject::new(
            class.clone(),
            rng.gen_range(near..=far),
            rng.gen_range(-horizontal..=horizontal),
            rng.gen_range(-vertical..=vertical),
        ));
    }

    Ok(objects)
}

#[cfg(test)]
pub fn build_scene(object_count: usize, seed: u64) -> anyhow::Result<Vec<DetectedObject>> {
    let config = GeneratorConfig {
        object_count,
        seed,
        ..Default::default()
    };
    build_scene_from_config(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_builds_expected_object_count() {
        let scene = build_scene(7, 3).unwrap();
        assert_eq!(scene.len(), 7);
        assert!(scene
            .iter()
            .all(|object| (1..=50).contains(&object.distance_meters)));
        assert!(scene
            .iter()
            .all(|object| object.horizontal_angle.abs() <= 45 && object.vertical_angle.abs() <= 15));
    }

    #[test]
    fn generator_is_deterministic_per_seed() {
        assert_eq!(build_scene(4, 13).unwrap(), build_scene(4, 13).unwrap());
    }

    #[test]
    fn generator_config_restricts_classes_and_distance() {
        let config = GeneratorConfig {
            object_count: 6,
            classes: vec!["cone".into()],
            min_distance_meters: 8,
            max_distance_meters: 8,
            horizontal_span_deg: 0,
            vertical_span_deg: 0,
            seed: 21,
            description: Some("cone line".into()),
        };

        let scene = build_scene_from_config(&config).unwrap();
        assert!(scene
            .iter()
            .all(|object| *object == DetectedObject::new("cone", 8, 0, 0)));
    }

    #[test]
    fn generator_clamps_extreme_spans() {
        let config = GeneratorConfig {
            object_count: 10,
            horizontal_span_deg: i64::MIN,
            vertical_span_deg: i64::MAX,
            seed: 5,
            ..Default::default()
        };
        let scene = build_scene_from_config(&config).unwrap();
        assert!(scene
            .iter()
            .all(|object| object.horizontal_angle.abs() <= 180 && object.vertical_angle.abs() <= 180));
    }

    #[test]
    fn generator_rejects_empty_class_list() {
        let config = GeneratorConfig {
            classes: Vec::new(),
            ..Default::default()
        };
        assert!(build_scene_from_config(&config).is_err());
    }
}
