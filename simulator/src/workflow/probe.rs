use detection_client::{ClientResult, DetectionClient, FieldValue, ObjectField};
use std::fmt;

/// Outcome of reading one field through the client.
pub struct FieldReading {
    pub field: ObjectField,
    pub outcome: ClientResult<FieldValue>,
}

pub struct ProbeReport {
    pub target: String,
    pub closest: Vec<FieldReading>,
    pub indexed: Option<(i64, Vec<FieldReading>)>,
}

impl ProbeReport {
    pub fn successes(&self) -> usize {
        let indexed = self
            .indexed
            .iter()
            .flat_map(|(_, readings)| readings.iter());
        self.closest
            .iter()
            .chain(indexed)
            .filter(|reading| reading.outcome.is_ok())
            .count()
    }
}

fn write_readings(f: &mut fmt::Formatter<'_>, readings: &[FieldReading]) -> fmt::Result {
    for reading in readings {
        match &reading.outcome {
            Ok(value) => writeln!(f, "  {} = {}", reading.field, value)?,
            Err(err) => writeln!(f, "  {} failed: {}", reading.field, err)?,
        }
    }
    Ok(())
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Closest object at {}:", self.target)?;
        write_readings(f, &self.closest)?;
        if let Some((index, readings)) = &self.indexed {
            writeln!(f, "Object #{}:", index)?;
            write_readings(f, readings)?;
        }
        Ok(())
    }
}

/// Queries every field of the closest object, and optionally of one indexed
/// object, one request per field.
pub struct Prober {
    client: DetectionClient,
}

impl Prober {
    pub fn new(client: DetectionClient) -> Self {
        Self { client }
    }

    pub fn execute(&self, index: Option<i64>) -> ProbeReport {
        let closest = ObjectField::ALL
            .into_iter()
            .map(|field| FieldReading {
                field,
                outcome: self.client.closest_field(field),
            })
            .collect();
        let indexed = index.map(|index| {
            let readings = ObjectField::ALL
                .into_iter()
                .map(|field| FieldReading {
                    field,
                    outcome: self.client.field_at_index(index, field),
                })
                .collect();
            (index, readings)
        });

        ProbeReport {
            target: self.client.endpoint().to_string(),
            closest,
            indexed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::template::reference_scene;
    use crate::server::routes::DetectionServer;
    use crate::server::scene::SceneModel;
    use detection_client::{ClientError, DetectedObject};
    use std::net::SocketAddr;

    fn probe(objects: Vec<DetectedObject>, index: Option<i64>) -> ProbeReport {
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let server = DetectionServer::spawn(addr, SceneModel::new(objects)).unwrap();
        let addr = server.local_addr();
        let client = DetectionClient::new(addr.ip().to_string(), addr.port()).unwrap();
        let report = Prober::new(client).execute(index);
        server.stop();
        report
    }

    #[test]
    fn prober_reads_reference_scene() {
        let report = probe(reference_scene(), None);
        assert_eq!(report.successes(), 4);
        assert_eq!(
            report.closest[0].outcome.as_ref().unwrap(),
            &FieldValue::Text("person".into())
        );
        assert_eq!(report.closest[1].outcome.as_ref().unwrap().as_integer(), Some(10));
        assert!(report.to_string().contains("distance_meters = 10"));
    }

    #[test]
    fn prober_reports_index_failures_per_field() {
        let report = probe(reference_scene(), Some(3));
        let (index, readings) = report.indexed.as_ref().unwrap();
        assert_eq!(*index, 3);
        assert!(readings.iter().all(|reading| matches!(
            reading.outcome,
            Err(ClientError::IndexOutOfRange { index: 3, len: 1 })
        )));
        assert_eq!(report.successes(), 4);
        assert!(report.to_string().contains("Object #3:"));
    }
}
