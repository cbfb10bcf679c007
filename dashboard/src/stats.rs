use crate::model::{Reading, Status};
use serde::{Serialize, Serializer};

/// Summary over the current history. Metrics with no numeric samples
/// report zero, the same as an empty history.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(serialize_with = "two_decimals")]
    pub avg_temp: f64,
    #[serde(serialize_with = "two_decimals")]
    pub avg_hum: f64,
    #[serde(serialize_with = "two_decimals")]
    pub avg_soil: f64,
    #[serde(serialize_with = "two_decimals")]
    pub min_temp: f64,
    #[serde(serialize_with = "two_decimals")]
    pub max_temp: f64,
    #[serde(serialize_with = "two_decimals")]
    pub min_hum: f64,
    #[serde(serialize_with = "two_decimals")]
    pub max_hum: f64,
    #[serde(serialize_with = "two_decimals")]
    pub min_soil: f64,
    #[serde(serialize_with = "two_decimals")]
    pub max_soil: f64,
    pub danger_count: usize,
    pub safe_count: usize,
    pub total_readings: usize,
}

fn two_decimals<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{:.2}", value))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Default)]
struct Accumulator {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl Accumulator {
    fn add(&mut self, value: Option<f64>) {
        let Some(v) = value else { return };
        if self.count == 0 {
            self.min = v;
            self.max = v;
        } else {
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
        self.sum += v;
        self.count += 1;
    }

    /// (avg, min, max), rounded
    fn finish(&self) -> (f64, f64, f64) {
        if self.count == 0 {
            return (0.0, 0.0, 0.0);
        }
        (
            round2(self.sum / self.count as f64),
            round2(self.min),
            round2(self.max),
        )
    }
}

/// Filter-then-aggregate pass over the readings, in one sweep
pub fn compute<'a, I>(readings: I) -> Statistics
where
    I: IntoIterator<Item = &'a Reading>,
{
    let mut temp = Accumulator::default();
    let mut hum = Accumulator::default();
    let mut soil = Accumulator::default();
    let mut stats = Statistics::default();

    for reading in readings {
        temp.add(reading.temp.as_f64());
        hum.add(reading.hum.as_f64());
        soil.add(reading.soil.as_f64());

        match reading.status {
            Status::Danger => stats.danger_count += 1,
            Status::Safe => stats.safe_count += 1,
            _ => {}
        }
        stats.total_readings += 1;
    }

    (stats.avg_temp, stats.min_temp, stats.max_temp) = temp.finish();
    (stats.avg_hum, stats.min_hum, stats.max_hum) = hum.finish();
    (stats.avg_soil, stats.min_soil, stats.max_soil) = soil.finish();

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DevicePayload, MetricValue};
    use chrono::Utc;

    fn reading(temp: MetricValue, hum: MetricValue, soil: MetricValue, status: Status) -> Reading {
        Reading::stamp(
            DevicePayload {
                temp,
                hum,
                soil,
                status,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_empty_is_zeroed() {
        let stats = compute(std::iter::empty());
        assert_eq!(stats, Statistics::default());

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["avgTemp"], "0.00");
        assert_eq!(json["maxSoil"], "0.00");
        assert_eq!(json["dangerCount"], 0);
        assert_eq!(json["totalReadings"], 0);
    }

    #[test]
    fn test_placeholders_excluded() {
        let history = vec![
            reading(20.0.into(), 40.0.into(), 10.0.into(), Status::Safe),
            reading(30.0.into(), 60.0.into(), 20.0.into(), Status::Danger),
            reading("--".into(), "--".into(), "--".into(), Status::Safe),
        ];

        let stats = compute(&history);
        assert_eq!(stats.avg_temp, 25.0);
        assert_eq!(stats.min_temp, 20.0);
        assert_eq!(stats.max_temp, 30.0);
        assert_eq!(stats.avg_hum, 50.0);
        assert_eq!(stats.avg_soil, 15.0);
        assert_eq!(stats.safe_count, 2);
        assert_eq!(stats.danger_count, 1);
        assert_eq!(stats.total_readings, 3);
    }

    #[test]
    fn test_json_formatting() {
        let history = vec![
            reading(20.0.into(), 40.0.into(), 10.0.into(), Status::Safe),
            reading(30.0.into(), 60.0.into(), 20.0.into(), Status::Safe),
            reading("--".into(), 50.0.into(), 30.0.into(), Status::Safe),
        ];

        let json = serde_json::to_value(compute(&history)).unwrap();
        assert_eq!(json["avgTemp"], "25.00");
        assert_eq!(json["minTemp"], "20.00");
        assert_eq!(json["maxTemp"], "30.00");
        assert_eq!(json["totalReadings"], 3);
    }

    #[test]
    fn test_rounding() {
        let history = vec![
            reading(1.0.into(), 1.0.into(), 1.0.into(), Status::Safe),
            reading(2.0.into(), 1.0.into(), 1.0.into(), Status::Safe),
            reading(2.0.into(), 1.0.into(), 1.0.into(), Status::Safe),
        ];

        let stats = compute(&history);
        assert_eq!(stats.avg_temp, 1.67);
        assert_eq!(serde_json::to_value(&stats).unwrap()["avgTemp"], "1.67");
    }

    #[test]
    fn test_metric_with_no_numeric_samples() {
        let history = vec![
            reading("--".into(), 40.0.into(), MetricValue::Missing, Status::Danger),
            reading("--".into(), 42.0.into(), MetricValue::Missing, Status::Danger),
        ];

        let stats = compute(&history);
        assert_eq!(stats.avg_temp, 0.0);
        assert_eq!(stats.min_temp, 0.0);
        assert_eq!(stats.max_temp, 0.0);
        assert_eq!(stats.avg_soil, 0.0);
        assert_eq!(stats.avg_hum, 41.0);
        assert_eq!(stats.danger_count, 2);
        assert_eq!(stats.total_readings, 2);
    }

    #[test]
    fn test_negative_values() {
        let history = vec![
            reading((-5.5).into(), 10.0.into(), 10.0.into(), Status::Other("COLD".into())),
            reading((-1.5).into(), 10.0.into(), 10.0.into(), Status::Offline),
        ];

        let stats = compute(&history);
        assert_eq!(stats.min_temp, -5.5);
        assert_eq!(stats.max_temp, -1.5);
        assert_eq!(stats.avg_temp, -3.5);
        assert_eq!(stats.safe_count, 0);
        assert_eq!(stats.danger_count, 0);
    }
}
