use rand::Rng;
use serde::Serialize;
use serde_json::Value;

/// Payload served at `GET /data`, shaped like the real device's
#[derive(Debug, Clone, Serialize)]
pub struct SensorPayload {
    pub temp: Value,
    pub hum: Value,
    pub soil: Value,
    pub status: String,
}

#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    /// Soil moisture (%) below which the plant is flagged
    pub dry: f64,
    /// Temperature (°C) above which the plant is flagged
    pub heat: f64,
}

pub fn generate_payload(rng: &mut impl Rng, fault_rate: f64, thresholds: Thresholds) -> SensorPayload {
    let temp = sample(rng, fault_rate, 15.0..35.0);
    let hum = sample(rng, fault_rate, 30.0..80.0);
    let soil = sample(rng, fault_rate, 10.0..90.0);

    let danger = soil.is_some_and(|s| s < thresholds.dry) || temp.is_some_and(|t| t > thresholds.heat);

    SensorPayload {
        temp: to_value(temp),
        hum: to_value(hum),
        soil: to_value(soil),
        status: if danger { "DANGER" } else { "SAFE" }.to_string(),
    }
}

/// One decimal, or `None` when the sensor "fails"
fn sample(rng: &mut impl Rng, fault_rate: f64, range: std::ops::Range<f64>) -> Option<f64> {
    if rng.gen_bool(fault_rate) {
        return None;
    }
    Some((rng.gen_range(range) * 10.0).round() / 10.0)
}

fn to_value(reading: Option<f64>) -> Value {
    match reading {
        Some(v) => Value::from(v),
        None => Value::from("--"),
    }
}
