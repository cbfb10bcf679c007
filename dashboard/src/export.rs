use crate::model::{timestamp, Reading};

pub const CSV_HEADER: &str = "Timestamp,Temperature (°C),Humidity (%),Soil Moisture (%),Status";
pub const CSV_FILENAME: &str = "sensor-data.csv";

/// Render readings as CSV, header first, rows joined by `\n`.
/// Fields are not quoted: values are numbers or short status words.
pub fn render_csv<'a, I>(readings: I) -> String
where
    I: IntoIterator<Item = &'a Reading>,
{
    let mut lines = vec![CSV_HEADER.to_string()];
    lines.extend(readings.into_iter().map(csv_row));
    lines.join("\n")
}

fn csv_row(reading: &Reading) -> String {
    format!(
        "{},{},{},{},{}",
        timestamp::format(&reading.timestamp),
        reading.temp,
        reading.hum,
        reading.soil,
        reading.status
    )
}
