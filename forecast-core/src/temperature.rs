use crate::model::Unit;

/// Converts a Celsius reading into whole degrees of `unit`.
pub fn format_temperature(temp_c: f64, unit: Unit) -> i64 {
    let value = match unit {
        Unit::Celsius => temp_c,
        Unit::Fahrenheit => temp_c * 9.0 / 5.0 + 32.0,
    };

    value.round() as i64
}
