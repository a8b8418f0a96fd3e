//! Temperature conversions applied only when formatting responses.

use crate::model::Unit;

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

/// Round half away from zero to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Convert a Celsius value to the requested display unit, rounded to one decimal.
pub fn display_temperature(celsius: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Celsius => round1(celsius),
        Unit::Fahrenheit => round1(celsius_to_fahrenheit(celsius)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hot_day_in_fahrenheit() {
        assert_eq!(display_temperature(34.0, Unit::Fahrenheit), 93.2);
    }

    #[test]
    fn freezing_point() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(fahrenheit_to_celsius(32.0), 0.0);
        assert_eq!(display_temperature(-40.0, Unit::Fahrenheit), -40.0);
    }

    #[test]
    fn celsius_display_is_rounded() {
        assert_eq!(display_temperature(21.47, Unit::Celsius), 21.5);
        assert_eq!(display_temperature(-3.04, Unit::Celsius), -3.0);
    }

    #[test]
    fn conversion_is_reversible_within_rounding() {
        let c = 17.3;
        assert!((fahrenheit_to_celsius(celsius_to_fahrenheit(c)) - c).abs() < 1e-9);
    }
}
