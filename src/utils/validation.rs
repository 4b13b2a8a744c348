//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

/// Formatos aceptados para fechas con hora en formularios
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar y convertir string a fecha con hora (sin zona horaria).
///
/// Una fecha sola se interpreta a medianoche.
pub fn validate_datetime(value: &str) -> Result<NaiveDateTime, ValidationError> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            validate_date(value)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| {
            let mut error = ValidationError::new("datetime");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"YYYY-MM-DDTHH:MM[:SS]".to_string());
            error
        })
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Importes (tarifas, costes, ingresos) nunca negativos
pub fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(*value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_validate_date() {
        let valid_date = "2024-01-15";
        assert!(validate_date(valid_date).is_ok());

        let invalid_date = "2024/01/15";
        assert!(validate_date(invalid_date).is_err());
    }

    #[test]
    fn test_validate_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(validate_datetime("2024-03-01T09:30").unwrap(), expected);
        assert_eq!(validate_datetime("2024-03-01T09:30:00").unwrap(), expected);
        assert_eq!(validate_datetime("2024-03-01 09:30:00").unwrap(), expected);

        let midnight = validate_datetime("2024-03-01").unwrap();
        assert_eq!(midnight.hour(), 0);

        assert!(validate_datetime("01/03/2024").is_err());
        assert!(validate_datetime("").is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(0).is_ok());
        assert!(validate_non_negative(5).is_ok());
        assert!(validate_non_negative(-5).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(&Decimal::new(2500, 2)).is_ok());
        assert!(validate_amount(&Decimal::ZERO).is_ok());
        assert!(validate_amount(&Decimal::new(-1, 2)).is_err());
    }
}
