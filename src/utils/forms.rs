//! Deserializadores para campos de formularios `application/x-www-form-urlencoded`.
//!
//! En un formulario todos los valores llegan como texto: un campo vacío
//! significa "sin valor" y las fechas vienen en el formato de `datetime-local`.

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{de, Deserialize, Deserializer};

use super::validation::validate_datetime;

/// Campo opcional: vacío se convierte en `None`.
///
/// Se usa junto con `#[serde(default)]` para que un campo ausente también sea `None`.
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let value = String::deserialize(deserializer)?;
    match value.trim() {
        "" => Ok(None),
        s => s.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Fecha con hora enviada por un formulario
pub fn form_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    validate_datetime(&value)
        .map_err(|_| de::Error::custom(format!("invalid date and time '{}'", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::value::{Error as ValueError, StrDeserializer};
    use serde::de::IntoDeserializer;

    #[test]
    fn test_empty_string_as_none() {
        let empty: StrDeserializer<ValueError> = "".into_deserializer();
        let parsed: Option<i32> = empty_string_as_none(empty).unwrap();
        assert_eq!(parsed, None);

        let number: StrDeserializer<ValueError> = " 42 ".into_deserializer();
        let parsed: Option<i32> = empty_string_as_none(number).unwrap();
        assert_eq!(parsed, Some(42));

        let garbage: StrDeserializer<ValueError> = "abc".into_deserializer();
        assert!(empty_string_as_none::<_, i32>(garbage).is_err());
    }

    #[test]
    fn test_form_datetime() {
        let input: StrDeserializer<ValueError> = "2024-06-01T10:00".into_deserializer();
        let parsed = form_datetime(input).unwrap();
        assert_eq!(parsed.to_string(), "2024-06-01 10:00:00");

        let input: StrDeserializer<ValueError> = "tomorrow".into_deserializer();
        assert!(form_datetime(input).is_err());
    }
}
