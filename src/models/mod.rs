use std::fmt;

use serde::{de, Deserializer};

pub mod voting_models;
pub mod work_models;

/// Work and token ids are written by several producers; some store them as
/// integers, some as strings. Both read back as the decimal string.
pub fn string_or_integer<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct IdVisitor;

    impl<'de> de::Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or an integer id")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<String, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "string_or_integer")]
        id: String,
    }

    #[test]
    fn ids_read_from_strings_and_integers() {
        let from_text: Holder = serde_json::from_str(r#"{"id":"0x2a"}"#).unwrap();
        assert_eq!(from_text.id, "0x2a");

        let from_number: Holder = serde_json::from_str(r#"{"id":42}"#).unwrap();
        assert_eq!(from_number.id, "42");

        let from_bson: Holder =
            mongodb::bson::from_document(mongodb::bson::doc! { "id": 42_i32 }).unwrap();
        assert_eq!(from_bson.id, "42");

        assert!(serde_json::from_str::<Holder>(r#"{"id":true}"#).is_err());
    }
}
