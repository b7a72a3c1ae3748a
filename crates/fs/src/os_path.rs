//! JSON form for file names and paths that keeps every byte.
//!
//! Valid UTF-8 is written as a plain string. Anything else is written as
//! `{"hex": "<raw bytes>"}` so the name of the file on disk survives a
//! `persist` / `load` round trip.

use std::ffi::{OsStr, OsString};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use serde_json::Value;

#[derive(Serialize)]
struct RawBytes {
    hex: String,
}

pub(crate) fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: AsRef<OsStr>,
    S: Serializer,
{
    let os = value.as_ref();
    match os.to_str() {
        Some(text) => serializer.serialize_str(text),
        None => RawBytes {
            hex: hex::encode(raw_bytes(os)),
        }
        .serialize(serializer),
    }
}

pub(crate) fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: From<OsString>,
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    from_value(value).map(T::from).map_err(D::Error::custom)
}

/// Same encoding for optional fields.
pub(crate) mod option {
    use std::ffi::{OsStr, OsString};

    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
    use serde_json::Value;

    use super::from_value;

    pub(crate) fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<OsStr>,
        S: Serializer,
    {
        match value {
            Some(v) => super::serialize(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: From<OsString>,
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None => Ok(None),
            Some(value) => from_value(value)
                .map(|os| Some(T::from(os)))
                .map_err(D::Error::custom),
        }
    }
}

fn from_value(value: Value) -> Result<OsString, String> {
    match value {
        Value::String(s) => Ok(OsString::from(s)),
        Value::Object(mut map) => match map.remove("hex") {
            Some(Value::String(h)) => {
                let bytes = hex::decode(&h).map_err(|e| format!("invalid hex path {h:?}: {e}"))?;
                os_from_bytes(bytes)
            }
            _ => Err("expected a path string or {\"hex\": ...}".to_string()),
        },
        other => Err(format!("expected a path, found {other}")),
    }
}

#[cfg(unix)]
fn raw_bytes(os: &OsStr) -> &[u8] {
    use std::os::unix::ffi::OsStrExt;
    os.as_bytes()
}

#[cfg(not(unix))]
fn raw_bytes(os: &OsStr) -> &[u8] {
    os.as_encoded_bytes()
}

#[cfg(unix)]
fn os_from_bytes(bytes: Vec<u8>) -> Result<OsString, String> {
    use std::os::unix::ffi::OsStringExt;
    Ok(OsString::from_vec(bytes))
}

// Only unix names are arbitrary bytes; elsewhere a raw name must still be UTF-8.
#[cfg(not(unix))]
fn os_from_bytes(bytes: Vec<u8>) -> Result<OsString, String> {
    String::from_utf8(bytes)
        .map(OsString::from)
        .map_err(|e| format!("path is not valid Unicode on this platform: {e}"))
}

#[cfg(test)]
#[path = "os_path_tests.rs"]
mod tests;
