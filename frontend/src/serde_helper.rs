//! JSON 字符串序列化辅助
//!
//! LocalStorage 只能存字符串，本模块在 `serde_json_wasm` 之上提供
//! 带统一错误类型的编解码入口。

use serde::{Serialize, de::DeserializeOwned};

/// Error type for serialization/deserialization operations
#[derive(Debug)]
pub enum Error {
    Serialize(String),
    Deserialize(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Serialize(msg) => write!(f, "JSON serialize error: {}", msg),
            Error::Deserialize(msg) => write!(f, "JSON deserialize error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Convert a Rust data structure to a JSON string
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String, Error> {
    serde_json_wasm::to_string(value).map_err(|e| Error::Serialize(e.to_string()))
}

/// Parse a JSON string into a Rust data structure
pub fn from_json_string<T: DeserializeOwned>(raw: &str) -> Result<T, Error> {
    serde_json_wasm::from_str(raw).map_err(|e| Error::Deserialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_via_string() {
        let value = vec!["a".to_string(), "b".to_string()];
        let raw = to_json_string(&value).unwrap();
        let back: Vec<String> = from_json_string(&raw).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn corrupt_input_is_an_error_not_a_panic() {
        let result: Result<Vec<String>, Error> = from_json_string("{not json");
        assert!(result.is_err());
    }
}
