use serde::{Deserialize, Serialize};

/// Point in time as the CA sends it: an RFC 3339 string in protocol JSON, or
/// the raw `{seconds, nanos}` pair in plain JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Rfc3339(String),
    Parts {
        #[serde(default)]
        seconds: i64,
        #[serde(default)]
        nanos: i32,
    },
}
