use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JWT payload used for authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: String, // user email
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    #[serde(flatten)]
    pub extra: Map<String, Value>, // auxiliary claims
}

impl Claims {
    pub fn subject(&self) -> Option<&str> {
        Some(self.sub.as_str()).filter(|s| !s.is_empty())
    }
}
