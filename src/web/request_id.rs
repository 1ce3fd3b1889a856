use crate::config::RequestIdConfig;
use axum::http::HeaderMap;
use uuid::Uuid;

/// Picks the correlation id for an incoming request.
#[derive(Debug, Clone)]
pub struct RequestIdResolver {
    headers: Vec<String>,
    prefix: String,
}

impl RequestIdResolver {
    pub fn new(config: &RequestIdConfig) -> Self {
        Self {
            headers: config.headers.clone(),
            prefix: config.prefix.clone(),
        }
    }

    /// First non-empty configured header, otherwise a freshly generated id.
    pub fn resolve(&self, headers: &HeaderMap) -> String {
        self.headers
            .iter()
            .filter_map(|name| headers.get(name.as_str()))
            .filter_map(|value| value.to_str().ok())
            .find(|value| !value.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.generate())
    }

    /// Prefix followed by 8 random bytes as lowercase hex.
    pub fn generate(&self) -> String {
        let bytes = *Uuid::new_v4().as_bytes();
        // Bytes 6 and 8 carry the v4 version and variant bits.
        let hex: String = bytes[..6]
            .iter()
            .chain(&bytes[10..12])
            .map(|b| format!("{:02x}", b))
            .collect();
        format!("{}{}", self.prefix, hex)
    }
}

impl Default for RequestIdResolver {
    fn default() -> Self {
        Self::new(&RequestIdConfig::default())
    }
}
