use std::fmt;

/// How the query reached the proxy, and therefore how it is sent upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DohMethod {
    Get,
    Post,
}

impl DohMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DohMethod::Get => "GET",
            DohMethod::Post => "POST",
        }
    }
}

impl fmt::Display for DohMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wire-format DoH query together with the caller's address as received
/// from the edge (possibly missing or garbage).
#[derive(Debug, Clone)]
pub struct DohRequest {
    pub message: Vec<u8>,
    pub client_ip: Option<String>,
    pub method: DohMethod,
}

impl DohRequest {
    pub fn new(message: Vec<u8>, client_ip: Option<String>, method: DohMethod) -> Self {
        Self {
            message,
            client_ip,
            method,
        }
    }
}

/// An `application/dns-json` query, kept as its ordered query-string pairs.
#[derive(Debug, Clone, Default)]
pub struct JsonQuery {
    pub params: Vec<(String, String)>,
    pub client_ip: Option<String>,
}

impl JsonQuery {
    pub const CLIENT_SUBNET_PARAM: &'static str = "edns_client_subnet";

    pub fn new(params: Vec<(String, String)>, client_ip: Option<String>) -> Self {
        Self { params, client_ip }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces every occurrence of `key` with a single pair at the position
    /// of the first one, or appends it.
    pub fn set_param(&mut self, key: &str, value: String) {
        match self.params.iter().position(|(k, _)| k == key) {
            Some(first) => {
                self.params[first].1 = value;
                let mut index = 0;
                self.params.retain(|(k, _)| {
                    let keep = index <= first || k != key;
                    index += 1;
                    keep
                });
            }
            None => self.params.push((key.to_string(), value)),
        }
    }
}
