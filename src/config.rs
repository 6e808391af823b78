use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        })
    }
}

/// Where and how to reach the PowerDNS HTTP API.
#[derive(Clone)]
pub struct ClientConfig {
    pub scheme: Scheme,
    pub host: String,
    pub port: Option<u16>,
    pub api_key: String,
}

impl ClientConfig {
    /// `host` or `host:port`.
    pub fn authority(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }

    /// API root, e.g. `http://127.0.0.1:8081/api/v1`.
    pub fn base_url(&self) -> String {
        format!("{}://{}/api/v1", self.scheme, self.authority())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_with_and_without_port() {
        let mut config = ClientConfig {
            scheme: Scheme::Http,
            host: "127.0.0.1".into(),
            port: Some(8081),
            api_key: "secret".into(),
        };
        assert_eq!(config.base_url(), "http://127.0.0.1:8081/api/v1");

        config.scheme = Scheme::Https;
        config.port = None;
        assert_eq!(config.base_url(), "https://127.0.0.1/api/v1");
        assert!(!format!("{config:?}").contains("secret"));
    }
}
