//! Works API endpoint configuration.

/// Portfolio works REST endpoint
#[derive(Debug, Clone)]
pub struct WorksApiConfig {
    /// Host name or address of the works backend
    pub host: String,

    /// TCP port of the works backend
    pub port: u16,

    /// API path prefix
    pub base_path: String,
}

impl Default for WorksApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            base_path: "/api/works".to_string(),
        }
    }
}

impl WorksApiConfig {
    /// Parse a `host:port` pair, falling back to the default port when the
    /// colon is absent
    pub fn from_addr(addr: &str) -> Self {
        let mut config = Self::default();
        match addr.rsplit_once(':') {
            Some((host, port)) => {
                config.host = host.to_string();
                if let Ok(port) = port.parse() {
                    config.port = port;
                }
            }
            None => config.host = addr.to_string(),
        }
        config
    }

    /// Socket address string for connecting
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_addr_with_port() {
        let config = WorksApiConfig::from_addr("works.example.com:8080");
        assert_eq!(config.host, "works.example.com");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_from_addr_without_port() {
        let config = WorksApiConfig::from_addr("localhost");
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5000);
    }
}
