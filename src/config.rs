use secrecy::SecretString;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub question_source_url: String,
    pub outbound_gateway_url: String,
    pub outbound_token: SecretString,
    pub session_ttl_secs: u64,
    pub web_server_host: String,
    pub web_server_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "placement-local".to_string()),
            question_source_url: env::var("QUESTION_SOURCE_URL")
                .unwrap_or_else(|_| "http://localhost:9090/questions".to_string()),
            outbound_gateway_url: env::var("OUTBOUND_GATEWAY_URL")
                .unwrap_or_else(|_| "http://localhost:9091/messages".to_string()),
            outbound_token: SecretString::from(
                env::var("OUTBOUND_TOKEN").unwrap_or_else(|_| "dev_outbound_token".to_string()),
            ),
            session_ttl_secs: env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
        }
    }

    /// Validate that production-critical configuration is set
    /// Panics if required secrets are using default values
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        if self.outbound_token.expose_secret() == "dev_outbound_token" {
            panic!(
                "FATAL: OUTBOUND_TOKEN is using default value! Set OUTBOUND_TOKEN environment variable."
            );
        }

        if self.question_source_url.starts_with("http://localhost") {
            panic!(
                "FATAL: QUESTION_SOURCE_URL is using default value! Set QUESTION_SOURCE_URL environment variable."
            );
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "placement-test".to_string(),
            question_source_url: "http://localhost:9090/questions".to_string(),
            outbound_gateway_url: "http://localhost:9091/messages".to_string(),
            outbound_token: SecretString::from("test_outbound_token".to_string()),
            session_ttl_secs: 60,
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
        }
    }
}
