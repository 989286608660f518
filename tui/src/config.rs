use std::path::PathBuf;

use clap::{builder::NonEmptyStringValueParser, Parser};

/// Terminal client for the anonymous chat service
#[derive(Parser, Debug, Clone)]
#[command(name = "anonchat")]
#[command(version)]
pub struct Config {
    /// Chat server host and port
    #[arg(short, long, env = "ANONCHAT_SERVER", default_value = "localhost:8080")]
    pub server: String,

    /// Id the server attributes your messages to, used to recognize own messages
    #[arg(short, long, env = "ANONCHAT_USER_ID", value_parser = NonEmptyStringValueParser::new())]
    pub user_id: String,

    /// File receiving the logs, the terminal itself is used by the UI
    #[arg(long, env = "ANONCHAT_LOG_FILE", default_value = "anonchat.log")]
    pub log_file: PathBuf,

    /// Log level (trace, debug, info, warn, error), RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["anonchat", "--user-id", "abc12345"]).unwrap();

        assert_eq!(config.server, "localhost:8080");
        assert_eq!(config.user_id, "abc12345");
        assert_eq!(config.log_file, PathBuf::from("anonchat.log"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_explicit_arguments() {
        let config = Config::try_parse_from(["anonchat", "-u", "abc12345", "-s", "chat:9000"])
            .unwrap();

        assert_eq!(config.user_id, "abc12345");
        assert_eq!(config.server, "chat:9000");
    }

    #[test]
    fn test_user_id_is_required() {
        if std::env::var_os("ANONCHAT_USER_ID").is_some() {
            return;
        }

        let err = Config::try_parse_from(["anonchat"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_empty_user_id_is_rejected() {
        assert!(Config::try_parse_from(["anonchat", "--user-id", ""]).is_err());
    }
}
