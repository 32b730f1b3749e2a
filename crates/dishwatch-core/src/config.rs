//! Dish connection settings.

use std::time::Duration;

/// Default dish address on a Starlink LAN.
pub const DEFAULT_DISH_HOST: &str = "192.168.100.1";
/// Default dish gRPC port.
pub const DEFAULT_DISH_PORT: u16 = 9200;
/// gRPC method every dish request goes through.
pub const DISH_GRPC_METHOD: &str = "SpaceX.API.Device.Device/Handle";

/// Where the dish lives and how to ask it for data.
///
/// Commands are program + arguments, run without a shell. Their stdout must
/// be a single JSON object.
#[derive(Debug, Clone)]
pub struct DishConfig {
    pub host: String,
    pub port: u16,
    /// Timeout for the TCP reachability pre-check.
    pub connect_timeout: Duration,
    /// Timeout for each provider command.
    pub command_timeout: Duration,
    pub status_command: Option<Vec<String>>,
    pub obstruction_command: Option<Vec<String>>,
    pub history_command: Option<Vec<String>>,
}

impl Default for DishConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DISH_HOST, DEFAULT_DISH_PORT)
    }
}

impl DishConfig {
    /// Config for `host:port` with grpcurl-based status, obstruction and
    /// history commands.
    pub fn new(host: &str, port: u16) -> Self {
        let addr = format!("{host}:{port}");
        Self {
            host: host.to_string(),
            port,
            connect_timeout: Duration::from_secs(2),
            command_timeout: Duration::from_secs(5),
            status_command: Some(grpcurl_command(&addr, r#"{"get_status":{}}"#)),
            obstruction_command: Some(grpcurl_command(
                &addr,
                r#"{"dish_get_obstruction_map":{}}"#,
            )),
            history_command: Some(grpcurl_command(&addr, r#"{"get_history":{}}"#)),
        }
    }

    /// `host:port` as a display string.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn grpcurl_command(addr: &str, request: &str) -> Vec<String> {
    [
        "grpcurl",
        "-plaintext",
        "-d",
        request,
        addr,
        DISH_GRPC_METHOD,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Split a command line on whitespace into program + arguments.
///
/// No quoting is supported; arguments must not contain spaces.
pub fn parse_command(line: &str) -> Option<Vec<String>> {
    let parts: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    if parts.is_empty() { None } else { Some(parts) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_address() {
        let config = DishConfig::default();
        assert_eq!(config.address(), "192.168.100.1:9200");
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        let history = config.history_command.unwrap();
        assert!(history.contains(&r#"{"get_history":{}}"#.to_string()));
    }

    #[test]
    fn test_default_status_command_targets_address() {
        let config = DishConfig::new("10.0.0.5", 9300);
        let cmd = config.status_command.unwrap();
        assert_eq!(cmd[0], "grpcurl");
        assert!(cmd.contains(&"10.0.0.5:9300".to_string()));
        assert!(cmd.contains(&r#"{"get_status":{}}"#.to_string()));
        assert_eq!(cmd.last().unwrap(), DISH_GRPC_METHOD);
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse_command("  python3 dish.py  --json "),
            Some(vec![
                "python3".to_string(),
                "dish.py".to_string(),
                "--json".to_string()
            ])
        );
        assert_eq!(parse_command("   "), None);
    }
}
