//! Shared networking constants and helpers used by client and server.

/// Default TCP port for the command channel (client -> server).
pub const COMMAND_PORT: u16 = 8080;
/// Default TCP port for the subscriber stream (server -> client push).
pub const STREAM_PORT: u16 = 8081;

/// Helper to format an IP address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}
