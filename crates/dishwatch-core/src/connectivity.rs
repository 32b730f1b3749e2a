//! Reachability pre-check for the dish's gRPC port.

use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::debug;

/// Troubleshooting hints shown when the dish cannot be reached.
pub const UNREACHABLE_HINTS: &[&str] = &[
    "Your Starlink dish is powered on",
    "You are connected to the Starlink network",
    "You can access http://192.168.100.1 in a browser",
];

/// Open (and immediately drop) a TCP connection to `host:port`.
///
/// Errors carry the address in their message.
pub fn check_dish_reachable(host: &str, port: u16, timeout: Duration) -> io::Result<()> {
    let addr_str = format!("{host}:{port}");
    let addrs = (host, port).to_socket_addrs().map_err(|e| {
        io::Error::new(e.kind(), format!("cannot resolve {addr_str}: {e}"))
    })?;

    let mut last_err = io::Error::new(
        io::ErrorKind::NotFound,
        format!("no addresses for {addr_str}"),
    );
    for addr in addrs {
        debug!("probing dish at {addr}");
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(_) => return Ok(()),
            Err(e) => {
                last_err = io::Error::new(e.kind(), format!("cannot reach {addr_str}: {e}"));
            }
        }
    }
    Err(last_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_reachable_local_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        assert!(check_dish_reachable("127.0.0.1", port, Duration::from_secs(2)).is_ok());
    }

    #[test]
    fn test_unreachable_closed_port() {
        // Bind then drop to get a port with nothing listening.
        let port = {
            let l = TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let err = check_dish_reachable("127.0.0.1", port, Duration::from_millis(500)).unwrap_err();
        assert!(err.to_string().contains(&format!("127.0.0.1:{port}")));
    }

    #[test]
    fn test_hints_present() {
        assert_eq!(UNREACHABLE_HINTS.len(), 3);
    }
}
