use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DATA_FILE: &str = "world_cup.csv";

pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_PORT: u16 = 8050;
pub const DEFAULT_BROADCAST_BUFFER: usize = 64;
pub const SSE_KEEPALIVE_SECS: u64 = 15;

pub fn bind_addr() -> SocketAddr {
    let host = std::env::var("HOST")
        .ok()
        .and_then(|value| value.trim().parse::<IpAddr>().ok())
        .unwrap_or(DEFAULT_HOST);
    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_PORT);
    SocketAddr::new(host, port)
}

pub fn sse_broadcast_buffer() -> usize {
    std::env::var("SSE_BROADCAST_BUFFER")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_BROADCAST_BUFFER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_defaults_to_local_dashboard_port() {
        temp_env::with_vars_unset(["HOST", "PORT"], || {
            assert_eq!(bind_addr(), "127.0.0.1:8050".parse::<SocketAddr>().expect("socket addr"));
        });
    }

    #[test]
    fn bind_addr_reads_host_and_port() {
        temp_env::with_vars([("HOST", Some("0.0.0.0")), ("PORT", Some(" 9000 "))], || {
            assert_eq!(bind_addr(), "0.0.0.0:9000".parse::<SocketAddr>().expect("socket addr"));
        });
    }

    #[test]
    fn bind_addr_ignores_invalid_values() {
        temp_env::with_vars([("HOST", Some("not-an-ip")), ("PORT", Some("0"))], || {
            assert_eq!(bind_addr(), "127.0.0.1:8050".parse::<SocketAddr>().expect("socket addr"));
        });
    }

    #[test]
    fn broadcast_buffer_falls_back_on_zero() {
        temp_env::with_var("SSE_BROADCAST_BUFFER", Some("0"), || {
            assert_eq!(sse_broadcast_buffer(), DEFAULT_BROADCAST_BUFFER);
        });
        temp_env::with_var("SSE_BROADCAST_BUFFER", Some("8"), || {
            assert_eq!(sse_broadcast_buffer(), 8);
        });
    }
}
