//! Best-effort public address discovery

use crate::error::NetResult;
use std::net::IpAddr;
use tokio::net::UdpSocket;

/// Resolver used only to make the OS pick an outbound source address.
const PROBE_TARGET: &str = "8.8.8.8:80";

/// Returns the local address the OS would use to reach the public
/// internet.
///
/// Connects a UDP socket to a well-known anycast resolver and reads back
/// the chosen local address; no packets are sent.
pub async fn public_ip() -> NetResult<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect(PROBE_TARGET).await?;
    Ok(socket.local_addr()?.ip())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_public_ip_is_not_unspecified() {
        // Needs a routable interface; loopback-only hosts may legitimately
        // fail to connect the probe socket
        if let Ok(ip) = public_ip().await {
            assert!(!ip.is_unspecified());
        }
    }
}
