//! TCP listener binding.
//!
//! # Responsibilities
//! - Resolve the configured listen address
//! - Bind the TCP socket the RPC server accepts on
//! - Report the address actually chosen (port 0 resolves here)

use std::net::SocketAddr;

use tokio::net::TcpListener;

/// Error type for listener operations.
#[derive(Debug)]
pub enum ListenerError {
    /// The configured address could not be parsed.
    Address { addr: String, reason: String },
    /// Failed to bind to address.
    Bind(std::io::Error),
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Address { addr, reason } => {
                write!(f, "Invalid listen address '{}': {}", addr, reason)
            }
            ListenerError::Bind(e) => write!(f, "Failed to bind: {}", e),
        }
    }
}

impl std::error::Error for ListenerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListenerError::Address { .. } => None,
            ListenerError::Bind(e) => Some(e),
        }
    }
}

/// Resolve a listen address.
///
/// A bare `:port` means every IPv4 interface on that port.
pub fn resolve_addr(addr: &str) -> Result<SocketAddr, ListenerError> {
    let trimmed = addr.trim();
    let candidate = if trimmed.starts_with(':') {
        format!("0.0.0.0{}", trimmed)
    } else {
        trimmed.to_string()
    };

    candidate.parse().map_err(|e: std::net::AddrParseError| ListenerError::Address {
        addr: addr.to_string(),
        reason: e.to_string(),
    })
}

/// Bind a TCP listener on the given address.
pub async fn bind(addr: &str) -> Result<TcpListener, ListenerError> {
    let addr = resolve_addr(addr)?;
    tracing::info!(grpc_addr = %addr, "Listen to RPC address");

    let listener = TcpListener::bind(addr).await.map_err(ListenerError::Bind)?;
    let local_addr = listener.local_addr().map_err(ListenerError::Bind)?;

    tracing::info!(address = %local_addr, "Listener bound");
    Ok(listener)
}
