//! Module `data_channel`
//!
//! Opens the per-request data connection. The server always dials out to the
//! port the client announced with `DPORT`, on the same address the control
//! connection came from.

use log::{error, info};
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpStream;

use crate::error::TransferError;

/// Connects to the client's data listener.
///
/// # Arguments
///
/// * `client_ip` - Peer address of the control connection
/// * `data_port` - Port from the client's `DPORT` announcement, if any
///
/// # Returns
///
/// * `Ok(TcpStream)` - A ready-to-use data connection
/// * `Err(TransferError)` - No port was announced or the connect failed
pub async fn open_data_connection(
    client_ip: IpAddr,
    data_port: Option<u16>,
) -> Result<TcpStream, TransferError> {
    let port = data_port.ok_or(TransferError::DataPortMissing)?;
    let data_socket = SocketAddr::new(client_ip, port);

    match TcpStream::connect(data_socket).await {
        Ok(stream) => {
            info!("data connection established with {}", data_socket);
            Ok(stream)
        }
        Err(e) => {
            error!("Failed to connect to client data socket {}: {}", data_socket, e);
            Err(TransferError::ConnectFailed(data_socket, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn connects_to_announced_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let (dialed, accepted) = tokio::join!(
            open_data_connection(IpAddr::V4(Ipv4Addr::LOCALHOST), Some(port)),
            listener.accept()
        );
        let stream = dialed.unwrap();
        let (_, peer) = accepted.unwrap();
        assert_eq!(stream.local_addr().unwrap(), peer);
    }

    #[tokio::test]
    async fn missing_port_is_an_error() {
        let result = open_data_connection(IpAddr::V4(Ipv4Addr::LOCALHOST), None).await;
        assert!(matches!(result, Err(TransferError::DataPortMissing)));
    }

    #[tokio::test]
    async fn refused_connection_is_an_error() {
        // Bind then drop to find a port nobody is listening on.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let result = open_data_connection(IpAddr::V4(Ipv4Addr::LOCALHOST), Some(port)).await;
        assert!(matches!(result, Err(TransferError::ConnectFailed(addr, _)) if addr.port() == port));
    }
}
