//! A single producer-side STOMP connection.

use crate::codec::StompCodec;
use crate::error::StompError;
use crate::frame::{Command, Frame};
use bytes::Bytes;
use futures::{FutureExt, SinkExt, StreamExt};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, info};

/// Default time to wait for the broker to acknowledge DISCONNECT.
pub const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection parameters for [`StompConnection::connect`].
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub host: String,
    pub port: u16,
    pub login: Option<String>,
    pub passcode: Option<String>,
    pub receipt_timeout: Duration,
}

impl ConnectOptions {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            login: None,
            passcode: None,
            receipt_timeout: DEFAULT_RECEIPT_TIMEOUT,
        }
    }

    /// Set login and passcode. CONNECT only carries them when both are set.
    pub fn with_credentials(mut self, login: Option<String>, passcode: Option<String>) -> Self {
        self.login = login;
        self.passcode = passcode;
        self
    }

    pub fn with_receipt_timeout(mut self, timeout: Duration) -> Self {
        self.receipt_timeout = timeout;
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn connect_frame(&self) -> Frame {
        Frame::connect(&self.host, self.login.as_deref(), self.passcode.as_deref())
    }
}

/// An established STOMP session.
///
/// Generic over the transport so the handshake and send path can run over
/// in-memory streams as well as TCP.
pub struct StompConnection<T = TcpStream> {
    framed: Framed<T, StompCodec>,
    version: String,
    server: Option<String>,
    session: Option<String>,
    receipt_timeout: Duration,
    next_receipt: u64,
}

impl StompConnection<TcpStream> {
    /// Open a TCP connection and perform the CONNECT handshake.
    pub async fn connect(options: &ConnectOptions) -> Result<Self, StompError> {
        let addr = options.addr();
        debug!("Opening TCP connection to {}", addr);

        let stream = TcpStream::connect((options.host.as_str(), options.port))
            .await
            .map_err(|source| StompError::Connect {
                addr: addr.clone(),
                source,
            })?;
        stream.set_nodelay(true)?;

        Self::handshake(stream, options).await
    }
}

impl<T> StompConnection<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Send CONNECT over `io` and wait for CONNECTED.
    pub async fn handshake(io: T, options: &ConnectOptions) -> Result<Self, StompError> {
        let mut framed = Framed::new(io, StompCodec::new());
        framed.send(options.connect_frame()).await?;

        let frame = match framed.next().await {
            Some(frame) => frame?,
            None => return Err(StompError::ConnectionClosed),
        };

        match frame.command {
            Command::Connected => {}
            Command::Error => {
                return Err(StompError::Rejected {
                    message: frame.error_message(),
                    details: String::from_utf8_lossy(&frame.body).into_owned(),
                })
            }
            other => return Err(StompError::UnexpectedFrame(other.to_string())),
        }

        let connection = Self {
            version: frame.get_header("version").unwrap_or("1.0").to_string(),
            server: frame.get_header("server").map(str::to_string),
            session: frame.get_header("session").map(str::to_string),
            framed,
            receipt_timeout: options.receipt_timeout,
            next_receipt: 0,
        };

        info!(
            "STOMP session established with {} (version {}, server {})",
            options.addr(),
            connection.version,
            connection.server.as_deref().unwrap_or("unknown")
        );

        Ok(connection)
    }

    /// Negotiated protocol version.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    /// Send one message to `destination` with extra headers.
    ///
    /// Fails without writing if the broker has already pushed an ERROR
    /// frame or closed the connection.
    pub async fn send(
        &mut self,
        destination: &str,
        body: impl Into<Bytes>,
        headers: &[(&str, &str)],
    ) -> Result<(), StompError> {
        self.check_pending()?;

        let mut frame = Frame::send(destination, body);
        for (name, value) in headers {
            frame = frame.header(*name, *value);
        }
        self.framed.send(frame).await
    }

    /// Drain whatever the broker has pushed so far without waiting.
    fn check_pending(&mut self) -> Result<(), StompError> {
        while let Some(next) = self.framed.next().now_or_never() {
            match next {
                None => return Err(StompError::ConnectionClosed),
                Some(Err(e)) => return Err(e),
                Some(Ok(frame)) if frame.command == Command::Error => {
                    return Err(StompError::Broker {
                        message: frame.error_message(),
                        details: String::from_utf8_lossy(&frame.body).into_owned(),
                    })
                }
                Some(Ok(frame)) => debug!("Ignoring {} frame from broker", frame.command),
            }
        }
        Ok(())
    }

    /// Send DISCONNECT, wait for its receipt, and close the transport.
    ///
    /// Writing the frame and waiting for the receipt share one timeout, so a
    /// broker that stopped reading cannot stall the close. A broker that
    /// simply closes the socket counts as a clean close.
    pub async fn disconnect(mut self) -> Result<(), StompError> {
        self.next_receipt += 1;
        let receipt = format!("disconnect-{}", self.next_receipt);

        let timeout = self.receipt_timeout;
        let framed = &mut self.framed;
        let wait = async {
            if let Err(e) = framed.send(Frame::disconnect(&receipt)).await {
                return Err(e);
            }
            loop {
                match framed.next().await {
                    None => {
                        debug!("Broker closed the connection before sending a receipt");
                        return Ok(());
                    }
                    Some(Err(e)) => return Err(e),
                    Some(Ok(frame)) => match frame.command {
                        Command::Receipt
                            if frame.get_header("receipt-id") == Some(receipt.as_str()) =>
                        {
                            return Ok(())
                        }
                        Command::Error => {
                            return Err(StompError::Broker {
                                message: frame.error_message(),
                                details: String::from_utf8_lossy(&frame.body).into_owned(),
                            })
                        }
                        other => debug!("Ignoring {} frame while disconnecting", other),
                    },
                }
            }
        };

        let outcome = tokio::time::timeout(timeout, wait).await;
        let result = match outcome {
            Ok(result) => result,
            Err(_) => Err(StompError::ReceiptTimeout(receipt.clone())),
        };

        // After a timeout the write buffer may never drain; dropping the
        // transport closes the socket without flushing.
        if result.is_ok() {
            if let Err(e) = self.framed.close().await {
                debug!("Error shutting down transport: {}", e);
            }
        }

        result
    }
}
