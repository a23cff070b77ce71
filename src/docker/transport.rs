use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use bytes::Bytes;
use http::{Request, Response, header};
use http_body_util::{BodyExt, Empty};
use hyper::body::Incoming;
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncRead, AsyncWrite};

use super::{Error, Result};

/// Socket the Docker daemon listens on by default.
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/docker.sock";

/// Address of a Docker Engine API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// A UNIX domain socket, e.g. `unix:///var/run/docker.sock`.
    Unix(PathBuf),
    /// A plain TCP address (`host:port`), from `tcp://` or `http://` URLs.
    Tcp(String),
}

impl Endpoint {
    fn host(&self) -> &str {
        match self {
            Endpoint::Unix(_) => "docker",
            Endpoint::Tcp(addr) => addr,
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Endpoint::Unix(PathBuf::from(DEFAULT_SOCKET_PATH))
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Some(path) = s.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(Error::InvalidEndpoint(s.to_owned()));
            }
            return Ok(Endpoint::Unix(PathBuf::from(path)));
        }

        let addr = s
            .strip_prefix("tcp://")
            .or_else(|| s.strip_prefix("http://"))
            .map(|addr| addr.trim_end_matches('/'))
            .ok_or_else(|| Error::InvalidEndpoint(s.to_owned()))?;
        if addr.is_empty() || addr.contains('/') {
            return Err(Error::InvalidEndpoint(s.to_owned()));
        }

        Ok(Endpoint::Tcp(addr.to_owned()))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Unix(path) => write!(f, "unix://{}", path.display()),
            Endpoint::Tcp(addr) => write!(f, "tcp://{addr}"),
        }
    }
}

/// Issues a single `GET` request on a fresh connection and buffers the whole body.
pub(crate) async fn get(endpoint: &Endpoint, path: &str) -> Result<Response<Bytes>> {
    let request = Request::get(path)
        .header(header::HOST, endpoint.host())
        .body(Empty::<Bytes>::new())
        .map_err(|source| Error::Request {
            path: path.to_owned(),
            source,
        })?;

    log::debug!("Connecting to {endpoint}...");
    let response = match endpoint {
        Endpoint::Unix(socket) => {
            let stream = tokio::net::UnixStream::connect(socket)
                .await
                .map_err(|source| Error::Connect {
                    endpoint: endpoint.to_string(),
                    source,
                })?;
            send(stream, request).await
        }
        Endpoint::Tcp(addr) => {
            let stream = tokio::net::TcpStream::connect(addr.as_str())
                .await
                .map_err(|source| Error::Connect {
                    endpoint: endpoint.to_string(),
                    source,
                })?;
            send(stream, request).await
        }
    }
    .map_err(|source| Error::Http {
        path: path.to_owned(),
        source,
    })?;

    let (parts, body) = response.into_parts();
    let body = body
        .collect()
        .await
        .map_err(|source| Error::Http {
            path: path.to_owned(),
            source,
        })?
        .to_bytes();

    Ok(Response::from_parts(parts, body))
}

async fn send<T>(
    io: T,
    request: Request<Empty<Bytes>>,
) -> std::result::Result<Response<Incoming>, hyper::Error>
where
    T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (mut sender, connection) = hyper::client::conn::http1::handshake(TokioIo::new(io)).await?;
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            log::debug!("Connection closed with error: {err}");
        }
    });

    sender.send_request(request).await
}
