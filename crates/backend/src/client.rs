use crate::protocol::{decode, Request};
use crate::FanBackend;
use async_trait::async_trait;
use fan_config::BackendConfig;
use fan_core::{ApplyResponse, PanelError, Result, Status};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tracing::debug;

/// Fan-control backend client over a Unix domain socket.
///
/// Opens a fresh connection per call, so a backend restart never leaves the
/// panel holding a dead stream.
#[derive(Debug, Clone)]
pub struct SocketBackend {
    socket:  PathBuf,
    timeout: Duration,
}

impl SocketBackend {
    pub fn new(socket: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            socket: socket.into(),
            timeout,
        }
    }

    pub fn from_config(cfg: &BackendConfig) -> Self {
        Self::new(&cfg.socket, Duration::from_millis(cfg.timeout_ms))
    }

    /// Path to the backend socket.
    pub fn socket(&self) -> &Path {
        &self.socket
    }

    async fn call<T: DeserializeOwned>(&self, request: Request<'_>) -> Result<T> {
        let budget_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        tokio::time::timeout(self.timeout, self.exchange(&request))
            .await
            .map_err(|_| PanelError::Timeout(budget_ms))?
    }

    async fn exchange<T: DeserializeOwned>(&self, request: &Request<'_>) -> Result<T> {
        let method = request.method();
        let mut stream = UnixStream::connect(&self.socket)
            .await
            .map_err(|e| PanelError::Backend(format!("connect '{}': {e}", self.socket.display())))?;

        stream
            .write_all(request.encode()?.as_bytes())
            .await
            .map_err(|e| PanelError::Backend(format!("write {method}: {e}")))?;

        let mut reply = String::new();
        let read = BufReader::new(&mut stream)
            .read_line(&mut reply)
            .await
            .map_err(|e| PanelError::Backend(format!("read {method}: {e}")))?;

        if read == 0 {
            return Err(PanelError::Backend(format!(
                "connection closed before {method} reply"
            )));
        }

        debug!(method, bytes = read, "backend reply");
        decode(method, &reply)
    }
}

#[async_trait]
impl FanBackend for SocketBackend {
    async fn get_status(&self) -> Result<Status> {
        self.call(Request::GetStatus).await
    }

    async fn set_profile(&self, profile: &str) -> Result<ApplyResponse> {
        self.call(Request::SetProfile { profile }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::UnixListener;

    fn socket_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("fan-backend-{}-{name}.sock", std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    /// Serve exactly one connection: record the request line, answer with `reply`.
    fn serve_once(path: &Path, reply: &'static str) -> tokio::task::JoinHandle<String> {
        let listener = UnixListener::bind(path).unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read, mut write) = stream.into_split();
            let mut request = String::new();
            BufReader::new(read).read_line(&mut request).await.unwrap();
            write.write_all(reply.as_bytes()).await.unwrap();
            request
        })
    }

    #[tokio::test]
    async fn get_status_round_trip() {
        let path = socket_path("status");
        let server = serve_once(
            &path,
            "{\"ok\":true,\"profile\":\"balanced\",\"cpu_rpm\":3200,\"gpu_rpm\":null}\n",
        );
        let backend = SocketBackend::new(&path, Duration::from_secs(2));

        let status = backend.get_status().await.unwrap();

        assert!(status.ok);
        assert_eq!(status.cpu_rpm, Some(3200.0));
        assert_eq!(status.gpu_rpm, None);
        assert_eq!(server.await.unwrap(), "{\"method\":\"get_status\"}\n");
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn set_profile_passes_the_name_through() {
        let path = socket_path("apply");
        let server = serve_once(&path, "{\"ok\":false,\"error\":\"Invalid profile\"}\n");
        let backend = SocketBackend::new(&path, Duration::from_secs(2));

        let res = backend.set_profile("turbo").await.unwrap();

        assert_eq!(res, ApplyResponse::rejected("Invalid profile"));
        assert!(server.await.unwrap().contains("\"profile\":\"turbo\""));
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn missing_socket_is_a_backend_error() {
        let backend = SocketBackend::new(socket_path("missing"), Duration::from_secs(1));
        let err = backend.get_status().await.unwrap_err();
        assert!(matches!(err, PanelError::Backend(_)), "{err}");
    }

    #[tokio::test]
    async fn silent_backend_times_out() {
        let path = socket_path("silent");
        let listener = UnixListener::bind(&path).unwrap();
        let _server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(stream);
        });
        let backend = SocketBackend::new(&path, Duration::from_millis(50));

        let err = backend.get_status().await.unwrap_err();

        assert!(matches!(err, PanelError::Timeout(50)), "{err}");
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn hang_up_without_reply_is_reported() {
        let path = socket_path("hangup");
        let listener = UnixListener::bind(&path).unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            drop(stream);
        });
        let backend = SocketBackend::new(&path, Duration::from_secs(2));

        let err = backend.get_status().await.unwrap_err();

        assert!(err.to_string().contains("get_status"), "{err}");
        let _ = std::fs::remove_file(&path);
    }
}
