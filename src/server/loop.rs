// Server loop module
// Accepts connections until a shutdown is requested, then drains

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::shutdown::drain_connections;
use super::signal::SignalHandler;
use crate::config;
use crate::logger;

/// Run the accept loop on `listener`
///
/// Accept errors (e.g. the process is out of file descriptors) are logged
/// and the loop keeps going; only a shutdown request ends it. The listener
/// is closed before in-flight connections are given
/// `performance.shutdown_grace` seconds to finish.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
    active_connections: Arc<AtomicUsize>,
    signals: Arc<SignalHandler>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = signals.shutdown.notified() => {
                break;
            }
        }
    }

    drop(listener);
    let grace = Duration::from_secs(state.config.performance.shutdown_grace);
    drain_connections(&active_connections, grace).await;
    logger::log_shutdown();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::create_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn raw_request(addr: std::net::SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        String::from_utf8_lossy(&response).into_owned()
    }

    struct Running {
        _dir: tempfile::TempDir,
        addr: std::net::SocketAddr,
        counter: Arc<AtomicUsize>,
        signals: Arc<SignalHandler>,
        server: tokio::task::JoinHandle<()>,
    }

    fn start() -> Running {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::write(root.join("index.html"), "A").unwrap();

        let mut cfg = Config::defaults().unwrap();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 0;
        let listener = create_listener(cfg.get_socket_addr().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();

        let state = Arc::new(config::AppState::new(&cfg, root));
        let counter = Arc::new(AtomicUsize::new(0));
        let signals = Arc::new(SignalHandler::new());
        let server = tokio::spawn(start_server_loop(
            listener,
            state,
            Arc::clone(&counter),
            Arc::clone(&signals),
        ));
        Running {
            _dir: dir,
            addr,
            counter,
            signals,
            server,
        }
    }

    async fn stop(running: Running) {
        running.signals.request_shutdown();
        tokio::time::timeout(Duration::from_secs(10), running.server)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(running.counter.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_serves_over_tcp_and_shuts_down() {
        let running = start();
        let addr = running.addr;

        let response = raw_request(
            addr,
            "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
        assert!(response.contains("Content-Type: text/html\r\n"), "{response}");
        assert!(response.contains("X-Frame-Options: DENY\r\n"), "{response}");
        assert!(response.contains("Access-Control-Allow-Origin: *\r\n"), "{response}");
        assert!(response.ends_with("\r\n\r\nA"), "{response}");

        let response = raw_request(
            addr,
            "GET /missing.png HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"), "{response}");
        assert!(response.contains("/missing.png"), "{response}");

        let response = raw_request(
            addr,
            "GET /index.html/ HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"), "{response}");

        stop(running).await;
    }

    // hyper answers unparseable request targets itself, before the handler
    // runs, so these responses lack the fixed header set
    #[tokio::test]
    async fn test_malformed_target_is_rejected_by_hyper() {
        let running = start();
        let response = raw_request(
            running.addr,
            "GET /x<y>.html HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{response}");
        assert!(!response.contains("X-Frame-Options"), "{response}");
        stop(running).await;
    }
}
