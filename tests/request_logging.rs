use lognorm::config::RequestIdConfig;
use lognorm::web::{create_router, serve, AppState, MetricsSink, ProcessCounters, RequestIdResolver};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn test_request_lifecycle_is_logged() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let sink: Arc<dyn MetricsSink> = Arc::new(ProcessCounters::new());
    let state = AppState::new(RequestIdResolver::new(&RequestIdConfig::default()), sink);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(serve(listener, create_router(state, 1024 * 1024), async move {
        let _ = shutdown_rx.await;
    }));

    let response = reqwest::Client::new()
        .post(format!("http://{}/transform", addr))
        .header("X-Request-ID", "req-log")
        .body(
            r#"[{"level":"e","message":"a","service":"s","error_type":"io"},
                {"level":"fatal","message":"b","service":"s","error_type":"db"},
                {"level":"err","message":"c","service":"s","error_type":"io"}]"#,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let _ = shutdown_tx.send(());
    handle.await.unwrap().unwrap();

    let output = logs.contents();
    let completed = output
        .lines()
        .find(|line| line.contains("Request completed"))
        .expect("completion event logged");

    assert!(completed.contains("request_id=req-log"));
    assert!(completed.contains("logs_processed=3"));
    // distinct error types, as in the REQUEST_END line of earlier deployments
    assert!(completed.contains("errors=2"));
    assert!(output.contains("Request started"));
    assert!(output.contains("log_count=3"));
}
