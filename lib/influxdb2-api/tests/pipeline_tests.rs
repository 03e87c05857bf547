//! Request builder behavior over a scripted transport: retries, cancellation,
//! completion delivery and progress.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert2::{check, let_assert};
use bytes::Bytes;
use influxdb2_api::retry::{RetryDecision, RetryPolicy};
use influxdb2_api::{
    ApiConfig, ApiRequest, BoxFuture, Cause, Method, NoContent, Progress, RawBytes, RawResponse,
    RawText, Request, RequestDescriptor, Response, SecretsApi, Structured, Transport,
    TransportError, UsersApi,
};
use tokio::sync::oneshot;

/// Replays canned outcomes and records what it was sent.
#[derive(Default)]
struct ScriptedTransport {
    outcomes: Mutex<VecDeque<RawResponse>>,
    sent: Mutex<Vec<Request<Bytes>>>,
}

impl ScriptedTransport {
    fn new(outcomes: impl IntoIterator<Item = RawResponse>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            sent: Mutex::default(),
        })
    }

    fn calls(&self) -> usize {
        self.sent.lock().expect("lock").len()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: Request<Bytes>) -> BoxFuture<'static, RawResponse> {
        self.sent.lock().expect("lock").push(request);
        let outcome = self.outcomes.lock().expect("lock").pop_front();
        Box::pin(async move { outcome.unwrap_or_default() })
    }
}

/// Never answers.
struct Silent;

impl Transport for Silent {
    fn send(&self, _: Request<Bytes>) -> BoxFuture<'static, RawResponse> {
        Box::pin(std::future::pending())
    }
}

fn status(code: u16, body: &'static str) -> RawResponse {
    RawResponse::completed(Response::new(code, HashMap::new(), Bytes::from_static(body.as_bytes())))
}

fn config(transport: impl Transport) -> ApiConfig {
    ApiConfig::builder("http://influx.test:8086")
        .header("Authorization", "Token t")
        .transport(transport)
        .build()
        .expect("valid config")
}

fn get(config: &ApiConfig, path: &str) -> RequestDescriptor {
    RequestDescriptor::builder(Method::Get, config.api_url(path)).build()
}

#[tokio::test]
async fn no_hook_means_single_attempt() {
    let transport = ScriptedTransport::new([status(500, ""), status(200, "late")]);
    let config = config(Arc::clone(&transport));

    let request = ApiRequest::<RawText>::new(config.clone(), get(&config, "/ping"));
    let_assert!(Err(err) = request.send().await);
    check!(err.code() == 500);
    check!(transport.calls() == 1);
}

#[tokio::test]
async fn retry_is_bounded() {
    let transport = ScriptedTransport::new([
        status(503, ""),
        status(503, ""),
        status(503, r#"{"message":"unavailable"}"#),
        status(200, "never reached"),
    ]);
    let config = config(Arc::clone(&transport));

    let (progress_tx, progress_rx) = oneshot::channel::<Progress>();
    let result = ApiRequest::<RawText>::new(config.clone(), get(&config, "/ping"))
        .retry(RetryPolicy::new(2))
        .on_progress(move |progress| {
            let _ = progress_tx.send(progress);
        })
        .send()
        .await;

    let_assert!(Err(err) = result);
    check!(err.code() == 503);
    let_assert!(Some(body) = err.body());
    check!(body["message"] == "unavailable");
    check!(transport.calls() == 3);

    let progress = progress_rx.await.expect("progress handle");
    check!(progress.attempts() == 3);
    check!(progress.is_finished());
}

#[tokio::test]
async fn retry_hook_sees_attempt_numbers() {
    let transport = ScriptedTransport::new([
        RawResponse::failed(TransportError::Connection("reset".into())),
        status(200, r#"{"ok":"yes"}"#),
    ]);
    let config = config(Arc::clone(&transport));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);

    let descriptor = get(&config, "/flags");
    let value = ApiRequest::<Structured<HashMap<String, String>>>::new(config, descriptor)
        .retry(move |attempt: u32, outcome: &RawResponse| {
            recorder.lock().expect("lock").push((attempt, outcome.status()));
            if outcome.error().is_some() {
                RetryDecision::Retry(Duration::from_millis(1))
            } else {
                RetryDecision::Stop
            }
        })
        .send_value()
        .await
        .expect("value");

    check!(value.get("ok").map(String::as_str) == Some("yes"));
    check!(*seen.lock().expect("lock") == vec![(1, None), (2, Some(200))]);
}

#[tokio::test]
async fn retried_request_is_reencoded_identically() {
    let transport = ScriptedTransport::new([status(500, ""), status(204, "")]);
    let config = config(Arc::clone(&transport));
    let descriptor = RequestDescriptor::builder(Method::Post, config.api_url("/users/u1/password"))
        .header("Zap-Trace-Span", "span")
        .json(&serde_json::json!({"password": "p"}))
        .expect("json")
        .build();

    ApiRequest::<NoContent>::new(config, descriptor)
        .retry(RetryPolicy::new(1))
        .send()
        .await
        .expect("no content");

    let sent = transport.sent.lock().expect("lock");
    check!(sent.len() == 2);
    for request in sent.iter() {
        check!(request.url().as_str() == "http://influx.test:8086/api/v2/users/u1/password");
        check!(request.header("authorization") == Some("Token t"));
        check!(request.header("zap-trace-span") == Some("span"));
        check!(request.header("content-type") == Some("application/json"));
        check!(request.body().map(|b| b.to_vec()) == Some(br#"{"password":"p"}"#.to_vec()));
    }
}

#[tokio::test]
async fn missing_response_is_minus_two() {
    let transport = ScriptedTransport::new([RawResponse::default()]);
    let config = config(transport);

    let request = ApiRequest::<RawBytes>::new(config.clone(), get(&config, "/x"));
    let_assert!(Err(err) = request.send().await);
    check!(err.code() == -2);
    check!(matches!(err.cause(), Cause::MissingResponse));
}

#[tokio::test]
async fn cancellation_during_transport_call() {
    let config = config(Silent);
    let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

    let request =
        ApiRequest::<RawText>::new(config.clone(), get(&config, "/slow")).cancel_on(async move {
            let _ = cancel_rx.await;
        });
    let pending = tokio::spawn(request.send());

    tokio::task::yield_now().await;
    cancel_tx.send(()).expect("request still running");

    let_assert!(Err(err) = pending.await.expect("join"));
    check!(err.code() == -1);
    check!(err.is_cancelled());
}

#[tokio::test]
async fn cancellation_during_retry_delay() {
    let transport = ScriptedTransport::new([status(503, ""), status(200, "")]);
    let config = config(Arc::clone(&transport));

    let result = ApiRequest::<RawText>::new(config.clone(), get(&config, "/ping"))
        .retry(|_: u32, _: &RawResponse| RetryDecision::Retry(Duration::from_secs(3600)))
        .cancel_on(async {})
        .send()
        .await;

    let_assert!(Err(err) = result);
    check!(err.is_cancelled());
    check!(transport.calls() <= 1);
}

#[tokio::test]
async fn completion_runs_once_and_later() {
    let transport = ScriptedTransport::new([status(200, "done")]);
    let config = config(transport);
    let called = Arc::new(AtomicBool::new(false));
    let (tx, rx) = oneshot::channel();

    let flag = Arc::clone(&called);
    ApiRequest::<RawText>::new(config.clone(), get(&config, "/ping")).execute(None, move |result| {
        flag.store(true, Ordering::SeqCst);
        let _ = tx.send(result);
    });
    check!(!called.load(Ordering::SeqCst));

    let envelope = rx.await.expect("completion").expect("success");
    check!(called.load(Ordering::SeqCst));
    check!(envelope.body().as_deref() == Some("done"));
}

#[test]
fn completion_on_explicit_dispatch_runtime() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("runtime");
    let config = ApiConfig::builder("http://influx.test:8086")
        .transport(ScriptedTransport::new([status(204, "")]))
        .dispatch(runtime.handle().clone())
        .build()
        .expect("valid config");

    let (tx, rx) = std::sync::mpsc::channel();
    let descriptor =
        RequestDescriptor::builder(Method::Delete, config.api_url("/users/u1")).build();
    ApiRequest::<NoContent>::new(config, descriptor).execute(None, move |result| {
        let _ = tx.send(result.map(|e| e.status()));
    });

    let status = rx.recv_timeout(Duration::from_secs(5)).expect("completion");
    check!(status.ok() == Some(204));
}

#[tokio::test]
async fn encoding_failure_is_delivered_through_completion() {
    let transport = ScriptedTransport::new([]);
    let config = config(Arc::clone(&transport));
    let descriptor = RequestDescriptor::builder(Method::Post, config.api_url("/upload"))
        .param("file", std::path::PathBuf::from("/definitely/not/here.csv"))
        .build();

    let (tx, rx) = oneshot::channel();
    ApiRequest::<RawText>::new(config, descriptor).execute(None, move |result| {
        let _ = tx.send(result);
    });

    let_assert!(Err(err) = rx.await.expect("completion"));
    check!(err.code() == 415);
    check!(matches!(err.cause(), Cause::MissingFile { .. }));
    check!(transport.calls() == 0);
}

#[tokio::test]
async fn invalid_url_is_encoding_failure() {
    let transport = ScriptedTransport::new([]);
    let config = config(Arc::clone(&transport));
    let descriptor = RequestDescriptor::builder(Method::Get, "not a url").build();

    let_assert!(Err(err) = ApiRequest::<RawText>::new(config, descriptor).send().await);
    check!(err.code() == 415);
    check!(matches!(err.cause(), Cause::InvalidUrl(_)));
    check!(transport.calls() == 0);
}

#[tokio::test]
async fn dot_segment_ids_never_reach_the_transport() {
    let transport = ScriptedTransport::new([status(204, ""), status(204, "")]);
    let config = config(Arc::clone(&transport));

    let secrets = SecretsApi::new(config.clone());
    let_assert!(Err(err) = secrets.delete_orgs_id_secrets_id("o1", "..", None).await);
    check!(err.code() == 415);
    check!(matches!(err.cause(), Cause::InvalidRequest(_)));

    let users = UsersApi::new(config);
    let_assert!(Err(err) = users.delete_users_id(".", None).await);
    check!(err.code() == 415);

    check!(transport.calls() == 0);
}

#[tokio::test]
async fn progress_counts_bytes() {
    let transport = ScriptedTransport::new([status(200, "0123456789")]);
    let config = config(transport);
    let descriptor = RequestDescriptor::builder(Method::Post, config.api_url("/echo"))
        .json_bytes(Bytes::from_static(b"{\"a\":1}"))
        .build();

    let (tx, rx) = oneshot::channel::<Progress>();
    ApiRequest::<RawText>::new(config, descriptor)
        .on_progress(move |p| {
            let _ = tx.send(p);
        })
        .send()
        .await
        .expect("text");

    let progress = rx.await.expect("progress");
    check!(progress.attempts() == 1);
    check!(progress.bytes_sent() == 7);
    check!(progress.bytes_received() == 10);
    check!(progress.is_finished());
}
