//! Attempt loop tests against scripted transports (no network).

use super::*;
use crate::sink::CollectSink;
use crate::transport::Response;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

/// Replays a fixed list of outcomes and records the timeout of every call.
/// Once the script runs out it keeps answering HTTP 503.
#[derive(Default)]
struct ScriptedTransport {
    script: Mutex<VecDeque<Result<Response, TransportError>>>,
    timeouts: Mutex<Vec<Duration>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Result<Response, TransportError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            timeouts: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.timeouts.lock().unwrap().len()
    }

    fn timeouts(&self) -> Vec<Duration> {
        self.timeouts.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn get(
        &self,
        _target: &Url,
        timeout: Duration,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send {
        self.timeouts.lock().unwrap().push(timeout);
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(TransportError::Http(503)));
        async move { next }
    }
}

fn ok(body: &[u8]) -> Result<Response, TransportError> {
    Ok(Response {
        status: 200,
        body: body.to_vec(),
    })
}

fn status(code: u32) -> Result<Response, TransportError> {
    Ok(Response {
        status: code,
        body: b"error page".to_vec(),
    })
}

fn timed_out() -> Result<Response, TransportError> {
    Err(TransportError::Curl(curl::Error::new(28)))
}

fn policy(max_attempts: u32, initial: f64, increment: f64) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_timeout: Duration::from_secs_f64(initial),
        timeout_increment: Duration::from_secs_f64(increment),
        retry_client_errors: true,
    }
}

const TARGET: &str = "http://example.com/data";

#[tokio::test]
async fn succeeds_on_third_attempt_with_escalating_timeouts() {
    let transport = ScriptedTransport::new(vec![timed_out(), status(500), ok(b"ok")]);
    let engine = RetryEngine::new(transport, policy(3, 1.0, 5.0));
    let mut sink = CollectSink::new();

    let delivery = engine.deliver(TARGET, &mut sink).await.unwrap();

    assert_eq!(delivery.attempts, 3);
    assert_eq!(delivery.timeout, Duration::from_secs(11));
    assert_eq!(
        engine.transport().timeouts(),
        vec![
            Duration::from_secs(1),
            Duration::from_secs(6),
            Duration::from_secs(11)
        ]
    );
    assert_eq!(sink.payload(), Some(&b"ok"[..]));
}

#[tokio::test]
async fn exhaustion_after_max_attempts_never_invokes_sink() {
    let transport = ScriptedTransport::new(vec![status(500), timed_out(), status(502)]);
    let engine = RetryEngine::new(transport, policy(3, 1.0, 5.0));
    let mut delivered = 0;
    let mut sink = |_: Vec<u8>| delivered += 1;

    let err = engine.deliver(TARGET, &mut sink).await.unwrap_err();

    match err {
        DeliverError::Exhausted { attempts, last } => {
            assert_eq!(attempts, 3);
            assert!(matches!(last, TransportError::Http(502)), "{last:?}");
        }
        other => panic!("expected Exhausted, got {other:?}"),
    }
    assert_eq!(engine.transport().calls(), 3);
    assert_eq!(delivered, 0);
}

#[tokio::test]
async fn single_attempt_success_uses_initial_timeout() {
    let transport = ScriptedTransport::new(vec![ok(b"first")]);
    let engine = RetryEngine::new(transport, policy(1, 2.5, 5.0));
    let mut sink = CollectSink::new();

    let delivery = engine.deliver(TARGET, &mut sink).await.unwrap();

    assert_eq!(delivery.attempts, 1);
    assert_eq!(engine.transport().timeouts(), vec![Duration::from_millis(2500)]);
    assert_eq!(sink.into_payload(), Some(b"first".to_vec()));
}

#[tokio::test]
async fn zero_max_attempts_fails_before_any_call() {
    let engine = RetryEngine::new(ScriptedTransport::default(), policy(0, 1.0, 5.0));
    let mut sink = CollectSink::new();

    let err = engine.deliver(TARGET, &mut sink).await.unwrap_err();

    assert!(matches!(err, DeliverError::InvalidPolicy(_)), "{err:?}");
    assert_eq!(engine.transport().calls(), 0);
    assert!(sink.payload().is_none());
}

#[tokio::test]
async fn malformed_target_fails_before_any_call() {
    let engine = RetryEngine::new(ScriptedTransport::default(), RetryPolicy::default());
    let mut sink = CollectSink::new();

    for target in ["", "not a url", "/relative/path", "ftp://example.com/file"] {
        let err = engine.deliver(target, &mut sink).await.unwrap_err();
        assert!(
            matches!(err, DeliverError::InvalidTarget { .. }),
            "{target:?}: {err:?}"
        );
    }
    assert_eq!(engine.transport().calls(), 0);
}

#[tokio::test]
async fn sink_receives_exactly_one_payload() {
    // Script has more successes than needed; only the first may be delivered.
    let transport = ScriptedTransport::new(vec![status(503), ok(b"one"), ok(b"two")]);
    let engine = RetryEngine::new(transport, policy(5, 0.1, 0.1));
    let mut payloads = Vec::new();
    let mut sink = |p: Vec<u8>| payloads.push(p);

    engine.deliver(TARGET, &mut sink).await.unwrap();

    assert_eq!(engine.transport().calls(), 2);
    assert_eq!(payloads, vec![b"one".to_vec()]);
}

#[tokio::test]
async fn timeouts_follow_linear_formula() {
    let engine = RetryEngine::new(ScriptedTransport::default(), policy(6, 0.5, 0.25));
    let mut sink = CollectSink::new();

    let _ = engine.deliver(TARGET, &mut sink).await.unwrap_err();

    let expected: Vec<Duration> = (1..=6).map(|i| engine.policy().timeout_for(i)).collect();
    assert_eq!(engine.transport().timeouts(), expected);
    assert_eq!(expected[5], Duration::from_millis(500 + 5 * 250));
}

#[tokio::test]
async fn zero_increment_keeps_timeout_constant() {
    let engine = RetryEngine::new(ScriptedTransport::default(), policy(4, 1.0, 0.0));
    let mut sink = CollectSink::new();

    let _ = engine.deliver(TARGET, &mut sink).await;

    assert_eq!(engine.transport().timeouts(), vec![Duration::from_secs(1); 4]);
}

#[tokio::test]
async fn client_errors_are_retried_by_default() {
    let transport = ScriptedTransport::new(vec![status(404), status(400), ok(b"late")]);
    let engine = RetryEngine::new(transport, policy(3, 1.0, 1.0));
    let mut sink = CollectSink::new();

    let delivery = engine.deliver(TARGET, &mut sink).await.unwrap();

    assert_eq!(delivery.attempts, 3);
    assert_eq!(sink.payload(), Some(&b"late"[..]));
}

#[tokio::test]
async fn client_errors_stop_the_loop_when_not_retried() {
    let transport = ScriptedTransport::new(vec![status(500), status(404), ok(b"never")]);
    let engine = RetryEngine::new(
        transport,
        RetryPolicy {
            retry_client_errors: false,
            ..policy(5, 1.0, 1.0)
        },
    );
    let mut sink = CollectSink::new();

    let err = engine.deliver(TARGET, &mut sink).await.unwrap_err();

    match err {
        DeliverError::Rejected { attempt, last } => {
            assert_eq!(attempt, 2);
            assert!(matches!(last, TransportError::Http(404)));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
    assert_eq!(engine.transport().calls(), 2);
    assert!(sink.payload().is_none());
}

/// Never resolves; counts calls.
#[derive(Default)]
struct HangingTransport {
    calls: Mutex<u32>,
}

impl Transport for HangingTransport {
    fn get(
        &self,
        _target: &Url,
        _timeout: Duration,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send {
        *self.calls.lock().unwrap() += 1;
        std::future::pending()
    }
}

#[tokio::test]
async fn cancelled_call_never_delivers() {
    let engine = RetryEngine::new(HangingTransport::default(), RetryPolicy::default());
    let mut sink = CollectSink::new();

    let res = tokio::time::timeout(
        Duration::from_millis(20),
        engine.deliver(TARGET, &mut sink),
    )
    .await;

    assert!(res.is_err(), "deliver should still be pending");
    assert_eq!(*engine.transport().calls.lock().unwrap(), 1);
    assert!(sink.payload().is_none());
}

/// Always succeeds, echoing the request path as the body.
struct EchoTransport;

impl Transport for EchoTransport {
    fn get(
        &self,
        target: &Url,
        _timeout: Duration,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send {
        let body = target.path().as_bytes().to_vec();
        async move { Ok(Response { status: 200, body }) }
    }
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let engine = RetryEngine::new(EchoTransport, RetryPolicy::default());
    let mut a = CollectSink::new();
    let mut b = CollectSink::new();

    let (ra, rb) = tokio::join!(
        engine.deliver("http://a.example/one", &mut a),
        engine.deliver("http://b.example/two", &mut b),
    );

    assert_eq!(ra.unwrap().attempts, 1);
    assert_eq!(rb.unwrap().attempts, 1);
    assert_eq!(a.payload(), Some(&b"/one"[..]));
    assert_eq!(b.payload(), Some(&b"/two"[..]));
}
