use super::*;

fn sh(script: &str) -> Vec<String> {
    vec!["-c".to_string(), script.to_string()]
}

#[test]
fn timeout_scales_with_duration_and_tier() {
    assert_eq!(encode_timeout(30, 10.0, QualityTier::Low), Duration::from_secs(50));
    assert_eq!(encode_timeout(30, 10.0, QualityTier::Ultra), Duration::from_secs(150));
    assert!(encode_timeout(0, 5.0, QualityTier::High) > encode_timeout(0, 5.0, QualityTier::Medium));
}

#[cfg(unix)]
#[tokio::test]
async fn successful_exit_is_ok() {
    let runner = EncoderRunner::new("sh", Duration::from_secs(5));
    runner.run(&sh("exit 0")).await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn failure_carries_exit_code_and_stderr_tail() {
    let runner = EncoderRunner::new("sh", Duration::from_secs(5));
    let err = runner
        .run(&sh("echo first >&2; echo boom >&2; exit 3"))
        .await
        .unwrap_err();
    let (stderr, exit_code) = match err {
        GlassError::EncoderFailure {
            stderr, exit_code, ..
        } => (stderr, exit_code),
        other => panic!("unexpected error: {other:?}"),
    };
    assert_eq!(exit_code, Some(3));
    assert_eq!(stderr.as_deref(), Some("first\nboom"));
}

#[cfg(unix)]
#[tokio::test]
async fn slow_encoder_times_out() {
    let runner = EncoderRunner::new("sh", Duration::from_millis(150));
    let err = runner.run(&sh("exec sleep 5")).await.unwrap_err();
    assert!(matches!(err, GlassError::ProcessingTimeout(_)), "{err:?}");
}

#[cfg(unix)]
#[tokio::test]
async fn cancellation_kills_the_encoder() {
    let (tx, rx) = watch::channel(false);
    let runner = EncoderRunner::new("sh", Duration::from_secs(30)).with_cancel(rx);
    let started = std::time::Instant::now();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let _ = tx.send(true);
    });
    let err = runner.run(&sh("exec sleep 10")).await.unwrap_err();
    assert!(matches!(err, GlassError::Cancelled), "{err:?}");
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn already_cancelled_requests_never_spawn() {
    let (_tx, rx) = watch::channel(true);
    let runner = EncoderRunner::new("/definitely/not/a/binary", Duration::from_secs(1)).with_cancel(rx);
    let err = runner.run(&[]).await.unwrap_err();
    assert!(matches!(err, GlassError::Cancelled));
}

#[tokio::test]
async fn missing_program_is_an_encoder_failure() {
    let runner = EncoderRunner::new("/definitely/not/a/binary", Duration::from_secs(1));
    let err = runner.run(&[]).await.unwrap_err();
    assert!(matches!(err, GlassError::EncoderFailure { exit_code: None, .. }));
}
