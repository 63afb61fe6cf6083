use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nano_tui::elements::ActiveElement;
use nano_tui::{
    CancellationChoice, CancellationMenu, CancellationToken, InputEvent, Key, SignalTrigger, Step,
    ToolExecutionBatch, ToolExecutionStatus, TrackedToolCall, TuiError,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn batch() -> ToolExecutionBatch {
    ToolExecutionBatch::new(vec![
        TrackedToolCall::new("a", "read", json!({"path": "a.txt"})),
        TrackedToolCall::new("b", "bash", json!({"command": "sleep 60"})),
        TrackedToolCall::new("c", "write", json!({"path": "c.txt"})),
    ])
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancelling_mid_batch_offers_recovery() {
    let token = CancellationToken::new();
    let mut batch = batch();

    for idx in 0..batch.tool_calls.len() {
        batch.mark_running(idx);
        let slow = batch.tool_calls[idx].name == "bash";
        if slow {
            let canceller = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                canceller.cancel();
            });
        }
        let outcome = token
            .run(async move {
                if slow {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                }
                json!("done")
            })
            .await;
        match outcome {
            Ok(result) => batch.mark_completed(idx, result),
            Err(err) if err.is_cancelled() => {
                batch.mark_cancelled(idx);
                break;
            }
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    assert_eq!(batch.tool_calls[0].status, ToolExecutionStatus::Completed);
    assert_eq!(batch.cancelled_tool().map(|call| call.id.as_str()), Some("b"));
    assert_eq!(batch.pending().len(), 1);

    let mut menu = CancellationMenu::new(batch.clone());
    assert!(menu
        .get_lines()
        .contains(&"│  Cancelled during: bash".to_string()));
    menu.handle_input(&InputEvent::key(Key::Down));
    assert_eq!(
        menu.handle_input(&InputEvent::key(Key::Enter)),
        Step::Done(Some(CancellationChoice::Skip))
    );

    // Skip: the cancelled tool is skipped, pending work runs on a fresh token state.
    batch.mark_skipped(1);
    token.reset();
    let result = token.run(async { json!("written") }).await.expect("pending tool");
    batch.mark_completed(2, result);
    assert_eq!(
        batch.summary_lines()[1],
        r#"  2. ⏭️ bash({"command":"sleep 60"}) - skipped"#
    );
}

#[tokio::test]
async fn cancelled_token_skips_work_until_reset() {
    let token = CancellationToken::new();
    token.cancel();

    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);
    let err = token
        .run(async move { flag.store(true, Ordering::SeqCst) })
        .await
        .expect_err("cancelled");
    assert!(matches!(err, TuiError::Cancelled));
    assert!(!ran.load(Ordering::SeqCst));

    token.reset();
    let flag = Arc::clone(&ran);
    token
        .run(async move { flag.store(true, Ordering::SeqCst) })
        .await
        .expect("runs after reset");
    assert!(ran.load(Ordering::SeqCst));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sigint_cancels_in_flight_work() {
    let token = CancellationToken::new();
    let trigger = SignalTrigger::install(token.clone()).expect("install");

    tokio::spawn(async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        unsafe {
            libc::raise(libc::SIGINT);
        }
    });

    let err = token
        .run(tokio::time::sleep(Duration::from_secs(30)))
        .await
        .expect_err("interrupted");
    assert!(err.is_cancelled());
    drop(trigger);
}
