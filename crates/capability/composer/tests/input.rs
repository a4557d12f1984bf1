use std::sync::{Arc, Mutex};
use std::time::Duration;

use historian_composer::{
    ComposerSettings, DEFAULT_DEBOUNCE, Debouncer, INVALID_REGEX_MESSAGE, RegexInput,
    RegexInputField,
};
use tokio::time::sleep;

fn recorder() -> (Arc<Mutex<Vec<String>>>, impl FnMut(String) + Send + 'static) {
    let flushed = Arc::new(Mutex::new(Vec::new()));
    let sink = flushed.clone();
    let flush = move |value: String| sink.lock().expect("lock").push(value);
    (flushed, flush)
}

#[tokio::test(start_paused = true)]
async fn debouncer_commits_only_the_last_value_after_quiet_window() {
    let (flushed, flush) = recorder();
    let (debouncer, handle) = Debouncer::spawn(DEFAULT_DEBOUNCE, flush);

    assert!(debouncer.push("pu".to_string()));
    sleep(Duration::from_millis(200)).await;
    assert!(debouncer.push("pump".to_string()));
    sleep(Duration::from_millis(400)).await;
    assert!(flushed.lock().expect("lock").is_empty());

    sleep(Duration::from_millis(200)).await;
    assert_eq!(*flushed.lock().expect("lock"), vec!["pump".to_string()]);

    assert!(debouncer.push("pump-2".to_string()));
    drop(debouncer);
    handle.await.expect("debounce task");
    assert_eq!(
        *flushed.lock().expect("lock"),
        vec!["pump".to_string(), "pump-2".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn clones_feed_the_same_debounce_window() {
    let (flushed, flush) = recorder();
    let (debouncer, handle) = Debouncer::spawn(Duration::from_millis(50), flush);
    let clone = debouncer.clone();
    drop(debouncer);
    assert!(clone.push("line".to_string()));
    sleep(Duration::from_millis(60)).await;
    drop(clone);
    handle.await.expect("debounce task");
    assert_eq!(*flushed.lock().expect("lock"), vec!["line".to_string()]);
}

#[test]
fn regex_input_validation() {
    let plain = RegexInput::validate("pump[1");
    assert!(plain.valid);
    assert_eq!(plain.error, None);

    let valid = RegexInput::validate("/^pump-\\d+$/");
    assert!(valid.valid);

    let invalid = RegexInput::validate("/[/");
    assert!(!invalid.valid);
    assert_eq!(invalid.value, "/[/");
    assert_eq!(invalid.error.as_deref(), Some(INVALID_REGEX_MESSAGE));
}

#[tokio::test(start_paused = true)]
async fn regex_field_validates_now_and_commits_after_configured_window() {
    let settings = ComposerSettings {
        debounce: Duration::from_millis(100),
        ..ComposerSettings::default()
    };
    let committed = Arc::new(Mutex::new(Vec::new()));
    let sink = committed.clone();
    let (field, handle) = RegexInputField::spawn(&settings, move |input: RegexInput| {
        sink.lock().expect("lock").push(input)
    });

    let state = field.input("/[/");
    assert!(!state.valid);
    let state = field.input("/^line-\\d+$/");
    assert!(state.valid);

    sleep(Duration::from_millis(50)).await;
    assert!(committed.lock().expect("lock").is_empty());

    sleep(Duration::from_millis(100)).await;
    {
        let committed = committed.lock().expect("lock");
        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].value, "/^line-\\d+$/");
        assert!(committed[0].valid);
    }

    drop(field);
    handle.await.expect("debounce task");
    assert_eq!(committed.lock().expect("lock").len(), 1);
}
