use std::io;
use std::sync::{Arc, Mutex};

use drawodds_core::{CancelToken, CategoryBound, Combo, Item, combo_probability, range_probability};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Capture {
    type Writer = Capture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn captured<F: FnOnce()>(run: F) -> String {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, run);
    capture.contents()
}

#[test]
fn cancelled_range_logs_start_and_abort() {
    let token = CancelToken::new();
    token.cancel();
    let deck = [Item::new(2, ["a"])];
    let logs = captured(|| {
        let _ = range_probability(&deck, &[], 1, &token);
    });
    assert!(logs.contains("range evaluation started"), "{logs}");
    assert!(logs.contains("range evaluation aborted"), "{logs}");
    assert!(logs.contains("calculation cancelled"), "{logs}");
}

#[test]
fn cancelled_combos_log_abort() {
    let token = CancelToken::new();
    token.cancel();
    let deck = [Item::new(2, ["a"])];
    let list = [Combo::new(vec![CategoryBound::new("a", 1, 1)])];
    let logs = captured(|| {
        let _ = combo_probability(&deck, &list, 1, &token);
    });
    assert!(logs.contains("combo evaluation started"), "{logs}");
    assert!(logs.contains("combo evaluation aborted"), "{logs}");
}

#[test]
fn finished_range_logs_probability() {
    let deck = [Item::new(2, ["a"]), Item::untagged(2)];
    let logs = captured(|| {
        let _ = range_probability(&deck, &[CategoryBound::new("a", 0, 0)], 2, &CancelToken::new());
    });
    assert!(logs.contains("range probability evaluated"), "{logs}");
}
