use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use scafftree::engine::progress::{ProgressCallback, ProgressSnapshot};
use std::sync::{Arc, Mutex};
use tracing::warn;

struct BarState {
    pb: ProgressBar,
    printed_messages: usize,
}

/// Drives an indicatif progress bar from generation snapshots.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<BarState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0).with_style(Self::bar_style());
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.set_message("Molecules");

        Self {
            state: Arc::new(Mutex::new(BarState {
                pb,
                printed_messages: 0,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |snapshot: ProgressSnapshot| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            if state.pb.length() != Some(snapshot.total as u64) {
                state.pb.set_length(snapshot.total as u64);
            }
            state.pb.set_position(snapshot.processed as u64);

            for message in &snapshot.messages[state.printed_messages..] {
                state.pb.println(format!("  ! {}", message));
            }
            state.printed_messages = snapshot.messages.len();

            if snapshot.saving {
                state.pb.finish_with_message("Saving tree");
            }
        })
    }

    pub fn finish(&self) {
        if let Ok(state) = self.state.lock()
            && !state.pb.is_finished()
        {
            state.pb.finish_and_clear();
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<12} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .expect("Failed to create bar style template")
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    write!(w, "{:.1}s", state.eta().as_secs_f64()).unwrap()
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(processed: usize, total: usize) -> ProgressSnapshot {
        ProgressSnapshot {
            processed,
            total,
            saving: false,
            messages: Vec::new(),
        }
    }

    #[test]
    fn callback_tracks_position_and_length() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(snapshot(1, 10));
        {
            let state = handler.state.lock().unwrap();
            assert_eq!(state.pb.length(), Some(10));
            assert_eq!(state.pb.position(), 1);
        }

        callback(snapshot(7, 10));
        {
            let state = handler.state.lock().unwrap();
            assert_eq!(state.pb.position(), 7);
        }
    }

    #[test]
    fn saving_snapshot_finishes_the_bar() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(ProgressSnapshot {
            processed: 3,
            total: 3,
            saving: true,
            messages: vec!["molecule 'm1': empty structure".to_string()],
        });

        let state = handler.state.lock().unwrap();
        assert!(state.pb.is_finished());
        assert_eq!(state.printed_messages, 1);
    }

    #[test]
    fn messages_are_printed_once() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        let messages = vec!["first".to_string(), "second".to_string()];
        callback(ProgressSnapshot {
            processed: 1,
            total: 2,
            saving: false,
            messages: messages.clone(),
        });
        callback(ProgressSnapshot {
            processed: 2,
            total: 2,
            saving: false,
            messages,
        });

        let state = handler.state.lock().unwrap();
        assert_eq!(state.printed_messages, 2);
    }
}
