//! Request lifecycle tracing
//!
//! Observers are handed to [`Transport::execute`](super::Transport::execute)
//! and receive events while the upload request is in flight.

use std::io::Write;
use std::sync::Mutex;

/// Lifecycle point of a single HTTP request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferEvent {
    ConnectStart,
    /// `Err` carries the reason the connection failed
    ConnectDone(Result<(), String>),
    WroteHeaders,
    WroteRequest,
    GotFirstResponseByte,
}

pub trait TransferObserver: Send + Sync {
    fn on_event(&self, event: TransferEvent);
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TransferObserver for NoopObserver {
    fn on_event(&self, _event: TransferEvent) {}
}

/// Prints the human readable upload progress markers
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgress;

impl ConsoleProgress {
    fn marker(event: &TransferEvent) -> &'static str {
        match event {
            TransferEvent::ConnectStart => "Connecting to board ... ",
            TransferEvent::ConnectDone(Ok(())) => " done\n",
            TransferEvent::ConnectDone(Err(_)) => "failed!\n",
            TransferEvent::WroteHeaders => "Uploading sketch ... ",
            TransferEvent::WroteRequest => " done\nFlashing sketch ... ",
            TransferEvent::GotFirstResponseByte => " done\n",
        }
    }
}

impl TransferObserver for ConsoleProgress {
    fn on_event(&self, event: TransferEvent) {
        log::trace!("transfer event: {:?}", event);
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(Self::marker(&event).as_bytes());
        let _ = stdout.flush();
    }
}

/// Keeps every event it sees, in order
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<TransferEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TransferEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl TransferObserver for RecordingObserver {
    fn on_event(&self, event: TransferEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_markers_compose_progress_lines() {
        let sequence = [
            TransferEvent::ConnectStart,
            TransferEvent::ConnectDone(Ok(())),
            TransferEvent::WroteHeaders,
            TransferEvent::WroteRequest,
            TransferEvent::GotFirstResponseByte,
        ];
        let rendered: String = sequence.iter().map(ConsoleProgress::marker).collect();
        assert_eq!(
            rendered,
            "Connecting to board ...  done\nUploading sketch ...  done\nFlashing sketch ...  done\n"
        );
    }

    #[test]
    fn test_recording_observer_keeps_order() {
        let observer = RecordingObserver::new();
        observer.on_event(TransferEvent::ConnectStart);
        observer.on_event(TransferEvent::ConnectDone(Err("refused".into())));
        assert_eq!(
            observer.events(),
            vec![
                TransferEvent::ConnectStart,
                TransferEvent::ConnectDone(Err("refused".into()))
            ]
        );
    }
}
