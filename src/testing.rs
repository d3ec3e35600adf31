//! Test doubles shared across module tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::host::HostRuntime;

/// Host runtime fake that records alerts and login navigations.
pub struct RecordingHost {
    init_data: Option<String>,
    alerts: Mutex<Vec<String>>,
    navigations: AtomicUsize,
}

impl RecordingHost {
    /// Host that supplies the given initData payload.
    pub fn with_init_data(init_data: &str) -> Self {
        Self {
            init_data: Some(init_data.to_string()),
            alerts: Mutex::new(Vec::new()),
            navigations: AtomicUsize::new(0),
        }
    }

    /// Host that supplies no identity assertion at all.
    pub fn without_init_data() -> Self {
        Self {
            init_data: None,
            alerts: Mutex::new(Vec::new()),
            navigations: AtomicUsize::new(0),
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().expect("alerts mutex").clone()
    }

    pub fn navigation_count(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }
}

impl HostRuntime for RecordingHost {
    fn init_data(&self) -> Option<String> {
        self.init_data.clone()
    }

    fn show_alert(&self, message: &str) {
        self.alerts
            .lock()
            .expect("alerts mutex")
            .push(message.to_string());
    }

    fn navigate_to_login(&self) {
        self.navigations.fetch_add(1, Ordering::SeqCst);
    }
}
