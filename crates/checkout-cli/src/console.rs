//! Terminal implementations of the notifier and navigator.

use checkout_core::{Navigator, NotificationKind, Notifier};
use std::sync::Mutex;
use tracing::info;

/// Prints notifications as toasts would show them
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Success => println!("✅ {}", message),
            NotificationKind::Error => eprintln!("❌ {}", message),
        }
    }
}

/// Prints redirects and remembers the last one
#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    last: Mutex<Option<String>>,
}

impl ConsoleNavigator {
    pub fn last_redirect(&self) -> Option<String> {
        match self.last.lock() {
            Ok(last) => last.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Navigator for ConsoleNavigator {
    fn redirect(&self, path: &str) {
        info!("Redirect to {}", path);
        println!("➡️  {}", path);
        match self.last.lock() {
            Ok(mut last) => *last = Some(path.to_string()),
            Err(poisoned) => *poisoned.into_inner() = Some(path.to_string()),
        }
    }
}
