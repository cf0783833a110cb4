//! Desktop notifications via notify-rust.

use std::time::Duration;

use notify_rust::Notification;
#[cfg(target_os = "linux")]
use notify_rust::Urgency;
use syllacal_core::{NotificationSink, Reminder};
use tracing::{error, info};

use crate::config::NotificationSettings;

/// Shows reminders as desktop notifications.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
    timeout_secs: u32,
    icon_path: Option<String>,
    urgency: Option<String>,
}

impl DesktopNotifier {
    pub fn new(settings: &NotificationSettings) -> Self {
        Self {
            app_name: settings.app_name.clone(),
            timeout_secs: settings.timeout_secs,
            icon_path: settings.icon_path.clone(),
            urgency: settings.urgency.clone(),
        }
    }

    /// Configured urgency, or critical for imminent reminders.
    pub fn urgency_for(&self, reminder: &Reminder) -> &str {
        match self.urgency {
            Some(ref urgency) => urgency.as_str(),
            None if reminder.imminent => "critical",
            None => "normal",
        }
    }
}

impl NotificationSink for DesktopNotifier {
    fn deliver(&self, reminder: &Reminder) -> bool {
        let mut notification = Notification::new();
        notification
            .appname(&self.app_name)
            .summary(&reminder.title)
            .body(&reminder.body)
            .timeout(Duration::from_secs(u64::from(self.timeout_secs)));

        if let Some(ref icon) = self.icon_path {
            notification.icon(icon);
        }

        #[cfg(target_os = "linux")]
        notification.urgency(parse_urgency(self.urgency_for(reminder)));

        match notification.show() {
            Ok(_) => {
                info!(title = %reminder.title, "Notification sent");
                true
            }
            Err(e) => {
                error!(error = %e, title = %reminder.title, "Failed to send notification");
                false
            }
        }
    }
}

#[cfg(target_os = "linux")]
fn parse_urgency(s: &str) -> Urgency {
    match s.to_lowercase().as_str() {
        "low" => Urgency::Low,
        "critical" => Urgency::Critical,
        _ => Urgency::Normal,
    }
}
