//! `syllacal notify`: desktop reminders for future events.

use std::io::Write;

use syllacal_core::NotificationSink;
use tracing::info;

use super::Context;
use crate::cli::InputArgs;
use crate::error::CliResult;
use crate::notify::DesktopNotifier;

pub fn run(ctx: &Context, source: &InputArgs, dry_run: bool, out: &mut dyn Write) -> CliResult<()> {
    let session = ctx.load_session(source)?;

    if dry_run {
        let reminders = session.reminders(ctx.now);
        if reminders.is_empty() {
            writeln!(out, "No upcoming events.")?;
        }
        for reminder in reminders {
            let marker = if reminder.imminent { "!" } else { " " };
            writeln!(out, "{marker} {}: {}", reminder.title, reminder.body)?;
        }
        return Ok(());
    }

    let notifier = DesktopNotifier::new(&ctx.config.notifications);
    let sink = ctx
        .config
        .notifications
        .enabled
        .then_some(&notifier as &dyn NotificationSink);
    if sink.is_none() {
        info!("Notifications disabled in configuration");
    }

    let sent = session.notify(ctx.now, sink);
    writeln!(out, "Sent {} reminder(s)", sent)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::*;

    #[test]
    fn dry_run_lists_future_reminders() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_syllabus(dir.path(), SYLLABUS);
        let mut ctx = context();
        ctx.now = dt(2024, 10, 15, 8, 0);

        let mut buf = Vec::new();
        run(&ctx, &source, true, &mut buf).unwrap();
        let text = output(buf);
        let lines: Vec<&str> = text.lines().collect();

        // Quiz rolled over to next year, so all three are ahead.
        assert_eq!(lines.len(), 3);
        assert!(lines.contains(&"! Upcoming: Midterm exam on 10/15 at 2pm: Starts at 10/15/2024, 2:00 PM"));
        assert!(lines.contains(&"  Upcoming: Project report due December 6: Starts at 12/06/2024, 12:00 PM"));
    }

    #[test]
    fn disabled_notifications_send_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_syllabus(dir.path(), SYLLABUS);
        let mut ctx = context();
        ctx.config.notifications.enabled = false;

        let mut buf = Vec::new();
        run(&ctx, &source, false, &mut buf).unwrap();
        assert_eq!(output(buf), "Sent 0 reminder(s)\n");
    }
}
