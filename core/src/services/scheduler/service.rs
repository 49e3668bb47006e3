//! Notification scheduler implementation

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};

use ra_shared::utils::phone::mask_phone_number;

use crate::domain::entities::notification_log::{NotificationChannel, NotificationLogEntry};
use crate::domain::entities::reminder::Reminder;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::notification_log::r#trait::NotificationLogRepository;
use crate::repositories::opt_out::r#trait::OptOutRegistry;
use crate::repositories::reminder::r#trait::ReminderRepository;
use crate::services::dispatch::traits::{EmailProviderTrait, SmsProviderTrait};
use crate::services::dispatch::{ChannelDispatcher, DispatchOutcome, TemplateVars};

use super::config::SchedulerConfig;
use super::types::RunSummary;

/// Processes due reminders: one pass selects them, dispatches through
/// the enabled channels and advances each reminder's schedule
///
/// Reminders are independent and processed sequentially; a failure on
/// one never aborts the others. The schedule advances whether or not
/// dispatch succeeded, so a reminder is attempted at most once per
/// scheduled date.
pub struct NotificationScheduler<R, L, O, E, S>
where
    R: ReminderRepository,
    L: NotificationLogRepository,
    O: OptOutRegistry,
    E: EmailProviderTrait,
    S: SmsProviderTrait,
{
    reminders: Arc<R>,
    log: Arc<L>,
    opt_outs: Arc<O>,
    dispatcher: ChannelDispatcher<E, S>,
    run_lock: Mutex<()>,
}

impl<R, L, O, E, S> NotificationScheduler<R, L, O, E, S>
where
    R: ReminderRepository,
    L: NotificationLogRepository,
    O: OptOutRegistry,
    E: EmailProviderTrait,
    S: SmsProviderTrait,
{
    /// Creates a new scheduler with default configuration
    pub fn new(
        reminders: Arc<R>,
        log: Arc<L>,
        opt_outs: Arc<O>,
        email_provider: Arc<E>,
        sms_provider: Arc<S>,
    ) -> Self {
        Self::with_config(
            reminders,
            log,
            opt_outs,
            email_provider,
            sms_provider,
            SchedulerConfig::default(),
        )
    }

    /// Creates a new scheduler with a custom configuration
    pub fn with_config(
        reminders: Arc<R>,
        log: Arc<L>,
        opt_outs: Arc<O>,
        email_provider: Arc<E>,
        sms_provider: Arc<S>,
        config: SchedulerConfig,
    ) -> Self {
        let dispatcher = ChannelDispatcher::new(
            email_provider,
            sms_provider,
            Duration::from_secs(config.dispatch_timeout_secs),
        );
        Self {
            reminders,
            log,
            opt_outs,
            dispatcher,
            run_lock: Mutex::new(()),
        }
    }

    /// Processes every reminder due today (UTC)
    pub async fn run_once(&self) -> DomainResult<RunSummary> {
        self.run_for_date(Utc::now().date_naive()).await
    }

    /// Processes every reminder due on `today`
    ///
    /// Only one run may be in flight at a time; a concurrent call fails
    /// fast rather than queueing, since overlapping runs could send the
    /// same reminder twice.
    pub async fn run_for_date(&self, today: NaiveDate) -> DomainResult<RunSummary> {
        let _guard = self.run_lock.try_lock().map_err(|_| {
            DomainError::BusinessRule {
                message: "a notification run is already in progress".to_string(),
            }
        })?;

        let due = self.reminders.find_due(today).await?;
        let mut summary = RunSummary {
            total: due.len(),
            ..RunSummary::default()
        };

        info!(
            event = "scheduler_run_started",
            date = %today,
            due = due.len(),
            "Notification run started"
        );

        for reminder in due {
            match self.process_reminder(&reminder, today).await {
                Ok(Processed::Sent) => {
                    summary.processed += 1;
                    summary.sent += 1;
                }
                Ok(Processed::Failed) => {
                    summary.processed += 1;
                    summary.failed += 1;
                }
                Ok(Processed::Skipped) => summary.skipped += 1,
                Err(e) => {
                    // one broken reminder must not abort the run
                    warn!(
                        event = "scheduler_reminder_error",
                        reminder_id = %reminder.id,
                        error = %e,
                        "Failed to process reminder"
                    );
                    summary.skipped += 1;
                }
            }
        }

        info!(
            event = "scheduler_run_finished",
            date = %today,
            total = summary.total,
            processed = summary.processed,
            sent = summary.sent,
            failed = summary.failed,
            skipped = summary.skipped,
            "Notification run finished"
        );

        Ok(summary)
    }

    async fn process_reminder(
        &self,
        reminder: &Reminder,
        today: NaiveDate,
    ) -> DomainResult<Processed> {
        let days_until_expiry = reminder.days_until_expiry(today);

        // A due date that no longer maps onto a configured interval
        // means the expiry date or the intervals were edited after the
        // schedule was computed. Repair the schedule instead of sending
        // an off-interval message.
        if days_until_expiry < 0
            || !reminder
                .notification_intervals
                .contains(&(days_until_expiry as u32))
        {
            let next = Reminder::first_notification_date(
                reminder.expiry_date,
                &reminder.notification_intervals,
                today,
            );
            self.reminders
                .update_schedule(reminder.id, next, None)
                .await?;
            info!(
                event = "scheduler_schedule_repaired",
                reminder_id = %reminder.id,
                days_until_expiry,
                next = ?next,
                "Due date off-interval, schedule recomputed"
            );
            return Ok(Processed::Skipped);
        }

        if self.opt_outs.is_opted_out(&reminder.contact_phone).await? {
            info!(
                event = "scheduler_reminder_skipped",
                reminder_id = %reminder.id,
                reason = "User opted out",
                "Reminder skipped"
            );
            return Ok(Processed::Skipped);
        }

        let interval = days_until_expiry as u32;
        let vars = TemplateVars {
            plate: reminder.plate_number.clone(),
            doc_type: reminder.reminder_type.label().to_string(),
            days_left: days_until_expiry,
            expiry_date: reminder.expiry_date.format("%Y-%m-%d").to_string(),
        };

        let mut any_sent = false;

        // Guests are reachable by phone only: SMS regardless of flags.
        // Registered users get every channel they enabled.
        if reminder.is_guest() || reminder.channels.sms {
            let outcome = self
                .dispatcher
                .send_sms(&reminder.contact_phone, interval, &vars)
                .await;
            any_sent |= outcome.success;
            self.append_log(
                reminder,
                NotificationChannel::Sms,
                reminder.contact_phone.clone(),
                outcome,
            )
            .await;
        }

        if !reminder.is_guest() && reminder.channels.email {
            if let Some(email) = reminder.contact_email.as_deref() {
                let outcome = self.dispatcher.send_email(email, interval, &vars).await;
                any_sent |= outcome.success;
                self.append_log(
                    reminder,
                    NotificationChannel::Email,
                    email.to_string(),
                    outcome,
                )
                .await;
            }
        }

        // Advance regardless of dispatch outcome: a failed send is not
        // retried the same day, the next interval gets its own attempt.
        let next = reminder
            .next_interval_after(days_until_expiry)
            .map(|i| reminder.date_for_interval(i));
        let sent_at = any_sent.then(Utc::now);
        self.reminders
            .update_schedule(reminder.id, next, sent_at)
            .await?;

        info!(
            event = "scheduler_reminder_processed",
            reminder_id = %reminder.id,
            phone = %mask_phone_number(&reminder.contact_phone),
            interval,
            sent = any_sent,
            next = ?next,
            "Reminder processed"
        );

        Ok(if any_sent {
            Processed::Sent
        } else {
            Processed::Failed
        })
    }

    async fn append_log(
        &self,
        reminder: &Reminder,
        channel: NotificationChannel,
        recipient: String,
        outcome: DispatchOutcome,
    ) {
        let entry = if outcome.success {
            NotificationLogEntry::sent(
                reminder.id,
                channel,
                recipient,
                outcome.rendered_message,
                outcome.provider,
                outcome.provider_message_id,
            )
        } else {
            NotificationLogEntry::failed(
                reminder.id,
                channel,
                recipient,
                outcome.rendered_message,
                outcome.provider,
                outcome.error.unwrap_or_else(|| "unknown error".to_string()),
            )
        };

        // the log is best-effort: losing an audit row must not stop
        // the reminder from advancing
        if let Err(e) = self.log.append(entry).await {
            warn!(
                event = "scheduler_log_append_failed",
                reminder_id = %reminder.id,
                channel = channel.as_str(),
                error = %e,
                "Failed to append notification log entry"
            );
        }
    }
}

enum Processed {
    Sent,
    Failed,
    Skipped,
}
