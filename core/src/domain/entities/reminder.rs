//! Reminder entity for vehicle document expiries.
//!
//! A reminder tracks one expiring document (ITP inspection, RCA policy
//! or rovinieta) for one vehicle and carries its own notification
//! schedule: a set of day-offsets before the expiry date at which a
//! message should go out.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default notification day-offsets before expiry
pub const DEFAULT_NOTIFICATION_INTERVALS: [u32; 3] = [7, 3, 1];

/// The kind of expiring document a reminder tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderType {
    Itp,
    Rca,
    Rovinieta,
}

impl ReminderType {
    /// Human-readable label used in rendered messages
    pub fn label(&self) -> &'static str {
        match self {
            ReminderType::Itp => "ITP",
            ReminderType::Rca => "RCA",
            ReminderType::Rovinieta => "Rovinieta",
        }
    }
}

/// Where the reminder was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderSource {
    Web,
    Kiosk,
    Import,
}

/// Per-reminder channel preferences (independent flags)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationChannels {
    pub email: bool,
    pub sms: bool,
}

/// Consent metadata recorded at intake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentInfo {
    /// When the user granted notification consent
    pub granted_at: DateTime<Utc>,
    /// Version of the consent text that was shown
    pub policy_version: String,
}

/// Reminder entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Unique identifier for the reminder
    pub id: Uuid,

    /// Vehicle plate number (uppercased at intake)
    pub plate_number: String,

    /// Which document this reminder tracks
    pub reminder_type: ReminderType,

    /// Date the document expires
    pub expiry_date: NaiveDate,

    /// Day-offsets before expiry at which to notify, sorted descending
    pub notification_intervals: Vec<u32>,

    /// Channel preference flags
    pub channels: NotificationChannels,

    /// Next date a notification is due, None when the schedule is exhausted
    pub next_notification_date: Option<NaiveDate>,

    /// When a notification last went out successfully
    pub last_notification_sent_at: Option<DateTime<Utc>>,

    /// Per-reminder opt-out flag (distinct from the global registry)
    pub opt_out: bool,

    /// Consent metadata recorded at intake
    pub consent: Option<ConsentInfo>,

    /// Where the reminder was created
    pub source: ReminderSource,

    /// Owning registered user; None means a guest reminder
    pub user_id: Option<Uuid>,

    /// Contact phone (E.164); guests are reachable only here
    pub contact_phone: String,

    /// Contact email; never captured for guests
    pub contact_email: Option<String>,

    /// Weak reference to the phone verification that established contact
    pub verification_id: Option<Uuid>,

    /// Timestamp when the reminder was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last modification
    pub updated_at: DateTime<Utc>,

    /// Soft-delete marker; the scheduler never hard-deletes
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Reminder {
    /// Creates a new reminder with its first notification date computed
    /// from `today`
    ///
    /// Intervals are deduplicated and kept sorted descending. The first
    /// notification date is the largest offset whose date has not
    /// already passed, keeping the invariant that
    /// `next_notification_date = expiry_date - i` for some configured
    /// interval `i`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        plate_number: String,
        reminder_type: ReminderType,
        expiry_date: NaiveDate,
        notification_intervals: Vec<u32>,
        channels: NotificationChannels,
        source: ReminderSource,
        contact_phone: String,
        today: NaiveDate,
    ) -> Self {
        let intervals = Self::normalize_intervals(notification_intervals);
        let next = Self::first_notification_date(expiry_date, &intervals, today);
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            plate_number: plate_number.to_uppercase(),
            reminder_type,
            expiry_date,
            notification_intervals: intervals,
            channels,
            next_notification_date: next,
            last_notification_sent_at: None,
            opt_out: false,
            consent: None,
            source,
            user_id: None,
            contact_phone,
            contact_email: None,
            verification_id: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Attach the owning registered user and their email
    pub fn with_owner(mut self, user_id: Uuid, email: Option<String>) -> Self {
        self.user_id = Some(user_id);
        self.contact_email = email;
        self
    }

    /// Attach the verification that established phone contact
    pub fn with_verification(mut self, verification_id: Uuid) -> Self {
        self.verification_id = Some(verification_id);
        self
    }

    /// Attach consent metadata
    pub fn with_consent(mut self, consent: ConsentInfo) -> Self {
        self.consent = Some(consent);
        self
    }

    /// Sort descending and deduplicate a set of day-offsets
    pub fn normalize_intervals(mut intervals: Vec<u32>) -> Vec<u32> {
        intervals.sort_unstable_by(|a, b| b.cmp(a));
        intervals.dedup();
        intervals
    }

    /// Whole days from `today` until the expiry date (negative when past)
    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        (self.expiry_date - today).num_days()
    }

    /// A reminder with no owning registered user is a guest reminder
    pub fn is_guest(&self) -> bool {
        self.user_id.is_none()
    }

    /// Whether the reminder is due for processing on `today`
    pub fn is_due(&self, today: NaiveDate) -> bool {
        !self.opt_out
            && self.deleted_at.is_none()
            && matches!(self.next_notification_date, Some(d) if d <= today)
    }

    /// First notification date for a fresh reminder: the largest
    /// interval whose date lies on or after `today`
    pub fn first_notification_date(
        expiry_date: NaiveDate,
        intervals: &[u32],
        today: NaiveDate,
    ) -> Option<NaiveDate> {
        intervals
            .iter()
            .map(|i| expiry_date - Duration::days(*i as i64))
            .filter(|d| *d >= today)
            .min()
    }

    /// The interval to schedule after the current one: the greatest
    /// configured offset strictly less than `days_until_expiry`
    ///
    /// Returns None when no smaller offset remains (schedule exhausted).
    pub fn next_interval_after(&self, days_until_expiry: i64) -> Option<u32> {
        self.notification_intervals
            .iter()
            .copied()
            .filter(|i| (*i as i64) < days_until_expiry)
            .max()
    }

    /// The notification date for a given interval
    pub fn date_for_interval(&self, interval: u32) -> NaiveDate {
        self.expiry_date - Duration::days(interval as i64)
    }

    /// Soft-delete the reminder
    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}
