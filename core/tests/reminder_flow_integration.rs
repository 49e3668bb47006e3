//! End-to-end flow: a guest verifies their phone at a kiosk, a reminder
//! is created for their vehicle, and the scheduler walks the full
//! notification schedule.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use ra_core::domain::entities::phone_verification::VerificationSource;
use ra_core::domain::entities::reminder::{
    NotificationChannels, Reminder, ReminderSource, ReminderType,
};
use ra_core::repositories::{
    MockNotificationLogRepository, MockOptOutRegistry, MockReminderRepository,
    MockVerificationStore, NotificationLogRepository, OptOutRegistry, ReminderRepository,
};
use ra_core::services::dispatch::traits::{EmailProviderTrait, SmsProviderTrait};
use ra_core::services::{NotificationScheduler, RequesterInfo, VerificationService};

const PHONE: &str = "+40712345678";

/// Recording SMS provider shared between the verification service and
/// the scheduler, the way a real deployment shares one gateway
struct RecordingSmsProvider {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingSmsProvider {
    fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, m)| m.clone()).collect()
    }
}

#[async_trait]
impl SmsProviderTrait for RecordingSmsProvider {
    async fn send_sms(&self, phone: &str, message: &str) -> Result<String, String> {
        self.sent
            .lock()
            .unwrap()
            .push((phone.to_string(), message.to_string()));
        Ok(format!("msg-{}", uuid::Uuid::new_v4()))
    }

    fn provider_name(&self) -> &str {
        "recording-sms"
    }
}

struct NullEmailProvider;

#[async_trait]
impl EmailProviderTrait for NullEmailProvider {
    async fn send_email(&self, _: &str, _: &str, _: &str) -> Result<String, String> {
        Err("email not configured".to_string())
    }

    fn provider_name(&self) -> &str {
        "null-email"
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn guest_kiosk_flow_from_verification_to_exhausted_schedule() {
    let store = Arc::new(MockVerificationStore::new());
    let opt_outs = Arc::new(MockOptOutRegistry::new());
    let sms = Arc::new(RecordingSmsProvider::new());
    let reminders = Arc::new(MockReminderRepository::new());
    let log = Arc::new(MockNotificationLogRepository::new());

    let verification_service =
        VerificationService::new(store.clone(), opt_outs.clone(), sms.clone());
    let scheduler = NotificationScheduler::new(
        reminders.clone(),
        log.clone(),
        opt_outs.clone(),
        Arc::new(NullEmailProvider),
        sms.clone(),
    );

    // the kiosk captures the phone in national format
    let requested = verification_service
        .request_code(
            "0712345678",
            VerificationSource::Kiosk,
            Some("station-cluj-01".to_string()),
            RequesterInfo::default(),
        )
        .await
        .unwrap();

    let code = store.get(requested.verification_id).await.unwrap().code;
    let verified = verification_service.verify_code(PHONE, &code).await.unwrap();
    assert_eq!(verified.verification_id, requested.verification_id);

    // reminder created right after verification, ITP expiring in 10 days
    let today = date(2025, 6, 1);
    let expiry = date(2025, 6, 11);
    let reminder = Reminder::new(
        "CJ01ABC".to_string(),
        ReminderType::Itp,
        expiry,
        vec![7, 3, 1],
        NotificationChannels {
            email: false,
            sms: true,
        },
        ReminderSource::Kiosk,
        PHONE.to_string(),
        today,
    )
    .with_verification(verified.verification_id);
    let reminder_id = reminder.id;
    reminders.create(reminder).await.unwrap();

    // walk the calendar day by day; only the scheduled dates send
    let mut sends_per_day = Vec::new();
    for offset in 0..=10 {
        let day = today + chrono::Duration::days(offset);
        let summary = scheduler.run_for_date(day).await.unwrap();
        sends_per_day.push((day, summary.sent));
    }

    let send_dates: Vec<NaiveDate> = sends_per_day
        .iter()
        .filter(|(_, sent)| *sent > 0)
        .map(|(day, _)| *day)
        .collect();
    assert_eq!(
        send_dates,
        vec![date(2025, 6, 4), date(2025, 6, 8), date(2025, 6, 10)]
    );

    // one verification SMS plus three reminder messages
    let messages = sms.messages();
    assert_eq!(messages.len(), 4);
    assert!(messages[0].contains(&code));
    assert!(messages[1].contains("saptamana"));
    assert!(messages[2].contains("3 zile"));
    assert!(messages[3].contains("MAINE"));

    // the append-only log has one SMS row per reminder send
    let entries = log.find_by_reminder(reminder_id).await.unwrap();
    assert_eq!(entries.len(), 3);

    // schedule exhausted
    let r = reminders.find_by_id(reminder_id).await.unwrap().unwrap();
    assert_eq!(r.next_notification_date, None);
    assert!(r.last_notification_sent_at.is_some());
}

#[tokio::test]
async fn opt_out_mid_schedule_stops_further_sends() {
    let opt_outs = Arc::new(MockOptOutRegistry::new());
    let sms = Arc::new(RecordingSmsProvider::new());
    let reminders = Arc::new(MockReminderRepository::new());
    let log = Arc::new(MockNotificationLogRepository::new());

    let scheduler = NotificationScheduler::new(
        reminders.clone(),
        log.clone(),
        opt_outs.clone(),
        Arc::new(NullEmailProvider),
        sms.clone(),
    );

    let today = date(2025, 6, 1);
    let reminder = Reminder::new(
        "B99XYZ".to_string(),
        ReminderType::Rca,
        date(2025, 6, 8),
        vec![7, 3, 1],
        NotificationChannels {
            email: false,
            sms: true,
        },
        ReminderSource::Kiosk,
        PHONE.to_string(),
        today,
    );
    let reminder_id = reminder.id;
    reminders.create(reminder).await.unwrap();

    // the 7-day message goes out
    let summary = scheduler.run_for_date(date(2025, 6, 1)).await.unwrap();
    assert_eq!(summary.sent, 1);

    // the user replies STOP; the phone lands on the suppression list
    opt_outs.add(PHONE, Some("sms STOP reply".to_string())).await.unwrap();

    // the 3-day date comes around: skipped, nothing logged, schedule kept
    let summary = scheduler.run_for_date(date(2025, 6, 5)).await.unwrap();
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.sent, 0);
    assert_eq!(sms.messages().len(), 1);
    assert_eq!(log.find_by_reminder(reminder_id).await.unwrap().len(), 1);

    let r = reminders.find_by_id(reminder_id).await.unwrap().unwrap();
    assert_eq!(r.next_notification_date, Some(date(2025, 6, 5)));
}
