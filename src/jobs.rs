//! Scheduled reminder and report generation.
//!
//! A background loop spawned at liftoff. Each tick reads from the store and
//! dispatches best-effort notifications; failures are logged and the loop
//! keeps running. The scheduler never writes.

use crate::notify::Notifier;
use crate::store::EmployeeStore;
use chrono::{Datelike, Utc};
use rocket_db_pools::sqlx::{self, PgPool};
use std::time::Duration;

const DEFAULT_INTERVAL_SECS: u64 = 86_400;

pub struct ReminderScheduler {
    store: EmployeeStore,
    notifier: Notifier,
    interval: Duration,
}

impl ReminderScheduler {
    /// Interval comes from `REMINDER_INTERVAL_SECS`, defaulting to daily.
    pub fn new(pool: PgPool, notifier: Notifier) -> Self {
        let secs = std::env::var("REMINDER_INTERVAL_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_INTERVAL_SECS);

        Self {
            store: EmployeeStore::new(pool),
            notifier,
            interval: Duration::from_secs(secs),
        }
    }

    /// Run the scheduler loop forever.
    pub async fn run(self) -> ! {
        log::info!(
            "reminder scheduler started (interval: {}s)",
            self.interval.as_secs()
        );

        loop {
            tokio::time::sleep(self.interval).await;

            if let Err(err) = self.tick().await {
                log::error!("scheduled reminder run failed: {}", err);
            }
        }
    }

    async fn tick(&self) -> Result<(), sqlx::Error> {
        if !self.notifier.is_ready() {
            log::debug!("mail sender not configured, skipping scheduled reminders");
            return Ok(());
        }

        let today = Utc::now().date_naive();
        let birthdays = self.store.find_birthdays(today.month(), today.day()).await?;

        if !birthdays.is_empty() {
            log::info!("{} employee birthday(s) today", birthdays.len());
            let names: Vec<String> = birthdays.into_iter().map(|e| e.name).collect();
            let notifier = self.notifier.clone();
            tokio::spawn(async move { notifier.send_birthday_reminder(&names).await });
        }

        let total = self.store.count().await?;
        if let Some(admin) = self.notifier.admin_email().map(str::to_string) {
            let notifier = self.notifier.clone();
            tokio::spawn(async move {
                let body = format!("The roster currently holds {total} employee record(s).\n");
                notifier.send_generic(&admin, "Roster report", &body).await;
            });
        }

        Ok(())
    }
}
