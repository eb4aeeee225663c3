//! Best-effort email notifications over AWS SESv2.
//!
//! The notifier is constructed once at ignite and injected through managed
//! state. Readiness is explicit: without `MAIL_FROM` and `ADMIN_EMAIL` the
//! notifier is disabled and every send is silently skipped. Send failures
//! are logged and swallowed; email must never fail a business operation.
//! Callers dispatch with `tokio::spawn` so no request or pipeline ever
//! waits on delivery.

use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use std::sync::Arc;

#[derive(Clone)]
pub struct Notifier {
    inner: Option<Arc<Inner>>,
}

struct Inner {
    ses: SesClient,
    from: String,
    admin: String,
}

impl Notifier {
    /// A notifier that skips every send. Used when mail is unconfigured and
    /// in tests.
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    /// Build from the environment: requires `MAIL_FROM` and `ADMIN_EMAIL`;
    /// AWS credentials and region come from the default provider chain.
    pub async fn from_env() -> Self {
        let from = non_empty_env("MAIL_FROM");
        let admin = non_empty_env("ADMIN_EMAIL");

        match (from, admin) {
            (Some(from), Some(admin)) => {
                let aws_config =
                    aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
                let ses = SesClient::new(&aws_config);
                log::info!("mail sender configured: from={}, admin={}", from, admin);
                Self {
                    inner: Some(Arc::new(Inner { ses, from, admin })),
                }
            }
            _ => {
                log::warn!("MAIL_FROM/ADMIN_EMAIL not set; email notifications disabled");
                Self::disabled()
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.inner.is_some()
    }

    /// Administrative recipient for summaries and reminders, when configured.
    pub fn admin_email(&self) -> Option<&str> {
        self.inner.as_deref().map(|inner| inner.admin.as_str())
    }

    pub async fn send_welcome(&self, to: &str, name: &str) {
        let body = format!(
            "Hi {name},\n\n\
             Your employee record has been created in the roster.\n\
             If any of your details are wrong, please contact HR.\n"
        );
        self.dispatch(to, "Welcome to the team", &body).await;
    }

    pub async fn send_import_summary(&self, imported: usize, failed: usize, total: usize) {
        let Some(admin) = self.admin_email().map(str::to_string) else {
            log::debug!("mail sender not configured, skipping import summary");
            return;
        };
        let body = format!(
            "Employee import finished.\n\n\
             Rows processed: {total}\n\
             Imported: {imported}\n\
             Failed: {failed}\n"
        );
        self.dispatch(&admin, "Employee import summary", &body).await;
    }

    pub async fn send_birthday_reminder(&self, names: &[String]) {
        let Some(admin) = self.admin_email().map(str::to_string) else {
            log::debug!("mail sender not configured, skipping birthday reminder");
            return;
        };
        let mut body = String::from("Employees with a birthday today:\n\n");
        for name in names {
            body.push_str("  - ");
            body.push_str(name);
            body.push('\n');
        }
        self.dispatch(&admin, "Birthday reminders", &body).await;
    }

    pub async fn send_generic(&self, to: &str, subject: &str, body: &str) {
        self.dispatch(to, subject, body).await;
    }

    async fn dispatch(&self, to: &str, subject: &str, body: &str) {
        let Some(inner) = self.inner.as_deref() else {
            log::debug!("mail sender not configured, skipping '{}' to {}", subject, to);
            return;
        };

        match deliver(&inner.ses, &inner.from, to, subject, body).await {
            Ok(()) => log::info!("sent '{}' to {}", subject, to),
            Err(err) => log::warn!("failed to send '{}' to {}: {}", subject, to, err),
        }
    }
}

async fn deliver(
    ses: &SesClient,
    from: &str,
    to: &str,
    subject: &str,
    body_text: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let subject = Content::builder().data(subject).build()?;

    let body = Body::builder()
        .text(Content::builder().data(body_text).build()?)
        .build();

    let message = Message::builder().subject(subject).body(body).build();

    ses.send_email()
        .from_email_address(from)
        .destination(Destination::builder().to_addresses(to).build())
        .content(EmailContent::builder().simple(message).build())
        .send()
        .await?;

    Ok(())
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_notifier_skips_sends_without_panicking() {
        let notifier = Notifier::disabled();
        assert!(!notifier.is_ready());
        assert_eq!(notifier.admin_email(), None);

        // All of these must be no-ops.
        notifier.send_welcome("grace@example.com", "Grace").await;
        notifier.send_import_summary(3, 1, 4).await;
        notifier.send_birthday_reminder(&["Grace".to_string()]).await;
        notifier.send_generic("x@example.com", "subject", "body").await;
    }
}
