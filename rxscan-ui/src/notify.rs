// Notification Adapter - Medication Reminder Email
//
// Sending is best effort. Every failure (bad address, transport, auth,
// missing SMTP credentials) is logged and reported as `false`.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::SmtpSettings;

pub const ALERT_SUBJECT: &str = "Medication Reminder - OCR Prescription Intelligence";

/// Notification errors
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Invalid email address: {0}")]
    Address(String),

    #[error("Could not build message: {0}")]
    Message(String),

    #[error("SMTP error: {0}")]
    Transport(String),
}

/// One outgoing HTML email
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Mail transport
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), NotifyError>;
}

/// SMTP transport over STARTTLS, authenticated as the sender
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    /// Returns `Ok(None)` when sender credentials are not configured
    pub fn from_settings(settings: &SmtpSettings) -> Result<Option<Self>, NotifyError> {
        let (Some(email), Some(password)) = (&settings.sender_email, &settings.sender_password)
        else {
            return Ok(None);
        };

        let sender: Mailbox = email
            .parse()
            .map_err(|e| NotifyError::Address(format!("{}: {}", email, e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.server)
            .map_err(|e| NotifyError::Transport(e.to_string()))?
            .port(settings.port)
            .credentials(Credentials::new(email.clone(), password.clone()))
            .timeout(Some(settings.timeout))
            .build();

        Ok(Some(Self { transport, sender }))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), NotifyError> {
        let recipient: Mailbox = mail
            .to
            .parse()
            .map_err(|e| NotifyError::Address(format!("{}: {}", mail.to, e)))?;

        let message = Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(mail.subject)
            .header(ContentType::TEXT_HTML)
            .body(mail.html_body)
            .map_err(|e| NotifyError::Message(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        Ok(())
    }
}

/// Sends medication reminders through an optional mailer
#[derive(Clone)]
pub struct Notifier {
    mailer: Option<Arc<dyn Mailer>>,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self {
            mailer: Some(mailer),
        }
    }

    pub fn disabled() -> Self {
        Self { mailer: None }
    }

    pub fn from_settings(settings: &SmtpSettings) -> Self {
        match SmtpMailer::from_settings(settings) {
            Ok(Some(mailer)) => {
                info!("SMTP notifications via {}:{}", settings.server, settings.port);
                Self::new(Arc::new(mailer))
            }
            Ok(None) => {
                warn!("SENDER_EMAIL/SENDER_PASSWORD not set; email alerts disabled");
                Self::disabled()
            }
            Err(e) => {
                warn!("Email alerts disabled: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.mailer.is_some()
    }

    /// Send the reminder email; `true` only if the transport accepted it
    pub async fn send_medication_alert(
        &self,
        to: &str,
        medications: &[String],
        frequencies: &[String],
    ) -> bool {
        let Some(mailer) = &self.mailer else {
            warn!("Email alert requested but no mailer is configured");
            return false;
        };

        let mail = OutgoingMail {
            to: to.to_string(),
            subject: ALERT_SUBJECT.to_string(),
            html_body: render_alert(medications, frequencies),
        };

        match mailer.send(mail).await {
            Ok(()) => {
                info!("Medication reminder sent");
                true
            }
            Err(e) => {
                error!("Error sending email: {}", e);
                false
            }
        }
    }
}

/// HTML body of the reminder
pub fn render_alert(medications: &[String], frequencies: &[String]) -> String {
    let medication_list = medications.join(", ");
    let frequency_list = frequencies.join(", ");
    let medications = html_escape::encode_text(&medication_list);
    let frequencies = html_escape::encode_text(&frequency_list);

    format!(
        "<html>\n  <body>\n    <h2>Medication Reminder</h2>\n    <p>Dear Patient,</p>\n    \
         <p>Here are your prescribed medications:</p>\n    <ul>\n      \
         <li><strong>Medications:</strong> {medications}</li>\n      \
         <li><strong>Frequencies:</strong> {frequencies}</li>\n    </ul>\n    \
         <p>Please take your medications as prescribed by your doctor.</p>\n    \
         <p>Best regards,<br>OCR Prescription Intelligence Team</p>\n  </body>\n</html>\n"
    )
}
