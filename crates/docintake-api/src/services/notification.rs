//! Upload confirmation emails
//!
//! Sent off the request path; every failure is logged and dropped.

use async_trait::async_trait;
use docintake_core::models::{DocumentType, Locale};
use docintake_core::Config;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Invalid sender address: {0}")]
    InvalidSender(String),

    #[error("Failed to build message: {0}")]
    Message(String),

    #[error("SMTP delivery failed: {0}")]
    Transport(String),
}

/// Facts needed to tell the uploader their document arrived.
#[derive(Debug, Clone)]
pub struct UploadNotification {
    pub company_id: Uuid,
    pub company_name: String,
    pub recipient_email: Option<String>,
    pub recipient_name: Option<String>,
    pub original_filename: String,
    pub document_type: DocumentType,
    pub locale: Locale,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: UploadNotification) -> Result<(), NotificationError>;
}

/// Used when email is disabled or SMTP is not configured.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, notification: UploadNotification) -> Result<(), NotificationError> {
        tracing::debug!(
            company_id = %notification.company_id,
            "Email notifications disabled, skipping upload confirmation"
        );
        Ok(())
    }
}

#[derive(Clone)]
pub struct EmailNotifier {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
    frontend_url: Option<String>,
}

impl EmailNotifier {
    /// Create from config. Returns `None` if disabled or SMTP is not configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        if !config.email_notifications_enabled() {
            tracing::debug!("Email notifications disabled (EMAIL_NOTIFICATIONS_ENABLED=false)");
            return None;
        }
        let host = config.smtp_host()?;
        let from = config.smtp_from()?.to_string();
        let port = config.smtp_port();
        let credentials = match (config.smtp_user(), config.smtp_password()) {
            (Some(u), Some(p)) => Some(Credentials::new(u.to_string(), p.to_string())),
            _ => None,
        };

        let mailer = if config.smtp_tls() {
            let builder = match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host) {
                Ok(b) => b.port(port),
                Err(e) => {
                    tracing::warn!(error = %e, host = %host, "Invalid SMTP relay, email disabled");
                    return None;
                }
            };
            let builder = match credentials {
                Some(c) => builder.credentials(c),
                None => builder,
            };
            tracing::info!(host = %host, port = port, "Email notifier initialized (SMTP with STARTTLS)");
            builder.build()
        } else {
            let builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port);
            let builder = match credentials {
                Some(c) => builder.credentials(c),
                None => builder,
            };
            tracing::info!(host = %host, port = port, "Email notifier initialized (SMTP)");
            builder.build()
        };

        Some(Self {
            mailer: Arc::new(mailer),
            from,
            frontend_url: config.frontend_url().map(String::from),
        })
    }

    fn build_message(&self, n: &UploadNotification) -> Result<Message, NotificationError> {
        let address = n
            .recipient_email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| NotificationError::InvalidRecipient("no email on identity".into()))?;
        let to: Mailbox = address
            .parse()
            .map_err(|e| NotificationError::InvalidRecipient(format!("{}: {}", address, e)))?;
        let from: Mailbox = self
            .from
            .parse()
            .map_err(|e| NotificationError::InvalidSender(format!("{}", e)))?;

        let (subject, body) = render(n, self.frontend_url.as_deref());

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| NotificationError::Message(e.to_string()))
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, notification: UploadNotification) -> Result<(), NotificationError> {
        let message = self.build_message(&notification)?;
        self.mailer
            .send(message)
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;
        tracing::info!(company_id = %notification.company_id, "Upload confirmation email sent");
        Ok(())
    }
}

/// Pick the notifier for this deployment.
pub fn create_notifier(config: &Config) -> Arc<dyn Notifier> {
    match EmailNotifier::from_config(config) {
        Some(email) => Arc::new(email),
        None => Arc::new(NoopNotifier),
    }
}

/// Run a notification in the background. Errors are logged at `warn`.
pub fn spawn_notification(notifier: Arc<dyn Notifier>, notification: UploadNotification) {
    tokio::spawn(async move {
        let company_id = notification.company_id;
        if let Err(e) = notifier.notify(notification).await {
            tracing::warn!(error = %e, company_id = %company_id, "Upload notification failed");
        }
    });
}

fn document_type_label(document_type: DocumentType, locale: Locale) -> &'static str {
    use DocumentType::*;
    match (locale, document_type) {
        (Locale::Fi, FinancialStatements) => "Tilinpäätös",
        (Locale::Fi, BalanceIncomeInterim) => "Tase ja tuloslaskelma",
        (Locale::Fi, Forecast) => "Ennuste",
        (Locale::Fi, BusinessPlan) => "Liiketoimintasuunnitelma",
        (Locale::Fi, LeasingDocument) => "Leasing-asiakirja",
        (Locale::Fi, CollateralDocument) => "Vakuusasiakirja",
        (Locale::Fi, TaxReturn) => "Veroilmoitus",
        (Locale::Fi, CompanyRegistration) => "Kaupparekisteriote",
        (Locale::Fi, Other) => "Muu asiakirja",
        (Locale::Sv, FinancialStatements) => "Bokslut",
        (Locale::Sv, BalanceIncomeInterim) => "Balans- och resultaträkning",
        (Locale::Sv, Forecast) => "Prognos",
        (Locale::Sv, BusinessPlan) => "Affärsplan",
        (Locale::Sv, LeasingDocument) => "Leasingdokument",
        (Locale::Sv, CollateralDocument) => "Säkerhetsdokument",
        (Locale::Sv, TaxReturn) => "Skattedeklaration",
        (Locale::Sv, CompanyRegistration) => "Handelsregisterutdrag",
        (Locale::Sv, Other) => "Övrigt dokument",
        (Locale::En, FinancialStatements) => "Financial statements",
        (Locale::En, BalanceIncomeInterim) => "Balance sheet and income statement",
        (Locale::En, Forecast) => "Forecast",
        (Locale::En, BusinessPlan) => "Business plan",
        (Locale::En, LeasingDocument) => "Leasing document",
        (Locale::En, CollateralDocument) => "Collateral document",
        (Locale::En, TaxReturn) => "Tax return",
        (Locale::En, CompanyRegistration) => "Trade register extract",
        (Locale::En, Other) => "Other document",
    }
}

/// Localized subject and plain-text body.
fn render(n: &UploadNotification, frontend_url: Option<&str>) -> (String, String) {
    let label = document_type_label(n.document_type, n.locale);
    let link = frontend_url
        .map(|url| format!("\n\n{}/companies/{}/documents", url.trim_end_matches('/'), n.company_id))
        .unwrap_or_default();

    match n.locale {
        Locale::Fi => {
            let greeting = n
                .recipient_name
                .as_deref()
                .map(|name| format!("Hei {},", name))
                .unwrap_or_else(|| "Hei,".to_string());
            (
                format!("Asiakirja vastaanotettu: {}", n.company_name),
                format!(
                    "{}\n\nOlemme vastaanottaneet yrityksen {} asiakirjan \"{}\" ({}). \
                     Asiakirja analysoidaan automaattisesti.{}",
                    greeting, n.company_name, n.original_filename, label, link
                ),
            )
        }
        Locale::Sv => {
            let greeting = n
                .recipient_name
                .as_deref()
                .map(|name| format!("Hej {},", name))
                .unwrap_or_else(|| "Hej,".to_string());
            (
                format!("Dokument mottaget: {}", n.company_name),
                format!(
                    "{}\n\nVi har tagit emot dokumentet \"{}\" ({}) för {}. \
                     Dokumentet analyseras automatiskt.{}",
                    greeting, n.original_filename, label, n.company_name, link
                ),
            )
        }
        Locale::En => {
            let greeting = n
                .recipient_name
                .as_deref()
                .map(|name| format!("Hi {},", name))
                .unwrap_or_else(|| "Hi,".to_string());
            (
                format!("Document received: {}", n.company_name),
                format!(
                    "{}\n\nWe have received the document \"{}\" ({}) for {}. \
                     It will be analyzed automatically.{}",
                    greeting, n.original_filename, label, n.company_name, link
                ),
            )
        }
    }
}
