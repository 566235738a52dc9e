//! Outbound email (password reset links)

use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send the password reset link
    pub async fn send_password_reset(&self, to: &str, reset_url: &str) -> AppResult<()> {
        let text = format!(
            "Follow this link to reset your password: {}\n\nThe link expires in one hour. \
             If you did not ask for a new password, you can ignore this email.",
            reset_url
        );
        let html = format!(
            "<p>Click the link to reset your password: \
             <a href='{url}' target='_blank'>Reset Password</a></p>\
             <p>The link expires in one hour.</p>",
            url = reset_url
        );

        self.send_email(to, "Reset Password", text, html).await
    }

    async fn send_email(&self, to: &str, subject: &str, text: String, html: String) -> AppResult<()> {
        if !self.config.enabled {
            tracing::debug!(subject, "Email delivery disabled, not sending");
            return Ok(());
        }

        let from_name = self.config.smtp_from_name.as_deref().unwrap_or("MyBooks");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let transport = if self.config.smtp_use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let transport = match (&self.config.smtp_username, &self.config.smtp_password) {
            (Some(username), Some(password)) => {
                transport.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => transport,
        };

        transport
            .build()
            .send(email)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        tracing::info!(subject, "Email sent");
        Ok(())
    }
}
