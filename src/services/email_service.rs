/// Email service for transactional mail
/// Uses lettre for SMTP delivery
use anyhow::{anyhow, Result};
use lettre::message::header::ContentType;
use lettre::transport::smtp::SmtpTransport;
use lettre::{Message, Transport};
use std::sync::Arc;

use crate::config::EmailConfig;

pub struct EmailService {
    config: Arc<EmailConfig>,
    app_url: String,
}

impl EmailService {
    pub fn new(config: EmailConfig, app_url: String) -> Self {
        EmailService {
            config: Arc::new(config),
            app_url,
        }
    }

    /// SMTP credentials are optional; without them sends are skipped
    pub fn is_configured(&self) -> bool {
        !self.config.smtp_username.is_empty()
            && !self.config.smtp_password.is_empty()
            && !self.config.smtp_host.is_empty()
    }

    fn create_transport(&self) -> Result<SmtpTransport> {
        let creds = lettre::transport::smtp::authentication::Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        let mailer = SmtpTransport::builder_dangerous(&self.config.smtp_host)
            .port(self.config.smtp_port)
            .credentials(creds)
            .build();

        Ok(mailer)
    }

    /// Send the post-registration welcome email
    pub fn send_welcome_email(&self, to_email: &str, to_name: &str) -> Result<()> {
        let body = format!(
            "Hi {},\n\n\
             Welcome aboard! Your account is ready and you can start writing right away:\n\n\
             {}\n\n\
             Happy blogging,\n\
             The team",
            to_name, self.app_url
        );

        self.send_email(to_email, "Welcome to the blog", &body)
    }

    fn send_email(&self, to_email: &str, subject: &str, text_body: &str) -> Result<()> {
        if to_email.is_empty() {
            return Err(anyhow!("Recipient email cannot be empty"));
        }

        let from = self
            .config
            .smtp_from
            .parse()
            .map_err(|e| anyhow!("Invalid from email address: {}", e))?;

        let to = to_email
            .parse()
            .map_err(|e| anyhow!("Invalid to email address: {}", e))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(text_body.to_string())
            .map_err(|e| anyhow!("Failed to build email message: {}", e))?;

        let mailer = self.create_transport()?;

        mailer
            .send(&message)
            .map_err(|e| anyhow!("Failed to send email: {}", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            smtp_from: "noreply@blogservice.dev".to_string(),
        }
    }

    #[test]
    fn test_without_credentials_is_unconfigured() {
        let service = EmailService::new(config(), "http://localhost:8080".into());
        assert!(!service.is_configured());
    }

    #[test]
    fn test_empty_recipient_rejected() {
        let service = EmailService::new(config(), "http://localhost:8080".into());
        assert!(service.send_welcome_email("", "Ada").is_err());
    }
}
