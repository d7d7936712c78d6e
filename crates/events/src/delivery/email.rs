//! Behavior-alert emails via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport and sends each
//! alert as a plain-text plus HTML alternative message. Configuration
//! is loaded from environment variables; if `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `None` and no mailer is constructed.

use crate::bus::AlertNotice;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "GuauAI <alertas@guauai.local>";

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// RFC 5322 "From" mailbox.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable        | Required | Default                          |
    /// |-----------------|----------|----------------------------------|
    /// | `SMTP_HOST`     | yes      | -                                |
    /// | `SMTP_PORT`     | no       | `587`                            |
    /// | `SMTP_FROM`     | no       | `GuauAI <alertas@guauai.local>`  |
    /// | `SMTP_USER`     | no       | -                                |
    /// | `SMTP_PASSWORD` | no       | -                                |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Subject plus plain-text and HTML bodies of a behavior-alert email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Emoji shown next to the detected state.
pub fn emotion_emoji(emotional_state: Option<&str>) -> &'static str {
    let state = emotional_state.map(|s| s.trim().to_lowercase());
    match state.as_deref() {
        Some("dolorido" | "painful") => "😢",
        Some("ansioso" | "anxious") => "😰",
        Some("asustado" | "scared") => "😨",
        _ => "⚠️",
    }
}

/// Escape text for interpolation into HTML element content or attributes.
fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

const SECTION_STYLE: &str = "background:#1a1a2e;border-radius:.75rem;padding:1rem;margin-bottom:1rem";
const LABEL_STYLE: &str = "color:#64748b;font-size:.75rem;text-transform:uppercase;\
    letter-spacing:.05em;margin-bottom:.5rem";

fn html_section(label: &str, content: &str) -> String {
    format!(
        "<div style=\"{SECTION_STYLE}\">\
         <div style=\"{LABEL_STYLE}\">{label}</div>{content}</div>"
    )
}

fn render_html(dog_name: &str, emoji: &str, state: &str, notice: &AlertNotice) -> String {
    let dog_name = escape_html(dog_name);
    let mut sections = html_section(
        "Estado detectado",
        &format!(
            "<div style=\"font-size:1.25rem;font-weight:800;color:#ef4444\">{emoji} {}</div>",
            escape_html(state)
        ),
    );
    sections.push_str(&html_section(
        "Mensaje",
        &format!(
            "<div style=\"font-style:italic\">&quot;{}&quot;</div>",
            escape_html(&notice.alert.message)
        ),
    ));
    if let Some(recommendation) = &notice.alert.recommendation {
        sections.push_str(&html_section(
            "💡 Qué hacer",
            &format!("<div>{}</div>", escape_html(recommendation)),
        ));
    }

    format!(
        "<!DOCTYPE html><html><body style=\"background:#0a0a0f;color:#f1f5f9;\
         font-family:system-ui,sans-serif;padding:0;margin:0\">\
         <div style=\"max-width:520px;margin:0 auto;padding:2rem\">\
         <div style=\"text-align:center;margin-bottom:2rem\">\
         <h1 style=\"color:#a855f7;font-size:1.75rem;font-weight:900\">🐾 GuauAI</h1></div>\
         <div style=\"background:#111118;border-radius:1rem;padding:1.5rem;\
         border:1px solid #1e1e30;border-left:4px solid #ef4444\">\
         <h2 style=\"color:#ef4444;margin-bottom:.5rem\">{emoji} Alerta de comportamiento</h2>\
         <p style=\"color:#94a3b8;margin-bottom:1.5rem\">Tu perro \
         <strong style=\"color:#f1f5f9\">{dog_name}</strong> necesita atención.</p>\
         {sections}</div>\
         <div style=\"text-align:center;margin-top:1.5rem\">\
         <a href=\"{link}\" style=\"background:#7c3aed;color:white;padding:.75rem 1.5rem;\
         border-radius:.875rem;text-decoration:none;font-weight:700\">Ver análisis completo →</a>\
         </div></div></body></html>",
        link = escape_html(&notice.deep_link),
    )
}

/// Build the email for `notice` addressed about `dog_name`.
pub fn compose_behavior_alert(dog_name: &str, notice: &AlertNotice) -> ComposedEmail {
    let emoji = emotion_emoji(notice.emotional_state.as_deref());
    let state = notice
        .emotional_state
        .as_deref()
        .map(|s| s.trim().to_uppercase())
        .unwrap_or_default();

    let mut text = format!(
        "{emoji} Alerta de comportamiento\n\n\
         Tu perro {dog_name} necesita atención.\n\n\
         Estado detectado: {emoji} {state}\n\
         Mensaje: \"{}\"\n",
        notice.alert.message
    );
    if let Some(recommendation) = &notice.alert.recommendation {
        text.push_str(&format!("💡 Qué hacer: {recommendation}\n"));
    }
    text.push_str(&format!("\nVer análisis completo: {}\n", notice.deep_link));

    ComposedEmail {
        subject: format!("🚨 {dog_name} necesita tu atención — GuauAI"),
        html: render_html(dog_name, emoji, &state, notice),
        text,
    }
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends behavior-alert emails via SMTP.
pub struct EmailDelivery {
    config: EmailConfig,
}

impl EmailDelivery {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send the alert email for `notice` to `to_email`.
    pub async fn deliver_behavior_alert(
        &self,
        to_email: &str,
        dog_name: &str,
        notice: &AlertNotice,
    ) -> Result<(), EmailError> {
        use lettre::{
            message::MultiPart, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
            AsyncTransport, Message, Tokio1Executor,
        };

        let composed = compose_behavior_alert(dog_name, notice);

        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(composed.subject)
            .multipart(MultiPart::alternative_plain_html(composed.text, composed.html))
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(
            to = to_email,
            analysis_id = notice.analysis_id,
            alert_type = %notice.alert.alert_type,
            "Behavior alert email sent"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
