use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::TelegramConfig;
use crate::contact::ContactLead;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("telegram request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("telegram rejected the message ({status}): {description}")]
    Rejected { status: u16, description: String },
}

/// Somewhere a validated lead gets delivered to.
pub trait LeadNotifier: Send + Sync {
    fn notify<'a>(&'a self, lead: &'a ContactLead) -> BoxFuture<'a, Result<(), NotifyError>>;
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

#[derive(Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
    site_url: Option<String>,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig, site_url: Option<String>) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            config,
            site_url,
        })
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token
        )
    }

    async fn send(&self, lead: &ContactLead) -> Result<(), NotifyError> {
        let text = format_lead_message(lead, Utc::now(), self.site_url.as_deref());
        let body = SendMessage {
            chat_id: &self.config.chat_id,
            text: &text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };

        let response = self
            .client
            .post(self.send_message_url())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        // Telegram answers with a JSON envelope for errors too.
        let parsed = response.json::<TelegramResponse>().await.ok();

        match parsed {
            Some(TelegramResponse { ok: true, .. }) if status.is_success() => Ok(()),
            other => Err(NotifyError::Rejected {
                status: status.as_u16(),
                description: other
                    .and_then(|r| r.description)
                    .unwrap_or_else(|| "no description".to_string()),
            }),
        }
    }
}

impl LeadNotifier for TelegramNotifier {
    fn notify<'a>(&'a self, lead: &'a ContactLead) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(self.send(lead))
    }
}

pub fn format_lead_message(
    lead: &ContactLead,
    received_at: DateTime<Utc>,
    site_url: Option<&str>,
) -> String {
    let mut text = String::from("<b>Новая заявка</b>\n\n");
    text.push_str(&format!("<b>Имя:</b> {}\n", escape_html(&lead.name)));
    text.push_str(&format!("<b>Контакт:</b> {}\n", escape_html(&lead.contact)));
    if let Some(message) = &lead.message {
        text.push_str(&format!("<b>Сообщение:</b>\n{}\n", escape_html(message)));
    }
    text.push_str(&format!(
        "\n<i>{}</i>",
        received_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(site) = site_url {
        text.push_str(&format!("\n{}", escape_html(site)));
    }
    text
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lead(message: Option<&str>) -> ContactLead {
        ContactLead {
            name: "Иван".to_string(),
            contact: "@ivan_tg".to_string(),
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn message_contains_every_field() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap();
        let text = format_lead_message(&lead(Some("Хочу на встречу")), at, Some("https://archihappy.ru"));

        assert!(text.starts_with("<b>Новая заявка</b>"));
        assert!(text.contains("<b>Имя:</b> Иван"));
        assert!(text.contains("<b>Контакт:</b> @ivan_tg"));
        assert!(text.contains("Хочу на встречу"));
        assert!(text.contains("2025-03-01 12:30:00 UTC"));
        assert!(text.ends_with("https://archihappy.ru"));
    }

    #[test]
    fn message_line_is_omitted_without_message() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let text = format_lead_message(&lead(None), at, None);
        assert!(!text.contains("Сообщение"));
    }

    #[test]
    fn user_input_is_escaped() {
        let mut l = lead(Some("<script>alert(1)</script> & co"));
        l.name = "<b>Boss</b>".to_string();
        let text = format_lead_message(&l, Utc::now(), None);

        assert!(text.contains("&lt;b&gt;Boss&lt;/b&gt;"));
        assert!(text.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; co"));
        assert!(!text.contains("<script>"));
    }

    #[test]
    fn send_url_tolerates_trailing_slash() {
        let notifier = TelegramNotifier::new(
            TelegramConfig {
                bot_token: "123:abc".to_string(),
                chat_id: "-1".to_string(),
                api_base: "http://localhost:8081/".to_string(),
            },
            None,
        )
        .unwrap();
        assert_eq!(
            notifier.send_message_url(),
            "http://localhost:8081/bot123:abc/sendMessage"
        );
    }
}
