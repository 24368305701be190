//! Contact form model: client-side validation and the API exchange types.

use serde::{Deserialize, Serialize};

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
pub const CONTACT_MIN: usize = 5;
pub const MESSAGE_MAX: usize = 1000;

pub const GENERIC_ERROR: &str = "Произошла ошибка. Попробуйте снова.";
pub const CONNECTION_ERROR: &str = "Ошибка соединения. Попробуйте позже.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadForm {
    pub name: String,
    pub contact: String,
    pub message: String,
    /// Honeypot, hidden from people.
    pub website: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<&'static str>,
    pub contact: Option<&'static str>,
    pub message: Option<&'static str>,
    pub website: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.contact.is_none() && self.message.is_none() && self.website.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactPayload {
    pub name: String,
    pub contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub website: String,
}

impl LeadForm {
    /// Same rules the server applies: lengths count characters of the raw
    /// input, values are trimmed afterwards.
    pub fn validate(&self) -> Result<ContactPayload, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name_len = self.name.chars().count();
        if name_len < NAME_MIN {
            errors.name = Some("Минимум 2 символа");
        } else if name_len > NAME_MAX {
            errors.name = Some("Максимум 100 символов");
        }
        if self.contact.chars().count() < CONTACT_MIN {
            errors.contact = Some("Введите телефон или Telegram");
        }
        if self.message.chars().count() > MESSAGE_MAX {
            errors.message = Some("Максимум 1000 символов");
        }
        if !self.website.is_empty() {
            errors.website = Some("Поле должно быть пустым");
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        let message = self.message.trim();
        Ok(ContactPayload {
            name: self.name.trim().to_string(),
            contact: self.contact.trim().to_string(),
            message: (!message.is_empty()).then(|| message.to_string()),
            website: String::new(),
        })
    }
}

/// Body of any `/api/contact` response, success or failure.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ContactReply {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormStatus {
    Idle,
    Submitting,
    Success,
    Error(String),
}

impl FormStatus {
    /// Maps a finished request to the next status. `Err` means the request
    /// never produced a readable reply.
    pub fn from_reply<E: std::fmt::Display>(reply: Result<ContactReply, E>) -> Self {
        match reply {
            Ok(reply) if reply.success => FormStatus::Success,
            Ok(reply) => {
                log::warn!("Contact submission rejected: {:?}", reply.error);
                FormStatus::Error(reply.message.filter(|m| !m.is_empty()).unwrap_or_else(|| GENERIC_ERROR.to_string()))
            }
            Err(e) => {
                log::error!("Contact submission failed: {}", e);
                FormStatus::Error(CONNECTION_ERROR.to_string())
            }
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, FormStatus::Submitting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, contact: &str) -> LeadForm {
        LeadForm {
            name: name.to_string(),
            contact: contact.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn name_length_bounds() {
        assert_eq!(form("A", "@ivan_t").validate().unwrap_err().name, Some("Минимум 2 символа"));
        assert!(form("Ян", "@ivan_t").validate().is_ok());
        assert!(form(&"Я".repeat(100), "@ivan_t").validate().is_ok());
        assert_eq!(
            form(&"Я".repeat(101), "@ivan_t").validate().unwrap_err().name,
            Some("Максимум 100 символов")
        );
    }

    #[test]
    fn contact_needs_five_characters() {
        assert!(form("Иван", "1234").validate().unwrap_err().contact.is_some());
        assert!(form("Иван", "12345").validate().is_ok());
    }

    #[test]
    fn raw_length_is_checked_then_trimmed() {
        let payload = form(" A ", " 1234 ").validate().unwrap();
        assert_eq!(payload.name, "A");
        assert_eq!(payload.contact, "1234");

        let padded = format!("{} ", "Я".repeat(100));
        assert_eq!(
            form(&padded, "@ivan_t").validate().unwrap_err().name,
            Some("Максимум 100 символов")
        );
    }

    #[test]
    fn message_is_optional_and_capped() {
        let mut lead = form("Иван", "@ivan_t");
        lead.message = "   ".to_string();
        assert_eq!(lead.validate().unwrap().message, None);

        lead.message = "x".repeat(1000);
        assert!(lead.validate().is_ok());

        lead.message = "x".repeat(1001);
        assert!(lead.validate().unwrap_err().message.is_some());
    }

    #[test]
    fn filled_honeypot_is_rejected() {
        let mut lead = form("Иван", "@ivan_t");
        lead.website = "x".to_string();
        let errors = lead.validate().unwrap_err();
        assert!(errors.website.is_some());
        assert!(errors.name.is_none());
    }

    #[test]
    fn all_errors_are_reported_together() {
        let errors = form("", "").validate().unwrap_err();
        assert!(errors.name.is_some());
        assert!(errors.contact.is_some());
    }

    #[test]
    fn payload_omits_empty_message() {
        let payload = form(" Иван ", "@ivan_t").validate().unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["name"], "Иван");
        assert!(json.get("message").is_none());
        assert_eq!(json["website"], "");
    }

    #[test]
    fn success_reply_maps_to_success() {
        let reply = ContactReply {
            success: true,
            message: Some("Заявка отправлена".to_string()),
            error: None,
        };
        assert_eq!(FormStatus::from_reply::<String>(Ok(reply)), FormStatus::Success);
    }

    #[test]
    fn server_error_message_is_shown_verbatim() {
        let reply: ContactReply = serde_json::from_str(
            r#"{"success":false,"error":"RATE_LIMITED","message":"Слишком много запросов","retryAfter":42}"#,
        )
        .unwrap();
        assert_eq!(
            FormStatus::from_reply::<String>(Ok(reply)),
            FormStatus::Error("Слишком много запросов".to_string())
        );
    }

    #[test]
    fn server_error_without_message_gets_generic_text() {
        let reply = ContactReply {
            success: false,
            message: None,
            error: Some("UNKNOWN_ERROR".to_string()),
        };
        assert_eq!(
            FormStatus::from_reply::<String>(Ok(reply)),
            FormStatus::Error(GENERIC_ERROR.to_string())
        );
    }

    #[test]
    fn network_failure_is_distinct_from_server_errors() {
        let status = FormStatus::from_reply::<String>(Err("connection refused".to_string()));
        assert_eq!(status, FormStatus::Error(CONNECTION_ERROR.to_string()));
        assert_ne!(CONNECTION_ERROR, GENERIC_ERROR);
    }
}
