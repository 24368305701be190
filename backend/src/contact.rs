use serde::{Deserialize, Serialize};

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
pub const CONTACT_MIN: usize = 5;
pub const MESSAGE_MAX: usize = 1000;

/// Raw body of `POST /api/contact`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub message: Option<String>,
    /// Honeypot. Hidden from people, filled in by bots.
    #[serde(default)]
    pub website: Option<String>,
}

/// A lead that passed validation. Only ever lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLead {
    pub name: String,
    pub contact: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Contact,
    Message,
    Website,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

impl ContactRequest {
    /// Checks the request and produces a trimmed lead. Lengths are checked on
    /// the raw input and trimming happens afterwards. All failing fields are
    /// reported, not just the first one.
    pub fn validate(&self) -> Result<ContactLead, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name_len = self.name.chars().count();
        if name_len < NAME_MIN {
            errors.push(FieldError {
                field: Field::Name,
                message: "Минимум 2 символа",
            });
        } else if name_len > NAME_MAX {
            errors.push(FieldError {
                field: Field::Name,
                message: "Максимум 100 символов",
            });
        }

        if self.contact.chars().count() < CONTACT_MIN {
            errors.push(FieldError {
                field: Field::Contact,
                message: "Введите телефон или Telegram",
            });
        }

        let message = self
            .message
            .as_deref()
            .filter(|m| !m.trim().is_empty());
        if message.is_some_and(|m| m.chars().count() > MESSAGE_MAX) {
            errors.push(FieldError {
                field: Field::Message,
                message: "Максимум 1000 символов",
            });
        }

        if self.website.as_deref().is_some_and(|w| !w.is_empty()) {
            errors.push(FieldError {
                field: Field::Website,
                message: "Bot detected",
            });
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ContactLead {
            name: self.name.trim().to_string(),
            contact: self.contact.trim().to_string(),
            message: message.map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, contact: &str) -> ContactRequest {
        ContactRequest {
            name: name.to_string(),
            contact: contact.to_string(),
            ..Default::default()
        }
    }

    fn failed_fields(req: &ContactRequest) -> Vec<Field> {
        req.validate()
            .unwrap_err()
            .into_iter()
            .map(|e| e.field)
            .collect()
    }

    #[test]
    fn one_letter_name_fails_two_letters_pass() {
        assert_eq!(failed_fields(&request("A", "@ivan_tg")), vec![Field::Name]);
        assert!(request("Al", "@ivan_tg").validate().is_ok());
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        // Two Cyrillic letters are four bytes.
        assert!(request("Ян", "+79001234567").validate().is_ok());
        assert!(request(&"я".repeat(100), "+79001234567").validate().is_ok());
        assert_eq!(
            failed_fields(&request(&"я".repeat(101), "+79001234567")),
            vec![Field::Name]
        );
    }

    #[test]
    fn empty_contact_fails() {
        assert_eq!(failed_fields(&request("Иван", "")), vec![Field::Contact]);
        assert_eq!(failed_fields(&request("Иван", "@ab")), vec![Field::Contact]);
    }

    #[test]
    fn lengths_are_checked_before_trimming() {
        let lead = request(" A ", "  @ab  ").validate().unwrap();
        assert_eq!(lead.name, "A");
        assert_eq!(lead.contact, "@ab");

        let padded = format!(" {}", "я".repeat(100));
        assert_eq!(failed_fields(&request(&padded, "@ivan_tg")), vec![Field::Name]);
    }

    #[test]
    fn message_limit_is_inclusive() {
        let mut req = request("Иван", "@ivan_tg");
        req.message = Some("ж".repeat(1000));
        assert!(req.validate().is_ok());

        req.message = Some("ж".repeat(1001));
        assert_eq!(failed_fields(&req), vec![Field::Message]);
    }

    #[test]
    fn honeypot_always_fails() {
        let mut req = request("Иван Петров", "@ivan_tg");
        req.message = Some("Хочу на встречу".to_string());
        req.website = Some("http://spam.example".to_string());
        assert_eq!(failed_fields(&req), vec![Field::Website]);
    }

    #[test]
    fn empty_honeypot_is_fine() {
        let mut req = request("Иван", "@ivan_tg");
        req.website = Some(String::new());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn values_are_trimmed_and_blank_message_dropped() {
        let mut req = request("  Иван Петров  ", " @ivan_telegram ");
        req.message = Some("   ".to_string());
        let lead = req.validate().unwrap();
        assert_eq!(lead.name, "Иван Петров");
        assert_eq!(lead.contact, "@ivan_telegram");
        assert_eq!(lead.message, None);
    }

    #[test]
    fn every_failing_field_is_reported() {
        let mut req = request("A", "");
        req.website = Some("x".to_string());
        assert_eq!(
            failed_fields(&req),
            vec![Field::Name, Field::Contact, Field::Website]
        );
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let req: ContactRequest = serde_json::from_str(r#"{"name":"Иван"}"#).unwrap();
        assert_eq!(req.contact, "");
        assert!(req.message.is_none());
        assert!(req.website.is_none());
    }
}
