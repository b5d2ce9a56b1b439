//! Contact form: honeypot gate, field mapping and delivery through the
//! transactional-email HTTP API.
use serde::Serialize;

use crate::content::HTTP;

/// Literal substituted when the visitor leaves the phone field empty.
const PHONE_FALLBACK: &str = "not provided";

/// Raw form state as typed by the visitor.
///
/// `website` is the honeypot: the input is visually hidden, so a value
/// can only come from an automated submitter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub website: String,
}

impl ContactFields {
    /// Any honeypot content disqualifies the submission.
    pub fn is_spam(&self) -> bool {
        !self.website.is_empty()
    }

    /// Template parameters for the delivery API. Family name leads,
    /// Hungarian order.
    pub fn payload(&self) -> EmailPayload {
        EmailPayload {
            name: format!("{} {}", self.last_name, self.first_name),
            email: self.email.clone(),
            phone: if self.phone.is_empty() {
                PHONE_FALLBACK.to_string()
            } else {
                self.phone.clone()
            },
            message: self.message.clone(),
        }
    }

    pub fn clear(&mut self) {
        *self = ContactFields::default();
    }
}

/// Flat field set the email template expects.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmailPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// Identifiers and endpoint of the delivery service.
#[derive(Debug, Clone)]
pub struct Mailer {
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a EmailPayload,
}

impl Mailer {
    /// Deliver one submission. Non-2xx responses are failures.
    pub async fn send(&self, payload: &EmailPayload) -> Result<(), reqwest::Error> {
        HTTP.post(&self.endpoint)
            .json(&SendRequest {
                service_id: &self.service_id,
                template_id: &self.template_id,
                user_id: &self.public_key,
                template_params: payload,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled() -> ContactFields {
        ContactFields {
            first_name: "Anna".into(),
            last_name: "Kovács".into(),
            email: "anna@example.com".into(),
            phone: String::new(),
            message: "Szép kertet szeretnék.".into(),
            website: String::new(),
        }
    }

    #[test]
    fn honeypot_content_marks_spam() {
        let mut fields = filled();
        assert!(!fields.is_spam());
        fields.website = "https://spam.example".into();
        assert!(fields.is_spam());
    }

    #[test]
    fn payload_leads_with_the_family_name() {
        assert_eq!(filled().payload().name, "Kovács Anna");
    }

    #[test]
    fn empty_phone_gets_the_literal_fallback() {
        let mut fields = filled();
        assert_eq!(fields.payload().phone, "not provided");
        fields.phone = "+36 30 123 4567".into();
        assert_eq!(fields.payload().phone, "+36 30 123 4567");
    }

    #[test]
    fn message_and_email_pass_through_unchanged() {
        let payload = filled().payload();
        assert_eq!(payload.email, "anna@example.com");
        assert_eq!(payload.message, "Szép kertet szeretnék.");
    }

    #[test]
    fn clear_resets_every_field() {
        let mut fields = filled();
        fields.clear();
        assert_eq!(fields, ContactFields::default());
    }

    #[test]
    fn send_request_has_the_delivery_api_shape() {
        let payload = filled().payload();
        let request = SendRequest {
            service_id: "service_x",
            template_id: "template_y",
            user_id: "key_z",
            template_params: &payload,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["service_id"], "service_x");
        assert_eq!(json["template_id"], "template_y");
        assert_eq!(json["user_id"], "key_z");
        assert_eq!(json["template_params"]["name"], "Kovács Anna");
    }
}
