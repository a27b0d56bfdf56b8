use serde_json::{Value, json};

use crate::errors::Result;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, Clone)]
pub struct Mailer {
    http: reqwest::Client,
    api_key: String,
    from_email: String,
}

impl Mailer {
    pub fn new(api_key: String, from_email: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            from_email,
        }
    }

    pub fn payload(&self, to: &str, subject: &str, html: &str) -> Value {
        json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": self.from_email },
            "subject": subject,
            "content": [{ "type": "text/html", "value": html }],
        })
    }

    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<()> {
        let payload = self.payload(to, subject, html);
        self.http
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let mailer = Mailer::new("key".to_string(), "no-reply@vayam.app".to_string());
        let payload = mailer.payload("sme@example.com", "Invitation", "<p>hi</p>");

        assert_eq!(
            payload["personalizations"][0]["to"][0]["email"],
            "sme@example.com"
        );
        assert_eq!(payload["from"]["email"], "no-reply@vayam.app");
        assert_eq!(payload["subject"], "Invitation");
        assert_eq!(payload["content"][0]["type"], "text/html");
        assert_eq!(payload["content"][0]["value"], "<p>hi</p>");
    }
}
