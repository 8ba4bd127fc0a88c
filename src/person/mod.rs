//! Person record updates
//!
//! Turns the submitted person form into the payload for the people
//! backend's update endpoint and summarizes the answer.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::HashMap;

/// Why an update was not sent
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersonUpdateError {
    #[error("Provide phone_number OR (first_name and last_name).")]
    MissingIdentifier,
}

/// Payload of `POST <backend>/set_info`. Empty fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_conversation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stories_for: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions_for: Option<String>,
}

impl PersonUpdate {
    /// Build from raw form fields: values are trimmed, blanks dropped, and
    /// an `age` that is not a finite number is left out.
    pub fn from_form(form: &HashMap<String, String>) -> Self {
        let field = |key: &str| {
            form.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            phone_number: field("phone_number"),
            first_name: field("first_name"),
            last_name: field("last_name"),
            age: field("age").and_then(|v| parse_age(&v)),
            relation: field("relation"),
            memory_about: field("memory_about"),
            last_conversation: field("last_conversation"),
            stories_for: field("stories_for"),
            questions_for: field("questions_for"),
        }
    }

    /// A record is addressed by phone number or by first and last name
    pub fn validate(&self) -> Result<(), PersonUpdateError> {
        let has_phone = self.phone_number.is_some();
        let has_names = self.first_name.is_some() && self.last_name.is_some();
        if has_phone || has_names {
            Ok(())
        } else {
            Err(PersonUpdateError::MissingIdentifier)
        }
    }
}

fn parse_age(raw: &str) -> Option<Number> {
    if let Ok(age) = raw.parse::<i64>() {
        return Some(age.into());
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Failure message from a rejected update body: `error`, then `hint`,
/// then the bare status.
pub fn rejection_message(body: Option<&Value>, status: u16) -> String {
    ["error", "hint"]
        .iter()
        .filter_map(|key| body.and_then(|b| b.get(*key)).and_then(Value::as_str))
        .find(|message| !message.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}

/// One-line summary of a successful update, e.g.
/// `status: updated · person: Anna Smith (+4322342)`
pub fn update_summary(response: &Value) -> String {
    let text = |value: Option<&Value>| {
        value
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let mut summary = match text(response.get("status")) {
        Some(status) => format!("status: {}", status),
        None => "ok".to_string(),
    };

    let person = response.get("person");
    let names: Vec<String> = ["first_name", "last_name"]
        .iter()
        .filter_map(|key| text(person.and_then(|p| p.get(*key))))
        .collect();
    let phone = text(person.and_then(|p| p.get("phone_number")));

    if !names.is_empty() || phone.is_some() {
        let mut who = names.join(" ");
        if let Some(phone) = phone {
            if !who.is_empty() {
                who.push(' ');
            }
            who.push_str(&format!("({})", phone));
        }
        summary.push_str(" · person: ");
        summary.push_str(&who);
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_payload_keeps_known_trimmed_fields() {
        let update = PersonUpdate::from_form(&form(&[
            ("first_name", "  Anna "),
            ("last_name", "Smith"),
            ("relation", ""),
            ("age", " 41 "),
            ("favourite_colour", "green"),
        ]));

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "first_name": "Anna", "last_name": "Smith", "age": 41 })
        );
    }

    #[test]
    fn test_age_must_be_a_number() {
        let update = PersonUpdate::from_form(&form(&[("phone_number", "+4322342"), ("age", "forty")]));
        assert_eq!(update.age, None);

        let update = PersonUpdate::from_form(&form(&[("age", "41.5")]));
        assert_eq!(update.age, Number::from_f64(41.5));

        let update = PersonUpdate::from_form(&form(&[("age", "NaN")]));
        assert_eq!(update.age, None);
    }

    #[test]
    fn test_identifier_rules() {
        let phone_only = PersonUpdate::from_form(&form(&[("phone_number", "+4322342")]));
        assert!(phone_only.validate().is_ok());

        let both_names = PersonUpdate::from_form(&form(&[("first_name", "Anna"), ("last_name", "Smith")]));
        assert!(both_names.validate().is_ok());

        let first_only = PersonUpdate::from_form(&form(&[("first_name", "Anna"), ("relation", "wife")]));
        assert_eq!(first_only.validate(), Err(PersonUpdateError::MissingIdentifier));

        let blank = PersonUpdate::from_form(&form(&[("phone_number", "   ")]));
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_rejection_message_prefers_error_then_hint() {
        let both = json!({ "error": "not found", "hint": "check the name" });
        assert_eq!(rejection_message(Some(&both), 404), "not found");

        let hint = json!({ "error": "", "hint": "check the name" });
        assert_eq!(rejection_message(Some(&hint), 404), "check the name");

        assert_eq!(
            rejection_message(Some(&json!({})), 500),
            "Request failed with status 500"
        );
        assert_eq!(rejection_message(None, 502), "Request failed with status 502");
    }

    #[test]
    fn test_update_summary() {
        let full = json!({
            "status": "updated",
            "person": { "first_name": "Anna", "last_name": "Smith", "phone_number": "+4322342" }
        });
        assert_eq!(
            update_summary(&full),
            "status: updated · person: Anna Smith (+4322342)"
        );

        let phone_only = json!({ "status": "created", "person": { "phone_number": "+1" } });
        assert_eq!(update_summary(&phone_only), "status: created · person: (+1)");

        assert_eq!(update_summary(&json!({})), "ok");
        assert_eq!(update_summary(&Value::Null), "ok");
    }
}
