//! Contact form submission handling.
//!
//! A pure request-to-reply function; delivery is left to the host, which
//! only gets the validated submission logged.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const MISSING_FIELDS: &str = "Por favor completa todos los campos requeridos.";
const INVALID_EMAIL: &str = "Por favor ingresa un email válido.";
const PROCESSING_FAILED: &str = "Error al procesar el formulario. Por favor intenta de nuevo.";
const SENT: &str = "Mensaje enviado exitosamente";
const NO_POSTAL_CODE: &str = "No proporcionado";

/// Form fields as submitted. Fields keep whatever JSON type the client
/// sent; a field counts as filled when it is truthy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactRequest {
    pub first_name: Value,
    pub last_name: Value,
    pub postal_code: Value,
    pub email: Value,
    pub message: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContactResponse {
    Sent { success: bool, message: String },
    Failed { error: String },
}

/// HTTP status plus JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactReply {
    pub status: u16,
    pub body: ContactResponse,
}

impl ContactReply {
    fn failed(status: u16, error: &str) -> Self {
        Self {
            status,
            body: ContactResponse::Failed {
                error: error.to_string(),
            },
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.body).unwrap_or_default()
    }
}

/// `local@domain.tld`: no whitespace, exactly one `@`, and a dot with
/// characters on both sides somewhere in the domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Text of a truthy field: non-empty strings, non-zero numbers, `true`,
/// arrays and objects. `null`, `false`, `0` and `""` count as missing.
fn filled(field: &Value) -> Option<String> {
    match field {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Validate one submission and build the reply.
pub fn handle_contact(body: &[u8]) -> ContactReply {
    let request = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Null) => {
            log::error!("contact form: request body is null");
            return ContactReply::failed(500, PROCESSING_FAILED);
        }
        Ok(value @ Value::Object(_)) => match serde_json::from_value::<ContactRequest>(value) {
            Ok(request) => request,
            Err(err) => {
                log::error!("contact form: unreadable request: {err}");
                return ContactReply::failed(500, PROCESSING_FAILED);
            }
        },
        // Any other JSON value has no fields to read.
        Ok(_) => ContactRequest::default(),
        Err(err) => {
            log::error!("contact form: unreadable request: {err}");
            return ContactReply::failed(500, PROCESSING_FAILED);
        }
    };

    let (Some(first_name), Some(last_name), Some(email), Some(message)) = (
        filled(&request.first_name),
        filled(&request.last_name),
        filled(&request.email),
        filled(&request.message),
    ) else {
        return ContactReply::failed(400, MISSING_FIELDS);
    };

    if !is_valid_email(&email) {
        return ContactReply::failed(400, INVALID_EMAIL);
    }

    log::info!(
        "contact form: {first_name} {last_name} <{email}>, postal code {}: {message}",
        filled(&request.postal_code).unwrap_or_else(|| NO_POSTAL_CODE.to_string())
    );

    ContactReply {
        status: 200,
        body: ContactResponse::Sent {
            success: true,
            message: SENT.to_string(),
        },
    }
}
