use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::utils::errors::AppError;

/// JSON extractor that runs `validator` rules after deserialization.
///
/// Deserialization failures map to 400 with a field-level message where
/// one can be recovered from the rejection; rule failures map to 422
/// with the collected messages. DTOs carry their messages in the
/// `#[validate]` attributes, so the response text stays close to the
/// field definitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value
            .validate()
            .map_err(|errors| AppError::unprocessable(anyhow!("{}", collect_messages(&errors))))?;

        Ok(ValidatedJson(value))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    if matches!(&rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request(anyhow!(
            "Missing 'Content-Type: application/json' header"
        ));
    }

    // The serde error text is the only place the offending field name
    // survives to, so it is sniffed out of the rejection body.
    let body_text = rejection.body_text();
    if let Some(field) = body_text
        .split("missing field `")
        .nth(1)
        .and_then(|rest| rest.split('`').next())
    {
        return AppError::bad_request(anyhow!("{field} is required"));
    }
    if body_text.contains("invalid type") {
        return AppError::bad_request(anyhow!("Invalid field type in request"));
    }

    AppError::bad_request(anyhow!("Invalid request body"))
}

fn collect_messages(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(msg) => msg.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Dto {
        #[validate(length(min = 1, message = "Name must not be empty"))]
        name: String,
        #[validate(range(min = 1))]
        amount: i64,
    }

    #[test]
    fn test_attribute_message_is_used() {
        let errors = Dto {
            name: String::new(),
            amount: 5,
        }
        .validate()
        .unwrap_err();
        assert_eq!(collect_messages(&errors), "Name must not be empty");
    }

    #[test]
    fn test_missing_message_falls_back_to_field_name() {
        let errors = Dto {
            name: "x".to_string(),
            amount: 0,
        }
        .validate()
        .unwrap_err();
        assert_eq!(collect_messages(&errors), "amount is invalid");
    }
}
