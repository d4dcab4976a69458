use crate::phone::CanonicalPhone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum address length, in characters.
pub const MAX_ADDRESS_LEN: usize = 255;

// ============ Domain Models ============

/// A phone number and the address it maps to.
///
/// Not stored as a struct: the phone becomes the store key and the address its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PhoneRecord {
    /// Phone number in E.164 format.
    #[schema(value_type = String, example = "+79991234567")]
    pub phone: CanonicalPhone,
    /// Address associated with the phone.
    #[schema(example = "Moscow, Red Square, 1")]
    pub address: String,
}

// ============ Request Models ============

/// Body of `POST /phones`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePhoneRequest {
    /// Phone number in any common spelling; normalized to E.164.
    #[schema(example = "8 (999) 123-45-67")]
    pub phone: String,
    /// Address, at most 255 characters.
    #[schema(example = "Moscow, Red Square, 1", max_length = 255)]
    pub address: String,
}

/// Body of `PUT /phones/{phone}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdatePhoneRequest {
    /// New address, at most 255 characters.
    #[schema(example = "Saint Petersburg, Nevsky 10", max_length = 255)]
    pub address: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Checks the address length bound. Returns the offending length on failure.
pub fn validate_address(address: &str) -> Result<(), usize> {
    let len = address.chars().count();
    if len > MAX_ADDRESS_LEN {
        return Err(len);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_length_counts_characters() {
        assert!(validate_address("").is_ok());
        assert!(validate_address(&"a".repeat(255)).is_ok());
        assert_eq!(validate_address(&"a".repeat(256)), Err(256));
        // Cyrillic letters are two bytes each but one character.
        assert!(validate_address(&"ж".repeat(255)).is_ok());
    }

    #[test]
    fn test_create_request_deserializes() {
        let req: CreatePhoneRequest =
            serde_json::from_str(r#"{"phone":"+79991234567","address":"Moscow"}"#).unwrap();
        assert_eq!(req.phone, "+79991234567");
        assert_eq!(req.address, "Moscow");
    }
}
