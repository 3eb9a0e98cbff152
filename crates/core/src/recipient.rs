use std::fmt;

use serde::Serialize;

use crate::ValidationError;

/// Validated fax number: an optional leading `+` followed by one or more
/// ASCII digits, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Recipient(String);

impl Recipient {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let digits = input.strip_prefix('+').unwrap_or(input);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidRecipient(input.to_string()));
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_digit_strings_with_optional_plus() {
        for input in ["+493012345678", "493012345678", "0", "+1"] {
            let recipient = Recipient::parse(input).unwrap();
            assert_eq!(recipient.as_str(), input);
        }
    }

    #[test]
    fn rejects_everything_else() {
        for input in ["", "+", "+49 30", "49-30", "abc", "+49a", "49+30", "４９"] {
            assert!(
                matches!(
                    Recipient::parse(input),
                    Err(ValidationError::InvalidRecipient(_))
                ),
                "should have rejected {input:?}"
            );
        }
    }
}
