//! Field rules for [`InputUser`](crate::models::InputUser) that the
//! validator crate has no built-in for.
//!
//! Messages are attached at the field so every violated field reports exactly
//! one fixed line; see `axum_helpers::validation_message` for how they are
//! joined.

use validator::ValidationError;

pub const FIRST_NAME_REQUIRED: &str = "first_name required";
pub const LAST_NAME_REQUIRED: &str = "last_name required";
pub const NICKNAME_REQUIRED: &str = "nickname required";
pub const PASSWORD_RULES: &str = "password must be ascii only,min=8,max=72";
pub const EMAIL_REQUIRED: &str = "email required";
pub const COUNTRY_RULES: &str = "country must be two-letter country code uppercase";

/// ISO 3166-1 alpha-2, sorted for binary search.
const COUNTRY_CODES: [&str; 249] = [
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX", "AZ",
    "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ", "BR", "BS",
    "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN",
    "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM", "DO", "DZ", "EC", "EE",
    "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR", "GA", "GB", "GD", "GE", "GF",
    "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY", "HK", "HM",
    "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR", "IS", "IT", "JE", "JM",
    "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN", "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC",
    "LI", "LK", "LR", "LS", "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK",
    "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA",
    "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG",
    "PH", "PK", "PL", "PM", "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW",
    "SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS",
    "ST", "SV", "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO",
    "TR", "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

/// Every byte is printable ASCII (space through tilde).
pub fn printable_ascii(value: &str) -> Result<(), ValidationError> {
    if value.bytes().all(|b| (0x20..=0x7e).contains(&b)) {
        Ok(())
    } else {
        Err(ValidationError::new("ascii"))
    }
}

/// Uppercase ISO 3166-1 alpha-2 code. Lowercase input is rejected.
pub fn country_code(value: &str) -> Result<(), ValidationError> {
    if COUNTRY_CODES.binary_search(&value).is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("iso3166_1_alpha2"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InputUser;
    use axum_helpers::validation_message;
    use validator::Validate;

    fn valid_input() -> InputUser {
        InputUser {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            nickname: "ada".into(),
            password: "password1".into(),
            email: "ada@example.com".into(),
            country: "GB".into(),
        }
    }

    #[test]
    fn test_country_table_is_sorted() {
        assert!(COUNTRY_CODES.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_country_code() {
        assert!(country_code("KZ").is_ok());
        assert!(country_code("US").is_ok());
        assert!(country_code("kz").is_err());
        assert!(country_code("XX").is_err());
        assert!(country_code("USA").is_err());
    }

    #[test]
    fn test_printable_ascii() {
        assert!(printable_ascii("pass word~1").is_ok());
        assert!(printable_ascii("pässword").is_err());
        assert!(printable_ascii("tab\there").is_err());
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn test_empty_input_reports_every_field() {
        let errors = InputUser::default().validate().unwrap_err();

        assert_eq!(
            validation_message(&errors),
            [
                COUNTRY_RULES,
                EMAIL_REQUIRED,
                FIRST_NAME_REQUIRED,
                LAST_NAME_REQUIRED,
                NICKNAME_REQUIRED,
                PASSWORD_RULES,
            ]
            .join(";")
        );
    }

    #[test]
    fn test_short_password() {
        let input = InputUser {
            password: "short".into(),
            ..valid_input()
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(validation_message(&errors), PASSWORD_RULES);
    }

    #[test]
    fn test_password_length_bounds() {
        let at_max = InputUser {
            password: "a".repeat(72),
            ..valid_input()
        };
        assert!(at_max.validate().is_ok());

        let over_max = InputUser {
            password: "a".repeat(73),
            ..valid_input()
        };
        assert!(over_max.validate().is_err());
    }

    #[test]
    fn test_bad_email() {
        let input = InputUser {
            email: "not-an-email".into(),
            ..valid_input()
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(validation_message(&errors), EMAIL_REQUIRED);
    }

    #[test]
    fn test_lowercase_country_rejected() {
        let input = InputUser {
            country: "us".into(),
            ..valid_input()
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(validation_message(&errors), COUNTRY_RULES);
    }
}
