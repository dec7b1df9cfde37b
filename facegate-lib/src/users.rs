use email_address::EmailAddress;

use crate::validation::check_control_leading_trailing;

pub const MAX_NAME_CHARS: usize = 128;
pub const MIN_PHONE_DIGITS: usize = 10;
pub const MAX_PHONE_DIGITS: usize = 15;

pub const DEFAULT_COUNTRY_PREFIX: &str = "+91";

pub fn name_valid(given: &String) -> bool {
    !given.is_empty() && check_control_leading_trailing(given, Some(MAX_NAME_CHARS))
}

pub fn email_valid(given: &String) -> bool {
    EmailAddress::is_valid(given)
}

pub fn phone_valid(given: &String) -> bool {
    let digits = given.strip_prefix('+').unwrap_or(given.as_str());

    if digits.is_empty() {
        return false;
    }

    let mut count = 0;

    for ch in digits.chars() {
        if !ch.is_ascii_digit() {
            return false;
        }

        count += 1;
    }

    count >= MIN_PHONE_DIGITS && count <= MAX_PHONE_DIGITS
}

/// numbers submitted without a country prefix get the deployment default
pub fn normalize_phone(given: &str) -> String {
    if given.starts_with('+') {
        given.to_owned()
    } else {
        format!("{DEFAULT_COUNTRY_PREFIX}{given}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn name_validation() {
        let valid = vec![
            String::from("Ashraful Momin"),
            String::from("a"),
        ];

        for test in valid {
            assert!(name_valid(&test), "valid string failed {:?}", test);
        }

        let invalid = vec![
            String::new(),
            String::from(" padded "),
            crate::string_to_len(MAX_NAME_CHARS + 1),
        ];

        for test in invalid {
            assert!(!name_valid(&test), "invalid string failed {:?}", test);
        }
    }

    #[test]
    fn email_validation() {
        assert!(email_valid(&String::from("person@example.com")));
        assert!(!email_valid(&String::from("not-an-email")));
    }

    #[test]
    fn phone_validation() {
        let valid = vec![
            String::from("+14155550123"),
            String::from("9876543210"),
        ];

        for test in valid {
            assert!(phone_valid(&test), "valid string failed {:?}", test);
        }

        let invalid = vec![
            String::new(),
            String::from("+1-415-555"),
            String::from("12345"),
            crate::string_to_len_char(MAX_PHONE_DIGITS + 1, '7'),
        ];

        for test in invalid {
            assert!(!phone_valid(&test), "invalid string failed {:?}", test);
        }
    }

    #[test]
    fn phone_normalization() {
        assert_eq!(normalize_phone("+14155550123"), "+14155550123");
        assert_eq!(normalize_phone("9876543210"), "+919876543210");
    }
}
