pub fn check_control_leading_trailing<G>(
    given: G,
    max_chars: Option<usize>
) -> bool
where
    G: AsRef<str>
{
    let given_ref = given.as_ref();
    let mut iter = given_ref.chars();
    let mut char_count = 1;

    if let Some(ch) = iter.next() {
        char_count += 1;

        if ch.is_control() || ch.is_whitespace() {
            return false
        }
    }

    // check for trailing whitespace/control
    if let Some(ch) = iter.next_back() {
        char_count += 1;

        if ch.is_control() || ch.is_whitespace() {
            return false
        }
    }

    if let Some(max_chars) = max_chars {
        while let Some(ch) = iter.next() {
            if ch.is_control() {
                return false;
            }

            char_count += 1;

            if char_count > max_chars {
                return false;
            }
        }
    } else {
        while let Some(ch) = iter.next() {
            if ch.is_control() {
                return false;
            }
        }
    }

    true
}

pub fn check_control_whitespace<G>(
    given: G,
    max_chars: Option<usize>
) -> bool
where
    G: AsRef<str>
{
    let given_ref = given.as_ref();
    let mut iter = given_ref.chars();
    let mut char_count = 0;

    if let Some(max_chars) = max_chars {
        while let Some(ch) = iter.next() {
            if ch.is_control() || ch.is_whitespace() {
                return false;
            }

            char_count += 1;

            if char_count > max_chars {
                return false;
            }
        }
    } else {
        while let Some(ch) = iter.next() {
            if ch.is_control() || ch.is_whitespace() {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn leading_trailing() {
        let valid = vec![
            String::from("plain"),
            String::from("interior space fine"),
        ];

        for test in valid {
            assert!(check_control_leading_trailing(&test, None), "valid string failed {:?}", test);
        }

        let invalid = vec![
            String::from(" leading"),
            String::from("trailing "),
            String::from("contr\u{0000}ol"),
            crate::string_to_len(12),
        ];

        for test in &invalid[..3] {
            assert!(!check_control_leading_trailing(test, None), "invalid string failed {:?}", test);
        }

        assert!(!check_control_leading_trailing(&invalid[3], Some(8)));
    }

    #[test]
    fn control_whitespace() {
        assert!(check_control_whitespace("no_spaces_here", None));
        assert!(!check_control_whitespace("has space", None));
        assert!(!check_control_whitespace("ctrl\u{0007}", None));
        assert!(!check_control_whitespace(crate::string_to_len(9), Some(8)));
    }
}
