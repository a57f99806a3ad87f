//! Value classification used to pick a pseudonymization strategy

/// Returns true for a dotted-quad IPv4 address with octets in `0..=255`
///
/// Octets with leading zeros (`01`) are rejected.
pub fn is_ipv4_address(value: &str) -> bool {
    let mut count = 0;
    for octet in value.split('.') {
        count += 1;
        if count > 4 || !is_octet(octet) {
            return false;
        }
    }
    count == 4
}

fn is_octet(s: &str) -> bool {
    if s.is_empty() || s.len() > 3 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if s.len() > 1 && s.starts_with('0') {
        return false;
    }
    s.parse::<u16>().is_ok_and(|n| n <= 255)
}

/// Returns true for `local@domain.tld` shaped strings
///
/// Matches `^[^\s@]+@[^\s@]+\.[^\s@]+$`: exactly one `@`, no whitespace, a
/// non-empty local part and a domain with a dot that is neither first nor last.
pub fn is_email_address(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("192.168.0.1", true)]
    #[test_case("0.0.0.0", true)]
    #[test_case("255.255.255.255", true)]
    #[test_case("256.1.1.1", false)]
    #[test_case("01.2.3.4", false)]
    #[test_case("1.2.3", false)]
    #[test_case("1.2.3.4.5", false)]
    #[test_case("1.2.3.", false)]
    #[test_case("a.b.c.d", false)]
    #[test_case(" 1.2.3.4", false)]
    fn test_is_ipv4_address(input: &str, expected: bool) {
        assert_eq!(is_ipv4_address(input), expected);
    }

    #[test_case("max@test.com", true)]
    #[test_case("a.b+c@sub.example.org", true)]
    #[test_case("user@localhost", false)]
    #[test_case("user@.com", false)]
    #[test_case("user@example.", false)]
    #[test_case("@example.com", false)]
    #[test_case("a@b@c.com", false)]
    #[test_case("max mustermann@test.com", false)]
    #[test_case("plain", false)]
    fn test_is_email_address(input: &str, expected: bool) {
        assert_eq!(is_email_address(input), expected);
    }
}
