use url::Url;

pub const TITLE_MAX_CHARS: usize = 100;
pub const BODY_MAX_CHARS: usize = 500;

/// A send request after trimming, ready for validation and dispatch.
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub title: String,
    pub body: String,
    pub interest: String,
    pub image: Option<String>,
}

/// Checks every rule and returns all violations, so a caller fixing a form
/// sees the full list at once. Empty result means the request is valid.
pub fn validate(request: &SendRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if request.title.is_empty() {
        errors.push("title is required".to_string());
    } else if request.title.chars().count() > TITLE_MAX_CHARS {
        errors.push(format!("title must not exceed {TITLE_MAX_CHARS} characters"));
    }

    if request.body.is_empty() {
        errors.push("body is required".to_string());
    } else if request.body.chars().count() > BODY_MAX_CHARS {
        errors.push(format!("body must not exceed {BODY_MAX_CHARS} characters"));
    }

    if request.interest.is_empty() {
        errors.push("interest is required".to_string());
    } else if !is_valid_interest(&request.interest) {
        errors.push(
            "interest may only contain lowercase letters, digits and hyphens".to_string(),
        );
    }

    if let Some(image) = request.image.as_deref()
        && !image.is_empty()
        && Url::parse(image).is_err()
    {
        errors.push("image URL is not valid".to_string());
    }

    errors
}

fn is_valid_interest(interest: &str) -> bool {
    interest
        .bytes()
        .all(|byte| matches!(byte, b'a'..=b'z' | b'0'..=b'9' | b'-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, body: &str, interest: &str, image: Option<&str>) -> SendRequest {
        SendRequest {
            title: title.to_string(),
            body: body.to_string(),
            interest: interest.to_string(),
            image: image.map(str::to_string),
        }
    }

    #[test]
    fn accepts_minimal_valid_request() {
        let errors = validate(&request("Hi", "There", "hello", None));
        assert!(errors.is_empty());
    }

    #[test]
    fn accepts_interest_with_digits_and_hyphens() {
        for interest in ["hello", "test-123", "my-topic"] {
            assert!(validate(&request("t", "b", interest, None)).is_empty());
        }
    }

    #[test]
    fn rejects_interest_outside_alphabet() {
        for interest in ["HELLO", "test_123", "my topic", "test@123"] {
            let errors = validate(&request("t", "b", interest, None));
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("lowercase"));
        }
    }

    #[test]
    fn rejects_empty_interest() {
        let errors = validate(&request("t", "b", "", None));
        assert!(errors.iter().any(|error| error == "interest is required"));
    }

    #[test]
    fn title_boundary_is_100_chars() {
        assert!(validate(&request(&"a".repeat(100), "b", "x", None)).is_empty());
        let errors = validate(&request(&"a".repeat(101), "b", "x", None));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("100"));
    }

    #[test]
    fn body_boundary_is_500_chars() {
        assert!(validate(&request("t", &"a".repeat(500), "x", None)).is_empty());
        let errors = validate(&request("t", &"a".repeat(501), "x", None));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("500"));
    }

    #[test]
    fn rejects_malformed_image_url() {
        let errors = validate(&request("t", "b", "x", Some("not a url")));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("image"));
    }

    #[test]
    fn accepts_valid_or_empty_image_url() {
        assert!(validate(&request("t", "b", "x", Some("https://example.com/a.png"))).is_empty());
        assert!(validate(&request("t", "b", "x", Some(""))).is_empty());
    }

    #[test]
    fn reports_all_violations_together() {
        let errors = validate(&request("", "", "BAD!", Some("nope")));
        assert_eq!(errors.len(), 4);
    }
}
