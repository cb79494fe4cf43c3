use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for the declared MIME type of an upload.
    /// Must be a bare `type/subtype` token, no parameters.
    /// - Valid: "image/jpeg", "video/mp4", "image/svg+xml"
    /// - Invalid: "image", "image/", "image/jpeg; charset=utf-8"
    pub static ref MIME_TYPE_REGEX: Regex =
        Regex::new(r"^[a-z]+/[a-z0-9][a-z0-9!#$&^_.+-]*$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_regex_valid() {
        assert!(MIME_TYPE_REGEX.is_match("image/jpeg"));
        assert!(MIME_TYPE_REGEX.is_match("image/png"));
        assert!(MIME_TYPE_REGEX.is_match("video/mp4"));
        assert!(MIME_TYPE_REGEX.is_match("video/quicktime"));
        assert!(MIME_TYPE_REGEX.is_match("image/svg+xml"));
        assert!(MIME_TYPE_REGEX.is_match("application/octet-stream"));
    }

    #[test]
    fn test_mime_type_regex_invalid() {
        assert!(!MIME_TYPE_REGEX.is_match("")); // empty
        assert!(!MIME_TYPE_REGEX.is_match("image")); // no subtype
        assert!(!MIME_TYPE_REGEX.is_match("image/")); // empty subtype
        assert!(!MIME_TYPE_REGEX.is_match("/jpeg")); // empty type
        assert!(!MIME_TYPE_REGEX.is_match("image/jpeg; charset=utf-8")); // parameters
        assert!(!MIME_TYPE_REGEX.is_match("Image/JPEG")); // uppercase
        assert!(!MIME_TYPE_REGEX.is_match("image jpeg")); // space
    }
}
