use url::Url;

use crate::errors::{ForgeError, ForgeResult};

/// Validate that an asset or output URL is well-formed http(s).
pub fn validate_public_url(url: &str) -> ForgeResult<Url> {
    let parsed = Url::parse(url)?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ForgeError::InvalidInput(format!(
            "unsupported scheme: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_public_url() {
        assert!(validate_public_url("https://cdn.test/a.jpg").is_ok());
        assert!(validate_public_url("http://localhost:9000/a.jpg").is_ok());

        let err = validate_public_url("ftp://cdn.test/a.jpg").unwrap_err();
        assert!(matches!(err, ForgeError::InvalidInput(_)));

        let err = validate_public_url("not a url").unwrap_err();
        assert!(matches!(err, ForgeError::UrlParse(_)));
    }
}
