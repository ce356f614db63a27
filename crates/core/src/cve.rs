//! CVE reference links attached to findings.
//!
//! Only input validation lives here; rows are modelled by the db crate.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use validator::ValidateUrl;

use crate::error::CoreError;
use crate::validation;

/// NVD detail page prefix used when no explicit URL is supplied.
pub const NVD_DETAIL_URL: &str = "https://nvd.nist.gov/vuln/detail/";

static CVE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^CVE-\d{4}-\d{4,}$").expect("CVE id regex is valid")
});

/// Validate and normalise a CVE identifier to upper case.
pub fn normalize_cve_id(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if !CVE_ID_RE.is_match(trimmed) {
        return Err(CoreError::validation(
            "cve_id",
            format!("'{raw}' is not a CVE-YYYY-NNNN identifier"),
        ));
    }
    Ok(trimmed.to_ascii_uppercase())
}

pub fn default_url(cve_id: &str) -> String {
    format!("{NVD_DETAIL_URL}{cve_id}")
}

/// A well-formed absolute URL with an `http` or `https` scheme.
fn is_web_url(value: &str) -> bool {
    let scheme = value.split_once("://").map(|(scheme, _)| scheme.to_ascii_lowercase());
    matches!(scheme.as_deref(), Some("http" | "https")) && value.validate_url()
}

/// Input for creating a CVE link.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCveLink {
    pub cve_id: String,
    pub title: String,
    pub url: Option<String>,
    pub description: Option<String>,
}

/// A [`NewCveLink`] after validation, ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCveLink {
    pub cve_id: String,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
}

impl NewCveLink {
    pub fn validate(self) -> Result<ValidCveLink, CoreError> {
        let cve_id = normalize_cve_id(&self.cve_id)?;
        validation::require_non_empty("title", &self.title)?;

        let url = match self.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) if is_web_url(url) => url.to_string(),
            Some(url) => {
                return Err(CoreError::validation(
                    "url",
                    format!("'{url}' is not a valid http(s) URL"),
                ))
            }
            None => default_url(&cve_id),
        };

        Ok(ValidCveLink {
            cve_id,
            title: self.title.trim().to_string(),
            url,
            description: self.description.filter(|d| !d.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn link(cve_id: &str, url: Option<&str>) -> NewCveLink {
        NewCveLink {
            cve_id: cve_id.to_string(),
            title: "OpenSSL heap overflow".to_string(),
            url: url.map(str::to_string),
            description: None,
        }
    }

    #[test]
    fn ids_are_normalised_to_upper_case() {
        assert_eq!(normalize_cve_id(" cve-2024-12345 ").unwrap(), "CVE-2024-12345");
    }

    #[test]
    fn malformed_ids_are_rejected() {
        for bad in ["CVE-24-1234", "CVE-2024-123", "2024-1234", "CVE-2024-12a4"] {
            assert!(normalize_cve_id(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn missing_url_defaults_to_nvd() {
        let valid = link("cve-2021-44228", None).validate().unwrap();
        assert_eq!(valid.url, "https://nvd.nist.gov/vuln/detail/CVE-2021-44228");
    }

    #[test]
    fn explicit_url_must_be_http() {
        let valid = link("CVE-2021-44228", Some("https://example.com/advisory"))
            .validate()
            .unwrap();
        assert_eq!(valid.url, "https://example.com/advisory");

        let err = link("CVE-2021-44228", Some("ftp://example.com")).validate().unwrap_err();
        assert_matches!(err, CoreError::Validation { ref field, .. } if field == "url");
    }

    #[test]
    fn malformed_urls_are_rejected() {
        for bad in [
            "http://[",
            "https://::::/x",
            "http://<script>",
            "https://exa%mple..",
            "https://",
            "https:// bad",
            "example.com/advisory",
        ] {
            let err = link("CVE-2021-44228", Some(bad)).validate().unwrap_err();
            assert_matches!(err, CoreError::Validation { ref field, .. } if field == "url", "{bad}");
        }
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let valid = link("CVE-2021-44228", Some("HTTPS://example.com/a?b=1#c"))
            .validate()
            .unwrap();
        assert_eq!(valid.url, "HTTPS://example.com/a?b=1#c");
    }
}
