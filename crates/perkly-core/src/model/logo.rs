// ── Brand logo fallback ──
//
// Display-only: a logo that cannot be used is swapped for a fixed
// placeholder at render time. The voucher itself is never rewritten.

use url::Url;

/// Placeholder shown when a brand logo URI cannot be used.
pub const PLACEHOLDER_LOGO_URL: &str = "https://placehold.co/100x50/E2E8F0/A0AEC0?text=Logo";

/// The built-in placeholder as a parsed URL.
pub fn default_placeholder() -> Url {
    Url::parse(PLACEHOLDER_LOGO_URL).expect("static placeholder URL is valid")
}

/// Pick the URL a presentation layer should load for a brand logo.
///
/// Only absolute `http`/`https` URLs with a host are considered loadable;
/// anything else resolves to `placeholder`.
pub fn resolve_logo(raw: &str, placeholder: &Url) -> Url {
    match Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => url,
        Ok(url) => {
            tracing::debug!(scheme = url.scheme(), "unsupported logo scheme, using placeholder");
            placeholder.clone()
        }
        Err(e) => {
            tracing::debug!(error = %e, raw, "unparseable logo URL, using placeholder");
            placeholder.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_loadable_https_logo() {
        let placeholder = default_placeholder();
        let url = resolve_logo(
            "https://placehold.co/100x50/34D399/FFFFFF?text=Logo",
            &placeholder,
        );
        assert_eq!(url.host_str(), Some("placehold.co"));
        assert_eq!(url.path(), "/100x50/34D399/FFFFFF");
    }

    #[test]
    fn relative_path_falls_back() {
        let placeholder = default_placeholder();
        assert_eq!(resolve_logo("/img/logo.png", &placeholder), placeholder);
    }

    #[test]
    fn empty_string_falls_back() {
        let placeholder = default_placeholder();
        assert_eq!(resolve_logo("", &placeholder), placeholder);
    }

    #[test]
    fn non_http_scheme_falls_back() {
        let placeholder = default_placeholder();
        assert_eq!(resolve_logo("ftp://example.com/logo.png", &placeholder), placeholder);
        assert_eq!(resolve_logo("data:image/png;base64,AAAA", &placeholder), placeholder);
    }

    #[test]
    fn placeholder_matches_constant() {
        assert_eq!(default_placeholder().as_str(), PLACEHOLDER_LOGO_URL);
    }
}
