//! Cookie handling
//!
//! The storefront backend expects every state-changing request to echo the
//! `csrftoken` cookie in the `X-CSRFToken` header. Cookie lookup follows the
//! browser page's `getCookie` helper exactly: the cookie string is split on
//! `;`, each pair is trimmed, the first pair starting with `name=` wins and
//! its value is percent-decoded.

/// Look up a cookie value in a `document.cookie` style string.
///
/// Returns `None` when the string is empty, the cookie is absent, or the
/// value is not valid percent-encoded UTF-8.
pub fn get_cookie(cookies: &str, name: &str) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }

    let prefix = format!("{}=", name);
    let raw = cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(prefix.as_str()))?;

    urlencoding::decode(raw).ok().map(|v| v.into_owned())
}

/// Browser-like cookie store for a single site.
///
/// Keeps insertion order so the rendered `Cookie` header matches what a
/// browser would send.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    pairs: Vec<(String, String)>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a jar from a `name=value; name2=value2` string.
    ///
    /// Pairs without `=` are ignored.
    pub fn parse(cookies: &str) -> Self {
        let mut jar = Self::new();
        for pair in cookies.split(';').map(str::trim) {
            if let Some((name, value)) = pair.split_once('=') {
                if !name.is_empty() {
                    jar.set(name, value);
                }
            }
        }
        jar
    }

    /// Insert or replace a cookie. The value is stored as sent on the wire.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.pairs.iter_mut().find(|(n, _)| n == name) {
            Some(pair) => pair.1 = value.to_string(),
            None => self.pairs.push((name.to_string(), value.to_string())),
        }
    }

    /// Merge a `Set-Cookie` header value. Attributes after the first `;`
    /// (path, expiry, flags) are ignored.
    pub fn store_set_cookie(&mut self, header: &str) {
        let first = header.split(';').next().unwrap_or_default().trim();
        if let Some((name, value)) = first.split_once('=') {
            let name = name.trim();
            if !name.is_empty() {
                self.set(name, value.trim());
            }
        }
    }

    /// Render the jar the way `document.cookie` reads.
    pub fn header_value(&self) -> String {
        self.pairs
            .iter()
            .map(|(n, v)| format!("{}={}", n, v))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Decoded value of a cookie, with `getCookie` semantics.
    pub fn get(&self, name: &str) -> Option<String> {
        get_cookie(&self.header_value(), name)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cookie_finds_value() {
        let cookies = "sessionid=abc; csrftoken=tok123; theme=dark";
        assert_eq!(get_cookie(cookies, "csrftoken").as_deref(), Some("tok123"));
        assert_eq!(get_cookie(cookies, "sessionid").as_deref(), Some("abc"));
    }

    #[test]
    fn test_get_cookie_missing_or_empty() {
        assert_eq!(get_cookie("", "csrftoken"), None);
        assert_eq!(get_cookie("sessionid=abc", "csrftoken"), None);
    }

    #[test]
    fn test_get_cookie_requires_exact_name_prefix() {
        // "xcsrftoken" must not match "csrftoken"
        let cookies = "xcsrftoken=nope; csrftoken=yes";
        assert_eq!(get_cookie(cookies, "csrftoken").as_deref(), Some("yes"));
        assert_eq!(get_cookie("csrftokenx=nope", "csrftoken"), None);
    }

    #[test]
    fn test_get_cookie_first_match_wins() {
        let cookies = "csrftoken=first;csrftoken=second";
        assert_eq!(get_cookie(cookies, "csrftoken").as_deref(), Some("first"));
    }

    #[test]
    fn test_get_cookie_decodes_and_keeps_equals() {
        assert_eq!(
            get_cookie("csrftoken=a%20b%3Dc", "csrftoken").as_deref(),
            Some("a b=c")
        );
        assert_eq!(get_cookie("token=x=y", "token").as_deref(), Some("x=y"));
    }

    #[test]
    fn test_jar_round_trips_document_cookie() {
        let mut jar = CookieJar::parse("sessionid=abc; csrftoken=old");
        jar.store_set_cookie("csrftoken=new; expires=Fri, 01 Jan 2027 00:00:00 GMT; Path=/");
        jar.store_set_cookie("messages=xyz; HttpOnly");

        assert_eq!(jar.header_value(), "sessionid=abc; csrftoken=new; messages=xyz");
        assert_eq!(jar.get("csrftoken").as_deref(), Some("new"));
    }

    #[test]
    fn test_jar_ignores_malformed_pairs() {
        let jar = CookieJar::parse("garbage; =novalue; ok=1");
        assert_eq!(jar.header_value(), "ok=1");
        assert!(CookieJar::parse("").is_empty());
    }
}
