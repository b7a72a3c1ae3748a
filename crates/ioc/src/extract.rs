use std::{borrow::Cow, collections::BTreeSet, fmt, ops::Range, sync::LazyLock};

use regex::{Captures, Regex};
use secutils_fs::describe;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    Url,
    Domain,
    Ipv4,
    Email,
    Md5,
    Sha1,
    Sha256,
}

impl IndicatorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IndicatorKind::Url => "url",
            IndicatorKind::Domain => "domain",
            IndicatorKind::Ipv4 => "ipv4",
            IndicatorKind::Email => "email",
            IndicatorKind::Md5 => "md5",
            IndicatorKind::Sha1 => "sha1",
            IndicatorKind::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Indicator {
    pub kind: IndicatorKind,
    pub value: String,
}

impl Indicator {
    fn new(kind: IndicatorKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

static DEFANG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)hxxp|\[\.\]|\(\.\)|\[dot\]|\[:\]|\[@\]|\[at\]").expect("valid defang regex")
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:https?|ftp)://[^\s<>"'`)\]}]+"#).expect("valid url regex")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[a-z0-9._%+-]+@((?:[a-z0-9-]+\.)+[a-z]{2,24})\b").expect("valid email regex")
});

static IPV4_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})\b").expect("valid ipv4 regex")
});

static HASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9a-fA-F]{32,64}\b").expect("valid hash regex"));

static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+([a-z]{2,24})\b")
        .expect("valid domain regex")
});

/// Undo common defanging (`hxxp`, `[.]`, `(.)`, `[dot]`, `[:]`, `[@]`, `[at]`).
pub fn refang(text: &str) -> Cow<'_, str> {
    DEFANG_RE.replace_all(text, |caps: &Captures<'_>| {
        let m = &caps[0];
        if m.eq_ignore_ascii_case("hxxp") {
            "http"
        } else if m.contains(':') {
            ":"
        } else if m.contains('@') || m.eq_ignore_ascii_case("[at]") {
            "@"
        } else {
            "."
        }
    })
}

/// Extract indicators of compromise from `text`.
///
/// The result is deduplicated and sorted by kind, then value.
pub fn extract(text: &str) -> Vec<Indicator> {
    let text = refang(text);
    let text = text.as_ref();

    let mut found = BTreeSet::new();
    let mut claimed: Vec<Range<usize>> = Vec::new();
    let mut hosts: BTreeSet<String> = BTreeSet::new();

    for m in URL_RE.find_iter(text) {
        let url = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']);
        if let Some(host) = url_host(url) {
            hosts.insert(host.to_ascii_lowercase());
        }
        claimed.push(m.range());
        found.insert(Indicator::new(IndicatorKind::Url, url));
    }

    for caps in EMAIL_RE.captures_iter(text) {
        let (Some(whole), Some(host)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        hosts.insert(host.as_str().to_ascii_lowercase());
        claimed.push(whole.range());
        found.insert(Indicator::new(
            IndicatorKind::Email,
            whole.as_str().to_ascii_lowercase(),
        ));
    }

    for caps in IPV4_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if is_dotted_continuation(text, whole.range()) {
            continue;
        }
        let valid = (1..=4).all(|i| caps[i].parse::<u8>().is_ok());
        if valid {
            found.insert(Indicator::new(IndicatorKind::Ipv4, whole.as_str()));
        }
    }

    for m in HASH_RE.find_iter(text) {
        let kind = match m.len() {
            32 => IndicatorKind::Md5,
            40 => IndicatorKind::Sha1,
            64 => IndicatorKind::Sha256,
            _ => continue,
        };
        found.insert(Indicator::new(kind, m.as_str().to_ascii_lowercase()));
    }

    for caps in DOMAIN_RE.captures_iter(text) {
        let (Some(whole), Some(tld)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let range = whole.range();
        if claimed.iter().any(|c| c.start < range.end && range.start < c.end) {
            continue;
        }
        // local part of an address that did not parse as an email
        if text[range.end..].starts_with('@') {
            continue;
        }
        let domain = whole.as_str().to_ascii_lowercase();
        if hosts.contains(&domain) || looks_like_file_name(tld.as_str()) {
            continue;
        }
        found.insert(Indicator::new(IndicatorKind::Domain, domain));
    }

    found.into_iter().collect()
}

/// Host component of an `scheme://[user@]host[:port]/...` URL.
fn url_host(url: &str) -> Option<&str> {
    let rest = url.split_once("://")?.1;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    let host = host.split(':').next()?;
    (!host.is_empty()).then_some(host)
}

/// True when the match is part of a longer dotted number such as `1.2.3.4.5`.
fn is_dotted_continuation(text: &str, range: Range<usize>) -> bool {
    let before = text[..range.start].chars().next_back();
    let mut after = text[range.end..].chars();
    let dot_digit_after = after.next() == Some('.') && after.next().is_some_and(|c| c.is_ascii_digit());
    let dot_before = before == Some('.');
    dot_digit_after || dot_before
}

/// `report.pdf` is a file name, not a domain.
fn looks_like_file_name(tld: &str) -> bool {
    describe(&format!(".{}", tld.to_ascii_lowercase())).is_some()
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
