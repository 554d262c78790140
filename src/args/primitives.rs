//! Primitive token parsers.
//!
//! Pure functions from one raw token to a value. `None` means "not
//! parseable"; the parsing engine turns that into an argument error naming the
//! expected type.

use crate::platform::Snowflake;
use url::Url;

const TRUTHY: [&str; 6] = ["yes", "y", "true", "1", "on", "enable"];
const FALSY: [&str; 6] = ["no", "n", "false", "0", "off", "disable"];

const URL_SCHEMES: [&str; 3] = ["http", "https", "ftp"];

/// Plain text. Empty text is rejected.
pub fn parse_text(raw: &str) -> Option<String> {
    (!raw.is_empty()).then(|| raw.to_string())
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    let lower = raw.to_lowercase();
    if TRUTHY.contains(&lower.as_str()) {
        Some(true)
    } else if FALSY.contains(&lower.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Strict base-10 integer, optional sign.
pub fn parse_int(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

/// Finite float. `NaN` and infinities are rejected.
pub fn parse_float(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Absolute http(s)/ftp URL with a host. A bare `example.com/path` is
/// accepted as `http://example.com/path` when the last host label is
/// alphabetic, so numbers such as `1.2` stay numbers.
pub fn parse_url(raw: &str) -> Option<Url> {
    let candidate = match Url::parse(raw) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) if raw.contains('.') => {
            let url = Url::parse(&format!("http://{raw}")).ok()?;
            if !has_alphabetic_tld(&url) {
                return None;
            }
            url
        }
        Err(_) => return None,
    };
    let host = candidate.host_str()?;
    let is_ip = matches!(
        candidate.host(),
        Some(url::Host::Ipv4(_) | url::Host::Ipv6(_))
    );
    let valid_host = is_ip || host == "localhost" || host.contains('.');
    (URL_SCHEMES.contains(&candidate.scheme()) && valid_host).then_some(candidate)
}

fn has_alphabetic_tld(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain
            .trim_end_matches('.')
            .rsplit('.')
            .next()
            .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())),
        _ => false,
    }
}

/// A raw snowflake id: ASCII digits only.
pub fn parse_snowflake(raw: &str) -> Option<Snowflake> {
    if raw.is_empty() || raw.len() > 20 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn strip_mention<'a>(raw: &'a str, open: &str) -> Option<&'a str> {
    raw.strip_prefix(open)?.strip_suffix('>')
}

/// `<#id>` or a bare id.
pub fn channel_id(raw: &str) -> Option<Snowflake> {
    parse_snowflake(strip_mention(raw, "<#").unwrap_or(raw))
}

/// `<@id>`, `<@!id>` or a bare id.
pub fn user_id(raw: &str) -> Option<Snowflake> {
    let inner = strip_mention(raw, "<@!")
        .or_else(|| strip_mention(raw, "<@").filter(|s| !s.starts_with('&')))
        .unwrap_or(raw);
    parse_snowflake(inner)
}

/// `<@&id>` or a bare id.
pub fn role_id(raw: &str) -> Option<Snowflake> {
    parse_snowflake(strip_mention(raw, "<@&").unwrap_or(raw))
}

/// Message reference: a jump link, `channel-message`, or a bare message id
/// in `current_channel`. Returns `(channel_id, message_id)`.
pub fn message_ref(raw: &str, current_channel: Snowflake) -> Option<(Snowflake, Snowflake)> {
    if let Ok(url) = Url::parse(raw) {
        let host = url.host_str()?;
        let known = ["discord.com", "discordapp.com"]
            .iter()
            .any(|base| host == *base || host.ends_with(&format!(".{base}")));
        if !known {
            return None;
        }
        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        return match segments.as_slice() {
            ["channels", _guild, channel, message] => {
                Some((parse_snowflake(channel)?, parse_snowflake(message)?))
            }
            _ => None,
        };
    }
    if let Some((channel, message)) = raw.split_once('-') {
        return Some((parse_snowflake(channel)?, parse_snowflake(message)?));
    }
    Some((current_channel, parse_snowflake(raw)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_sets() {
        for t in ["yes", "Y", "TRUE", "1", "on", "Enable"] {
            assert_eq!(parse_bool(t), Some(true), "{t}");
        }
        for f in ["no", "N", "false", "0", "OFF", "disable"] {
            assert_eq!(parse_bool(f), Some(false), "{f}");
        }
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("-7"), Some(-7));
        assert_eq!(parse_int("4.2"), None);
        assert_eq!(parse_int("12abc"), None);
        assert_eq!(parse_float("2.5"), Some(2.5));
        assert_eq!(parse_float("NaN"), None);
        assert_eq!(parse_float("inf"), None);
    }

    #[test]
    fn test_text_rejects_empty() {
        assert_eq!(parse_text(""), None);
        assert_eq!(parse_text("a"), Some("a".into()));
    }

    #[test]
    fn test_urls() {
        assert!(parse_url("https://example.com/a.png").is_some());
        assert_eq!(
            parse_url("example.com/x").map(|u| u.to_string()),
            Some("http://example.com/x".into())
        );
        assert!(parse_url("not a url").is_none());
        assert!(parse_url("mailto:someone@example.com").is_none());
        assert!(parse_url("https://nodot").is_none());
    }

    #[test]
    fn test_bare_numbers_are_not_urls() {
        assert!(parse_url("1.2").is_none());
        assert!(parse_url("3.14/x").is_none());
        assert!(parse_url("127.0.0.1").is_none());
        assert!(parse_url("host.c0m").is_none());
        assert!(parse_url("http://127.0.0.1/a").is_some());
        assert!(parse_url("cdn.example.org/e.png").is_some());
    }

    #[test]
    fn test_mentions() {
        assert_eq!(channel_id("<#123>"), Some(123));
        assert_eq!(channel_id("123"), Some(123));
        assert_eq!(user_id("<@!55>"), Some(55));
        assert_eq!(user_id("<@55>"), Some(55));
        assert_eq!(user_id("<@&55>"), None);
        assert_eq!(role_id("<@&77>"), Some(77));
        assert_eq!(channel_id("general"), None);
    }

    #[test]
    fn test_message_refs() {
        assert_eq!(
            message_ref("https://discord.com/channels/1/2/3", 9),
            Some((2, 3))
        );
        assert_eq!(
            message_ref("https://ptb.discord.com/channels/@me/2/3", 9),
            Some((2, 3))
        );
        assert_eq!(message_ref("https://example.com/channels/1/2/3", 9), None);
        assert_eq!(message_ref("2-3", 9), Some((2, 3)));
        assert_eq!(message_ref("3", 9), Some((9, 3)));
    }
}
