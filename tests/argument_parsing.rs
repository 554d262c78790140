//! Integration tests for argument parsing against a platform resolver.

use async_trait::async_trait;
use glyphbot::args::{ArgKind, ArgParser, ArgSpec, ArgValue, ArgumentDef};
use glyphbot::error::ArgumentError;
use glyphbot::platform::memory::MemoryResolver;
use glyphbot::platform::{
    Channel, EntityResolver, GuildEmote, Message, PlatformError, Role, Scope, Snowflake, User,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Resolver that counts lookups and knows every user.
#[derive(Default)]
struct CountingResolver {
    lookups: AtomicUsize,
}

impl CountingResolver {
    fn hit(&self) {
        self.lookups.fetch_add(1, Ordering::SeqCst);
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntityResolver for CountingResolver {
    async fn channel(&self, _id: Snowflake) -> Result<Option<Channel>, PlatformError> {
        self.hit();
        Ok(None)
    }

    async fn message(
        &self,
        _channel_id: Snowflake,
        _id: Snowflake,
    ) -> Result<Option<Message>, PlatformError> {
        self.hit();
        Ok(None)
    }

    async fn user(&self, id: Snowflake) -> Result<Option<User>, PlatformError> {
        self.hit();
        Ok(Some(User::new(id, format!("user{id}"))))
    }

    async fn role(
        &self,
        _guild_id: Snowflake,
        _id: Snowflake,
    ) -> Result<Option<Role>, PlatformError> {
        self.hit();
        Ok(None)
    }

    async fn guild_emote(
        &self,
        _guild_id: Snowflake,
        _id: Snowflake,
    ) -> Result<Option<GuildEmote>, PlatformError> {
        self.hit();
        Err(PlatformError::Transport("emote cache offline".into()))
    }
}

fn tokens(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn parser() -> ArgParser {
    ArgParser::new(Duration::from_millis(250))
}

fn guild() -> Scope {
    Scope::Guild {
        guild_id: 100,
        channel_id: 200,
    }
}

fn dm() -> Scope {
    Scope::Direct { channel_id: 300 }
}

#[tokio::test]
async fn test_too_few_fails_before_any_lookup() {
    let resolver = CountingResolver::default();
    let spec = ArgSpec::new()
        .arg(("from", ArgKind::User))
        .arg(("to", ArgKind::User));

    let err = parser()
        .parse(&spec, &tokens(&["<@5>"]), &resolver, &guild())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ArgumentError::TooFew {
            expected: 2,
            received: 1
        }
    );
    assert_eq!(resolver.lookups(), 0);

    let out = parser()
        .parse(&spec, &tokens(&["<@5>", "<@!6>"]), &resolver, &guild())
        .await
        .unwrap();
    assert_eq!(resolver.lookups(), 2);
    assert_eq!(out.user("to").map(|u| u.id), Some(6));
}

#[tokio::test]
async fn test_optional_and_default_do_not_count_as_required() {
    let resolver = CountingResolver::default();
    let spec = ArgSpec::new()
        .arg(("name", ArgKind::Text))
        .arg(ArgumentDef::new("format", ArgKind::Text).default_value("webp"))
        .arg(ArgumentDef::new("size", ArgKind::Int).optional());
    assert_eq!(spec.required_count(), 1);

    let out = parser()
        .parse(&spec, &tokens(&["kirby"]), &resolver, &dm())
        .await
        .unwrap();
    assert_eq!(out.text("format"), Some("webp"));
    assert!(out.contains("size"));
    assert_eq!(out.get("size"), None);
    assert_eq!(out.len(), 3);

    let err = parser()
        .parse(&spec, &[], &resolver, &dm())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Too little arguments. Expected 1 but only received 0."
    );
}

#[tokio::test]
async fn test_defaults_and_optional_url() {
    let resolver = MemoryResolver::new();
    let spec = ArgSpec::new()
        .arg(ArgumentDef::new("size", ArgKind::Text).default_value("256KB"))
        .arg(ArgumentDef::new("url", ArgKind::Url).optional());

    let out = parser().parse(&spec, &[], &resolver, &dm()).await.unwrap();
    assert_eq!(out.text("size"), Some("256KB"));
    assert!(out.contains("url"));
    assert!(out.url("url").is_none());

    let out = parser()
        .parse(&spec, &tokens(&["1MB", "example.com/a.png"]), &resolver, &dm())
        .await
        .unwrap();
    assert_eq!(out.text("size"), Some("1MB"));
    assert_eq!(
        out.url("url").map(|u| u.as_str()),
        Some("http://example.com/a.png")
    );
}

#[tokio::test]
async fn test_positional_choices_with_default() {
    let resolver = MemoryResolver::new();
    let spec = ArgSpec::new()
        .arg(ArgumentDef::new("scope", ArgKind::Text).choices(["server", "user"]))
        .arg(ArgumentDef::new("action", ArgKind::Text).choices(["add", "remove", "set"]))
        .arg(ArgumentDef::new("prefix", ArgKind::Text).default_value("!"));

    let out = parser()
        .parse(&spec, &tokens(&["server", "add", "?"]), &resolver, &dm())
        .await
        .unwrap();
    assert_eq!(out.text("scope"), Some("server"));
    assert_eq!(out.text("action"), Some("add"));
    assert_eq!(out.text("prefix"), Some("?"));

    let out = parser()
        .parse(&spec, &tokens(&["USER", "Remove"]), &resolver, &dm())
        .await
        .unwrap();
    assert_eq!(out.text("scope"), Some("user"));
    assert_eq!(out.text("action"), Some("remove"));
    assert_eq!(out.text("prefix"), Some("!"));
}

#[tokio::test]
async fn test_choice_mismatch_lists_choices() {
    let resolver = MemoryResolver::new();
    let spec = ArgSpec::new().arg(
        ArgumentDef::new("format", ArgKind::Text).choices(["png", "jpeg", "webp"]),
    );

    let out = parser()
        .parse(&spec, &tokens(&["PNG"]), &resolver, &dm())
        .await
        .unwrap();
    assert_eq!(out.get("format"), Some(&ArgValue::Text("png".into())));

    let err = parser()
        .parse(&spec, &tokens(&["gif"]), &resolver, &dm())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ArgumentError::NotAChoice {
            choices: vec!["png".into(), "jpeg".into(), "webp".into()],
            received: "gif".into(),
        }
    );
}

#[tokio::test]
async fn test_bool_rejects_unknown_words() {
    let resolver = MemoryResolver::new();
    let spec = ArgSpec::new().arg(("enabled", ArgKind::Bool));

    let err = parser()
        .parse(&spec, &tokens(&["maybe"]), &resolver, &dm())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Wrong argument `maybe`. Expected boolean.");

    for (raw, expected) in [("yes", true), ("OFF", false), ("1", true)] {
        let out = parser()
            .parse(&spec, &tokens(&[raw]), &resolver, &dm())
            .await
            .unwrap();
        assert_eq!(out.bool("enabled"), Some(expected), "input {raw}");
    }
}

#[tokio::test]
async fn test_remainder_captures_rest_of_input() {
    let resolver = MemoryResolver::new();
    let spec = ArgSpec::new()
        .arg(("target", ArgKind::Text))
        .arg(ArgumentDef::new("reason", ArgKind::Text).remainder());

    let out = parser()
        .parse(&spec, &tokens(&["x", "a", "b", "c"]), &resolver, &dm())
        .await
        .unwrap();
    assert_eq!(out.text("reason"), Some("a b c"));

    // Without the remainder marker the extra tokens are ignored.
    let spec = ArgSpec::new()
        .arg(("target", ArgKind::Text))
        .arg(("reason", ArgKind::Text));
    let out = parser()
        .parse(&spec, &tokens(&["x", "a", "b", "c"]), &resolver, &dm())
        .await
        .unwrap();
    assert_eq!(out.text("reason"), Some("a"));
}

#[tokio::test]
async fn test_glyphs_in_text_order() {
    let resolver = MemoryResolver::new();
    let spec = ArgSpec::new().arg(ArgumentDef::new("input", ArgKind::EmotesOrEmojis).remainder());

    let out = parser()
        .parse(
            &spec,
            &tokens(&["🎉", "then", "<a:dance:123456>", "and", "👋"]),
            &resolver,
            &dm(),
        )
        .await
        .unwrap();
    let names: Vec<String> = out
        .glyphs("input")
        .unwrap()
        .iter()
        .map(|g| g.to_string())
        .collect();
    assert_eq!(names, vec!["🎉", "<a:dance:123456>", "👋"]);
}

#[tokio::test]
async fn test_lookup_failure_is_invalid_argument() {
    let resolver = CountingResolver::default();
    let spec = ArgSpec::new().arg(("emote", ArgKind::GuildEmote));

    let err = parser()
        .parse(&spec, &tokens(&["<:wave:1234>"]), &resolver, &guild())
        .await
        .unwrap_err();
    assert!(matches!(err, ArgumentError::Invalid { ref raw, .. } if raw == "<:wave:1234>"));
    assert_eq!(resolver.lookups(), 1);

    let err = parser()
        .parse(&spec, &tokens(&["<:wave:1234>"]), &resolver, &dm())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Expected server emote but this is not a server."
    );
    assert_eq!(resolver.lookups(), 1);
}

#[tokio::test]
async fn test_number_parsing_is_strict() {
    let resolver = MemoryResolver::new();
    let spec = ArgSpec::new()
        .arg(("count", ArgKind::Int))
        .arg(ArgumentDef::new("ratio", ArgKind::Float).optional());

    let out = parser()
        .parse(&spec, &tokens(&["-12", "0.5"]), &resolver, &dm())
        .await
        .unwrap();
    assert_eq!(out.int("count"), Some(-12));
    assert_eq!(out.float("ratio"), Some(0.5));

    for bad in [["12.5", "1"], ["12abc", "1"], ["3", "NaN"], ["3", "inf"]] {
        let result = parser()
            .parse(&spec, &tokens(&bad), &resolver, &dm())
            .await;
        assert!(result.is_err(), "input {bad:?}");
    }
}
