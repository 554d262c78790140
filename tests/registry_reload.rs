//! Integration tests for registry reloads while commands are in flight.

mod common;

use async_trait::async_trait;
use common::{OWNER, STRANGER, TestBot};
use glyphbot::args::ParsedArgs;
use glyphbot::error::{CommandResult, RegistrationError};
use glyphbot::handlers::owner::reload;
use glyphbot::handlers::{CommandDescriptor, CommandHandler, Context, Outcome};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

/// Replies with the discovery generation it was built in. Generation 1 parks
/// until released.
struct SlowHandler {
    generation: usize,
    entered: Arc<Notify>,
    gate: Arc<Notify>,
}

#[async_trait]
impl CommandHandler for SlowHandler {
    async fn handle(&self, ctx: &Context, _args: &ParsedArgs) -> CommandResult {
        if self.generation == 1 {
            self.entered.notify_one();
            self.gate.notified().await;
        }
        ctx.reply(format!("gen {}", self.generation)).await?;
        Ok(())
    }
}

struct Harness {
    bot: Arc<TestBot>,
    entered: Arc<Notify>,
    gate: Arc<Notify>,
    broken: Arc<AtomicBool>,
}

fn harness() -> Harness {
    let generation = Arc::new(AtomicUsize::new(0));
    let entered = Arc::new(Notify::new());
    let gate = Arc::new(Notify::new());
    let broken = Arc::new(AtomicBool::new(false));

    let source = {
        let (entered, gate, broken) = (entered.clone(), gate.clone(), broken.clone());
        move || -> Result<Vec<CommandDescriptor>, RegistrationError> {
            let generation = generation.fetch_add(1, Ordering::SeqCst) + 1;
            let slow = CommandDescriptor::new(
                "slow",
                SlowHandler {
                    generation,
                    entered: entered.clone(),
                    gate: gate.clone(),
                },
            )
            .category("misc");
            let mut commands = vec![slow, reload::command().category("owner")];
            if broken.load(Ordering::SeqCst) {
                commands.push(CommandDescriptor::new("SLOW", SlowHandler {
                    generation,
                    entered: entered.clone(),
                    gate: gate.clone(),
                }));
            }
            Ok(commands)
        }
    };

    Harness {
        bot: Arc::new(TestBot::with_source(TestBot::config(), Arc::new(source))),
        entered,
        gate,
        broken,
    }
}

#[tokio::test]
async fn test_in_flight_invocation_keeps_old_descriptor() {
    let h = harness();
    let before = h.bot.registry.find("slow").unwrap();

    let in_flight = tokio::spawn({
        let bot = h.bot.clone();
        async move { bot.dm(STRANGER, "slow").await }
    });
    h.entered.notified().await;

    assert_eq!(h.bot.registry.reload().unwrap(), 2);
    let after = h.bot.registry.find("slow").unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(after.name, before.name);

    assert_eq!(h.bot.dm(STRANGER, "slow").await, Outcome::Completed);
    assert_eq!(h.bot.last_reply().as_deref(), Some("gen 2"));

    h.gate.notify_one();
    let outcome = tokio::time::timeout(Duration::from_secs(5), in_flight)
        .await
        .expect("in-flight dispatch finishes")
        .unwrap();
    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(h.bot.replies(), vec!["gen 2", "gen 1"]);
}

#[tokio::test]
async fn test_reload_command_reports_success() {
    let h = harness();
    assert_eq!(h.bot.dm(OWNER, "reload").await, Outcome::Completed);
    assert_eq!(
        h.bot.last_reply().as_deref(),
        Some("Successfully reloaded all commands! (2 commands loaded)")
    );
    // Hidden from everyone else.
    assert_eq!(h.bot.dm(STRANGER, "reload").await, Outcome::Hidden);
}

#[tokio::test]
async fn test_failed_reload_keeps_serving_old_commands() {
    let h = harness();
    h.broken.store(true, Ordering::SeqCst);

    assert_eq!(h.bot.dm(OWNER, "reload").await, Outcome::Rejected);
    let reply = h.bot.last_reply().unwrap();
    assert!(reply.starts_with("❌ Failed to reload commands:\n```\n"));
    assert!(reply.contains("duplicate command name or alias `slow`"));
    assert!(h.bot.reporter.reports().is_empty());

    assert_eq!(h.bot.registry.len(), 2);
    h.gate.notify_one();
    assert_eq!(h.bot.dm(STRANGER, "slow").await, Outcome::Completed);
    assert_eq!(h.bot.last_reply().as_deref(), Some("gen 1"));

    h.broken.store(false, Ordering::SeqCst);
    assert_eq!(h.bot.dm(OWNER, "reload").await, Outcome::Completed);
    assert_eq!(h.bot.dm(STRANGER, "slow").await, Outcome::Completed);
    assert_eq!(h.bot.last_reply().as_deref(), Some("gen 3"));
}

#[tokio::test]
async fn test_dispatch_during_repeated_reloads() {
    let h = harness();
    // Generation 1 would park; move past it first.
    h.bot.registry.reload().unwrap();

    let reloader = tokio::spawn({
        let bot = h.bot.clone();
        async move {
            for _ in 0..50 {
                bot.registry.reload().unwrap();
                tokio::task::yield_now().await;
            }
        }
    });

    for _ in 0..50 {
        assert_eq!(h.bot.dm(STRANGER, "slow").await, Outcome::Completed);
    }
    reloader.await.unwrap();
    assert!(h.bot.replies().iter().all(|r| r.starts_with("gen ")));
}
