//! Command discovery sources.
//!
//! Commands are discovered from an explicit constructor table grouped by
//! category. Discovery runs at startup and again on every registry reload.

use super::traits::CommandDescriptor;
use crate::error::RegistrationError;

/// Builds one descriptor. Called fresh on every discovery pass.
pub type CommandFactory = fn() -> CommandDescriptor;

/// Yields the full command set.
pub trait CommandSource: Send + Sync {
    fn discover(&self) -> Result<Vec<CommandDescriptor>, RegistrationError>;
}

impl<F> CommandSource for F
where
    F: Fn() -> Result<Vec<CommandDescriptor>, RegistrationError> + Send + Sync,
{
    fn discover(&self) -> Result<Vec<CommandDescriptor>, RegistrationError> {
        self()
    }
}

/// Category-grouped constructor table.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    groups: Vec<(&'static str, Vec<CommandFactory>)>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category and its constructors. Each descriptor's category is
    /// overwritten with `name`.
    pub fn group(mut self, name: &'static str, factories: &[CommandFactory]) -> Self {
        self.groups.push((name, factories.to_vec()));
        self
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, f)| f.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CommandSource for StaticSource {
    fn discover(&self) -> Result<Vec<CommandDescriptor>, RegistrationError> {
        Ok(self
            .groups
            .iter()
            .flat_map(|(category, factories)| {
                factories
                    .iter()
                    .map(move |factory| factory().category(*category))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ParsedArgs;
    use crate::error::CommandResult;
    use crate::handlers::core::{CommandHandler, Context};
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl CommandHandler for Noop {
        async fn handle(&self, _ctx: &Context, _args: &ParsedArgs) -> CommandResult {
            Ok(())
        }
    }

    fn alpha() -> CommandDescriptor {
        CommandDescriptor::new("alpha", Noop)
    }

    fn beta() -> CommandDescriptor {
        CommandDescriptor::new("beta", Noop).category("ignored")
    }

    #[test]
    fn test_static_source_assigns_categories() {
        let source = StaticSource::new()
            .group("misc", &[alpha])
            .group("Owner", &[beta]);
        let found = source.discover().unwrap();
        assert_eq!(source.len(), 2);
        assert_eq!(found[0].category, "misc");
        assert_eq!(found[1].name, "beta");
        assert_eq!(found[1].category, "owner");
    }
}
