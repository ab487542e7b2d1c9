use std::sync::Arc;

/// Reply used for anything the table does not know
pub const UNKNOWN_REPLY: &str = "What?";

/// A command addressed to the bot, nickname already removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    tokens: Vec<String>,
}

impl CommandInvocation {
    /// Returns `None` when there is no command token.
    pub fn new(tokens: Vec<String>) -> Option<Self> {
        if tokens.is_empty() {
            None
        } else {
            Some(Self { tokens })
        }
    }

    pub fn name(&self) -> &str {
        &self.tokens[0]
    }

    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// What a command handler wants the bot to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Plain text reply to the origin of the message
    Text(String),
    /// Look up media for `query` and share it out-of-band
    Media { query: String },
}

/// Command handler function type
pub type CommandHandler = Arc<dyn Fn(&CommandInvocation) -> Reply + Send + Sync>;

/// Represents a bot command
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    pub handler: Option<CommandHandler>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            aliases: Vec::new(),
            handler: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&CommandInvocation) -> Reply + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn matches(&self, input: &str) -> bool {
        let input_lower = input.to_lowercase();
        self.name.to_lowercase() == input_lower ||
            self.aliases.iter().any(|a| a.to_lowercase() == input_lower)
    }
}

/// Ordered command table. Bot variants differ only in what they register.
#[derive(Clone, Default)]
pub struct CommandTable {
    commands: Vec<Command>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// `hi` and `gif`
    pub fn standard() -> Self {
        let mut table = Self::new();

        table.register(Command::new("hi")
            .with_description("Say hi")
            .with_handler(|_| Reply::Text("Hi!".to_string())));

        table.register(Command::new("gif")
            .with_description("Share a gif matching the words that follow")
            .with_handler(|inv| Reply::Media { query: inv.args().join(" ") }));

        table
    }

    /// Adds a `help` command listing everything registered so far.
    pub fn with_help(mut self) -> Self {
        let mut listing = "Commands:".to_string();
        for cmd in &self.commands {
            listing.push_str(&format!("\n{} - {}", cmd.name, cmd.description.as_deref().unwrap_or("")));
        }
        listing.push_str("\nhelp - Show this message");

        self.register(Command::new("help")
            .with_description("Show this message")
            .with_handler(move |_| Reply::Text(listing.clone())));
        self
    }

    /// Registers a command, replacing any earlier one with the same name.
    pub fn register(&mut self, command: Command) {
        self.commands.retain(|c| c.name != command.name);
        self.commands.push(command);
    }

    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.matches(input))
    }

    /// Runs the handler for the invocation, or answers `What?`.
    pub fn dispatch(&self, invocation: &CommandInvocation) -> Reply {
        match self.find(invocation.name()).and_then(|c| c.handler.as_ref()) {
            Some(handler) => handler(invocation),
            None => Reply::Text(UNKNOWN_REPLY.to_string()),
        }
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
