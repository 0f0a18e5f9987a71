//! Commands Module
//!
//! The server's registry of named operations.
//!
//! ## Responsibilities
//! - Map command names to handlers with a declared arity
//! - Enforce "unknown name first, then token count" validation
//! - Turn every handler outcome (value, error, panic) into a reply
//!
//! The table is built once and never mutated; it is handed to the server
//! by value, so tests can substitute their own handlers.

mod jig;

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use crate::error::Result;
use crate::protocol::{Reply, Request};

pub use jig::{jig_commands, JIG_COMMANDS};

/// A named operation the server can execute
pub trait Command: Send + Sync {
    /// Total token count, command name included
    fn arity(&self) -> usize;

    /// Run the command with its argument tokens (name excluded)
    fn execute(&self, args: &[&str]) -> Result<Reply>;
}

/// A command backed by a closure
pub struct FnCommand<F> {
    arity: usize,
    handler: F,
}

impl<F> FnCommand<F>
where
    F: Fn(&[&str]) -> Result<Reply> + Send + Sync,
{
    pub fn new(arity: usize, handler: F) -> Self {
        Self { arity, handler }
    }
}

impl<F> Command for FnCommand<F>
where
    F: Fn(&[&str]) -> Result<Reply> + Send + Sync,
{
    fn arity(&self) -> usize {
        self.arity
    }

    fn execute(&self, args: &[&str]) -> Result<Reply> {
        (self.handler)(args)
    }
}

/// Immutable name -> command registry
pub struct CommandTable {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandTable {
    /// Create a new table builder
    pub fn builder() -> CommandTableBuilder {
        CommandTableBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Validate a request and run its handler
    ///
    /// Never fails: every problem becomes a `Reply::Error`.
    pub fn dispatch(&self, request: &Request) -> Reply {
        let name = request.name();

        let Some(command) = self.get(name) else {
            return Reply::error(format!("unknown command: '{}'", name));
        };

        if request.token_count() != command.arity() {
            return Reply::error(format!(
                "wrong number of arguments for command: '{}'",
                name
            ));
        }

        let args = request.args();
        match panic::catch_unwind(AssertUnwindSafe(|| command.execute(&args))) {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => Reply::error(e.to_string()),
            Err(_) => {
                tracing::error!("command '{}' panicked", name);
                Reply::error(format!("internal error in command '{}'", name))
            }
        }
    }
}

/// Builder for CommandTable
#[derive(Default)]
pub struct CommandTableBuilder {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandTableBuilder {
    /// Register a command; a later registration replaces an earlier one
    pub fn register(mut self, name: impl Into<String>, command: impl Command + 'static) -> Self {
        self.commands.insert(name.into(), Box::new(command));
        self
    }

    /// Register a closure-backed command
    pub fn register_fn<F>(self, name: impl Into<String>, arity: usize, handler: F) -> Self
    where
        F: Fn(&[&str]) -> Result<Reply> + Send + Sync + 'static,
    {
        self.register(name, FnCommand::new(arity, handler))
    }

    pub fn build(self) -> CommandTable {
        CommandTable {
            commands: self.commands,
        }
    }
}
