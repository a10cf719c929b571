//! Special commands parser for interactive chat mode
//!
//! This module parses the commands that can be entered during an interactive
//! chat session instead of a message. Special commands allow users to:
//! - Browse and filter the persona catalog
//! - Switch to a different persona
//! - Toggle thinking mode
//! - View session status or clear the transcript
//! - Exit the session
//!
//! Commands are prefixed with `/` and are case-insensitive. Arguments keep
//! their original case.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
///
/// These commands change the session or print information, rather than
/// being sent to the persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// List catalog entries, filtered by the optional query
    ListModels(Option<String>),

    /// Switch to the persona with the given id
    ///
    /// Clears the transcript.
    SwitchModel(String),

    /// Flip thinking mode on or off
    ToggleThinking,

    /// Display the selected persona, thinking mode and transcript size
    ShowStatus,

    /// Start over with the current persona
    Clear,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent as a regular message.
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input starts with "/" but is not
/// a valid command, `CommandError::UnsupportedArgument` if a command that
/// takes no argument receives one, and `CommandError::MissingArgument` if
/// `/model` is given without an id.
///
/// # Examples
///
/// ```
/// use maguai::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/model maguai-7").unwrap();
/// assert_eq!(cmd, SpecialCommand::SwitchModel("maguai-7".to_string()));
///
/// let cmd = parse_special_command("/models Coding").unwrap();
/// assert_eq!(cmd, SpecialCommand::ListModels(Some("Coding".to_string())));
///
/// let cmd = parse_special_command("hello there").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// // Invalid command returns error
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // If input doesn't start with "/", it's not a command (except exit/quit)
    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let (command, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command.to_lowercase(), Some(rest.trim())),
        None => (lower.clone(), None),
    };
    let arg = arg.filter(|a| !a.is_empty());

    match command.as_str() {
        "/models" | "/list" => Ok(SpecialCommand::ListModels(arg.map(str::to_string))),

        "/model" | "/use" => match arg {
            Some(id) => Ok(SpecialCommand::SwitchModel(id.to_string())),
            None => Err(CommandError::MissingArgument {
                command: command.clone(),
                usage: format!("{} <model_id>", command),
            }),
        },

        "/think" | "/thinking" => no_argument(&command, arg, SpecialCommand::ToggleThinking),
        "/status" => no_argument(&command, arg, SpecialCommand::ShowStatus),
        "/clear" | "/new" => no_argument(&command, arg, SpecialCommand::Clear),
        "/help" | "/?" => no_argument(&command, arg, SpecialCommand::Help),

        // Exit commands
        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        // Unknown command starting with "/"
        _ => Err(CommandError::UnknownCommand(command)),
    }
}

fn no_argument(
    command: &str,
    arg: Option<&str>,
    parsed: SpecialCommand,
) -> Result<SpecialCommand, CommandError> {
    match arg {
        Some(arg) => Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: arg.to_string(),
        }),
        None => Ok(parsed),
    }
}

/// Display help text for special commands
///
/// # Examples
///
/// ```
/// use maguai::commands::special_commands::print_help;
///
/// print_help();
/// ```
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
===========================================

PERSONAS:
  /models [query] - List personas, filtered by name or category
  /list [query]   - Same as /models
  /model <id>     - Switch persona (clears the conversation)
  /use <id>       - Same as /model

SESSION:
  /think          - Toggle thinking mode (extended reasoning budget)
  /status         - Show persona, thinking mode and conversation size
  /clear          - Start a fresh conversation with the same persona
  /help           - Show this help message
  exit, quit      - Exit the session

Anything else is sent to the selected persona.
"#
    );
}
