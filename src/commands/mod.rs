/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `run_chat` - Interactive chat with a persona
- `models`   - Catalog listing and lookup

The chat loop owns the [`Session`] and drives it with user input; it is the
only place that talks to the terminal.
*/

use crate::adapter::Adapter;
use crate::catalog::{self, Model};
use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
use crate::config::Config;
use crate::error::{MaguaiError, Result};
use crate::session::{Message, Session};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

// Special commands parser for the chat loop
pub mod special_commands;

// Catalog listing commands
pub mod models;

/// What the chat loop should do after a special command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopAction {
    Continue,
    Exit,
}

/// Start interactive chat mode
///
/// The starting persona and thinking mode come from `config.chat`, which
/// already includes CLI overrides.
///
/// # Errors
///
/// Returns error if the configured persona does not exist, the provider
/// cannot be created or the terminal cannot be initialized
///
/// # Examples
///
/// ```no_run
/// use maguai::commands::run_chat;
/// use maguai::config::Config;
///
/// # async fn example() -> anyhow::Result<()> {
/// run_chat(Config::default()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_chat(config: Config) -> Result<()> {
    let model = catalog::find_model(&config.chat.default_model)
        .ok_or_else(|| MaguaiError::UnknownModel(config.chat.default_model.clone()))?;

    let adapter = Adapter::from_config(&config)?;
    let mut session = Session::new(model).with_thinking_mode(config.chat.thinking_mode);

    let upstream = adapter.model_name();
    tracing::info!("Chat session started with {} on {}", model.id, upstream);

    let mut rl = DefaultEditor::new()?;

    print_welcome_banner(&session);

    loop {
        match rl.readline(&format_prompt(&session)) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_special_command(trimmed) {
                    Ok(SpecialCommand::None) => {}
                    Ok(command) => {
                        if handle_special_command(&mut session, command, &adapter)
                            == LoopAction::Exit
                        {
                            break;
                        }
                        continue;
                    }
                    Err(e) => {
                        eprintln!("{}\n", e.to_string().red());
                        continue;
                    }
                }

                rl.add_history_entry(trimmed)?;
                session.set_pending_input(trimmed);

                let persona = session.selected_model().name.clone();
                println!("{}", waiting_line(session.thinking_mode()).dimmed());

                // Ctrl-C abandons the outstanding reply; the session stays usable
                let outcome = tokio::select! {
                    result = session.send(trimmed, &adapter) => Some(result),
                    _ = tokio::signal::ctrl_c() => None,
                };

                match outcome {
                    Some(Ok(reply)) => print_reply(&persona, &upstream, reply),
                    Some(Err(skip)) => tracing::debug!("Submission skipped: {}", skip),
                    None => println!("{}\n", "Request cancelled".yellow()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                tracing::error!("Readline error: {:?}", err);
                break;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Apply a special command to the session
fn handle_special_command(
    session: &mut Session,
    command: SpecialCommand,
    adapter: &Adapter,
) -> LoopAction {
    match command {
        SpecialCommand::ListModels(query) => {
            let query = query.unwrap_or_default();
            let found = catalog::filter_catalog(&query);
            if found.is_empty() {
                println!("No models found matching '{}'\n", query);
            } else {
                models::output_models_table(&found);
            }
        }
        SpecialCommand::SwitchModel(id) => match catalog::find_model(&id) {
            Some(model) => {
                session.select_model(model);
                println!(
                    "Switched to {} {} ({})\n",
                    model.icon,
                    model.name.bold(),
                    model.category
                );
            }
            None => eprintln!(
                "{}\n",
                format!("Unknown model: {}. Use /models to browse.", id).red()
            ),
        },
        SpecialCommand::ToggleThinking => {
            let enabled = session.toggle_thinking_mode();
            println!("Thinking mode {}\n", on_off(enabled));
        }
        SpecialCommand::ShowStatus => print_status_display(session, &adapter.model_name()),
        SpecialCommand::Clear => {
            let current = session.selected_model().clone();
            session.select_model(&current);
            println!("Started a new conversation with {}\n", current.name);
        }
        SpecialCommand::Help => print_help(),
        SpecialCommand::Exit => return LoopAction::Exit,
        SpecialCommand::None => {}
    }
    LoopAction::Continue
}

/// Prompt showing the persona id and a thinking marker
fn format_prompt(session: &Session) -> String {
    let model = session.selected_model();
    if session.thinking_mode() {
        format!("[{}|{}] >> ", model.id.cyan(), "THINK".magenta())
    } else {
        format!("[{}] >> ", model.id.cyan())
    }
}

fn on_off(enabled: bool) -> colored::ColoredString {
    if enabled {
        "ON".green()
    } else {
        "OFF".yellow()
    }
}

/// Line shown while a reply is outstanding
fn waiting_line(thinking_mode: bool) -> &'static str {
    if thinking_mode {
        "Maguai is thinking deeply..."
    } else {
        "Maguai is responding..."
    }
}

/// Header printed above a message: author and local `HH:MM`
fn reply_header(author: &str, message: &Message) -> String {
    format!("{} · {}", author, message.time_label())
}

fn print_reply(persona: &str, upstream: &str, reply: &Message) {
    println!("\n{}", reply_header(persona, reply).bold());
    if let Some(thoughts) = &reply.thinking {
        println!("{}", thoughts.dimmed().italic());
    }
    println!("{}\n", reply.content);
    tracing::debug!("Reply {} from {}", reply.id, upstream);
}

/// Display welcome banner at the start of interactive chat mode
fn print_welcome_banner(session: &Session) {
    let model = session.selected_model();

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║          Maguai Interactive Chat Mode - Welcome!             ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    println!("Model:    {} {} ({})", model.icon, model.name.bold(), model.category);
    println!("Thinking: {}\n", on_off(session.thinking_mode()));
    println!("Type '/help' for available commands, 'exit' to quit\n");
}

/// Display detailed status information about the current session
fn print_status_display(session: &Session, upstream: &str) {
    let model: &Model = session.selected_model();

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                     Maguai Session Status                    ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    println!("Model:             {} {} [{}]", model.icon, model.name, model.id);
    println!("Category:          {}", model.category);
    println!("Upstream:          {}", upstream);
    println!("Thinking Mode:     {}", on_off(session.thinking_mode()));
    println!("Conversation Size: {} messages", session.transcript().len());
    println!("Prompt Format:     {}", format_prompt(session));
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::AdapterSettings;
    use crate::providers::{GenerateRequest, GenerateResponse, Provider};
    use async_trait::async_trait;

    struct EchoProvider;

    #[async_trait]
    impl Provider for EchoProvider {
        async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
            let last = request.contents.last().map(|t| t.text.clone());
            Ok(GenerateResponse {
                text: last,
                thoughts: None,
                usage: None,
            })
        }

        fn model_name(&self) -> String {
            "echo".to_string()
        }
    }

    fn adapter() -> Adapter {
        Adapter::new(Box::new(EchoProvider), AdapterSettings::default())
    }

    async fn session_with_history() -> Session {
        let mut session = Session::new(catalog::default_model());
        session.send("Hello", &adapter()).await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_run_chat_unknown_model() {
        let mut cfg = Config::default();
        cfg.chat.default_model = "maguai-0".to_string();

        let res = run_chat(cfg).await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn test_switch_model_clears_transcript() {
        let mut session = session_with_history().await;
        assert_eq!(session.transcript().len(), 2);

        let action = handle_special_command(
            &mut session,
            SpecialCommand::SwitchModel("maguai-33".to_string()),
            &adapter(),
        );
        assert_eq!(action, LoopAction::Continue);
        assert_eq!(session.selected_model().id, "maguai-33");
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_switch_to_unknown_model_keeps_session() {
        let mut session = session_with_history().await;
        handle_special_command(
            &mut session,
            SpecialCommand::SwitchModel("gpt-4".to_string()),
            &adapter(),
        );
        assert_eq!(session.selected_model().id, "maguai-1");
        assert_eq!(session.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_clear_keeps_model() {
        let mut session = session_with_history().await;
        handle_special_command(&mut session, SpecialCommand::Clear, &adapter());
        assert_eq!(session.selected_model().id, "maguai-1");
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn test_toggle_thinking_and_exit() {
        let mut session = Session::new(catalog::default_model());
        let adapter = adapter();

        handle_special_command(&mut session, SpecialCommand::ToggleThinking, &adapter);
        assert!(session.thinking_mode());
        assert!(format_prompt(&session).contains("THINK"));

        assert_eq!(
            handle_special_command(&mut session, SpecialCommand::Exit, &adapter),
            LoopAction::Exit
        );
    }

    #[test]
    fn test_listing_and_status_are_read_only() {
        let mut session = Session::new(catalog::default_model());
        let adapter = adapter();

        handle_special_command(
            &mut session,
            SpecialCommand::ListModels(Some("creative".to_string())),
            &adapter,
        );
        handle_special_command(&mut session, SpecialCommand::ListModels(None), &adapter);
        handle_special_command(&mut session, SpecialCommand::ShowStatus, &adapter);
        handle_special_command(&mut session, SpecialCommand::Help, &adapter);

        assert!(session.transcript().is_empty());
        assert!(!session.thinking_mode());
    }

    #[test]
    fn test_waiting_line_follows_thinking_mode() {
        assert_eq!(waiting_line(true), "Maguai is thinking deeply...");
        assert_eq!(waiting_line(false), "Maguai is responding...");
    }

    #[test]
    fn test_reply_header_has_time_label() {
        let message = Message::assistant("hi");
        let header = reply_header("Maguai Alpha 1", &message);
        assert!(header.starts_with("Maguai Alpha 1 · "));
        assert!(header.ends_with(&message.time_label()));
        assert_eq!(message.time_label().len(), 5);
    }

    #[test]
    fn test_print_welcome_banner() {
        // Smoke test - verifies function executes without panic
        print_welcome_banner(&Session::new(catalog::default_model()).with_thinking_mode(true));
    }
}
