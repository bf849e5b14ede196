//! Interactive chat front end for a remote chat-answering service.
//!
//! This binary provides a REPL that sends each line to the backend's
//! `POST /api/chat` endpoint and prints the answer, with bullet points,
//! source citations and a confidence badge when the backend supplies them.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a backend on http://localhost:8000
//! chatfront
//!
//! # Pick another backend (or set CHATFRONT_BACKEND_URL)
//! chatfront --backend-url http://10.0.0.5:8000
//!
//! # Read defaults from a YAML file and log client events
//! chatfront --config chatfront.yaml --log-file events.jsonl
//!
//! # Disable colors (useful for piping output)
//! chatfront --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/clear` - Clear conversation history
//! - `/history` - Show the whole conversation again
//! - `/retry` - Send your last message again
//! - `/health` - Check that the backend is reachable
//! - `/quit` - Exit the application

use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use chatfront::chat::view::render_message_list;
use chatfront::chat::{
    BACKEND_URL_ENV, ChatArgs, ChatCommand, ChatConfig, ChatSession, InputBox, PlainTextRenderer,
    Renderer, check_backend, help_text, parse_command,
};
use chatfront::{ChatClient, JsonLinesLogger};

/// Main entry point for the chatfront application.
///
/// The runtime is single-threaded: user input and the one outstanding request
/// are interleaved on the same thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("chatfront [OPTIONS]");
    let config = ChatConfig::resolve(args, env::var(BACKEND_URL_ENV).ok())?;

    let mut client = ChatClient::new(&config)?;
    if let Some(path) = &config.log_path {
        client = client.with_logger(Arc::new(JsonLinesLogger::open(path)?));
    }
    let probe = client.clone();
    let mut session = ChatSession::new(client);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut input = InputBox::new();
    let mut rl = DefaultEditor::new()?;

    // In-flight requests cannot be aborted; Ctrl+C only explains that.
    let in_flight = Arc::new(AtomicBool::new(false));
    let in_flight_clone = in_flight.clone();
    ctrlc::set_handler(move || {
        if in_flight_clone.load(Ordering::Relaxed) {
            eprintln!("\nA request is in flight and cannot be cancelled; waiting for it to finish.");
        } else {
            std::process::exit(130);
        }
    })?;

    println!("{} (backend: {})", config.title, config.backend_url);
    in_flight.store(true, Ordering::Relaxed);
    check_backend(&probe, &mut renderer).await;
    in_flight.store(false, Ordering::Relaxed);
    println!("Type /help for commands, /quit to exit\n");

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                // Check for slash commands
                if let Some(cmd) = parse_command(&line) {
                    let _ = rl.add_history_entry(line.trim());
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.reset();
                            renderer.print_info("Conversation cleared.");
                        }
                        ChatCommand::History => {
                            if session.messages().is_empty() {
                                renderer.print_info("(no messages yet)");
                            } else {
                                println!();
                                print!(
                                    "{}",
                                    render_message_list(
                                        session.messages(),
                                        session.status(),
                                        config.use_color
                                    )
                                );
                                println!();
                            }
                        }
                        ChatCommand::Retry => {
                            if session.last_user_message().is_none() {
                                renderer.print_error("Nothing to retry.");
                            } else {
                                in_flight.store(true, Ordering::Relaxed);
                                session.retry_last(&mut renderer).await;
                                in_flight.store(false, Ordering::Relaxed);
                            }
                        }
                        ChatCommand::Health => {
                            in_flight.store(true, Ordering::Relaxed);
                            check_backend(&probe, &mut renderer).await;
                            in_flight.store(false, Ordering::Relaxed);
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Stats => {
                            print_stats(&session);
                        }
                        ChatCommand::ShowConfig => {
                            print_config(&config);
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to the backend
                input.set_draft(line);
                let Some(text) = input.submit(session.status()) else {
                    continue;
                };
                let _ = rl.add_history_entry(text.as_str());

                in_flight.store(true, Ordering::Relaxed);
                session.send(&text, &mut renderer).await;
                in_flight.store(false, Ordering::Relaxed);
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_stats(session: &ChatSession) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Backend: {}", session.backend().base_url());
    println!(
        "      Messages: {} ({} from you, {} answers)",
        stats.message_count, stats.user_messages, stats.assistant_messages
    );
    println!(
        "      Requests: {} ({} failed)",
        stats.total_requests, stats.failed_requests
    );
    match stats.last_latency {
        Some(latency) => println!("      Last request: {:.2}s", latency.as_secs_f64()),
        None => println!("      Last request: (none)"),
    }
    println!("      Status: {}", stats.status);
}

fn print_config(config: &ChatConfig) {
    println!("    Current Configuration:");
    println!("      Backend: {}", config.backend_url);
    println!("      Timeout: {}ms", config.timeout.as_millis());
    println!(
        "      Colors: {}",
        if config.use_color { "on" } else { "off" }
    );
    match config.log_path {
        Some(ref path) => println!("      Client log: {}", path.display()),
        None => println!("      Client log: (disabled)"),
    }
}
