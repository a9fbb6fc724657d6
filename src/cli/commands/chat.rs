//! Interactive chat command.

use super::preflight;
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::{Secrets, Settings};
use crate::orchestrator::Pipeline;
use crate::session::{ChatSession, Role, STARTER_PROMPTS};
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(settings: Settings, secrets: Secrets) -> Result<()> {
    preflight(Operation::Ask, &settings, &secrets)?;

    let pipeline = Pipeline::from_settings(&settings, &secrets).await?;
    let mut session = ChatSession::new();

    println!(
        "\n{} {}",
        style("Spotter Chat").bold().cyan(),
        style(format!("({})", pipeline.model())).dim()
    );
    println!(
        "{}\n",
        style("Ask a fitness question, or pick a starter by number. 'history' shows the conversation, 'clear' resets it, 'exit' quits.").dim()
    );
    for (i, prompt) in STARTER_PROMPTS.iter().enumerate() {
        println!("  {} {}", style(format!("[{}]", i + 1)).cyan(), prompt);
    }
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            session = ChatSession::new();
            Output::info("Conversation history cleared.");
            continue;
        }

        if input.eq_ignore_ascii_case("history") {
            print_history(&session);
            continue;
        }

        let question = starter(input).unwrap_or(input);
        if question != input {
            println!("{} {}", style("You:").green().bold(), question);
        }

        let spinner = Output::spinner("Thinking...");
        let result = session.ask(&pipeline, question).await;
        spinner.finish_and_clear();

        match result {
            Ok(turn) => {
                println!("\n{} {}\n", style("Coach:").cyan().bold(), turn.content);
                if let Some(secs) = turn.response_time {
                    Output::response_time(secs);
                }
                if let Some(recs) = &turn.recommendations {
                    Output::recommendations(recs);
                }
                println!();
            }
            Err(e) => {
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}

/// Map "1".."4" to a starter prompt.
fn starter(input: &str) -> Option<&'static str> {
    let n: usize = input.parse().ok()?;
    STARTER_PROMPTS.get(n.checked_sub(1)?).copied()
}

fn print_history(session: &ChatSession) {
    if session.is_empty() {
        Output::info("No messages yet.");
        return;
    }
    Output::header("Conversation");
    for turn in session.history() {
        let who = match turn.role {
            Role::User => style("You:").green().bold(),
            Role::Assistant => style("Coach:").cyan().bold(),
        };
        println!("{} {}", who, turn.content);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_selection() {
        assert_eq!(starter("1"), Some(STARTER_PROMPTS[0]));
        assert_eq!(starter("4"), Some(STARTER_PROMPTS[3]));
        assert_eq!(starter("0"), None);
        assert_eq!(starter("5"), None);
        assert_eq!(starter("squats"), None);
    }
}
