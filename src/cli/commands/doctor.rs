//! Doctor command - verify credentials and configuration.

use crate::cli::Output;
use crate::config::{
    EmbeddingProvider, LlmProvider, RecommendationStrategy, Secrets, Settings, VectorStoreProvider,
};
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, secrets: &Secrets, config_path: &Path) -> anyhow::Result<()> {
    Output::header("Spotter Doctor");
    println!();

    println!("{}", style("Credentials").bold());
    let key_checks = check_keys(settings, secrets);
    for check in &key_checks {
        check.print();
    }
    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(config_path);
    config_check.print();
    let ingest_check = check_ingest_dir(settings);
    ingest_check.print();
    println!();

    let checks: Vec<_> = key_checks
        .into_iter()
        .chain([config_check, ingest_check])
        .collect();
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!("{} error(s) found. Please fix them before using Spotter.", errors));
        anyhow::bail!("doctor found {} error(s)", errors);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Spotter is ready to use.");
    }

    Ok(())
}

/// Check every credential, marking the ones the configuration needs.
fn check_keys(settings: &Settings, secrets: &Secrets) -> Vec<CheckResult> {
    let needs = [
        (
            Secrets::PINECONE,
            &secrets.pinecone_api_key,
            settings.vector_store.provider == VectorStoreProvider::Pinecone,
        ),
        (
            Secrets::GOOGLE,
            &secrets.google_api_key,
            settings.llm.provider == LlmProvider::Gemini,
        ),
        (
            Secrets::OPENAI,
            &secrets.openai_api_key,
            settings.llm.provider == LlmProvider::OpenAI
                || settings.embedding.provider == EmbeddingProvider::OpenAI,
        ),
        (
            Secrets::YOUTUBE,
            &secrets.youtube_api_key,
            settings.recommendations.strategy == RecommendationStrategy::Videos,
        ),
    ];

    let mut results: Vec<_> = needs
        .into_iter()
        .map(|(name, value, required)| check_key(name, value, required))
        .collect();

    results.push(match &secrets.hf_api_token {
        Some(token) => CheckResult::ok(Secrets::HF, &format!("configured ({})", mask(token))),
        None => CheckResult::warning(
            Secrets::HF,
            "not set",
            "Anonymous inference is rate-limited; set HF_API_TOKEN for reliable embeddings",
        ),
    });
    results
}

fn check_key(name: &str, value: &Option<String>, required: bool) -> CheckResult {
    let hint = format!("Set with: export {}='...' (or add it to .env)", name);
    match (value, required) {
        (Some(key), _) => CheckResult::ok(name, &format!("configured ({})", mask(key))),
        (None, true) => CheckResult::error(name, "not set", &hint),
        (None, false) => CheckResult::ok(name, "not needed by current configuration"),
    }
}

/// Show only the last four characters of a credential.
fn mask(key: &str) -> String {
    let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    if key.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("****{}", tail)
    }
}

fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            &format!("Create {} to override settings", config_path.display()),
        )
    }
}

fn check_ingest_dir(settings: &Settings) -> CheckResult {
    let dir = settings.ingest_output_dir();
    if dir.is_dir() {
        CheckResult::ok("Ingest output", &format!("{}", dir.display()))
    } else {
        CheckResult::warning(
            "Ingest output",
            &format!("{} (not created yet)", dir.display()),
            "Created by 'spotter ingest'",
        )
    }
}
