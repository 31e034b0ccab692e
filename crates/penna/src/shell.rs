// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `penna shell` command implementation.
//!
//! Launches an interactive REPL with a colored prompt and readline history.
//! Plain input generates content in the user's style; slash commands drive
//! the session, sample, and feedback workflows. All state lives in the
//! session store, sample gate, generation controller, and history
//! projection — the shell only renders it.

use std::sync::Arc;

use colored::Colorize;
use penna_api::ApiClient;
use penna_app::{EditMode, GenerationController, HistoryProjection, SampleGate};
use penna_config::PennaConfig;
use penna_core::{Artifact, FeedbackKind, PennaError};
use penna_session::{SessionCache, SessionStore};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

struct Shell {
    session: Arc<SessionStore>,
    gate: Arc<SampleGate>,
    history: Arc<HistoryProjection>,
    controller: GenerationController,
    context: String,
}

/// Runs the `penna shell` interactive REPL.
pub async fn run_shell(config: PennaConfig) -> Result<(), PennaError> {
    if !config.shell.color {
        colored::control::set_override(false);
    }

    let api = ApiClient::new(&config.service)
        .map_err(|e| PennaError::Internal(format!("failed to build HTTP client: {e}")))?;
    let session = Arc::new(SessionStore::new(
        api,
        SessionCache::new(&config.session.cache_dir),
    ));
    session.restore().await;

    let history = Arc::new(HistoryProjection::new(
        session.clone(),
        config.generation.history_limit,
    ));
    let gate = Arc::new(SampleGate::new(session.clone(), history.clone()));
    let controller = GenerationController::new(session.clone(), gate.subscribe(), history.clone());

    let mut shell = Shell {
        session,
        gate,
        history,
        controller,
        context: config.generation.default_context.clone(),
    };

    println!("{}", "penna shell".bold().green());
    println!(
        "Type a prompt to generate, {} for commands, {} to exit.\n",
        "/help".yellow(),
        "/quit".yellow()
    );

    if let Some(active) = shell.session.session().await {
        println!("Welcome back, {}.", active.email.bold());
        shell.bootstrap().await;
    } else {
        println!("Not logged in. Use {} or {}.", "/login".yellow(), "/signup".yellow());
    }

    let mut rl = DefaultEditor::new()
        .map_err(|e| PennaError::Internal(format!("failed to initialize readline: {e}")))?;
    let mut auth_rx = shell.session.subscribe();
    auth_rx.mark_unchanged();

    let prompt = format!("{}> ", "penna".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                let _ = rl.add_history_entry(&line);

                if let Err(e) = shell.dispatch(&mut rl, trimmed).await {
                    eprintln!("{}: {e}", "error".red());
                }
                if let Some(notice) = shell.controller.take_notice().await {
                    println!("{}", notice.dimmed());
                }
                // A forced logout may have landed during the command; drop
                // dependent state so every surface observes it at once.
                if auth_rx.has_changed().unwrap_or(false) && !*auth_rx.borrow_and_update() {
                    shell.reset_dependents().await;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                // Ctrl+C / Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

impl Shell {
    /// Handles one shell line: a slash command, or a generation prompt.
    async fn dispatch(&mut self, rl: &mut DefaultEditor, line: &str) -> Result<(), PennaError> {
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "/help" => print_help(),
            "/login" => self.login(rest, false).await?,
            "/signup" => self.login(rest, true).await?,
            "/logout" => {
                self.session.logout().await;
                self.reset_dependents().await;
                println!("Logged out.");
            }
            "/whoami" => match self.session.session().await {
                Some(active) => println!("{} (since {})", active.email, active.established_at),
                None => println!("Not logged in."),
            },
            "/samples" => self.list_samples().await,
            "/upload" => self.upload(rl, rest).await?,
            "/analyze" => {
                let profile = self.gate.analyze().await?;
                println!(
                    "Style profile rebuilt from {} sample(s): {} vocabulary, {} tone.",
                    profile.sample_count, profile.vocabulary_level, profile.formality_preference
                );
            }
            "/delete" => {
                let id: i64 = rest.parse().map_err(|_| {
                    PennaError::Validation("Usage: /delete <sample-id>".into())
                })?;
                self.gate.remove(id).await?;
                println!("Sample {id} deleted.");
            }
            "/profile" => match self.gate.profile() {
                Some(profile) => {
                    println!("{} {}", "vocabulary:".bold(), profile.vocabulary_level);
                    println!("{} {}", "formality:".bold(), profile.formality_preference);
                    println!("{} {:.1}", "sentence length:".bold(), profile.sentence_complexity);
                    println!("{} {}", "samples analyzed:".bold(), profile.sample_count);
                }
                None => println!("No style profile yet. Upload samples and run /analyze."),
            },
            "/context" => {
                if rest.is_empty() {
                    println!("context: {}", self.context);
                } else {
                    self.context = rest.to_string();
                    println!("context set to {}", self.context);
                }
            }
            "/show" => match self.controller.artifact().await {
                Some(artifact) => {
                    let mode = self.controller.edit_mode().await;
                    print_artifact(&artifact, &mode);
                }
                None => println!("Nothing generated yet."),
            },
            "/accept" => self.feedback(FeedbackKind::Accepted).await?,
            "/reject" => self.feedback(FeedbackKind::Rejected).await?,
            "/edit" => {
                self.controller.start_editing().await?;
                let text = read_block(rl, "Enter your version; end with a single '.' line.")?;
                if text.trim().is_empty() {
                    println!("Draft unchanged. Use {} or {}.", "/save".yellow(), "/cancel".yellow());
                } else {
                    self.controller.set_draft(&text).await?;
                    println!("Draft updated. Use {} or {}.", "/save".yellow(), "/cancel".yellow());
                }
            }
            "/save" => self.feedback(FeedbackKind::Modified).await?,
            "/cancel" => {
                self.controller.cancel_editing().await;
                println!("Edit discarded.");
            }
            "/clear" => {
                self.controller.clear().await;
                println!("Cleared.");
            }
            "/history" => {
                self.history.refresh().await;
                let entries = self.history.entries().await;
                if entries.is_empty() {
                    println!("No generation history.");
                }
                for entry in entries {
                    let feedback = entry.user_feedback.as_deref().unwrap_or("unrated");
                    println!(
                        "{} [{}] {} — {}",
                        format!("#{}", entry.id).bold(),
                        entry.created_at.format("%Y-%m-%d %H:%M"),
                        feedback,
                        entry.prompt
                    );
                }
            }
            "/stats" => {
                self.history.refresh().await;
                match self.history.stats().await {
                    Some(stats) => {
                        println!("{} {}", "generations:".bold(), stats.total_generations);
                        println!(
                            "{} {} accepted, {} modified, {} rejected",
                            "feedback:".bold(),
                            stats.accepted,
                            stats.modified,
                            stats.rejected
                        );
                        println!(
                            "{} {:.0}% accepted, {:.0}% modified",
                            "rates:".bold(),
                            stats.acceptance_rate,
                            stats.modification_rate
                        );
                    }
                    None => println!("Statistics unavailable."),
                }
            }
            _ if command.starts_with('/') => {
                println!("Unknown command {command}. Try {}.", "/help".yellow());
            }
            // Anything else is a generation prompt.
            _ => {
                match self.controller.generate(line, &self.context).await? {
                    Some(artifact) => {
                        println!();
                        println!("{}", artifact.display_content());
                        println!();
                        println!(
                            "{}",
                            format!(
                                "artifact #{} — /accept, /reject, or /edit",
                                artifact.id
                            )
                            .dimmed()
                        );
                    }
                    None => {
                        debug!("generation superseded before its result arrived");
                    }
                }
            }
        }

        Ok(())
    }

    async fn login(&self, email: &str, is_signup: bool) -> Result<(), PennaError> {
        if email.is_empty() {
            let usage = if is_signup { "/signup <email>" } else { "/login <email>" };
            return Err(PennaError::Validation(format!("Usage: {usage}")));
        }
        let password = rpassword::prompt_password("password: ")
            .map_err(|e| PennaError::Internal(format!("failed to read password: {e}")))?;

        let active = if is_signup {
            self.session.signup(email, &password).await?
        } else {
            self.session.login(email, &password).await?
        };
        println!("Logged in as {}.", active.email.bold());
        self.bootstrap().await;
        Ok(())
    }

    /// Warms dependent state after a session becomes active.
    async fn bootstrap(&self) {
        if let Err(e) = self.gate.refresh().await {
            eprintln!("{}: {e}", "warning".yellow());
        }
        self.history.refresh().await;
    }

    /// Drops all per-session state; used on logout and forced logout.
    async fn reset_dependents(&self) {
        self.gate.reset().await;
        self.controller.clear().await;
        self.history.reset().await;
    }

    async fn list_samples(&self) {
        let samples = self.gate.samples().await;
        if samples.is_empty() {
            println!("No writing samples uploaded.");
            return;
        }
        for sample in samples {
            let analyzed = if sample.analyzed { "analyzed" } else { "pending" };
            println!(
                "{} [{analyzed}] {} ({} chars)",
                format!("#{}", sample.id).bold(),
                sample.title,
                sample.content.chars().count()
            );
        }
    }

    async fn upload(&self, rl: &mut DefaultEditor, title: &str) -> Result<(), PennaError> {
        if title.is_empty() {
            return Err(PennaError::Validation("Usage: /upload <title>".into()));
        }
        let content = read_block(rl, "Paste the sample text; end with a single '.' line.")?;
        let sample = self.gate.upload(title, &content).await?;
        println!("Uploaded sample #{} ({}).", sample.id, sample.title);
        Ok(())
    }

    async fn feedback(&self, kind: FeedbackKind) -> Result<(), PennaError> {
        let state = self.controller.feedback(kind).await?;
        println!("feedback: {}", format!("{state:?}").to_lowercase());
        Ok(())
    }
}

/// Reads lines until a lone `.` terminator (or EOF) and joins them.
fn read_block(rl: &mut DefaultEditor, hint: &str) -> Result<String, PennaError> {
    println!("{}", hint.dimmed());
    let mut lines = Vec::new();
    loop {
        match rl.readline("... ") {
            Ok(line) => {
                if line.trim() == "." {
                    break;
                }
                lines.push(line);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(PennaError::Internal(format!("readline failed: {e}"))),
        }
    }
    Ok(lines.join("\n"))
}

fn print_artifact(artifact: &Artifact, mode: &EditMode) {
    println!("{} {}", "prompt:".bold(), artifact.prompt);
    println!("{} {}", "context:".bold(), artifact.context);
    println!();
    println!("{}", artifact.display_content());
    println!();
    let state = format!("{:?}", artifact.feedback).to_lowercase();
    if mode.is_editing() {
        println!("{} {state} {}", "feedback:".bold(), "(editing)".yellow());
    } else {
        println!("{} {state}", "feedback:".bold());
    }
}

fn print_help() {
    println!("{}", "session".bold());
    println!("  /login <email>     log in (prompts for password)");
    println!("  /signup <email>    create an account");
    println!("  /logout            log out and clear the cached session");
    println!("  /whoami            show the active session");
    println!("{}", "style".bold());
    println!("  /samples           list uploaded writing samples");
    println!("  /upload <title>    upload a writing sample");
    println!("  /analyze           rebuild the style profile from all samples");
    println!("  /delete <id>       delete a writing sample");
    println!("  /profile           show the current style profile");
    println!("{}", "generation".bold());
    println!("  <prompt>           generate content in your style");
    println!("  /context [value]   show or set the generation context");
    println!("  /show              show the current artifact");
    println!("  /accept, /reject   rate the artifact (repeat to undo)");
    println!("  /edit              edit the artifact text");
    println!("  /save              submit the edit as feedback");
    println!("  /cancel            discard the edit");
    println!("  /clear             discard the artifact");
    println!("{}", "insights".bold());
    println!("  /history           recent generations");
    println!("  /stats             acceptance statistics");
    println!("  /quit              exit");
}
