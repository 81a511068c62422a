//! services/intake/src/console/commands.rs
//!
//! Command line surface of the symptom guide and the dispatch for each command.

use crate::adapters::{export_report, render_history_report};
use crate::console::render::{self, Palette};
use crate::console::state::AppState;
use crate::console::submit::submit_intake;
use crate::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use symptom_guide_core::domain::DEFAULT_SEVERITY;
use symptom_guide_core::first_aid::{find_topic, FIRST_AID_GUIDE};
use symptom_guide_core::{
    matched_keywords, Gender, GuidanceError, SymptomIntake, Theme, MEDICAL_DISCLAIMER,
};
use tracing::info;

pub const DEFAULT_REPORT_PATH: &str = "symptom-guide-history.pdf";

/// How a command finished when it did not hit an unexpected error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed,
    /// The API key is missing or rejected.
    NeedsConfiguration,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failed => ExitCode::FAILURE,
            // EX_CONFIG
            Outcome::NeedsConfiguration => ExitCode::from(78),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "symptom-guide")]
#[command(version)]
#[command(about = "Informational symptom guidance. Not a diagnosis.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Describe symptoms and request guidance
    Analyze(AnalyzeArgs),

    /// Check a description for emergency keywords without any network call
    Screen {
        /// Symptom description to screen
        text: String,
    },

    /// Browse, export or clear the saved queries
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Show or change the display theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },

    /// Show, accept or revoke the medical disclaimer
    Consent {
        #[command(subcommand)]
        action: ConsentAction,
    },

    /// Offline first-aid reference
    FirstAid {
        /// Topic name or prefix, e.g. "burns"; lists topics when omitted
        topic: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// What you are experiencing
    pub description: String,

    /// Age in years
    #[arg(long)]
    pub age: Option<u32>,

    /// Male, Female or Other
    #[arg(long, default_value = "other")]
    pub gender: Gender,

    /// How long the symptoms have lasted, e.g. "2 days"
    #[arg(long, default_value = "")]
    pub duration: String,

    /// Severity on a 1-10 scale
    #[arg(long, default_value_t = DEFAULT_SEVERITY, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub severity: u8,

    /// Accept the medical disclaimer and remember the choice
    #[arg(long)]
    pub accept_disclaimer: bool,
}

#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    /// List saved queries, newest first
    List,
    /// Show one saved query in full
    Show {
        /// Position in the list, starting at 1
        index: usize,
    },
    /// Delete every saved query
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Write the history as a PDF report
    Export {
        /// Destination file
        #[arg(default_value = DEFAULT_REPORT_PATH)]
        path: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum ThemeAction {
    Show,
    /// light or dark
    Set { theme: Theme },
    Toggle,
}

#[derive(Subcommand, Debug)]
pub enum ConsentAction {
    Show,
    Accept,
    Revoke,
}

/// Runs one command. Expected guidance failures are rendered here and reported
/// through the exit code; everything else propagates.
pub async fn run(cli: Cli, app_state: &AppState) -> Result<Outcome, AppError> {
    let mut local = app_state.load_local_state()?;
    let palette = if cli.no_color || !std::io::stdout().is_terminal() {
        Palette::plain()
    } else {
        Palette::for_theme(local.theme())
    };

    match cli.command {
        Command::Analyze(args) => {
            if args.accept_disclaimer && !local.consent_accepted() {
                local.set_consent(true)?;
                info!("Disclaimer accepted from the command line.");
            }
            if !local.consent_accepted() {
                eprintln!("{}\n", MEDICAL_DISCLAIMER);
                eprintln!("Run `symptom-guide consent accept` or pass --accept-disclaimer.");
                return Err(AppError::ConsentRequired);
            }

            let intake = SymptomIntake::new(
                args.description,
                args.age,
                args.gender,
                args.duration,
                args.severity,
            )?;

            // Shown before the request so it appears even if the request fails.
            let matched = matched_keywords(&intake.description);
            if !matched.is_empty() {
                println!("{}\n", render::emergency_banner(&palette, &matched));
            }

            match submit_intake(app_state, &mut local, intake).await {
                Ok(submission) => {
                    if submission.show_emergency_banner && submission.matched_keywords.is_empty() {
                        println!("{}\n", render::emergency_banner(&palette, &[]));
                    }
                    println!("{}", render::render_guidance(&palette, &submission.record.result));
                    if !submission.saved {
                        eprintln!("\nNote: this result could not be saved to history.");
                    }
                    Ok(Outcome::Success)
                }
                Err(AppError::Guidance(err)) => {
                    eprintln!("{}", render::render_failure(&palette, &err));
                    Ok(guidance_outcome(&err))
                }
                Err(other) => Err(other),
            }
        }

        Command::Screen { text } => {
            let matched = matched_keywords(&text);
            if matched.is_empty() {
                println!("No emergency keywords detected.");
            } else {
                println!("{}", render::emergency_banner(&palette, &matched));
            }
            Ok(Outcome::Success)
        }

        Command::History { action } => match action {
            HistoryAction::List => {
                println!("{}", render::render_history_list(&palette, local.history()));
                Ok(Outcome::Success)
            }
            HistoryAction::Show { index } => {
                match index.checked_sub(1).and_then(|i| local.history().get(i)) {
                    Some(record) => {
                        println!("{}", render::render_record(&palette, record));
                        Ok(Outcome::Success)
                    }
                    None => {
                        eprintln!(
                            "No saved query #{}; history holds {}.",
                            index,
                            local.history().len()
                        );
                        Ok(Outcome::Failed)
                    }
                }
            }
            HistoryAction::Clear { yes } => {
                if !yes {
                    eprintln!(
                        "This deletes {} saved queries. Re-run with --yes to confirm.",
                        local.history().len()
                    );
                    return Ok(Outcome::Failed);
                }
                local.clear_history()?;
                println!("History cleared.");
                Ok(Outcome::Success)
            }
            HistoryAction::Export { path } => {
                let bytes = render_history_report(local.history())?;
                export_report(&bytes, &path)?;
                info!("Exported {} records to {}", local.history().len(), path.display());
                println!("Report written to {}", path.display());
                Ok(Outcome::Success)
            }
        },

        Command::Theme { action } => {
            let theme = match action {
                ThemeAction::Show => local.theme(),
                ThemeAction::Set { theme } => {
                    local.set_theme(theme)?;
                    theme
                }
                ThemeAction::Toggle => local.toggle_theme()?,
            };
            println!("Theme: {}", theme);
            Ok(Outcome::Success)
        }

        Command::Consent { action } => {
            match action {
                ConsentAction::Show => {
                    println!("{}\n", MEDICAL_DISCLAIMER);
                    let status = if local.consent_accepted() {
                        "accepted"
                    } else {
                        "not accepted"
                    };
                    println!("Status: {}", status);
                }
                ConsentAction::Accept => {
                    local.set_consent(true)?;
                    println!("Disclaimer accepted.");
                }
                ConsentAction::Revoke => {
                    local.set_consent(false)?;
                    println!("Disclaimer acceptance revoked.");
                }
            }
            Ok(Outcome::Success)
        }

        Command::FirstAid { topic } => match topic {
            None => {
                println!("{}", render::render_first_aid_index(&palette, FIRST_AID_GUIDE));
                Ok(Outcome::Success)
            }
            Some(query) => match find_topic(&query) {
                Some(found) => {
                    println!("{}", render::render_first_aid(&palette, found));
                    Ok(Outcome::Success)
                }
                None => {
                    eprintln!("No first-aid topic matches '{}'.", query);
                    println!("{}", render::render_first_aid_index(&palette, FIRST_AID_GUIDE));
                    Ok(Outcome::Failed)
                }
            },
        },
    }
}

fn guidance_outcome(err: &GuidanceError) -> Outcome {
    if err.is_terminal() {
        Outcome::NeedsConfiguration
    } else {
        Outcome::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::console::submit::fakes::ScriptedGuidance;
    use symptom_guide_core::testing::MemoryStore;
    use std::sync::Arc;

    fn app(guidance: ScriptedGuidance) -> (AppState, Arc<ScriptedGuidance>) {
        let guidance = Arc::new(guidance);
        let app_state = AppState {
            config: Arc::new(Config::from_lookup(|_| None).unwrap()),
            guidance: guidance.clone(),
            store: Arc::new(MemoryStore::default()),
        };
        (app_state, guidance)
    }

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["symptom-guide", "--no-color"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn analyze_defaults() {
        let cli = parse(&["analyze", "sore throat"]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.gender, Gender::Other);
        assert_eq!(args.severity, DEFAULT_SEVERITY);
        assert_eq!(args.duration, "");
        assert!(!args.accept_disclaimer);
    }

    #[test]
    fn severity_outside_scale_is_rejected_by_the_parser() {
        let argv = ["symptom-guide", "analyze", "x", "--severity", "11"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[tokio::test]
    async fn analyze_without_consent_makes_no_request() {
        let (app_state, guidance) = app(ScriptedGuidance::default());
        let err = run(parse(&["analyze", "headache"]), &app_state)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ConsentRequired));
        assert_eq!(guidance.call_count(), 0);
    }

    #[tokio::test]
    async fn accepting_the_disclaimer_inline_records_consent_and_history() {
        let (app_state, guidance) = app(ScriptedGuidance::default());
        let code = run(
            parse(&["analyze", "headache", "--accept-disclaimer", "--age", "40"]),
            &app_state,
        )
        .await
        .unwrap();
        assert_eq!(code, Outcome::Success);
        assert_eq!(guidance.call_count(), 1);

        let local = app_state.load_local_state().unwrap();
        assert!(local.consent_accepted());
        assert_eq!(local.history().len(), 1);
        assert_eq!(local.history()[0].intake.age, Some(40));
    }

    #[tokio::test]
    async fn guidance_failure_maps_to_exit_code() {
        let (app_state, _) = app(ScriptedGuidance::with(vec![Err(
            GuidanceError::MissingCredential,
        )]));
        let code = run(
            parse(&["analyze", "headache", "--accept-disclaimer"]),
            &app_state,
        )
        .await
        .unwrap();
        assert_eq!(code, Outcome::NeedsConfiguration);
        assert!(app_state.load_local_state().unwrap().history().is_empty());
    }

    #[tokio::test]
    async fn clear_requires_confirmation() {
        let (app_state, _) = app(ScriptedGuidance::default());
        run(parse(&["analyze", "rash", "--accept-disclaimer"]), &app_state)
            .await
            .unwrap();

        let code = run(parse(&["history", "clear"]), &app_state).await.unwrap();
        assert_eq!(code, Outcome::Failed);
        assert_eq!(app_state.load_local_state().unwrap().history().len(), 1);

        run(parse(&["history", "clear", "--yes"]), &app_state)
            .await
            .unwrap();
        assert!(app_state.load_local_state().unwrap().history().is_empty());
    }

    #[tokio::test]
    async fn theme_and_consent_commands_persist() {
        let (app_state, _) = app(ScriptedGuidance::default());
        run(parse(&["theme", "set", "dark"]), &app_state).await.unwrap();
        assert_eq!(app_state.load_local_state().unwrap().theme(), Theme::Dark);
        run(parse(&["theme", "toggle"]), &app_state).await.unwrap();
        assert_eq!(app_state.load_local_state().unwrap().theme(), Theme::Light);

        run(parse(&["consent", "accept"]), &app_state).await.unwrap();
        assert!(app_state.load_local_state().unwrap().consent_accepted());
        run(parse(&["consent", "revoke"]), &app_state).await.unwrap();
        assert!(!app_state.load_local_state().unwrap().consent_accepted());
    }

    #[tokio::test]
    async fn export_of_empty_history_fails() {
        let (app_state, _) = app(ScriptedGuidance::default());
        let err = run(parse(&["history", "export", "unused.pdf"]), &app_state)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Report(crate::adapters::ReportError::EmptyHistory)
        ));
    }

    #[tokio::test]
    async fn unknown_first_aid_topic_fails() {
        let (app_state, _) = app(ScriptedGuidance::default());
        let code = run(parse(&["first-aid", "frostbite"]), &app_state)
            .await
            .unwrap();
        assert_eq!(code, Outcome::Failed);
        let code = run(parse(&["first-aid", "burn"]), &app_state).await.unwrap();
        assert_eq!(code, Outcome::Success);
    }
}
