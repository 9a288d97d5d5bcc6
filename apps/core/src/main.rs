// Sentify command line entry point.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};

use sentify_core::actors::LlmActorHandle;
use sentify_core::analysis::labels::{Audience, Formality, Intent, SentimentCategory};
use sentify_core::analysis::result::{confidence_or_unknown, label_or_unknown};
use sentify_core::analysis::{AnalysisResult, Analyzer, FormalityFlag};
use sentify_core::coach::{Conversation, EditSuggestionSet, EmailCoach, TargetMetrics};
use sentify_core::config::Settings;
use sentify_core::{input, telemetry};

const SAMPLE_EMAIL: &str = "Subject: Test Email - Just Checking In
Hi TestRecipient,
This is just a quick test email to make sure everything is working correctly. Please feel free to ignore this.
Thanks,
Person
";

#[derive(Debug, Parser)]
#[command(name = "sentify", version, about = "Sentify: Email Sentiment Analysis CLI")]
struct Cli {
    /// Path to file containing email text
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Email text to analyze
    #[arg(short, long)]
    text: Option<String>,

    /// Show detailed output
    #[arg(short, long)]
    verbose: bool,

    /// Output results as JSON
    #[arg(short, long)]
    json: bool,

    /// Generate AI feedback
    #[arg(long)]
    feedback: bool,

    /// Ask the model for subject, salutation, closing and body alternatives
    #[arg(long)]
    edit: bool,

    #[arg(long, value_name = "INTENT", requires = "edit")]
    target_intent: Option<Intent>,

    #[arg(long, value_name = "FORMALITY", requires = "edit")]
    target_formality: Option<Formality>,

    #[arg(long, value_name = "AUDIENCE", requires = "edit")]
    target_audience: Option<Audience>,

    #[arg(long, value_name = "POLARITY", requires = "edit")]
    target_polarity: Option<SentimentCategory>,

    /// Flag sentences whose formality differs from this label
    #[arg(long, value_name = "LABEL")]
    check_formality: Option<Formality>,
}

impl Cli {
    fn targets(&self) -> TargetMetrics {
        TargetMetrics {
            intent: self.target_intent,
            formality: self.target_formality,
            audience: self.target_audience,
            polarity: self.target_polarity,
        }
    }

    fn progress(&self, message: &str) {
        if self.verbose && !self.json {
            print!("{}", message);
            let _ = std::io::stdout().flush();
        }
    }

    fn done(&self) {
        if self.verbose && !self.json {
            println!("Done");
        }
    }
}

/// Everything one invocation produced.
#[derive(Debug, Serialize)]
struct Report {
    #[serde(flatten)]
    analysis: AnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    edit_suggestions: Option<EditSuggestionSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    formality_flags: Option<Vec<FormalityFlag>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    telemetry::init_tracing(cli.verbose)?;

    let email_text = match (&cli.file, &cli.text) {
        (Some(path), _) => match input::read_email_file(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Error reading file: {}", e);
                std::process::exit(1);
            }
        },
        (None, Some(text)) => text.clone(),
        (None, None) => {
            println!("No input provided. Using an example email...");
            SAMPLE_EMAIL.to_string()
        }
    };

    let settings = Settings::from_env()?;
    let analyzer = Analyzer::from_settings(&settings.analyzer)?;
    info!(backend = %settings.analyzer.backend, "Analyzer ready");

    cli.progress("Analyzing sentiment...");
    let mut analysis = analyzer.analyze_parallel(&email_text).await?;
    cli.done();

    let mut edit_suggestions = None;
    if cli.feedback || cli.edit {
        let llm_settings = settings.llm().context("AI features need a completion endpoint")?;
        let llm = LlmActorHandle::new(llm_settings.clone())?;
        let coach = EmailCoach::new(analyzer.clone(), llm);

        if cli.feedback {
            cli.progress("Generating AI Feedback...");
            let mut conversation = Conversation::feedback();
            let feedback = coach.feedback(&mut conversation, &email_text, &analysis).await?;
            analysis = analysis.with_feedback(feedback);
            cli.done();
        }

        if cli.edit {
            cli.progress("Generating edit suggestions...");
            let targets = cli.targets();
            let suggestions = coach.edit(&email_text, &analysis, Some(&targets)).await?;
            edit_suggestions = Some(suggestions);
            cli.done();
        }
    }

    let formality_flags = cli
        .check_formality
        .map(|desired| analyzer.flag_mismatches(&email_text, desired));

    let report = Report {
        analysis,
        edit_suggestions,
        formality_flags,
    };

    if cli.json {
        debug!("Dumping JSON");
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &cli);
    }

    if cli.verbose && !cli.json {
        println!("\nAnalysis complete!");
    }
    Ok(())
}

fn print_report(report: &Report, cli: &Cli) {
    let analysis = &report.analysis;
    let scores = &analysis.sentiment_scores;

    println!("\n=== Email Analysis Results ===");
    println!(
        "Sentiment: {} (compound score: {:.2})",
        analysis.sentiment_category, scores.compound
    );
    println!("Intent: {}", label_or_unknown(analysis.intent));
    println!("Formality: {}", analysis.formality);
    println!("Audience: {}", label_or_unknown(analysis.audience));

    if let Some(feedback) = &analysis.feedback {
        println!("\n=== AI Feedback ===");
        println!("{}", feedback);
    }

    if let Some(suggestions) = &report.edit_suggestions {
        println!("\n=== Suggested Edits ===");
        print_list("Subjects", &suggestions.subjects);
        print_list("Salutations", &suggestions.salutations);
        print_list("Closings", &suggestions.closings);
        print_list("Bodies", &suggestions.bodies);
    }

    if let (Some(flags), Some(desired)) = (&report.formality_flags, cli.check_formality) {
        println!("\n=== Formality Check (desired: {}) ===", desired);
        if flags.is_empty() {
            println!("All sentences match the desired formality.");
        }
        for flag in flags {
            println!("- {}", flag.sentence);
            println!("  {}", flag.issue);
        }
    }

    if cli.verbose {
        println!("\n=== Detailed Sentiment Scores: ===");
        println!("  Positive: {:.2}", scores.pos);
        println!("  Negative: {:.2}", scores.neg);
        println!("  Neutral: {:.2}", scores.neu);
        println!("\n=== Classifier Confidences: ===");
        println!("  Intent: {}", confidence_or_unknown(analysis.intent_confidence));
        println!("  Audience: {}", confidence_or_unknown(analysis.audience_confidence));
    }
}

fn print_list(title: &str, items: &[String]) {
    println!("{}:", title);
    for (i, item) in items.iter().enumerate() {
        println!("  {}. {}", i + 1, item);
    }
}
