use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use civic_analysis::{IssueBoard, ReportAnalysisClient, ReportDraft};
use civic_common::{fixtures::mock_issues, Config, IssueCategory, Location, Reporter};

#[derive(Parser)]
#[command(name = "janseva", about = "Triage civic issue reports with an AI priority score")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a report and print the assessment as JSON.
    Analyze {
        description: String,
        /// Category label passed through to the model as-is.
        #[arg(long, default_value = "Broken Roads")]
        category: String,
        /// Fail instead of substituting the fallback assessment.
        #[arg(long)]
        strict: bool,
    },
    /// Score a report, file it on a board seeded with sample issues, and print the ranked board.
    File {
        description: String,
        /// Label ("Waterlogging") or slug ("water").
        #[arg(long, default_value = "roads")]
        category: IssueCategory,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        anonymous: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("civic_analysis=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    config.log_redacted();

    let client = ReportAnalysisClient::from_config(&config);

    match cli.command {
        Command::Analyze {
            description,
            category,
            strict,
        } => {
            if strict {
                let result = client.try_analyze(&description, &category).await?;
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let assessment = client.assess(&description, &category).await;
                println!("{}", serde_json::to_string_pretty(&assessment)?);
            }
        }
        Command::File {
            description,
            category,
            address,
            name,
            anonymous,
        } => {
            let reporter = match (anonymous, name) {
                (false, Some(name)) => Reporter::named(name),
                _ => Reporter::anonymous(),
            };
            let mut draft = ReportDraft::new(category, description).with_reporter(reporter);
            if let Some(address) = address {
                let location = Location {
                    address,
                    ..draft.location.clone()
                };
                draft = draft.with_location(location);
            }

            let mut board = IssueBoard::with_issues(mock_issues(Utc::now()));
            let (issue, source) = board.submit(&client, draft).await?;
            info!(id = %issue.id, ?source, "Report filed");

            for issue in board.ranked() {
                println!(
                    "{:>5.1}  {:<9}  {:<20}  {:<17}  {}",
                    issue.priority_score,
                    issue.priority_band().to_string(),
                    issue.category.label(),
                    issue.status.to_string(),
                    issue.description
                );
            }
        }
    }

    Ok(())
}
