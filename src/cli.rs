// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::config::{AppConfig, DEFAULT_CONFIG_PATH};
use crate::error::HireSightError;
use crate::export::{score_pages, write_csv};
use crate::profile_extraction::{ExtractionOutcome, FilePage, ProfilePage, RemotePage};
use crate::render::{CandidatePreview, ReportView};
use crate::scoring::CompatibilityScorer;
use crate::session::AnalysisSession;
use crate::types::backend::{RegisterRequest, Resource};
use crate::types::candidate::{CandidateRecord, ManualCandidateInput};

#[derive(Parser)]
#[command(name = "hiresight")]
#[command(about = "Extract candidate profiles and score them against job descriptions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract candidate fields from a saved profile page or a URL
    Extract {
        page: String,
        #[arg(long)]
        json: bool,
    },
    /// Extract a profile and score it against a job description
    Analyze {
        page: String,
        /// File holding the job description
        #[arg(long)]
        job: PathBuf,
        /// Save the analysis to the backend
        #[arg(long)]
        save: bool,
        #[arg(long)]
        json: bool,
    },
    /// Score a candidate entered by hand
    Manual {
        #[arg(long)]
        job: PathBuf,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        about: String,
        /// Comma separated
        #[arg(long, default_value = "")]
        skills: String,
        #[arg(long)]
        save: bool,
        #[arg(long)]
        json: bool,
    },
    /// Score many saved profile pages against one job description
    Batch {
        #[arg(required = true)]
        pages: Vec<PathBuf>,
        #[arg(long)]
        job: PathBuf,
        /// Write the ranking to this CSV file instead of stdout
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Re-extract whenever a saved page switches to another profile
    Watch {
        page: PathBuf,
        #[arg(long)]
        job: Option<PathBuf>,
    },
    /// Log in to the backend
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a backend account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        company: Option<String>,
    },
    /// Forget the stored credentials
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Renew the stored access token
    Refresh,
    /// List a backend collection
    List {
        resource: Resource,
        /// Query parameter as key=value, repeatable
        #[arg(long = "query", value_parser = parse_key_value)]
        query: Vec<(String, String)>,
    },
    /// Show one entity
    Get { resource: Resource, id: String },
    /// Delete one entity
    Delete { resource: Resource, id: String },
}

fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    match cli.command {
        Command::Extract { page, json } => {
            let record = extract_candidate(&config, &page).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("{}", CandidatePreview::new(&record));
            }
        }

        Command::Analyze {
            page,
            job,
            save,
            json,
        } => {
            let job_description = read_job(&job).await?;
            let record = extract_candidate(&config, &page).await?;
            run_analysis(&config, record, job_description, save, json).await?;
        }

        Command::Manual {
            job,
            name,
            title,
            location,
            about,
            skills,
            save,
            json,
        } => {
            let job_description = read_job(&job).await?;
            let input = ManualCandidateInput {
                name,
                title,
                location,
                about,
                skills,
            };
            let record = CandidateRecord::from_manual(input, "")?;
            run_analysis(&config, record, job_description, save, json).await?;
        }

        Command::Batch { pages, job, csv } => {
            let job_description = read_job(&job).await?;
            let extractor = config.extraction.build_extractor()?;
            let scorer = CompatibilityScorer::new();

            let pages: Vec<(String, FilePage)> = pages
                .into_iter()
                .map(|path| (path.display().to_string(), FilePage::new(path)))
                .collect();
            let result = score_pages(&extractor, &scorer, &pages, &job_description).await;

            for skipped in &result.skipped {
                eprintln!("⚠️  Skipped {}: {}", skipped.source, skipped.reason);
            }

            match csv {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    write_csv(&result, file)?;
                    println!(
                        "✅ {} candidates ranked, written to {}",
                        result.entries.len(),
                        path.display()
                    );
                }
                None => write_csv(&result, std::io::stdout())?,
            }
        }

        Command::Watch { page, job } => {
            let job_description = match job {
                Some(path) => Some(read_job(&path).await?),
                None => None,
            };
            watch_page(&config, page, job_description).await?;
        }

        Command::Login { email, password } => {
            let client = config.backend_client()?;
            client.login(&email, &password).await?;
            println!("✅ Logged in as {}", email);
        }

        Command::Register {
            name,
            email,
            password,
            company,
        } => {
            let client = config.backend_client()?;
            let request = RegisterRequest {
                name,
                email,
                password,
                company,
            };
            let response = client.register(&request).await?;
            println!(
                "✅ Account created for {}{}",
                request.email,
                if response.access_token.is_some() {
                    " (logged in)"
                } else {
                    ""
                }
            );
        }

        Command::Logout => {
            config.backend_client()?.logout().await?;
            println!("✅ Logged out");
        }

        Command::Whoami => {
            let client = config.backend_client()?;
            let user = backend_call(client.profile().await)?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }

        Command::Refresh => {
            let client = config.backend_client()?;
            backend_call(client.refresh().await)?;
            println!("✅ Access token renewed");
        }

        Command::List { resource, query } => {
            let client = config.backend_client()?;
            let items = backend_call(client.list(resource, &query).await)?;
            println!("{}", serde_json::to_string_pretty(&items)?);
        }

        Command::Get { resource, id } => {
            let client = config.backend_client()?;
            let item = backend_call(client.get(resource, &id).await)?;
            println!("{}", serde_json::to_string_pretty(&item)?);
        }

        Command::Delete { resource, id } => {
            let client = config.backend_client()?;
            backend_call(client.delete(resource, &id).await)?;
            println!("✅ Deleted {} {}", resource, id);
        }
    }

    Ok(())
}

async fn read_job(path: &Path) -> Result<String> {
    let job = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read job description: {}", path.display()))?;
    if job.trim().is_empty() {
        anyhow::bail!("Job description {} is empty", path.display());
    }
    Ok(job)
}

fn open_page(config: &AppConfig, source: &str) -> Result<Box<dyn ProfilePage>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let timeout = Duration::from_secs(config.backend.timeout_seconds);
        Ok(Box::new(RemotePage::new(source, timeout)?))
    } else {
        Ok(Box::new(FilePage::new(source)))
    }
}

async fn extract_candidate(config: &AppConfig, source: &str) -> Result<CandidateRecord> {
    let extractor = config.extraction.build_extractor()?;
    let page = open_page(config, source)?;

    match extractor.extract(page.as_ref()).await {
        Ok(record) => Ok(record),
        Err(e @ HireSightError::InsufficientData { .. }) => {
            eprintln!("❌ Could not read enough profile data from {}", source);
            eprintln!("   Enter the candidate by hand instead: hiresight manual --job <file> --name ... --skills ...");
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

async fn run_analysis(
    config: &AppConfig,
    record: CandidateRecord,
    job_description: String,
    save: bool,
    json: bool,
) -> Result<()> {
    let scorer = CompatibilityScorer::new();
    let user = match config.credential_store().load().await {
        Ok(credentials) => credentials.and_then(|c| c.user),
        Err(e) => {
            warn!("Ignoring unreadable credentials: {}", e);
            None
        }
    };
    let mut session = AnalysisSession::with_user(user);
    session.set_candidate(record);
    session.set_job_description(job_description);
    session.analyze(&scorer)?;

    if let (Some(candidate), Some(report)) = (session.candidate(), session.report()) {
        if json {
            println!("{}", serde_json::to_string_pretty(report)?);
        } else {
            println!("{}", ReportView::new(candidate, report));
            if let Some(analyst) = session.analyst() {
                println!("Analyzed by {}", analyst);
            }
        }
    }

    if save {
        let client = config.backend_client()?;
        let analysis = session.saved_analysis()?;
        backend_call(client.save_analysis(&analysis).await)?;
        println!("✅ Analysis of \"{}\" saved", analysis.candidate_name);
    }

    Ok(())
}

/// Add a login hint to authentication failures
fn backend_call<T>(result: crate::error::Result<T>) -> Result<T> {
    result.map_err(|e| {
        if e.requires_login() {
            eprintln!("🔐 Run `hiresight login --email <email> --password <password>`");
        }
        error!("Backend call failed: {}", e);
        e.into()
    })
}

async fn watch_page(
    config: &AppConfig,
    path: PathBuf,
    job_description: Option<String>,
) -> Result<()> {
    let extractor = config.extraction.build_extractor()?;
    let watcher = config.extraction.navigation_watcher();
    let scorer = CompatibilityScorer::new();
    let page = FilePage::new(path);
    let (tx, mut rx) = mpsc::channel::<ExtractionOutcome>(8);

    let printer = async {
        while let Some(outcome) = rx.recv().await {
            println!("── {}", outcome.url);
            match outcome.result {
                Ok(record) => match &job_description {
                    Some(job) => {
                        let report = scorer.score(&record, job);
                        println!("{}", ReportView::new(&record, &report));
                    }
                    None => println!("{}", CandidatePreview::new(&record)),
                },
                Err(e) => eprintln!("❌ {}", e),
            }
        }
    };

    let watch = async {
        let (result, ()) = tokio::join!(watcher.run(&extractor, &page, tx), printer);
        result
    };

    info!("Watching {} (Ctrl+C to stop)", page.path().display());
    tokio::select! {
        result = watch => result?,
        _ = tokio::signal::ctrl_c() => info!("Stopped watching"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "hiresight",
            "analyze",
            "profile.html",
            "--job",
            "job.txt",
            "--save",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("config.yaml"));
        match cli.command {
            Command::Analyze {
                page, save, json, ..
            } => {
                assert_eq!(page, "profile.html");
                assert!(save);
                assert!(!json);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_cli_parses_resources_and_queries() {
        let cli = Cli::try_parse_from([
            "hiresight",
            "list",
            "job-postings",
            "--query",
            "status=open",
            "--config",
            "prod.yaml",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("prod.yaml"));
        match cli.command {
            Command::List { resource, query } => {
                assert_eq!(resource, Resource::JobPostings);
                assert_eq!(query, vec![("status".to_string(), "open".to_string())]);
            }
            _ => panic!("expected list"),
        }

        assert!(Cli::try_parse_from(["hiresight", "get", "notes", "1"]).is_err());
        assert!(matches!(
            Cli::try_parse_from(["hiresight", "refresh"]).unwrap().command,
            Command::Refresh
        ));
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("page = 2").unwrap(),
            ("page".to_string(), "2".to_string())
        );
        assert!(parse_key_value("nokey").is_err());
        assert!(parse_key_value("=x").is_err());
    }
}
