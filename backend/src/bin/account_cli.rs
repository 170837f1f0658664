//! Drive the account workflows from the command line.
//!
//! Prints `key=value` lines on stdout; progress and diagnostics go to the
//! log on stderr.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use account_console::domain::ports::{AccountEditCommand, InsuranceEntityCommand};
use account_console::domain::{
    AccountDraft, AccountEdits, AccountId, AccountProfile, EditOutcome, InsuranceDraft,
    RemoteAccount, StagedImage, WorkflowOutcome, WorkflowProgress,
};
use account_console::services::ConsoleServices;
use account_console::settings::ConsoleSettings;
use cap_std::{ambient_authority, fs::Dir};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `account-cli` arguments.
#[derive(Debug, Parser)]
#[command(
    name = "account-cli",
    about = "Create and edit external accounts against the configured backend",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account, then upload and attach an optional image.
    Create {
        #[arg(long)]
        email: String,
        #[arg(long = "role", value_name = "role")]
        user_role: String,
        /// JSON file with profile fields keyed by wire name.
        #[arg(long, value_name = "path")]
        profile: Option<PathBuf>,
        /// Profile image to attach once the account exists.
        #[arg(long, value_name = "path")]
        image: Option<PathBuf>,
    },
    /// Update fields of an existing account and optionally replace its image.
    Edit {
        id: String,
        /// Field assignment as `key=value`; repeatable.
        #[arg(long = "set", value_name = "key=value", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
        #[arg(long, value_name = "path")]
        image: Option<PathBuf>,
    },
    /// Create an insurance entity from a JSON draft.
    CreateInsurance {
        #[arg(long, value_name = "path")]
        draft: PathBuf,
    },
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = ConsoleSettings::load_without_args("account-cli").map_err(io::Error::other)?;
    let services = ConsoleServices::from_settings(&settings).map_err(io::Error::other)?;

    match args.command {
        Command::Create {
            email,
            user_role,
            profile,
            image,
        } => {
            let profile: AccountProfile = match profile {
                Some(path) => read_json(&path)?,
                None => AccountProfile::default(),
            };
            let mut draft = AccountDraft::new(email, user_role, profile).map_err(invalid_input)?;
            if let Some(path) = image {
                draft = draft.with_staged_image(stage_image(&path)?);
            }
            let outcome = create(&services, draft).await;
            print_workflow_outcome(&outcome);
        }
        Command::Edit { id, set, image } => {
            let id = AccountId::new(id).map_err(invalid_input)?;
            let mut fields = RemoteAccount::default();
            for (key, value) in set {
                fields.set(key, value);
            }
            let mut edits = AccountEdits::new(fields);
            if let Some(path) = image {
                edits = edits.with_staged_image(stage_image(&path)?);
            }
            let outcome = services.account_edit.submit(&id, edits).await;
            print_edit_outcome(&outcome);
        }
        Command::CreateInsurance { draft } => {
            let draft: InsuranceDraft = read_json(&draft)?;
            let id = services
                .insurance
                .create(draft)
                .await
                .map_err(|error| io::Error::other(error.message().to_owned()))?;
            println!("status=created");
            println!("entity_id={id}");
        }
    }
    Ok(())
}

async fn create(services: &ConsoleServices, draft: AccountDraft) -> WorkflowOutcome {
    let (progress, mut receiver) = WorkflowProgress::channel();
    let reporter = tokio::spawn(async move {
        while receiver.changed().await.is_ok() {
            let state = *receiver.borrow_and_update();
            if let Some(step) = state.step_message() {
                info!(?state, step, "workflow progress");
            }
        }
    });
    let outcome = services
        .account_creation
        .submit_observed(draft, &progress)
        .await;
    drop(progress);
    if let Err(error) = reporter.await {
        warn!(%error, "progress reporter stopped abnormally");
    }
    outcome
}

fn print_workflow_outcome(outcome: &WorkflowOutcome) {
    match outcome {
        WorkflowOutcome::Created { id, image } => {
            println!("status=created");
            println!("account_id={id}");
            if let Some(image) = image {
                println!("image_url={}", image.image_url);
                println!("image_source={}", image.source);
                println!("low_confidence={}", image.is_low_confidence());
            }
        }
        WorkflowOutcome::CreatedImageFailed { id, stage, reason } => {
            println!("status=created_image_failed");
            println!("account_id={id}");
            println!("failed_stage={stage:?}");
            println!("reason={reason}");
        }
        WorkflowOutcome::CreatedLookupFailed { reason } => {
            println!("status=created_lookup_failed");
            println!("reason={reason}");
        }
        WorkflowOutcome::Failed { .. } => println!("status=failed"),
    }
    println!("message={}", outcome.user_message());
}

fn print_edit_outcome(outcome: &EditOutcome) {
    match outcome {
        EditOutcome::Updated { image } => {
            println!("status=updated");
            if let Some(image) = image {
                println!("image_url={}", image.image_url);
            }
        }
        EditOutcome::UpdatedImageFailed { reason } => {
            println!("status=updated_image_failed");
            println!("reason={reason}");
        }
        EditOutcome::Failed { .. } => println!("status=failed"),
    }
    println!("message={}", outcome.user_message());
}

fn invalid_input(error: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, error.to_string())
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err("assignment key must not be empty".to_owned());
    }
    Ok((key.to_owned(), value.to_owned()))
}

fn content_type_for(path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => return None,
    };
    Some(mime.to_owned())
}

fn read_file(path: &Path) -> io::Result<Vec<u8>> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path must name a file"))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        io::Error::other(format!("open directory '{}': {error}", parent.display()))
    })?;
    let mut file = directory
        .open(Path::new(file_name))
        .map_err(|error| io::Error::other(format!("open '{}': {error}", path.display())))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|error| io::Error::other(format!("read '{}': {error}", path.display())))?;
    Ok(bytes)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> io::Result<T> {
    let bytes = read_file(path)?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|error| invalid_input(format!("'{}' is not JSON: {error}", path.display())))?;
    serde_json::from_value(value)
        .map_err(|error| invalid_input(format!("'{}': {error}", path.display())))
}

fn stage_image(path: &Path) -> io::Result<StagedImage> {
    let bytes = read_file(path)?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .to_owned();
    StagedImage::new(file_name, content_type_for(path), bytes).map_err(invalid_input)
}
