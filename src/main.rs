use owo_colors::OwoColorize;
use rc_tracker::adapters::outbound::console::StderrProgressReporter;
use rc_tracker::adapters::outbound::filesystem::{VersionsFileReader, YamlSnapshotStore};
use rc_tracker::adapters::outbound::network::{
    CachingSourceForge, GitHubClient, OciRegistryClient, DEFAULT_GITHUB_API_URL,
};
use rc_tracker::adapters::outbound::process::{
    AnsiblePlaybookAction, DEFAULT_INVENTORY, DEFAULT_PLAYBOOK, DEFAULT_PROGRAM,
};
use rc_tracker::application::dto::{ScanRequest, TagRequest, TestRunOutcome, TestRunRequest};
use rc_tracker::application::services::{
    SaveOutcome, SnapshotStore, VersionResolver, DEFAULT_MAX_COMMITS, DEFAULT_MAX_RELEASES,
};
use rc_tracker::application::use_cases::{
    ReconcileTagsUseCase, RunTestsUseCase, ScanComponentsUseCase, DEFAULT_CONCURRENCY,
    DEFAULT_TAG_MESSAGE,
};
use rc_tracker::cli::{Args, Command, ScanArgs, TagArgs, TestArgs};
use rc_tracker::config::{load_config, ConfigFile, DEFAULT_SNAPSHOT_FILE, DEFAULT_VERSIONS_FILE};
use rc_tracker::ports::outbound::VersionRecordReader;
use rc_tracker::release_tracking::domain::SnapshotStatus;
use rc_tracker::shared::error::ExitCode;
use rc_tracker::shared::Result;
use rc_tracker::telemetry::{default_level, init_tracing};
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    // clap exits with status 2 on invalid arguments
    let args = Args::parse_args();
    init_tracing(args.log_json, default_level(args.verbose));

    let code = match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\n{}\n", "❌ An error occurred:".red().bold());
            eprintln!("{}", e);

            // Display error chain
            for cause in e.chain().skip(1) {
                eprintln!("\nCaused by: {}", cause);
            }

            eprintln!();
            ExitCode::ApplicationError
        }
    };

    process::exit(code.as_i32());
}

async fn run(args: Args) -> Result<ExitCode> {
    let working_dir = std::env::current_dir()?;
    let config = load_config(args.config.as_deref(), &working_dir)?;

    let snapshot_file = args
        .file
        .clone()
        .or_else(|| config.snapshot_file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_FILE));

    match &args.command {
        Command::Scan(scan) => run_scan(scan, &config, &snapshot_file).await,
        Command::Test(test) => run_test(test, &config, &snapshot_file).await,
        Command::Tag(tag) => run_tag(tag, &config).await,
    }
}

fn github_client(config: &ConfigFile) -> Result<GitHubClient> {
    let api_url = config
        .github_api_url
        .as_deref()
        .unwrap_or(DEFAULT_GITHUB_API_URL);
    let token = std::env::var("GITHUB_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());
    GitHubClient::new(api_url, token)
}

async fn run_scan(scan: &ScanArgs, config: &ConfigFile, snapshot_file: &Path) -> Result<ExitCode> {
    let repositories = config.repository_configs()?;

    let forge = CachingSourceForge::new(github_client(config)?);
    let resolver = VersionResolver::new(forge, OciRegistryClient::new()?).with_limits(
        config.max_commits.unwrap_or(DEFAULT_MAX_COMMITS),
        config.max_releases.unwrap_or(DEFAULT_MAX_RELEASES),
    );
    let concurrency = scan
        .concurrency
        .map(usize::from)
        .or(config.concurrency)
        .unwrap_or(DEFAULT_CONCURRENCY);

    let use_case = ScanComponentsUseCase::new(
        resolver,
        SnapshotStore::new(YamlSnapshotStore::new(), snapshot_file),
        StderrProgressReporter::new(),
        concurrency,
    );
    let response = use_case.execute(ScanRequest::new(repositories)).await?;

    for component in &response.components {
        println!(
            "{:<45} {:<8} {}",
            component.name(),
            component.versioning_selection_mechanism().as_str(),
            component.git_ref()
        );
    }
    for label in &response.unresolved {
        println!("{:<45} {}", label, "unresolved".yellow());
    }

    match &response.outcome {
        SaveOutcome::Inserted(id) => println!(
            "\n📸 Recorded pending snapshot {} in {}",
            id.bold(),
            snapshot_file.display()
        ),
        SaveOutcome::Unchanged => {
            println!("\nNo change since the newest snapshot; nothing recorded")
        }
    }

    Ok(ExitCode::Success)
}

async fn run_test(test: &TestArgs, config: &ConfigFile, snapshot_file: &Path) -> Result<ExitCode> {
    let overrides = config.test_action.clone().unwrap_or_default();
    let action = AnsiblePlaybookAction::new(
        overrides
            .program
            .unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
        overrides
            .playbook
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PLAYBOOK)),
        overrides
            .inventory
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INVENTORY)),
    );

    let use_case = RunTestsUseCase::new(
        SnapshotStore::new(YamlSnapshotStore::new(), snapshot_file),
        action,
    );
    let outcome = use_case
        .run(TestRunRequest::new(test.selector(), test.dry_run))
        .await?;

    match outcome {
        TestRunOutcome::NoPendingSnapshot => {
            println!("No pending snapshot; nothing to test");
            Ok(ExitCode::Success)
        }
        TestRunOutcome::DryRun {
            snapshot_id,
            command,
            variables,
        } => {
            println!("Snapshot: {}", snapshot_id);
            for (key, value) in &variables {
                println!("{}={}", key, value);
            }
            println!("Command:  {}", command);
            Ok(ExitCode::Success)
        }
        TestRunOutcome::Completed { snapshot } => match snapshot.status() {
            SnapshotStatus::Successful => {
                println!("{} snapshot {}", "✅ successful:".green(), snapshot.id());
                Ok(ExitCode::Success)
            }
            _ => {
                println!("{} snapshot {}", "❌ failed:".red(), snapshot.id());
                Ok(ExitCode::TestsFailed)
            }
        },
    }
}

async fn run_tag(tag: &TagArgs, config: &ConfigFile) -> Result<ExitCode> {
    let versions_file = tag
        .versions_file
        .clone()
        .or_else(|| config.versions_file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_VERSIONS_FILE));
    let versions = VersionsFileReader::new().read_versions(&versions_file)?;

    let use_case = ReconcileTagsUseCase::new(github_client(config)?).with_tag_message(
        config
            .tag_message
            .clone()
            .unwrap_or_else(|| DEFAULT_TAG_MESSAGE.to_string()),
    );
    let reports = use_case
        .execute(TagRequest {
            versions,
            only: tag.version.clone(),
            dry_run: tag.dry_run,
        })
        .await?;

    let mut exit_code = ExitCode::Success;
    for report in &reports {
        println!("{}", report.version.bold());
        for repository in &report.ensured {
            println!("  {:<45} exists", repository);
        }
        for repository in &report.created {
            println!("  {:<45} {}", repository, "created".green());
        }
        for repository in &report.would_create {
            println!("  {:<45} {}", repository, "would create".yellow());
        }
        for (repository, reason) in &report.failed {
            println!("  {:<45} {} {}", repository, "failed:".red(), reason);
        }
        if !report.is_success() {
            exit_code = ExitCode::ApplicationError;
        }
    }

    Ok(exit_code)
}
