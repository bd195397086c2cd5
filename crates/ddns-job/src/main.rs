// # ddns-job - One-shot Route53 DDNS update
//
// A thin integration layer: it parses inputs, sets up logging and the
// runtime, wires the HTTP IP source and the Route53 provider into a
// `DdnsJob`, runs it once and turns the result into an exit code. All DDNS
// logic lives in ddns-core.
//
// ## Configuration
//
// Every flag can also be set through the environment:
//
// - `-z/--zone` (`DDNS_ZONE`): hosted zone name, exactly as Route53 lists it
// - `-d/--domain` (`DDNS_DOMAIN`): fully-qualified record name to update
// - `--ip-url` (`DDNS_IP_SOURCE_URL`): IP-echo endpoint
// - `--region` (`AWS_REGION`), `--profile` (`AWS_PROFILE`)
// - `--endpoint-url` (`DDNS_ROUTE53_ENDPOINT`): Route53 endpoint override
// - `--mode` (`DDNS_MODE`): `live` or `dry-run`; `--dry-run` is a shorthand
// - `--require-ipv4` (`DDNS_REQUIRE_IPV4`)
// - `--log-level` (`DDNS_LOG_LEVEL`)
//
// ## Example
//
// ```bash
// ddns-job -z example.com. -d home.example.com.
// ```

use anyhow::{Context, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use ddns_core::{DdnsJob, JobConfig, JobEvent, JobReport, UpsertOutcome};
use ddns_core::config::DEFAULT_IP_ECHO_URL;
use ddns_ip_http::HttpIpSource;
use ddns_provider_route53::{CredentialProvider, Route53Factory, Route53Settings};
use std::process::ExitCode;
use tokio::sync::mpsc;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Record upserted (or dry-run completed)
/// - 1: Usage or configuration error, before any network activity
/// - 2: Runtime error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// Clean exit
    Success = 0,
    /// Usage or configuration error
    ConfigError = 1,
    /// Runtime error (IP lookup, credentials, zone lookup, upsert)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Whether the change batch is submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum RunMode {
    /// Submit the change batch
    #[default]
    Live,
    /// Resolve everything, log the change batch, submit nothing
    DryRun,
}

#[derive(Debug, Parser)]
#[command(name = "ddns-job")]
#[command(about = "Point a Route53 A record at the current public IP", long_about = None)]
#[command(version)]
struct Cli {
    /// Hosted zone name, as Route53 lists it (e.g. 'example.com.')
    #[arg(short = 'z', long, env = "DDNS_ZONE", value_parser = NonEmptyStringValueParser::new())]
    zone: String,

    /// Fully-qualified domain name to update (e.g. 'home.example.com.')
    #[arg(short = 'd', long, env = "DDNS_DOMAIN", value_parser = NonEmptyStringValueParser::new())]
    domain: String,

    /// IP-echo endpoint returning the public IP as plain text (10 s request timeout)
    #[arg(long, env = "DDNS_IP_SOURCE_URL", default_value = DEFAULT_IP_ECHO_URL)]
    ip_url: String,

    /// AWS region override
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Shared config profile to load credentials from
    #[arg(long, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// Route53 endpoint override (LocalStack, test doubles)
    #[arg(long, env = "DDNS_ROUTE53_ENDPOINT")]
    endpoint_url: Option<String>,

    /// Run mode
    #[arg(long, env = "DDNS_MODE", value_enum, default_value_t = RunMode::Live)]
    mode: RunMode,

    /// Shorthand for --mode dry-run
    #[arg(long)]
    dry_run: bool,

    /// Reject an IP-echo body that is not a well-formed IPv4 address
    #[arg(long, env = "DDNS_REQUIRE_IPV4")]
    require_ipv4: bool,

    /// Log level
    #[arg(
        long,
        env = "DDNS_LOG_LEVEL",
        default_value = "info",
        ignore_case = true,
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    log_level: String,
}

impl Cli {
    fn is_dry_run(&self) -> bool {
        self.dry_run || self.mode == RunMode::DryRun
    }

    fn tracing_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    fn job_config(&self) -> JobConfig {
        JobConfig::new(&self.zone, &self.domain)
            .with_ip_echo_url(&self.ip_url)
            .with_require_ipv4(self.require_ipv4)
    }

    fn credential_provider(&self) -> CredentialProvider {
        match &self.profile {
            Some(profile) => CredentialProvider::Profile(profile.clone()),
            None => CredentialProvider::Ambient,
        }
    }

    fn route53_settings(&self) -> Route53Settings {
        Route53Settings {
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
            dry_run: self.is_dry_run(),
        }
    }
}

/// Map a clap parse failure to an exit code
///
/// Help and version output are not failures.
fn parse_failure_exit_code(kind: ErrorKind) -> DdnsExitCode {
    match kind {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => DdnsExitCode::Success,
        _ => DdnsExitCode::ConfigError,
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = parse_failure_exit_code(e.kind());
            if code == DdnsExitCode::Success {
                let _ = e.print();
            } else {
                eprint!("{}", usage_failure_text(&e));
            }
            return code.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.tracing_level())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let (job, events) = match build_job(&cli) {
        Ok(built) => built,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    finish(rt.block_on(run_job(job, events))).into()
}

/// Render a parse failure, always followed by the usage line
fn usage_failure_text(e: &clap::Error) -> String {
    let message = e.render().to_string();
    if message.contains("Usage:") {
        return message;
    }
    format!("{}\n\n{}\n", message.trim_end(), Cli::command().render_usage())
}

/// Log the outcome of a run and pick the exit code
///
/// A failed run produces exactly one ERROR line, written here.
fn finish(result: ddns_core::Result<JobReport>) -> DdnsExitCode {
    match result {
        Ok(report) => {
            log_report(&report);
            DdnsExitCode::Success
        }
        Err(e) => {
            error!("DDNS job failed ({}): {}", e.kind(), e);
            DdnsExitCode::RuntimeError
        }
    }
}

/// Wire the IP source and the Route53 bootstrap into a job
///
/// Fails only on invalid configuration; nothing touches the network here.
fn build_job(cli: &Cli) -> Result<(DdnsJob, mpsc::Receiver<JobEvent>)> {
    let config = cli.job_config();
    config.validate().context("invalid job configuration")?;

    let ip_source =
        HttpIpSource::new(&config.ip_echo_url).context("failed to build the IP-echo client")?;
    let factory = Route53Factory::new(cli.credential_provider(), cli.route53_settings());

    let (job, events) = DdnsJob::new(Box::new(ip_source), Box::new(factory), config)?;
    Ok((job, events))
}

/// Run the job once, then flush its events to the debug log
async fn run_job(
    job: DdnsJob,
    mut events: mpsc::Receiver<JobEvent>,
) -> ddns_core::Result<JobReport> {
    let result = job.run().await;

    while let Ok(event) = events.try_recv() {
        debug!("Job event: {:?}", event);
    }

    result
}

fn log_report(report: &JobReport) {
    match &report.outcome {
        UpsertOutcome::Submitted(receipt) => info!(
            "{} -> {} in {} (change {} is {})",
            report.domain_name, report.ip, report.zone.id, receipt.change_id, receipt.status
        ),
        UpsertOutcome::DryRun => info!(
            "[DRY-RUN] {} -> {} in {} not submitted",
            report.domain_name, report.ip, report.zone.id
        ),
    }
}
