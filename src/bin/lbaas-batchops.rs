//! # LBaaS Batch Operations
//!
//! Expands a templated control-plane command over its variable values and
//! runs the resulting commands one by one, waiting for the load balancer to
//! settle before each of them. On completion or on an interrupting signal the
//! records gathered so far are written and summarised, and the process exits 0.

use lbaas_batchops::cli::{usage, Invocation};
use lbaas_batchops::command::{check_credentials, resolve_binary};
use lbaas_batchops::config::ConfigLoader;
use lbaas_batchops::database::{DatabaseConnection, ProvisioningStatusLookup};
use lbaas_batchops::logging::init_tracing;
use lbaas_batchops::orchestration::{
    print_summary, BatchOrchestrator, BatchPlan, ExecutionLog, OrchestratorSettings, ReportWriter,
};
use lbaas_batchops::readiness::{
    CliStatusProbe, DatabaseStatusProbe, GatePolicy, ReadinessGate, StatusProbe,
};
use lbaas_batchops::{
    BatchError, CommandExecutor, CommandTemplate, ProcessRunner, Result, VariableSet,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let invocation = match Invocation::parse_from(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(BatchError::MissingCommandTemplate) => {
            let program = std::env::args_os()
                .next()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|| "lbaas-batchops".to_string());
            eprint!("{}", usage(&program));
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };

    init_tracing(invocation.args.verbose);

    if let Err(e) = run(invocation).await {
        if e.is_startup_error() {
            error!(error = %e, "Startup failed, no command was run");
        } else {
            error!(error = %e, "Batch failed");
        }
        return Err(e.into());
    }
    Ok(())
}

async fn run(invocation: Invocation) -> Result<()> {
    let mut config = ConfigLoader::load(invocation.args.config.as_deref())?;
    invocation.args.apply_to(&mut config);
    config.validate()?;
    if config.database.is_partial() {
        warn!("Database parameters are incomplete; reading status through the control-plane CLI");
    }
    info!(config = ?config.sanitized(), "Configuration resolved");

    let mut writer = ReportWriter::open(config.output_target())?;
    info!(output = %config.output_path, "Results will be written");

    check_credentials(&config.control_plane.credential_env_var)?;
    let binary_path = resolve_binary(&config.control_plane.binary)?;
    info!(binary = %binary_path.display(), "Control-plane command resolved");

    let template =
        CommandTemplate::from_tokens(&config.control_plane.binary, &invocation.template_tokens);
    info!(template = %template, "Command template");
    let variables = VariableSet::from_assignments(&template, &invocation.assignments)?;
    for (name, values) in variables.iter() {
        info!(variable = %name, values = ?values, "Variable parsed");
    }
    let plan = BatchPlan::build(&template, &variables, config.check_lb.as_str());

    let runner = ProcessRunner::new(config.control_plane.command_timeout())
        .with_format_args(config.control_plane.output_format_args.clone());
    info!(
        timeout_secs = runner.timeout().as_secs(),
        "Commands run with a hard timeout"
    );
    let executor: Arc<dyn CommandExecutor> = Arc::new(runner);

    let database = if config.database.is_complete() {
        let connection = DatabaseConnection::connect(&config.database).await?;
        if !connection.health_check().await? {
            warn!("Status database answered the health check unexpectedly");
        }
        Some(connection)
    } else {
        None
    };

    let probe: Arc<dyn StatusProbe> = match &database {
        Some(connection) => Arc::new(DatabaseStatusProbe::new(ProvisioningStatusLookup::new(
            connection.pool().clone(),
        ))),
        None => Arc::new(CliStatusProbe::new(
            executor.clone(),
            config.control_plane.binary.clone(),
        )),
    };
    info!(probe = probe.description(), "Status probe selected");

    let poll_interval = config.readiness.poll_interval();
    let gate = ReadinessGate::new(
        probe,
        GatePolicy::pre_check(config.readiness.max_check_times, poll_interval),
        GatePolicy::post_check(poll_interval),
    );

    let log = ExecutionLog::new();
    let orchestrator = BatchOrchestrator::new(
        executor,
        gate,
        log.clone(),
        OrchestratorSettings::from(&config),
    );

    let abort = tokio::select! {
        outcome = orchestrator.run(&plan) => {
            if let Some(abort) = &outcome.abort {
                error!("{}", BatchError::from(abort.clone()));
            }
            outcome.abort
        }
        _ = shutdown_signal() => {
            info!(
                output = %config.output_path,
                records = log.len(),
                "Signal received, quit. Partial results are output"
            );
            None
        }
    };

    let records = log.snapshot();
    writer.write_records(&records)?;
    print_summary(&records, abort.as_ref())?;

    if let Some(connection) = database {
        connection.close().await;
    }

    Ok(())
}

/// Resolves on interrupt, hangup, terminate or quit
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C"),
            Err(e) => {
                warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let (hangup, terminate, quit) = {
        use signal::unix::SignalKind;
        (
            unix_signal(SignalKind::hangup(), "SIGHUP"),
            unix_signal(SignalKind::terminate(), "SIGTERM"),
            unix_signal(SignalKind::quit(), "SIGQUIT"),
        )
    };

    #[cfg(not(unix))]
    let (hangup, terminate, quit) = (
        std::future::pending::<()>(),
        std::future::pending::<()>(),
        std::future::pending::<()>(),
    );

    tokio::select! {
        _ = ctrl_c => {},
        _ = hangup => {},
        _ = terminate => {},
        _ = quit => {},
    }
}

#[cfg(unix)]
async fn unix_signal(kind: signal::unix::SignalKind, name: &'static str) {
    match signal::unix::signal(kind) {
        Ok(mut stream) => {
            stream.recv().await;
            info!(signal = name, "Received signal");
        }
        Err(e) => {
            warn!(signal = name, error = %e, "Failed to install signal handler");
            std::future::pending::<()>().await;
        }
    }
}
