use anyhow::Context;
use clap::Parser;
use ctrlc;
use rustyline_async::{Readline, SharedWriter};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::metadata::LevelFilter;
use tracing_subscriber::{filter::Targets, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::cli::interactive::run_interactive_cli;
use crate::client::Task;

#[macro_use]
extern crate tracing;

mod cli;
mod client;
mod config;
mod mission;
mod planner;
mod telemetry;
mod types;
mod vehicle;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    // setup colorful backtraces
    color_backtrace::install();

    // set up logging and interactive line editor
    let (editor, stdout) =
        Readline::new("riser> ".into()).context("failed to create interactive editor")?;

    let mut targets = tracing_subscriber::filter::Targets::new();

    if let Ok(directives) = std::env::var("RUST_LOG") {
        for directive in directives.split(',') {
            if let Some((target, level)) = directive.split_once('=') {
                targets = targets.with_target(
                    target,
                    level.parse::<LevelFilter>().context("invalid log level")?,
                );
            } else {
                targets = targets.with_default(
                    directive
                        .parse::<LevelFilter>()
                        .context("invalid log level")?,
                );
            }
        }
    }

    let (writer, _guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::hourly("logs", "riser-system"));

    tracing_subscriber::registry()
        // writer that outputs to console
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer({
                    let stdout = stdout.clone();
                    move || stdout.clone()
                })
                .with_filter(targets),
        )
        // writer that outputs to files
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(
                    Targets::new().with_targets(vec![("riser_system", LevelFilter::DEBUG)]),
                ),
        )
        .init();

    let main_args: cli::args::MainArgs = cli::args::MainArgs::parse();

    debug!("reading config from {:?}", &main_args.config);
    let config = crate::config::RiserSystemConfig::read_from_path(&main_args.config)
        .context("failed to read config file")?;

    run_tasks(config, editor, stdout).await
}

async fn run_tasks(
    config: crate::config::RiserSystemConfig,
    editor: Readline,
    stdout: SharedWriter,
) -> anyhow::Result<()> {
    let cancellation_token = CancellationToken::new();

    ctrlc::set_handler({
        let cancellation_token = cancellation_token.clone();
        move || {
            info!("received interrupt, shutting down");
            cancellation_token.cancel();
        }
    })
    .expect("could not set ctrl+c handler");

    let mut tasks = Vec::<Box<dyn Task>>::new();

    let vehicle = match config.vehicle {
        Some(c) => {
            debug!("initializing vehicle task");
            let vehicle_task =
                vehicle::create_task(c).context("failed to initialize vehicle task")?;
            let handles = (vehicle_task.events(), vehicle_task.cmd());
            tasks.push(Box::new(vehicle_task));
            Some(handles)
        }
        None => None,
    };

    let (vehicle_evt_rx, vehicle_cmd_tx) = match vehicle {
        Some((evt_rx, cmd_tx)) => (Some(evt_rx), Some(cmd_tx)),
        None => (None, None),
    };

    debug!("initializing telemetry task");
    let telem_task = telemetry::create_task(vehicle_evt_rx)
        .context("failed to initialize telemetry task")?;
    let telem_rx = telem_task.telemetry();
    tasks.push(Box::new(telem_task));

    let mission_cmd_tx = if let Some(vehicle_cmd_tx) = vehicle_cmd_tx {
        debug!("initializing mission task");
        let mission_task = mission::create_task(config.mission, telem_rx, vehicle_cmd_tx)
            .context("failed to initialize mission task")?;
        let mission_cmd_tx = mission_task.cmd();
        tasks.push(Box::new(mission_task));
        Some(mission_cmd_tx)
    } else {
        warn!("no vehicle configured, mission control is unavailable");
        None
    };

    let mut join_set = JoinSet::new();

    join_set.spawn(run_interactive_cli(
        editor,
        stdout,
        mission_cmd_tx,
        cancellation_token.clone(),
    ));

    for task in tasks {
        debug!("starting {} task", task.name());
        join_set.spawn(task.run(cancellation_token.clone()));
    }

    while let Some(res) = join_set.join_next().await {
        // if task panicked, then will be Some(Err)
        // if task terminated w/ error, then will be Some(Ok(Err))
        // need to propagate errors in both cases

        match res {
            Err(err) => {
                cancellation_token.cancel();
                return Err(err).context("task failed");
            }
            Ok(Err(err)) => {
                cancellation_token.cancel();
                return Err(err).context("task terminated with error");
            }
            _ => {
                info!("exited task");
            }
        }
    }

    Ok(())
}
