use clap::Parser;
use futures::{AsyncWriteExt, FutureExt};
use rustyline_async::{Readline, SharedWriter};
use tokio::select;
use tokio_util::sync::CancellationToken;

use crate::client::{self, ChannelCommandSink};
use crate::mission::{MissionRequest, MissionResponse};

#[derive(Parser, Debug)]
#[clap(setting(clap::AppSettings::NoBinaryName))]
#[clap(rename_all = "kebab-case")]
enum Commands {
    #[clap(subcommand)]
    #[clap(name = "mission")]
    Mission(MissionRequest),
    Exit,
}

pub async fn run_interactive_cli(
    mut editor: Readline,
    mut stdout: SharedWriter,
    mission_cmd_tx: Option<ChannelCommandSink<MissionRequest, MissionResponse>>,
    cancellation_token: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        select! {
            _ = cancellation_token.cancelled() => {
                break;
            }
            result = editor.readline().fuse() => {
                match result {
                    Ok(line) => {
                        stdout.write_all(format!("riser> {}\n", line).as_bytes()).await?;

                        let request: Result<Commands, _> = Parser::try_parse_from(line.split_ascii_whitespace());

                        let request = match request {
                            Ok(request) => request,
                            Err(err) => {
                                stdout.write_all(err.to_string().as_bytes()).await?;
                                continue;
                            },
                        };

                        editor.add_history_entry(line);

                        match request {
                            Commands::Mission(request) => {
                                if let Some(mission_cmd_tx) = &mission_cmd_tx {
                                    match client::command(mission_cmd_tx, request).await {
                                        Ok(response) => info!("{:?}", response),
                                        Err(err) => error!("{:#}", err),
                                    };
                                } else {
                                    error!("mission task is not running");
                                }
                            }

                            Commands::Exit => {
                                info!("exiting");
                                cancellation_token.cancel();
                            }
                        };
                    }
                    Err(err) => {
                        error!("interactive error: {:#?}", err);
                        break;
                    }
                };
            }
        }
    }

    cancellation_token.cancel();

    Ok(())
}
