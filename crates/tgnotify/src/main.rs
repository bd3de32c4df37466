use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio_util::sync::CancellationToken;

use tgnotify_core::{config::Config, input, poller::Poller, ports::BotApi, shutdown};
use tgnotify_telegram::TelegramClient;

mod cli;

use cli::{Cli, Mode};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = tgnotify_core::logging::init("tgnotify") {
        eprintln!("{e}");
    }

    // Config may export `.env` entries, so it is loaded before the runtime spawns workers.
    let result = prepare(&cli, Config::load).and_then(|(mode, cfg)| {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to start tokio runtime")?;
        rt.block_on(run(mode, cfg, tokio::io::stdin(), tokio::io::stdout()))
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("tgnotify: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Validate arguments, then load config. Argument errors surface before the token is read.
fn prepare(
    cli: &Cli,
    load: impl FnOnce() -> tgnotify_core::Result<Config>,
) -> anyhow::Result<(Mode, Config)> {
    let mode = cli.mode()?;
    let cfg = load()?;
    Ok((mode, cfg))
}

async fn run<R, W>(mode: Mode, cfg: Config, stdin: R, mut stdout: W) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let client = TelegramClient::new(cfg.token.clone(), &cfg.api_url)?;
    let me = client
        .get_me()
        .await
        .context("failed to get bot information; is the token valid and the bot online?")?;
    tracing::info!(
        id = me.id.0,
        "bot identity: @{}",
        me.username.as_deref().unwrap_or(&me.first_name)
    );

    let api: Arc<dyn BotApi> = Arc::new(client);
    match mode {
        Mode::Poll => {
            let token = CancellationToken::new();
            let listener = shutdown::install(token.clone());
            let mut poller = Poller::new(api, cfg.poll.clone(), cfg.backoff, token.clone());
            poller.run().await;
            token.cancel();
            let _ = listener.await;
        }
        Mode::Send(target) => {
            let mut stdin = BufReader::new(stdin);
            let chat_id = match target {
                Some(id) => id,
                None => input::prompt_chat_id(&mut stdin, &mut stdout).await?,
            };

            // A failed send is reported but is not a process failure.
            match input::send_input(api.as_ref(), chat_id, &mut stdin).await {
                Ok(id) => tracing::info!(chat_id = chat_id.0, message_id = id.0, "message sent"),
                Err(e) => tracing::error!(chat_id = chat_id.0, "failed to send message: {e}"),
            }
        }
    }

    Ok(())
}
