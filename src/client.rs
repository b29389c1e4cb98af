use async_trait::async_trait;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// A long-running unit of the system, driven until cancellation.
#[async_trait]
pub trait Task {
    fn name(&self) -> &'static str;

    async fn run(self: Box<Self>, cancel: CancellationToken) -> anyhow::Result<()>;
}

pub type Command<Req, Res> = (Req, oneshot::Sender<anyhow::Result<Res>>);
pub type ChannelCommandSink<Req, Res> = flume::Sender<Command<Req, Res>>;
pub type ChannelCommandSource<Req, Res> = flume::Receiver<Command<Req, Res>>;

/// Sends a request down a command channel and waits for the reply.
pub async fn command<Req: Send, Res: Send>(
    sink: &ChannelCommandSink<Req, Res>,
    request: Req,
) -> anyhow::Result<Res> {
    let (tx, rx) = oneshot::channel();
    if let Err(_) = sink.send_async((request, tx)).await {
        anyhow::bail!("could not send command");
    }
    rx.await?
}
