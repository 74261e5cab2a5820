use punch_client::ClockService;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::app::Completion;

/// Message from a background call back to the driver.
pub(super) enum Settled<S> {
    Connected(S),
    Done(Completion),
}

pub(super) type SettledTx<S> = UnboundedSender<Settled<S>>;
pub(super) type SettledRx<S> = UnboundedReceiver<Settled<S>>;

pub(super) fn channel<S: ClockService>() -> (SettledTx<S>, SettledRx<S>) {
    mpsc::unbounded_channel()
}

