use punch_client::{CallError, ClockService, Connection, Connector, MemberId};
use std::sync::Arc;

use crate::app::{App, Completion, Effect};
use crate::error::KioskError;
use crate::input::Keys;

use super::completion_queue::{channel, Settled, SettledRx, SettledTx};

/// Runs the [`App`] against a time-clock connection.
///
/// Effects become spawned tasks; their results come back over a channel that
/// is drained once per [`Driver::step`], so the app is only ever touched from
/// the loop that owns the driver.
pub struct Driver<C: Connector> {
    app: App,
    connector: Arc<C>,
    connection: Connection<C::Service>,
    member: MemberId,
    tx: SettledTx<C::Service>,
    rx: SettledRx<C::Service>,
    in_flight: bool,
}

impl<C: Connector> Driver<C> {
    pub fn new(app: App, connector: C, member: MemberId) -> Self {
        let (tx, rx) = channel();
        Self {
            app,
            connector: Arc::new(connector),
            connection: Connection::new(),
            member,
            tx,
            rx,
            in_flight: false,
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Whether a background call has not reported back yet.
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Run one tick. Returns [`KioskError::Terminated`] once the app asks to
    /// shut down.
    pub fn step(&mut self, keys: &Keys) -> Result<(), KioskError> {
        let completions = self.drain();
        match self.app.update(keys, completions) {
            Some(Effect::Shutdown) => Err(KioskError::Terminated),
            Some(effect) => {
                self.dispatch(effect);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Close the connection. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.connection.close();
    }

    fn drain(&mut self) -> Vec<Completion> {
        let mut completions = Vec::new();
        while let Ok(settled) = self.rx.try_recv() {
            self.in_flight = false;
            match settled {
                Settled::Connected(service) => {
                    self.connection.establish(service);
                    completions.push(Completion::Connected);
                }
                Settled::Done(completion) => completions.push(completion),
            }
        }
        completions
    }

    fn dispatch(&mut self, effect: Effect) {
        if self.in_flight {
            tracing::error!(?effect, "call already in flight, not dispatching");
            return;
        }

        debug_assert!(
            effect == Effect::Connect || self.app.screen().is_working(),
            "calls are only issued on entering a working screen"
        );

        let tx = self.tx.clone();
        match effect {
            Effect::Connect => {
                let connector = Arc::clone(&self.connector);
                tokio::spawn(async move {
                    let settled = match connector.connect().await {
                        Ok(service) => Settled::Connected(service),
                        Err(e) => Settled::Done(Completion::ConnectFailed(e.to_string())),
                    };
                    let _ = tx.send(settled);
                });
            }
            Effect::SubmitClock(direction) => {
                let Some(service) = self.connection.service() else {
                    let _ = tx.send(Settled::Done(Completion::ClockFailed(
                        CallError::NotConnected.to_string(),
                    )));
                    self.in_flight = true;
                    return;
                };
                let member = self.member;
                tokio::spawn(async move {
                    let completion = match service.clock(member, direction).await {
                        Ok(reply) => {
                            tracing::info!(?direction, result = %reply.result, "clocked");
                            Completion::Clocked(reply)
                        }
                        Err(e) => Completion::ClockFailed(e.to_string()),
                    };
                    let _ = tx.send(Settled::Done(completion));
                });
            }
            Effect::QueryRecords(range) => {
                let Some(service) = self.connection.service() else {
                    let _ = tx.send(Settled::Done(Completion::QueryFailed(
                        CallError::NotConnected.to_string(),
                    )));
                    self.in_flight = true;
                    return;
                };
                let member = self.member;
                tokio::spawn(async move {
                    let completion = match service.records(member, range).await {
                        Ok(records) => {
                            tracing::info!(?range, count = records.len(), "queried records");
                            Completion::Queried(records)
                        }
                        Err(e) => Completion::QueryFailed(e.to_string()),
                    };
                    let _ = tx.send(Settled::Done(completion));
                });
            }
            Effect::Shutdown => return,
        }
        self.in_flight = true;
    }
}

impl<C: Connector> Drop for Driver<C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
