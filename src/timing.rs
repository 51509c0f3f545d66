//! Trailing-edge debounce and throttle driven by tokio timers.
//!
//! Both handles forward values to an async handler running on a spawned task.
//! Dropping the handle stops the task; a value still pending at that point is
//! discarded. Handler runs never overlap.

use std::{future::Future, time::Duration};

use tokio::{
    sync::{mpsc, oneshot},
    time::{Instant, sleep_until},
};

enum Command<T> {
    Call(T),
    Cancel,
    Shutdown(oneshot::Sender<()>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Every call pushes the deadline back.
    Debounce,
    /// The first call fixes the deadline, later calls only swap the value.
    Throttle,
}

#[derive(Debug)]
struct Pacer<T> {
    commands: mpsc::UnboundedSender<Command<T>>,
}

impl<T: Send + 'static> Pacer<T> {
    fn spawn<F, Fut>(mode: Mode, wait: Duration, mut handler: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (commands, mut rx) = mpsc::unbounded_channel::<Command<T>>();

        tokio::spawn(async move {
            let mut pending: Option<(T, Instant)> = None;
            loop {
                let deadline = pending.as_ref().map(|(_, at)| *at);
                let wake = deadline.unwrap_or_else(Instant::now);
                tokio::select! {
                    command = rx.recv() => match command {
                        Some(Command::Call(value)) => {
                            let at = match (&pending, mode) {
                                (Some((_, at)), Mode::Throttle) => *at,
                                _ => Instant::now() + wait,
                            };
                            pending = Some((value, at));
                        }
                        Some(Command::Cancel) => pending = None,
                        Some(Command::Shutdown(done)) => {
                            let _ = done.send(());
                            break;
                        }
                        None => break,
                    },
                    _ = sleep_until(wake), if deadline.is_some() => {
                        if let Some((value, _)) = pending.take() {
                            handler(value).await;
                        }
                    }
                }
            }
        });

        Self { commands }
    }

    fn call(&self, value: T) {
        // The task only goes away with the runtime.
        let _ = self.commands.send(Command::Call(value));
    }

    fn cancel(&self) {
        let _ = self.commands.send(Command::Cancel);
    }

    async fn shutdown(&self) {
        let (done, finished) = oneshot::channel();
        if self.commands.send(Command::Shutdown(done)).is_ok() {
            // An error means the task already stopped.
            let _ = finished.await;
        }
    }
}

/// Delivers the last value once `wait` has passed without another call.
#[derive(Debug)]
pub struct Debounce<T> {
    pacer: Pacer<T>,
}

impl<T: Send + 'static> Debounce<T> {
    /// Must be called from within a tokio runtime.
    pub fn new<F, Fut>(wait: Duration, handler: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            pacer: Pacer::spawn(Mode::Debounce, wait, handler),
        }
    }

    pub fn call(&self, value: T) {
        self.pacer.call(value);
    }

    pub fn cancel(&self) {
        self.pacer.cancel();
    }
}

/// Delivers the latest value at most once per `wait`, on the trailing edge.
#[derive(Debug)]
pub struct Throttle<T> {
    pacer: Pacer<T>,
}

impl<T: Send + 'static> Throttle<T> {
    /// Must be called from within a tokio runtime.
    pub fn new<F, Fut>(wait: Duration, handler: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            pacer: Pacer::spawn(Mode::Throttle, wait, handler),
        }
    }

    pub fn call(&self, value: T) {
        self.pacer.call(value);
    }

    pub fn cancel(&self) {
        self.pacer.cancel();
    }

    /// Drops the pending value and stops the task once a handler already in
    /// progress has returned. Later calls are ignored.
    pub async fn shutdown(&self) {
        self.pacer.shutdown().await;
    }
}
