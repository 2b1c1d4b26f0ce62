use {
    std::{
        fmt::Display,
        future::Future,
        sync::{Arc, Mutex, PoisonError},
    },
    tokio::{signal, sync::watch, task::JoinHandle},
};

/// Why the process is winding down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Running,
    /// SIGINT / SIGTERM or an explicit shutdown request.
    Requested,
    /// A supervised task failed or panicked.
    Fault,
}

impl Exit {
    pub fn code(&self) -> u8 {
        match self {
            Self::Running | Self::Requested => 0,
            Self::Fault => 1,
        }
    }
}

/// Owns the server's lifetime. Background tasks are spawned through it, and
/// any uncaught failure in one of them turns into an orderly drain-then-exit
/// instead of leaving the process running in a half-broken state.
#[derive(Clone)]
pub struct Supervisor {
    exit: Arc<watch::Sender<Exit>>,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Supervisor {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Exit::Running);
        Self {
            exit: Arc::new(tx),
            tasks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Receiver that flips away from `Exit::Running` once shutdown begins.
    pub fn subscribe(&self) -> watch::Receiver<Exit> {
        self.exit.subscribe()
    }

    pub fn state(&self) -> Exit {
        *self.exit.borrow()
    }

    pub fn request_shutdown(&self) {
        self.transition(Exit::Requested);
    }

    pub fn fault(&self, task: &str, error: impl Display) {
        tracing::error!(task, error = %error, "unrecoverable fault, shutting down");
        self.transition(Exit::Fault);
    }

    /// First transition wins: a fault after a requested shutdown does not
    /// change the exit reason, and vice versa.
    fn transition(&self, to: Exit) {
        self.exit.send_if_modified(|current| {
            if *current == Exit::Running {
                *current = to;
                true
            } else {
                false
            }
        });
    }

    pub fn spawn<F, E>(&self, name: &'static str, task: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let inner = tokio::spawn(task);
        let supervisor = self.clone();
        let watcher = tokio::spawn(async move {
            match inner.await {
                Ok(Ok(())) => tracing::debug!(task = name, "supervised task finished"),
                Ok(Err(e)) => supervisor.fault(name, e),
                Err(e) if e.is_panic() => supervisor.fault(name, "task panicked"),
                Err(e) => supervisor.fault(name, e),
            }
        });

        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(watcher);
    }

    /// Resolves when an OS signal arrives or a supervised task faults. Meant
    /// for `axum::serve(..).with_graceful_shutdown(..)`.
    pub async fn wait_for_shutdown(&self) {
        let mut rx = self.subscribe();
        tokio::select! {
            _ = shutdown_signal() => self.request_shutdown(),
            _ = rx.wait_for(|exit| *exit != Exit::Running) => {}
        }
    }

    /// Stops remaining background tasks and reports the final exit reason.
    pub async fn finish(self) -> Exit {
        self.request_shutdown();

        let handles = std::mem::take(
            &mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner),
        );
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "supervisor watcher did not finish cleanly");
            }
        }

        self.state()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
