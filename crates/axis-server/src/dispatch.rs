use axis_backend::FunctionsClient;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Outcome of one background loop trigger, delivered on the dispatcher's
/// completion channel.
#[derive(Debug)]
pub struct LoopCompletion {
    pub dispatch_id: Uuid,
    pub role_id: Uuid,
    pub result: Result<(), String>,
}

/// Explicit fire-and-forget dispatcher for role autonomous-loop triggers.
///
/// The tick must not block on reasoning calls that can take tens of
/// seconds, but "fire and forget" here is observable: every dispatch gets
/// a logged id, and every completion (success or failure) is logged and
/// emitted on the channel returned by [`LoopDispatcher::new`]. A failed
/// trigger is not retried within the tick; the next scheduled tick picks
/// the role up again.
#[derive(Clone)]
pub struct LoopDispatcher {
    functions: FunctionsClient,
    completions: mpsc::UnboundedSender<LoopCompletion>,
}

impl LoopDispatcher {
    pub fn new(functions: FunctionsClient) -> (Self, mpsc::UnboundedReceiver<LoopCompletion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                functions,
                completions: tx,
            },
            rx,
        )
    }

    /// Spawn the trigger and return immediately with its dispatch id.
    pub fn dispatch(&self, role_id: Uuid) -> Uuid {
        let dispatch_id = Uuid::new_v4();
        let functions = self.functions.clone();
        let completions = self.completions.clone();

        tracing::info!(%dispatch_id, %role_id, "dispatching autonomous loop");
        tokio::spawn(async move {
            let result = functions
                .trigger_role_loop(role_id)
                .await
                .map_err(|e| e.to_string());
            match &result {
                Ok(()) => tracing::info!(%dispatch_id, %role_id, "loop trigger completed"),
                Err(e) => {
                    tracing::warn!(%dispatch_id, %role_id, error = %e, "loop trigger failed")
                }
            }
            // Receiver may be gone (server drains lazily); that only
            // loses observability, never correctness.
            let _ = completions.send(LoopCompletion {
                dispatch_id,
                role_id,
                result,
            });
        });
        dispatch_id
    }
}

/// Drain completions into the log. Spawned by `serve` so the channel
/// never backs up in production.
pub async fn drain_completions(mut rx: mpsc::UnboundedReceiver<LoopCompletion>) {
    while let Some(completion) = rx.recv().await {
        tracing::debug!(
            dispatch_id = %completion.dispatch_id,
            role_id = %completion.role_id,
            ok = completion.result.is_ok(),
            "loop completion drained"
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
