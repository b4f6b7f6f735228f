use std::sync::Arc;

use axis_backend::{BackendClient, FunctionsClient};
use axis_core::config::Config;
use tokio::sync::mpsc;

use crate::dispatch::{LoopCompletion, LoopDispatcher};
use crate::lease::TickLeases;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: BackendClient,
    pub functions: FunctionsClient,
    pub dispatcher: LoopDispatcher,
    pub leases: TickLeases,
}

impl AppState {
    /// Build the state and hand back the dispatcher's completion stream;
    /// the caller decides whether to drain it into logs (`serve`) or
    /// inspect it (tests).
    pub fn new(config: Config) -> (Self, mpsc::UnboundedReceiver<LoopCompletion>) {
        let backend = BackendClient::new(
            config.backend.url.as_str(),
            config.backend.service_role_key.as_str(),
        );
        let functions = FunctionsClient::new(
            config.backend.functions_url(),
            config.backend.service_role_key.as_str(),
        );
        let (dispatcher, completions) = LoopDispatcher::new(functions.clone());
        (
            Self {
                config: Arc::new(config),
                backend,
                functions,
                dispatcher,
                leases: TickLeases::new(),
            },
            completions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axis_core::config::{BackendConfig, ServerConfig};

    #[test]
    fn state_derives_functions_url_from_backend() {
        let config = Config {
            backend: BackendConfig {
                url: "https://acme.backend.example".into(),
                service_role_key: "0123456789abcdef0123456789abcdef".into(),
                functions_url: None,
            },
            server: ServerConfig::default(),
        };
        let (state, _rx) = AppState::new(config);
        assert_eq!(
            state.config.backend.functions_url(),
            "https://acme.backend.example/functions/v1"
        );
    }
}
