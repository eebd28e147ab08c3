use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::core::config::Settings;
use crate::core::generation::TextGenerator;
use crate::utils::logging::LoggingState;

/// Everything the app needs to reach the backend, fixed for the session.
pub struct SessionContext {
    pub generator: Arc<dyn TextGenerator>,
    pub model: String,
    pub host: String,
    pub logging: LoggingState,
    pub request_cancel_token: Option<CancellationToken>,
}

impl SessionContext {
    pub fn new(settings: &Settings, generator: Arc<dyn TextGenerator>, logging: LoggingState) -> Self {
        Self {
            generator,
            model: settings.model.clone(),
            host: settings.host.clone(),
            logging,
            request_cancel_token: None,
        }
    }

    /// Hand out a fresh token for the next request, replacing any previous one.
    pub fn issue_cancel_token(&mut self) -> CancellationToken {
        let token = CancellationToken::new();
        self.request_cancel_token = Some(token.clone());
        token
    }

    pub fn cancel_current_request(&mut self) {
        if let Some(token) = self.request_cancel_token.take() {
            token.cancel();
        }
    }
}
