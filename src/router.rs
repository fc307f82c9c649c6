//! Validation and dispatch of UI action requests
//!
//! Every request either produces a success response or an `{error}` response;
//! no failure escapes [`ActionRouter::handle`]. Requests are handled
//! independently, so two in-flight requests against the same tab race at the
//! host and the host alone decides the final state.

use log::{debug, error, warn};
use serde_json::Value;

use crate::config::Config;
use crate::error::RouterError;
use crate::host::{APPEND_INDEX, BrowserHost};
use crate::protocol::{Action, ActionResponse, MessageSender};
use crate::snapshot::{TabId, WindowId, WindowSnapshot};

pub struct ActionRouter<H> {
    host: H,
    extension_id: String,
    max_action_len: usize,
}

impl<H: BrowserHost> ActionRouter<H> {
    pub fn new(host: H, extension_id: impl Into<String>, config: &Config) -> Self {
        ActionRouter {
            host,
            extension_id: extension_id.into(),
            max_action_len: config.max_action_len,
        }
    }

    /// Answer one runtime message
    pub async fn handle(&self, message: &Value, sender: &MessageSender) -> ActionResponse {
        match self.dispatch(message, sender).await {
            Ok(response) => response,
            Err(err) => ActionResponse::failure(&err),
        }
    }

    /// Validate, authorize, parse and run a request
    pub async fn dispatch(
        &self,
        message: &Value,
        sender: &MessageSender,
    ) -> Result<ActionResponse, RouterError> {
        let name = match self.action_name(message) {
            Some(name) => name,
            None => {
                warn!("Invalid message received: {}", message);
                return Err(RouterError::InvalidRequest);
            }
        };

        if sender.id.as_deref() != Some(self.extension_id.as_str()) {
            warn!("Unauthorized sender: {:?}", sender);
            return Err(RouterError::UnauthorizedSender);
        }

        let action = Action::parse(name, message.get("data")).inspect_err(|e| {
            warn!("Rejected {} request: {}", name, e);
        })?;

        debug!("Dispatching {:?}", action);
        self.execute(action).await.inspect_err(|e| {
            if let RouterError::HostApi(host_err) = e {
                error!("{} failed: {}", name, host_err);
            }
        })
    }

    /// The `action` field, if the message is an object with a sane one
    fn action_name<'a>(&self, message: &'a Value) -> Option<&'a str> {
        let name = message.as_object()?.get("action")?.as_str()?;
        let len = name.chars().count();
        (len > 0 && len <= self.max_action_len).then_some(name)
    }

    async fn execute(&self, action: Action) -> Result<ActionResponse, RouterError> {
        match action {
            Action::ListAll => self.list_all().await.map(ActionResponse::with_windows),
            Action::CloseTab { tab_id } => {
                self.host.remove_tab(tab_id).await?;
                Ok(ActionResponse::ok())
            }
            Action::CloseWindow { window_id } => {
                self.host.remove_window(window_id).await?;
                Ok(ActionResponse::ok())
            }
            Action::MoveTab {
                tab_id,
                window_id,
                index,
            } => {
                self.host
                    .move_tab(tab_id, window_id, index.unwrap_or(APPEND_INDEX))
                    .await?;
                Ok(ActionResponse::ok())
            }
            Action::FocusWindow { window_id } => {
                self.host.focus_window(window_id).await?;
                Ok(ActionResponse::ok())
            }
            Action::FocusTab { tab_id } => {
                self.focus_tab(tab_id).await?;
                Ok(ActionResponse::ok())
            }
        }
    }

    async fn list_all(&self) -> Result<Vec<WindowSnapshot>, RouterError> {
        let windows = self.host.get_all_windows().await?;
        Ok(windows.into_iter().map(WindowSnapshot::from).collect())
    }

    /// Activate the tab, then focus whichever window holds it now.
    ///
    /// The owning window is read after activation; a `move-tab` landing in
    /// between can leave the previous window focused.
    async fn focus_tab(&self, tab_id: TabId) -> Result<WindowId, RouterError> {
        self.host.activate_tab(tab_id).await?;
        let tab = self.host.get_tab(tab_id).await?;
        self.host.focus_window(tab.window_id).await?;
        Ok(tab.window_id)
    }
}
