//! Install-to-home-screen bridge.
//!
//! Platforms that support a native install prompt hand us a deferred prompt
//! when installation becomes available. When the user asks to install we
//! either show that prompt or fall back to manual instructions. Nothing else
//! in the crate depends on the outcome.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum InstallResult {
    /// The native prompt was shown and the user answered.
    Prompted { outcome: InstallOutcome },
    /// No native prompt available; manual instructions are now visible.
    ShowInstructions,
}

pub type PromptFuture = Pin<Box<dyn Future<Output = InstallOutcome> + Send>>;

/// A platform-supplied, single-use native install prompt.
pub trait DeferredPrompt: Send {
    /// Show the prompt and resolve with the user's choice.
    fn prompt(self: Box<Self>) -> PromptFuture;
}

/// One step of the manual install instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InstallStep {
    pub action: &'static str,
    pub target: &'static str,
}

const MANUAL_STEPS: [InstallStep; 2] = [
    InstallStep {
        action: "Tap the browser's",
        target: "Share",
    },
    InstallStep {
        action: "Choose",
        target: "Add to Home Screen",
    },
];

#[derive(Default)]
pub struct InstallBridge {
    deferred: Option<Box<dyn DeferredPrompt>>,
    instructions_visible: bool,
}

impl std::fmt::Debug for InstallBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallBridge")
            .field("prompt_available", &self.deferred.is_some())
            .field("instructions_visible", &self.instructions_visible)
            .finish()
    }
}

impl InstallBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// The platform signalled that a native prompt can be shown.
    /// A newer prompt replaces an older unused one.
    pub fn on_install_available(&mut self, prompt: Box<dyn DeferredPrompt>) {
        self.deferred = Some(prompt);
    }

    pub fn prompt_available(&self) -> bool {
        self.deferred.is_some()
    }

    /// Handle the user's install request.
    ///
    /// A deferred prompt is consumed whatever the user answers.
    pub async fn request_install(&mut self) -> InstallResult {
        match self.deferred.take() {
            Some(prompt) => {
                let outcome = prompt.prompt().await;
                if outcome == InstallOutcome::Accepted {
                    tracing::info!("install accepted");
                }
                InstallResult::Prompted { outcome }
            }
            None => {
                self.instructions_visible = true;
                InstallResult::ShowInstructions
            }
        }
    }

    pub fn instructions_visible(&self) -> bool {
        self.instructions_visible
    }

    pub fn dismiss_instructions(&mut self) {
        self.instructions_visible = false;
    }

    pub fn instructions() -> &'static [InstallStep] {
        &MANUAL_STEPS
    }
}
