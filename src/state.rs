//! Form view-state for a front end collecting a [`Config`].
//!
//! The state is a plain value. Each user action is an [`Event`]
//! and [`FormState::apply`] returns the next state, so a UI layer
//! only has to store the latest value and render it.

use crate::config::{Config, DEFAULT_ADMIN_USER, DEFAULT_PROJECT_DIR, Instance};
use crate::script;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SetProjectDir(String),
    SetAcmeEmail(String),
    AddInstance,
    RemoveInstance(usize),
    SetDomain(usize, String),
    SetAdminUser(usize, String),
    Generate,
    Copied,
    CopyReset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub project_dir: String,
    pub acme_email: String,
    pub instances: Vec<Instance>,
    /// Last generated script. Kept when fields change afterwards.
    pub script: Option<String>,
    pub copied: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            project_dir: DEFAULT_PROJECT_DIR.to_string(),
            acme_email: String::new(),
            instances: vec![blank_instance()],
            script: None,
            copied: false,
        }
    }
}

impl FormState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn apply(mut self, event: Event) -> Self {
        match event {
            Event::SetProjectDir(v) => self.project_dir = v,
            Event::SetAcmeEmail(v) => self.acme_email = v,
            Event::AddInstance => self.instances.push(blank_instance()),
            Event::RemoveInstance(i) => {
                if self.instances.len() > 1 && i < self.instances.len() {
                    self.instances.remove(i);
                }
            }
            Event::SetDomain(i, v) => {
                if let Some(inst) = self.instances.get_mut(i) {
                    inst.domain = v;
                }
            }
            Event::SetAdminUser(i, v) => {
                if let Some(inst) = self.instances.get_mut(i) {
                    inst.admin_user = v;
                }
            }
            Event::Generate => {
                if self.is_valid() {
                    self.script = Some(script::compose(&self.config()));
                }
            }
            Event::Copied => self.copied = self.script.is_some(),
            Event::CopyReset => self.copied = false,
        }
        self
    }

    /// Whether the Generate action is enabled.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.project_dir.trim().is_empty()
            && !self.acme_email.trim().is_empty()
            && !self.instances.is_empty()
            && self
                .instances
                .iter()
                .all(|i| !i.domain.trim().is_empty() && !i.admin_user.trim().is_empty())
    }

    /// Snapshot of the current fields, untrimmed.
    #[must_use]
    pub fn config(&self) -> Config {
        Config {
            project_dir: self.project_dir.clone(),
            acme_email: self.acme_email.clone(),
            instances: self.instances.clone(),
        }
    }
}

fn blank_instance() -> Instance {
    Instance::new("", DEFAULT_ADMIN_USER)
}
