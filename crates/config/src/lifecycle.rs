//! Boot sequence producing the process configuration
//!
//! ```text
//! Uninitialized -> Loading -> Parsed -> Resolved -> Validated -> Ready
//!        \___________\__________\_________\___________\______-> Aborted
//! ```
//!
//! The sequence never exits the process. The caller decides what to do
//! with an error; the sequence is left in [`BootState::Aborted`].

use crate::env::EnvSnapshot;
use crate::loader::DescriptorLoader;
use crate::publisher::{EnvSink, EnvironmentPublisher, StorageEnvironment};
use crate::resolver::ConfigResolver;
use crate::schema::Configuration;
use crate::validation::{StartupValidator, ValidationReport};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use types::{RegionResolver, Result, S3ProxyError};

/// Boot progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootState {
    Uninitialized,
    Loading,
    Parsed,
    Resolved,
    Validated,
    Ready,
    Aborted,
}

impl BootState {
    pub fn is_terminal(self) -> bool {
        matches!(self, BootState::Ready | BootState::Aborted)
    }
}

/// Result of a successful boot
#[derive(Debug, Clone)]
pub struct ReadyConfig {
    /// The one live configuration, shared read-only
    pub config: Arc<Configuration>,
    /// Storage values for the storage client
    pub storage: StorageEnvironment,
    /// Warnings raised during validation
    pub report: ValidationReport,
}

/// One-shot boot sequence
#[derive(Debug)]
pub struct BootSequence {
    descriptor_path: PathBuf,
    state: BootState,
}

impl BootSequence {
    pub fn new<P: AsRef<Path>>(descriptor_path: P) -> Self {
        Self {
            descriptor_path: descriptor_path.as_ref().to_path_buf(),
            state: BootState::Uninitialized,
        }
    }

    pub fn state(&self) -> BootState {
        self.state
    }

    pub fn descriptor_path(&self) -> &Path {
        &self.descriptor_path
    }

    /// Load, resolve, validate and publish.
    ///
    /// `env` must have been captured before anything was published;
    /// `sink` receives the canonical storage values once validation passed.
    pub async fn run(
        &mut self,
        env: &EnvSnapshot,
        resolver: &dyn RegionResolver,
        sink: &mut dyn EnvSink,
    ) -> Result<ReadyConfig> {
        if self.state != BootState::Uninitialized {
            return Err(S3ProxyError::Boot(format!(
                "boot sequence already ran (state {:?})",
                self.state
            )));
        }

        let result = self.advance(env, resolver, sink).await;
        if result.is_err() {
            self.transition(BootState::Aborted);
        }
        result
    }

    async fn advance(
        &mut self,
        env: &EnvSnapshot,
        resolver: &dyn RegionResolver,
        sink: &mut dyn EnvSink,
    ) -> Result<ReadyConfig> {
        self.transition(BootState::Loading);
        let bytes = DescriptorLoader::load(&self.descriptor_path)?;
        let descriptor = DescriptorLoader::parse(&bytes)?;
        self.transition(BootState::Parsed);

        let config = ConfigResolver::resolve(&descriptor, env);
        self.transition(BootState::Resolved);

        let (config, report) = StartupValidator::validate(config, resolver)
            .await
            .into_ready()?;
        self.transition(BootState::Validated);

        let storage = EnvironmentPublisher::publish(&config, sink);
        self.transition(BootState::Ready);

        Ok(ReadyConfig {
            config: Arc::new(config),
            storage,
            report,
        })
    }

    fn transition(&mut self, next: BootState) {
        debug!(from = ?self.state, to = ?next, "Boot state transition");
        self.state = next;
    }
}
