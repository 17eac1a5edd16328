//! The network switch.
//!
//! Sequence: read the current network, validate the target, ensure archive
//! directories, stop the full node if it is running, swap cache files,
//! rewrite every network-dependent config field, save, then restart the full
//! node if it was stopped. Each step either completes or aborts the switch
//! with the [`SwitchError`] variant for that step.

use std::path::{Path, PathBuf};

use chia_tools_config::{ConfigStore, LeafPolicy};
use chia_tools_rpc::ServiceController;
use chia_tools_types::{NetworkName, ServiceName};

use crate::profile::NetworkProfile;
use crate::relocate::{db_dir, CacheRelocator, RelocateOutcome, CACHE_FILES, CACHE_MARKER};
use crate::SwitchError;

/// What happened to the full node's restart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RestartOutcome {
    /// The node was not running before the switch.
    NotNeeded,
    Restarted,
    /// The switch itself succeeded but the node did not come back.
    Failed(String),
}

/// What happened to the cache files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheRelocation {
    /// Files were swapped; `moved` counts files that existed and moved.
    Performed { moved: usize },
    /// An earlier, interrupted switch to the same target already swapped
    /// them and nothing was left to bring in.
    AlreadyDone,
}

/// Outcome of a successful switch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwitchReport {
    pub previous: NetworkName,
    pub target: NetworkName,
    /// Whether the full node was stopped for the switch.
    pub stopped: bool,
    pub caches: CacheRelocation,
    pub restart: RestartOutcome,
}

/// Switches an installation between networks.
///
/// Owns its collaborators for the duration of the switch; tests reach them
/// through the accessors to inspect what was recorded.
pub struct NetworkSwitch<S, C, R> {
    store: S,
    services: C,
    relocator: R,
    chia_root: PathBuf,
}

impl<S, C, R> NetworkSwitch<S, C, R>
where
    S: ConfigStore,
    C: ServiceController,
    R: CacheRelocator,
{
    pub fn new(store: S, services: C, relocator: R, chia_root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            services,
            relocator,
            chia_root: chia_root.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn services(&self) -> &C {
        &self.services
    }

    pub fn relocator(&self) -> &R {
        &self.relocator
    }

    /// Give back the relocator, e.g. to carry its state into another switch.
    pub fn into_relocator(self) -> R {
        self.relocator
    }

    /// Switch to `target`.
    pub async fn switch(&mut self, target: &str) -> Result<SwitchReport, SwitchError> {
        let target =
            NetworkName::new(target).map_err(|e| SwitchError::InvalidArgument(e.to_string()))?;
        tracing::info!(network = %target, "swapping to network");

        let current = self
            .store
            .document()
            .selected_network()
            .map_err(SwitchError::Config)?;
        tracing::info!(current_network = %current, "discovered current network");

        if current == target {
            return Err(SwitchError::InvalidArgument(format!(
                "current network and new network are both {current}"
            )));
        }

        let db = db_dir(&self.chia_root);
        self.ensure_dir(&db.join(current.as_str()))?;
        self.ensure_dir(&db.join(target.as_str()))?;

        let stopped = self.stop_full_node().await?;

        let caches = self.relocate_caches(&db, &current, &target)?;

        self.apply_profile(&NetworkProfile::resolve(&target))?;

        tracing::debug!("saving config");
        self.store.save().map_err(SwitchError::ConfigSave)?;

        let restart = if stopped {
            self.start_full_node().await
        } else {
            RestartOutcome::NotNeeded
        };

        tracing::info!(previous = %current, network = %target, "complete");
        Ok(SwitchReport {
            previous: current,
            target,
            stopped,
            caches,
            restart,
        })
    }

    fn ensure_dir(&self, path: &Path) -> Result<(), SwitchError> {
        self.relocator
            .ensure_dir(path)
            .map_err(|source| SwitchError::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Stop the full node if it is running. Returns whether it was stopped.
    async fn stop_full_node(&self) -> Result<bool, SwitchError> {
        tracing::debug!("checking if full node is running");
        let running = match self.services.is_running(ServiceName::FullNode).await {
            Ok(running) => running,
            Err(e) if e.is_connection_refused() => {
                tracing::debug!(error = %e, "daemon not reachable, treating full node as stopped");
                false
            }
            Err(e) => return Err(SwitchError::ServiceQuery(e)),
        };
        if !running {
            return Ok(false);
        }

        tracing::info!("stopping full node");
        self.services
            .stop_service(ServiceName::FullNode)
            .await
            .map_err(SwitchError::ServiceStop)?;
        tracing::info!("successfully stopped full node service");
        Ok(true)
    }

    async fn start_full_node(&self) -> RestartOutcome {
        tracing::info!("starting full node");
        match self.services.start_service(ServiceName::FullNode).await {
            Ok(()) => {
                tracing::info!("successfully started full node");
                RestartOutcome::Restarted
            }
            Err(e) => {
                tracing::warn!(error = %e, "error starting full node, start it manually");
                RestartOutcome::Failed(e.to_string())
            }
        }
    }

    /// Archive the active cache files under their owner's directory and bring
    /// in the target's archived files.
    ///
    /// The owner is the network named by the cache marker, or the current
    /// network when there is no marker. The marker is rewritten to the target
    /// as soon as the departing files are archived, so the active slot never
    /// holds files without a known owner. If the marker already names the
    /// target, an earlier switch got at least that far: departures are
    /// skipped and any arriving file still archived is brought in.
    fn relocate_caches(
        &self,
        db: &Path,
        current: &NetworkName,
        target: &NetworkName,
    ) -> Result<CacheRelocation, SwitchError> {
        let marker = self
            .relocator
            .read_marker(db)
            .map_err(|source| SwitchError::CacheRelocation {
                path: db.join(CACHE_MARKER),
                source,
            })?;
        let owner = match marker.map(NetworkName::new) {
            Some(Ok(owner)) => owner,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "ignoring unreadable cache marker");
                current.clone()
            }
            None => current.clone(),
        };
        let arriving = db.join(target.as_str());

        if owner == *target {
            tracing::info!(network = %target, "cache files already belong to the target network, resuming");
            let moved = self.bring_in(db, &arriving)?;
            return Ok(match moved {
                0 => CacheRelocation::AlreadyDone,
                moved => CacheRelocation::Performed { moved },
            });
        }

        let departing = db.join(owner.as_str());
        if owner != *current {
            self.ensure_dir(&departing)?;
        }

        let mut moved = 0;
        for name in CACHE_FILES {
            moved += self.relocate(&db.join(name), &departing.join(name))?;
        }
        self.relocator
            .write_marker(db, target.as_str())
            .map_err(|source| SwitchError::CacheRelocation {
                path: db.join(CACHE_MARKER),
                source,
            })?;
        moved += self.bring_in(db, &arriving)?;
        Ok(CacheRelocation::Performed { moved })
    }

    /// Move each archived file under `arriving` into the active `db/`.
    fn bring_in(&self, db: &Path, arriving: &Path) -> Result<usize, SwitchError> {
        let mut moved = 0;
        for name in CACHE_FILES {
            moved += self.relocate(&arriving.join(name), &db.join(name))?;
        }
        Ok(moved)
    }

    fn relocate(&self, source: &Path, destination: &Path) -> Result<usize, SwitchError> {
        match self.relocator.relocate(source, destination) {
            Ok(RelocateOutcome::Moved) => Ok(1),
            Ok(RelocateOutcome::SourceMissing) => Ok(0),
            Err(source_err) => Err(SwitchError::CacheRelocation {
                path: source.to_path_buf(),
                source: source_err,
            }),
        }
    }

    /// Validate every field against the document, then set them all.
    fn apply_profile(&mut self, profile: &NetworkProfile) -> Result<(), SwitchError> {
        let updates = profile.field_updates().map_err(SwitchError::ConfigField)?;

        let document = self.store.document();
        for (path, value) in &updates {
            document
                .check(path, value, LeafPolicy::MayCreate)
                .map_err(SwitchError::ConfigField)?;
        }

        for (path, value) in updates {
            tracing::debug!(%path, "setting config path");
            self.store
                .set_field(&path, value)
                .map_err(SwitchError::ConfigField)?;
        }
        Ok(())
    }
}
