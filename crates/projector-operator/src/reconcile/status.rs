//! Status reporting on managed project records.

use projector_core::project::CONDITION_READY;
use projector_core::{Condition, ConditionStatus, ManagedProject, Phase, Timestamp, now_utc};
use projector_storage::{DynStore, ResourceKind};
use tracing::{debug, warn};

pub struct StatusReporter {
    store: DynStore,
}

impl StatusReporter {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    /// Records the outcome on `project` and writes its status.
    ///
    /// Write failures are logged and swallowed; the next pass reports again.
    pub async fn report(
        &self,
        project: &mut ManagedProject,
        phase: Phase,
        message: impl Into<String>,
        rendered_yaml: String,
    ) {
        apply_status(project, phase, message.into(), rendered_yaml, now_utc());

        let target = project.object_ref();
        let value = match project.to_value() {
            Ok(value) => value,
            Err(err) => {
                warn!(project = %target, error = %err, "Failed to encode status");
                return;
            }
        };
        match self
            .store
            .update_status(&ResourceKind::MANAGED_PROJECT, &value)
            .await
        {
            Ok(stored) => {
                project.metadata.resource_version = stored.meta.resource_version;
                debug!(project = %target, phase = %phase, "Status updated");
            }
            Err(err) => {
                warn!(
                    project = %target,
                    phase = %phase,
                    error = %err,
                    category = %err.category(),
                    "Failed to update status"
                );
            }
        }
    }
}

/// Sets the status fields for `phase` on `project`.
///
/// `lastSyncTime` only moves when the phase is Ready. The single Ready
/// condition is replaced in place, or appended when missing.
pub fn apply_status(
    project: &mut ManagedProject,
    phase: Phase,
    message: String,
    rendered_yaml: String,
    now: Timestamp,
) {
    let generation = project.generation();
    let project_name = project.spec.project_name.clone();
    let status = project.status_mut();

    status.phase = Some(phase);
    status.project_name = project_name;
    status.observed_generation = generation;
    status.rendered_yaml = rendered_yaml;
    if phase == Phase::Ready {
        status.last_sync_time = Some(now);
    }

    status.upsert_condition(Condition {
        condition_type: CONDITION_READY.to_string(),
        status: if phase == Phase::Ready {
            ConditionStatus::True
        } else {
            ConditionStatus::False
        },
        observed_generation: generation,
        last_transition_time: now,
        reason: phase.to_string(),
        message,
    });
}
