use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::{FitnessGoal, NutritionTargets, UserProfile};
use crate::events::{EventRegistry, StoreEvent};

/// Last known profile, goal and targets, persisted under
/// `nutrition-storage` so screens have something to show before the first
/// fetch completes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NutritionSnapshot {
    pub profile: Option<UserProfile>,
    pub fitness_goal: Option<FitnessGoal>,
    pub targets: Option<NutritionTargets>,
}

/// Shared handle to the nutrition state. Clones observe the same state.
#[derive(Clone)]
pub struct NutritionStore {
    state: Arc<RwLock<NutritionSnapshot>>,
    events: Arc<EventRegistry>,
}

impl NutritionStore {
    pub fn new(events: Arc<EventRegistry>) -> Self {
        Self {
            state: Arc::new(RwLock::new(NutritionSnapshot::default())),
            events,
        }
    }

    pub async fn set_profile(&self, profile: UserProfile) {
        self.update(|state| state.profile = Some(profile)).await;
    }

    pub async fn set_fitness_goal(&self, goal: FitnessGoal) {
        self.update(|state| state.fitness_goal = Some(goal)).await;
    }

    pub async fn set_targets(&self, targets: NutritionTargets) {
        self.update(|state| state.targets = Some(targets)).await;
    }

    pub async fn clear(&self) {
        self.update(|state| *state = NutritionSnapshot::default())
            .await;
    }

    /// Loads persisted state at startup without emitting an event.
    pub(crate) fn hydrate(&self, snapshot: NutritionSnapshot) {
        *self.write() = snapshot;
    }

    pub fn snapshot(&self) -> NutritionSnapshot {
        self.read().clone()
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.read().profile.clone()
    }

    pub fn fitness_goal(&self) -> Option<FitnessGoal> {
        self.read().fitness_goal.clone()
    }

    pub fn targets(&self) -> Option<NutritionTargets> {
        self.read().targets.clone()
    }

    async fn update(&self, change: impl FnOnce(&mut NutritionSnapshot)) {
        let snapshot = {
            let mut state = self.write();
            change(&mut *state);
            state.clone()
        };
        self.events
            .dispatch(StoreEvent::NutritionChanged {
                snapshot,
                at: Utc::now(),
            })
            .await;
    }

    fn read(&self) -> RwLockReadGuard<'_, NutritionSnapshot> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, NutritionSnapshot> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
