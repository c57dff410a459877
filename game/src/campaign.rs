use crate::error::LoadError;
use crate::levels::{self, Level};
use crate::storage::{Progress, ProgressStore};

/// Ordered level list plus the player's progress through it.
pub(crate) struct Campaign<S> {
    levels: Vec<String>,
    current: usize,
    progress: Progress,
    store: S,
}

impl<S: ProgressStore> Campaign<S> {
    /// The embedded levels in play order.
    pub(crate) fn new(store: S) -> Result<Self, LoadError> {
        Self::with_levels(levels::names().map(str::to_string).collect(), store)
    }

    pub(crate) fn with_levels(levels: Vec<String>, store: S) -> Result<Self, LoadError> {
        if levels.is_empty() {
            return Err(LoadError::NoLevels);
        }
        let progress = store.load()?;
        let mut campaign = Self {
            levels,
            current: 0,
            progress,
            store,
        };
        // Resume from the furthest level reached.
        campaign.current = (0..campaign.levels.len())
            .rev()
            .find(|&i| campaign.is_playable(i))
            .unwrap_or(0);
        log::info!(
            "campaign resumes at level {} of {}",
            campaign.current + 1,
            campaign.levels.len()
        );
        Ok(campaign)
    }

    pub(crate) fn current_name(&self) -> &str {
        &self.levels[self.current]
    }

    pub(crate) fn is_playable(&self, index: usize) -> bool {
        index == 0
            || self
                .levels
                .get(index)
                .is_some_and(|name| self.progress.unlocked.contains(name))
    }

    #[cfg(test)]
    pub(crate) fn is_game_completed(&self) -> bool {
        self.progress.game_completed
    }

    pub(crate) fn is_last(&self) -> bool {
        self.current + 1 >= self.levels.len()
    }

    /// Switches to a level that has been unlocked.
    pub(crate) fn select(&mut self, index: usize) -> bool {
        if index >= self.levels.len() || !self.is_playable(index) {
            return false;
        }
        self.current = index;
        true
    }

    pub(crate) fn load_current(&self) -> Result<Level, LoadError> {
        levels::load(self.current_name())
    }

    /// Records the current level as beaten and moves on. Returns false once
    /// there is nothing left to play.
    pub(crate) fn complete_current(&mut self) -> bool {
        log::info!("level {:?} completed", self.current_name());
        let has_next = !self.is_last();
        if has_next {
            let next = self.levels[self.current + 1].clone();
            self.progress.unlocked.insert(next);
            self.current += 1;
        } else {
            self.progress.game_completed = true;
            log::info!("campaign completed");
        }
        self.store.save(&self.progress);
        has_next
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }
}
