//! In-memory repository for task persistence.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{Task, TaskId},
    ports::{PageWindow, TaskRepository, TaskRepositoryError, TaskRepositoryResult, TaskSlice},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, StoredTask>,
    next_sequence: u64,
}

/// Stored task plus its insertion sequence, used to order timestamp ties.
#[derive(Debug)]
struct StoredTask {
    sequence: u64,
    task: Task,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn saturating_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.tasks.insert(
            task.id(),
            StoredTask {
                sequence,
                task: task.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).map(|stored| stored.task.clone()))
    }

    async fn find_page(&self, window: PageWindow) -> TaskRepositoryResult<TaskSlice> {
        let state = self.read()?;
        let mut ordered: Vec<&StoredTask> = state.tasks.values().collect();
        ordered.sort_by_key(|stored| (Reverse(stored.task.created_at()), Reverse(stored.sequence)));

        let tasks = ordered
            .into_iter()
            .skip(saturating_usize(window.offset))
            .take(saturating_usize(u64::from(window.limit)))
            .map(|stored| stored.task.clone())
            .collect();
        let total = u64::try_from(state.tasks.len()).map_err(TaskRepositoryError::persistence)?;

        Ok(TaskSlice { tasks, total })
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        stored.task = task.clone();
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<u64> {
        let mut state = self.write()?;
        Ok(u64::from(state.tasks.remove(&id).is_some()))
    }

    async fn ping(&self) -> TaskRepositoryResult<()> {
        self.read().map(drop)
    }
}
