//! CRUD, paging, and constraint mapping against `PostgreSQL`.

use std::time::Duration;

use crate::postgres::helpers::{TaskStore, task_store};
use chrono::Duration as TimeDelta;
use mockable::DefaultClock;
use rstest::rstest;
use taskhub::task::domain::{
    PersistedTaskData, Task, TaskChanges, TaskDraft, TaskId, TaskStatus, TaskTitle,
};
use taskhub::task::ports::{PageWindow, TaskRepository, TaskRepositoryError};

fn draft(title: &str) -> eyre::Result<TaskDraft> {
    Ok(TaskDraft::new(TaskTitle::new(title)?))
}

#[rstest]
fn stored_task_round_trips(task_store: TaskStore) -> eyre::Result<()> {
    let task = Task::new(
        draft("Persist me")?
            .with_description("with detail")
            .with_status(TaskStatus::InProgress),
        &DefaultClock,
    );

    task_store.block_on(task_store.repository.store(&task))?;

    let loaded = task_store.block_on(task_store.repository.find_by_id(task.id()))?;
    assert_eq!(loaded, Some(task));
    let missing = task_store.block_on(task_store.repository.find_by_id(TaskId::new()))?;
    assert_eq!(missing, None);
    Ok(())
}

#[rstest]
fn duplicate_identifier_is_reported(task_store: TaskStore) -> eyre::Result<()> {
    let task = Task::new(draft("Once")?, &DefaultClock);
    task_store.block_on(task_store.repository.store(&task))?;

    let result = task_store.block_on(task_store.repository.store(&task));

    assert!(matches!(
        result,
        Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()
    ));
    Ok(())
}

#[rstest]
fn pages_are_newest_first_with_total(task_store: TaskStore) -> eyre::Result<()> {
    let mut created = Vec::new();
    for index in 0..5 {
        let task = Task::new(draft(&format!("Task {index}"))?, &DefaultClock);
        task_store.block_on(task_store.repository.store(&task))?;
        created.push(task.id());
        std::thread::sleep(Duration::from_millis(2));
    }

    let slice = task_store.block_on(task_store.repository.find_page(PageWindow::new(2, 1)))?;

    assert_eq!(slice.total, 5);
    let ids: Vec<TaskId> = slice.tasks.iter().map(Task::id).collect();
    let expected: Vec<TaskId> = created.iter().rev().skip(1).take(2).copied().collect();
    assert_eq!(ids, expected);

    let beyond = task_store.block_on(task_store.repository.find_page(PageWindow::new(10, 50)))?;
    assert!(beyond.tasks.is_empty());
    assert_eq!(beyond.total, 5);
    Ok(())
}

#[rstest]
fn equal_creation_times_page_by_descending_id(task_store: TaskStore) -> eyre::Result<()> {
    let first = Task::new(draft("Twin A")?, &DefaultClock);
    let twin = Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        title: TaskTitle::new("Twin B")?,
        description: None,
        status: TaskStatus::Pending,
        created_at: first.created_at(),
        updated_at: first.updated_at(),
    });
    task_store.block_on(task_store.repository.store(&first))?;
    task_store.block_on(task_store.repository.store(&twin))?;

    let slice = task_store.block_on(task_store.repository.find_page(PageWindow::new(10, 0)))?;

    let mut expected = vec![first.id(), twin.id()];
    expected.sort_by_key(|id| std::cmp::Reverse(id.into_inner()));
    let ids: Vec<TaskId> = slice.tasks.iter().map(Task::id).collect();
    assert_eq!(ids, expected);
    Ok(())
}

#[rstest]
fn update_persists_changes_and_detects_missing_rows(task_store: TaskStore) -> eyre::Result<()> {
    let mut task = Task::new(draft("Before")?.with_description("kept"), &DefaultClock);
    task_store.block_on(task_store.repository.store(&task))?;

    task.apply(
        TaskChanges::new()
            .with_title(TaskTitle::new("After")?)
            .with_status(TaskStatus::Completed),
        &DefaultClock,
    );
    task_store.block_on(task_store.repository.update(&task))?;
    let loaded = task_store.block_on(task_store.repository.find_by_id(task.id()))?;
    assert_eq!(loaded, Some(task));

    let stranger = Task::new(draft("Never stored")?, &DefaultClock);
    let result = task_store.block_on(task_store.repository.update(&stranger));
    assert!(matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == stranger.id()));
    Ok(())
}

#[rstest]
fn delete_reports_removed_rows(task_store: TaskStore) -> eyre::Result<()> {
    let task = Task::new(draft("Short lived")?, &DefaultClock);
    task_store.block_on(task_store.repository.store(&task))?;

    assert_eq!(task_store.block_on(task_store.repository.delete(task.id()))?, 1);
    assert_eq!(task_store.block_on(task_store.repository.delete(task.id()))?, 0);
    Ok(())
}

#[rstest]
fn check_constraint_maps_to_field_violation(task_store: TaskStore) -> eyre::Result<()> {
    let created = Task::new(draft("Backwards")?, &DefaultClock);
    let inverted = Task::from_persisted(PersistedTaskData {
        id: created.id(),
        title: created.title().clone(),
        description: None,
        status: created.status(),
        created_at: created.created_at(),
        updated_at: created.created_at() - TimeDelta::seconds(1),
    });

    let result = task_store.block_on(task_store.repository.store(&inverted));

    let Err(TaskRepositoryError::Validation(violations)) = result else {
        return Err(eyre::eyre!("expected validation failure, got {result:?}"));
    };
    let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
    assert_eq!(fields, vec!["updated_at"]);
    assert_eq!(violations.first().map(|v| v.message.as_str()), Some("Validation error"));
    Ok(())
}

#[rstest]
fn ping_succeeds_when_reachable(task_store: TaskStore) -> eyre::Result<()> {
    task_store.block_on(task_store.repository.ping())?;
    Ok(())
}
