//! One-shot command handlers.
//!
//! Every mutating command goes through the [`Reconciler`] so the CLI behaves
//! like any other client: one service call per intent, full re-fetch after.

use anyhow::{Context, Result};
use time::format_description::well_known::Rfc3339;

use taskpad_app::{Reconciler, TaskStore};
use taskpad_core::{StatusFilter, Task, TaskId};

use crate::{Command, LsFormat};

pub fn run<S: TaskStore>(command: Command, reconciler: &mut Reconciler<S>) -> Result<()> {
    reconciler.sync().context("failed to load tasks")?;

    match command {
        Command::Add { title } => handle_add(reconciler, &title),
        Command::Ls { status, format } => handle_ls(reconciler, status.into(), format),
        Command::Toggle { id } => handle_toggle(reconciler, TaskId(id)),
        Command::Edit { id, title } => handle_edit(reconciler, TaskId(id), &title),
        Command::Rm { id } => handle_rm(reconciler, TaskId(id)),
        Command::Latest => handle_latest(reconciler),
        _ => unreachable!("Tui/Mcp handled before command dispatch"),
    }
}

fn handle_add<S: TaskStore>(reconciler: &mut Reconciler<S>, title: &str) -> Result<()> {
    match reconciler.add_task(title)? {
        Some(task) => println!("created task {}: {}", task.id, task.title),
        None => println!("nothing to add: title is empty"),
    }
    Ok(())
}

fn handle_ls<S: TaskStore>(
    reconciler: &mut Reconciler<S>,
    status: StatusFilter,
    format: LsFormat,
) -> Result<()> {
    let snapshot = reconciler.snapshot();
    let tasks = snapshot.filtered(status);

    if tasks.is_empty() {
        if status == StatusFilter::All {
            println!("No tasks found");
        } else {
            println!("No {status} tasks found");
        }
        return Ok(());
    }

    match format {
        LsFormat::Table => render_task_table(&tasks)?,
        LsFormat::Json => println!("{}", serde_json::to_string_pretty(&tasks)?),
    }
    Ok(())
}

fn handle_toggle<S: TaskStore>(reconciler: &mut Reconciler<S>, id: TaskId) -> Result<()> {
    if reconciler.toggle_completion(id)? {
        match reconciler.snapshot().get(id) {
            Some(task) if task.completed => println!("completed task {id}: {}", task.title),
            Some(task) => println!("reopened task {id}: {}", task.title),
            None => println!("toggled task {id}"),
        }
    } else {
        println!("task {id} is not in the current list");
    }
    Ok(())
}

fn handle_edit<S: TaskStore>(reconciler: &mut Reconciler<S>, id: TaskId, title: &str) -> Result<()> {
    if reconciler.edit_title(id, title)? {
        println!("renamed task {id}: {title}");
    } else if title.trim().is_empty() {
        println!("nothing to rename: title is empty");
    } else {
        println!("task {id} is not in the current list");
    }
    Ok(())
}

fn handle_rm<S: TaskStore>(reconciler: &mut Reconciler<S>, id: TaskId) -> Result<()> {
    reconciler.delete_task(id)?;
    println!("deleted task {id}");
    Ok(())
}

fn handle_latest<S: TaskStore>(reconciler: &Reconciler<S>) -> Result<()> {
    match reconciler.service().get_latest()? {
        Some(task) => println!("{}", serde_json::to_string_pretty(&task)?),
        None => println!("No tasks found"),
    }
    Ok(())
}

fn render_task_table(tasks: &[&Task]) -> Result<()> {
    println!("ID | Done | Title | Created");
    println!("-- | ---- | ----- | -------");

    for task in tasks {
        let done = if task.completed { "x" } else { " " };
        let created = task
            .created_at
            .format(&Rfc3339)
            .context("failed to format timestamp")?;
        println!("{} | [{}] | {} | {}", task.id, done, task.title, created);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use crate::StatusArg;
    use anyhow::anyhow;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
    use taskpad_app::TaskService;
    use time::OffsetDateTime;

    #[derive(Clone, Default)]
    struct MockStore {
        inner: Arc<MockStoreInner>,
    }

    #[derive(Default)]
    struct MockStoreInner {
        tasks: Mutex<Vec<Task>>,
        next_id: Mutex<i64>,
        insert_calls: Mutex<u32>,
        replace_calls: Mutex<Vec<(TaskId, String, bool)>>,
        remove_calls: Mutex<Vec<TaskId>>,
    }

    fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    impl MockStore {
        fn tasks(&self) -> Vec<Task> {
            guard(&self.inner.tasks).clone()
        }

        fn insert_calls(&self) -> u32 {
            *guard(&self.inner.insert_calls)
        }

        fn replace_calls(&self) -> Vec<(TaskId, String, bool)> {
            guard(&self.inner.replace_calls).clone()
        }

        fn remove_calls(&self) -> Vec<TaskId> {
            guard(&self.inner.remove_calls).clone()
        }
    }

    impl TaskStore for MockStore {
        type Error = anyhow::Error;

        fn insert_task(&self, title: &str) -> Result<Task, Self::Error> {
            *guard(&self.inner.insert_calls) += 1;
            let id = {
                let mut next = guard(&self.inner.next_id);
                *next += 1;
                *next
            };
            let task = Task {
                id: TaskId(id),
                title: title.to_owned(),
                completed: false,
                created_at: OffsetDateTime::from_unix_timestamp(id)
                    .map_err(|err| anyhow!("bad timestamp: {err}"))?,
            };
            guard(&self.inner.tasks).push(task.clone());
            Ok(task)
        }

        fn fetch_tasks(&self) -> Result<Vec<Task>, Self::Error> {
            Ok(guard(&self.inner.tasks).clone())
        }

        fn replace_task(
            &self,
            id: TaskId,
            title: &str,
            completed: bool,
        ) -> Result<Option<Task>, Self::Error> {
            guard(&self.inner.replace_calls).push((id, title.to_owned(), completed));
            let mut tasks = guard(&self.inner.tasks);
            let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
                return Ok(None);
            };
            task.title = title.to_owned();
            task.completed = completed;
            Ok(Some(task.clone()))
        }

        fn remove_task(&self, id: TaskId) -> Result<bool, Self::Error> {
            guard(&self.inner.remove_calls).push(id);
            let mut tasks = guard(&self.inner.tasks);
            let before = tasks.len();
            tasks.retain(|task| task.id != id);
            Ok(tasks.len() < before)
        }

        fn latest_task(&self) -> Result<Option<Task>, Self::Error> {
            Ok(guard(&self.inner.tasks)
                .iter()
                .max_by_key(|task| (task.created_at, task.id))
                .cloned())
        }
    }

    fn reconciler_with_store() -> (Reconciler<MockStore>, MockStore) {
        let store = MockStore::default();
        let reconciler = Reconciler::new(TaskService::new(store.clone()));
        (reconciler, store)
    }

    #[test]
    fn run_add_dispatches_to_the_service() -> Result<()> {
        let (mut reconciler, store) = reconciler_with_store();
        run(
            Command::Add {
                title: "via run".into(),
            },
            &mut reconciler,
        )?;

        assert_eq!(store.insert_calls(), 1);
        assert_eq!(store.tasks()[0].title, "via run");
        Ok(())
    }

    #[test]
    fn run_toggle_resends_the_stored_title() -> Result<()> {
        let (mut reconciler, store) = reconciler_with_store();
        run(
            Command::Add {
                title: "flip me".into(),
            },
            &mut reconciler,
        )?;
        let id = store.tasks()[0].id;

        run(Command::Toggle { id: id.as_i64() }, &mut reconciler)?;

        assert_eq!(store.replace_calls(), vec![(id, "flip me".to_owned(), true)]);
        Ok(())
    }

    #[test]
    fn run_toggle_on_unknown_id_makes_no_service_call() -> Result<()> {
        let (mut reconciler, store) = reconciler_with_store();
        run(Command::Toggle { id: 99 }, &mut reconciler)?;
        assert!(store.replace_calls().is_empty());
        Ok(())
    }

    #[test]
    fn run_rm_dispatches_delete() -> Result<()> {
        let (mut reconciler, store) = reconciler_with_store();
        run(
            Command::Add {
                title: "doomed".into(),
            },
            &mut reconciler,
        )?;
        let id = store.tasks()[0].id;

        run(Command::Rm { id: id.as_i64() }, &mut reconciler)?;
        assert_eq!(store.remove_calls(), vec![id]);
        assert!(store.tasks().is_empty());
        Ok(())
    }

    #[test]
    fn run_ls_renders_without_error_for_every_status() -> Result<()> {
        let (mut reconciler, _store) = reconciler_with_store();
        run(
            Command::Add {
                title: "visible".into(),
            },
            &mut reconciler,
        )?;

        for status in [StatusArg::All, StatusArg::Active, StatusArg::Completed] {
            run(
                Command::Ls {
                    status,
                    format: LsFormat::Table,
                },
                &mut reconciler,
            )?;
            run(
                Command::Ls {
                    status,
                    format: LsFormat::Json,
                },
                &mut reconciler,
            )?;
        }
        Ok(())
    }

    #[test]
    fn run_latest_reports_the_newest_task() -> Result<()> {
        let (mut reconciler, _store) = reconciler_with_store();
        run(Command::Latest, &mut reconciler)?;
        run(
            Command::Add {
                title: "newest".into(),
            },
            &mut reconciler,
        )?;
        run(Command::Latest, &mut reconciler)?;
        Ok(())
    }
}
