//! In-memory store with the same semantics as the Postgres backend. Backs the
//! integration suite and database-free local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::model::{NewTask, NewUser, Task, TaskPatch, TaskStats, User};
use crate::query::{TaskFilter, TaskSort};
use crate::store::{validate_title, StoreError, TaskStore, UserStore};

#[derive(Default)]
pub struct MemoryStore {
    tasks: RwLock<HashMap<Uuid, Task>>,
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(task: &Task, filter: &TaskFilter) -> bool {
    if task.owner != filter.owner {
        return false;
    }
    if let Some(completed) = filter.completed {
        if task.completed != completed {
            return false;
        }
    }
    if let Some(priority) = &filter.priority {
        // Raw-text comparison: unknown priority values match nothing
        if task.priority.map(|p| p.as_str()) != Some(priority.as_str()) {
            return false;
        }
    }
    true
}

fn sort_tasks(tasks: &mut [Task], sort: TaskSort) {
    match sort {
        TaskSort::DueDateAsc => {
            // Option ordering puts tasks without a due date first
            tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        }
        TaskSort::PriorityDesc => {
            tasks.sort_by(|a, b| {
                let rank = |t: &Task| t.priority.map(|p| p.rank()).unwrap_or(0);
                rank(b).cmp(&rank(a))
            });
        }
        TaskSort::CreatedDesc => {
            tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_many(&self, filter: &TaskFilter, sort: TaskSort) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().expect("tasks lock");
        let mut found: Vec<Task> = tasks.values().filter(|t| matches(t, filter)).cloned().collect();
        drop(tasks);
        sort_tasks(&mut found, sort);
        Ok(found)
    }

    async fn find_one(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.read().expect("tasks lock").get(&id).cloned())
    }

    async fn insert(&self, task: NewTask) -> Result<Task, StoreError> {
        validate_title(&task.title)?;

        let created = Task {
            id: Uuid::new_v4(),
            owner: task.owner,
            title: task.title,
            completed: task.completed,
            priority: task.priority,
            due_date: task.due_date,
            created_at: Utc::now(),
        };
        self.tasks.write().expect("tasks lock").insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_by_id(&self, id: Uuid, patch: TaskPatch) -> Result<Task, StoreError> {
        if let Some(title) = &patch.title {
            validate_title(title)?;
        }

        let mut tasks = self.tasks.write().expect("tasks lock");
        let task = tasks
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("Task not found".to_string()))?;

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        if let Some(priority) = patch.priority {
            task.priority = Some(priority);
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = Some(due_date);
        }

        Ok(task.clone())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        self.tasks
            .write()
            .expect("tasks lock")
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound("Task not found".to_string()))
    }

    async fn aggregate_counts(&self, owner: Uuid) -> Result<TaskStats, StoreError> {
        let tasks = self.tasks.read().expect("tasks lock");
        let mut stats = TaskStats::empty();
        for task in tasks.values().filter(|t| t.owner == owner) {
            stats.total += 1;
            if task.completed {
                stats.completed += 1;
            } else {
                stats.pending += 1;
            }
        }
        Ok(stats)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().expect("users lock");
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("Email is already registered".to_string()));
        }

        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password: user.password,
            created_at: Utc::now(),
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .expect("users lock")
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().expect("users lock").get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use crate::query::build_query;
    use crate::query::ListParams;
    use chrono::TimeZone;

    fn new_task(owner: Uuid, title: &str) -> NewTask {
        NewTask { owner, title: title.into(), completed: false, priority: None, due_date: None }
    }

    async fn seed(store: &MemoryStore, owner: Uuid) -> Vec<Task> {
        let mut out = Vec::new();
        let due = |d: u32| Utc.with_ymd_and_hms(2026, 9, d, 0, 0, 0).single();

        for (title, completed, priority, due_date) in [
            ("a", true, Some(Priority::Low), due(3)),
            ("b", false, Some(Priority::High), due(1)),
            ("c", false, Some(Priority::Medium), None),
        ] {
            let mut task = new_task(owner, title);
            task.completed = completed;
            task.priority = priority;
            task.due_date = due_date;
            out.push(store.insert(task).await.unwrap());
            // Distinct created_at ordering
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        out
    }

    #[tokio::test]
    async fn filters_by_completed_and_priority() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        seed(&store, owner).await;

        let mut filter = TaskFilter::owned_by(owner);
        filter.completed = Some(true);
        let found = store.find_many(&filter, TaskSort::CreatedDesc).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].completed);

        let mut filter = TaskFilter::owned_by(owner);
        filter.priority = Some("high".into());
        let found = store.find_many(&filter, TaskSort::CreatedDesc).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].priority, Some(Priority::High));

        // Unknown priority text matches nothing
        let mut filter = TaskFilter::owned_by(owner);
        filter.priority = Some("urgent".into());
        let found = store.find_many(&filter, TaskSort::CreatedDesc).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn owner_filter_isolates_users() {
        let store = MemoryStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.insert(new_task(a, "mine")).await.unwrap();

        let found = store
            .find_many(&TaskFilter::owned_by(b), TaskSort::CreatedDesc)
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn sort_orders() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        seed(&store, owner).await;
        let filter = TaskFilter::owned_by(owner);

        // Default: newest first
        let found = store.find_many(&filter, TaskSort::CreatedDesc).await.unwrap();
        let titles: Vec<&str> = found.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["c", "b", "a"]);

        // Due date ascending, missing dates first
        let found = store.find_many(&filter, TaskSort::DueDateAsc).await.unwrap();
        let titles: Vec<&str> = found.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["c", "b", "a"]);

        // Priority rank descending
        let found = store.find_many(&filter, TaskSort::PriorityDesc).await.unwrap();
        let titles: Vec<&str> = found.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["b", "c", "a"]);
    }

    #[tokio::test]
    async fn list_params_round_trip_through_build_query() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        seed(&store, owner).await;

        let params = ListParams {
            completed: Some("nope".into()), // lenient: anything but "true" is false
            priority: None,
            sort: Some("bogus".into()),
        };
        let (filter, sort) = build_query(owner, &params);
        let found = store.find_many(&filter, sort).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|t| !t.completed));
    }

    #[tokio::test]
    async fn insert_rejects_blank_title() {
        let store = MemoryStore::new();
        let err = store.insert(new_task(Uuid::new_v4(), "   ")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn update_patches_only_present_fields() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let task = store.insert(new_task(owner, "before")).await.unwrap();

        let patch = TaskPatch { completed: Some(true), ..Default::default() };
        let updated = store.update_by_id(task.id, patch).await.unwrap();
        assert!(updated.completed);
        assert_eq!(updated.title, "before");
        assert_eq!(updated.owner, owner);

        let err = store
            .update_by_id(Uuid::new_v4(), TaskPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_and_reports_missing() {
        let store = MemoryStore::new();
        let task = store.insert(new_task(Uuid::new_v4(), "gone soon")).await.unwrap();

        store.delete_by_id(task.id).await.unwrap();
        assert!(store.find_one(task.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete_by_id(task.id).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn aggregate_counts_cases() {
        let store = MemoryStore::new();
        let empty_owner = Uuid::new_v4();
        assert_eq!(
            store.aggregate_counts(empty_owner).await.unwrap(),
            TaskStats::empty()
        );

        let owner = Uuid::new_v4();
        for i in 0..5 {
            let mut task = new_task(owner, "t");
            task.completed = i < 2;
            store.insert(task).await.unwrap();
        }
        let stats = store.aggregate_counts(owner).await.unwrap();
        assert_eq!(stats, TaskStats { total: 5, completed: 2, pending: 3 });
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        let user = NewUser {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "salt$digest".into(),
        };
        store.insert_user(user.clone()).await.unwrap();
        let err = store.insert_user(user).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }
}
