//! In-memory repository implementations for testing
//!
//! One shared store backs every repository port. Units of work stage their
//! writes on a copy of the store and publish it on commit, so rollback tests
//! can observe that nothing leaked.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use timesync_core::catalog::ports::{
    AssignmentRepository, ProjectRepository, TaskRepository, UserRepository,
};
use timesync_core::tracking::ports::{TimeEntryRepository, UnitOfWork, UnitOfWorkFactory};
use timesync_domain::{
    NewAssignment, NewProject, NewTask, NewTimeEntry, NewUser, Project, ProjectDetails,
    Result as DomainResult, Task, TaskAssignment, TaskDetails, TimeEntry, TimeEntryRecord,
    TimeSyncError, User,
};

#[derive(Default, Clone)]
struct State {
    users: Vec<User>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    entries: Vec<TimeEntry>,
    assignments: Vec<TaskAssignment>,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user_name(&self, user_id: i64) -> Option<String> {
        self.users.iter().find(|u| u.user_id == user_id).map(|u| u.full_name.clone())
    }

    fn project_details(&self, project: &Project) -> ProjectDetails {
        ProjectDetails {
            project: project.clone(),
            user_name: self.user_name(project.user_id).unwrap_or_default(),
        }
    }

    fn task_details(&self, task: &Task) -> TaskDetails {
        TaskDetails {
            task: task.clone(),
            project_name: self
                .projects
                .iter()
                .find(|p| p.project_id == task.project_id)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            user_name: self.user_name(task.user_id).unwrap_or_default(),
        }
    }

    fn record(&self, entry: &TimeEntry) -> TimeEntryRecord {
        let task = self.tasks.iter().find(|t| t.task_id == entry.task_id);
        TimeEntryRecord {
            entry_id: entry.entry_id,
            user_id: entry.user_id,
            task_id: entry.task_id,
            start_time: entry.start_time,
            end_time: entry.end_time,
            user_name: self.user_name(entry.user_id),
            task_name: task.map(|t| t.name.clone()),
            project_name: task.and_then(|t| {
                self.projects.iter().find(|p| p.project_id == t.project_id).map(|p| p.name.clone())
            }),
            external_id: entry.external_id.clone(),
        }
    }
}

/// Shared in-memory store implementing every repository port.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    fail_entry_inserts: Arc<AtomicBool>,
    commits: Arc<AtomicUsize>,
    rollbacks: Arc<AtomicUsize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent time entry insert fail.
    pub fn fail_entry_inserts(&self) {
        self.fail_entry_inserts.store(true, Ordering::SeqCst);
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }

    pub fn entry_count(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn entry(&self, entry_id: i64) -> Option<TimeEntry> {
        self.lock().entries.iter().find(|e| e.entry_id == entry_id).cloned()
    }

    /// Seed a user directly, bypassing services.
    pub fn seed_user(&self, full_name: &str) -> User {
        let mut state = self.lock();
        let user = User { user_id: state.next_id(), full_name: full_name.to_string() };
        state.users.push(user.clone());
        user
    }

    pub fn seed_project(&self, name: &str, user_id: i64) -> Project {
        let mut state = self.lock();
        let project = Project {
            project_id: state.next_id(),
            name: name.to_string(),
            user_id,
            external_id: None,
        };
        state.projects.push(project.clone());
        project
    }

    pub fn seed_task(&self, name: &str, project_id: i64, user_id: i64) -> Task {
        let mut state = self.lock();
        let task = Task {
            task_id: state.next_id(),
            name: name.to_string(),
            project_id,
            user_id,
            estimate_hours: 1.0,
            external_id: None,
        };
        state.tasks.push(task.clone());
        task
    }

    pub fn seed_entry(
        &self,
        user_id: i64,
        task_id: i64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> TimeEntry {
        let mut state = self.lock();
        let entry = TimeEntry {
            entry_id: state.next_id(),
            user_id,
            task_id,
            start_time,
            end_time,
            external_id: None,
        };
        state.entries.push(entry.clone());
        entry
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Detached copy sharing the failure switch but not the data.
    fn staged_copy(&self) -> Self {
        Self {
            state: Arc::new(Mutex::new(self.lock().clone())),
            fail_entry_inserts: Arc::clone(&self.fail_entry_inserts),
            commits: Arc::new(AtomicUsize::new(0)),
            rollbacks: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn get_by_id(&self, user_id: i64) -> DomainResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn get_all(&self) -> DomainResult<Vec<User>> {
        Ok(self.lock().users.clone())
    }

    async fn add(&self, user: NewUser) -> DomainResult<User> {
        let mut state = self.lock();
        let created = User { user_id: state.next_id(), full_name: user.full_name };
        state.users.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn get_by_id(&self, project_id: i64) -> DomainResult<Option<ProjectDetails>> {
        let state = self.lock();
        Ok(state
            .projects
            .iter()
            .find(|p| p.project_id == project_id)
            .map(|p| state.project_details(p)))
    }

    async fn get_all(&self) -> DomainResult<Vec<ProjectDetails>> {
        let state = self.lock();
        Ok(state.projects.iter().map(|p| state.project_details(p)).collect())
    }

    async fn add(&self, project: NewProject) -> DomainResult<Project> {
        let mut state = self.lock();
        let created = Project {
            project_id: state.next_id(),
            name: project.name,
            user_id: project.user_id,
            external_id: None,
        };
        state.projects.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn get_by_id(&self, task_id: i64) -> DomainResult<Option<TaskDetails>> {
        let state = self.lock();
        Ok(state.tasks.iter().find(|t| t.task_id == task_id).map(|t| state.task_details(t)))
    }

    async fn get_by_project(&self, project_id: i64) -> DomainResult<Vec<TaskDetails>> {
        let state = self.lock();
        Ok(state
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .map(|t| state.task_details(t))
            .collect())
    }

    async fn add(&self, task: NewTask) -> DomainResult<Task> {
        let mut state = self.lock();
        let created = Task {
            task_id: state.next_id(),
            name: task.name,
            project_id: task.project_id,
            user_id: task.user_id,
            estimate_hours: task.estimate_hours,
            external_id: None,
        };
        state.tasks.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryStore {
    async fn add(&self, assignment: NewAssignment) -> DomainResult<TaskAssignment> {
        let mut state = self.lock();
        let created = TaskAssignment {
            assignment_id: state.next_id(),
            user_id: assignment.user_id,
            task_id: assignment.task_id,
            assigned_at: Utc::now(),
        };
        state.assignments.push(created.clone());
        Ok(created)
    }

    async fn exists(&self, user_id: i64, task_id: i64) -> DomainResult<bool> {
        Ok(self.lock().assignments.iter().any(|a| a.user_id == user_id && a.task_id == task_id))
    }

    async fn tasks_for_user(&self, user_id: i64) -> DomainResult<Vec<TaskDetails>> {
        let state = self.lock();
        Ok(state
            .assignments
            .iter()
            .filter(|a| a.user_id == user_id)
            .filter_map(|a| state.tasks.iter().find(|t| t.task_id == a.task_id))
            .map(|t| state.task_details(t))
            .collect())
    }

    async fn users_for_task(&self, task_id: i64) -> DomainResult<Vec<User>> {
        let state = self.lock();
        Ok(state
            .assignments
            .iter()
            .filter(|a| a.task_id == task_id)
            .filter_map(|a| state.users.iter().find(|u| u.user_id == a.user_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TimeEntryRepository for InMemoryStore {
    async fn get_by_id(&self, entry_id: i64) -> DomainResult<Option<TimeEntryRecord>> {
        let state = self.lock();
        Ok(state.entries.iter().find(|e| e.entry_id == entry_id).map(|e| state.record(e)))
    }

    async fn get_by_user(&self, user_id: i64) -> DomainResult<Vec<TimeEntryRecord>> {
        let state = self.lock();
        Ok(state.entries.iter().filter(|e| e.user_id == user_id).map(|e| state.record(e)).collect())
    }

    async fn get_by_date_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<TimeEntryRecord>> {
        let state = self.lock();
        Ok(state
            .entries
            .iter()
            .filter(|e| e.start_time >= from && e.end_time <= to)
            .map(|e| state.record(e))
            .collect())
    }

    async fn add(&self, entry: NewTimeEntry) -> DomainResult<TimeEntry> {
        if self.fail_entry_inserts.load(Ordering::SeqCst) {
            return Err(TimeSyncError::Database("disk I/O error".into()));
        }

        let mut state = self.lock();
        let created = TimeEntry {
            entry_id: state.next_id(),
            user_id: entry.user_id,
            task_id: entry.task_id,
            start_time: entry.start_time,
            end_time: entry.end_time,
            external_id: None,
        };
        state.entries.push(created.clone());
        Ok(created)
    }

    async fn update(&self, entry: &TimeEntry) -> DomainResult<()> {
        let mut state = self.lock();
        let slot = state
            .entries
            .iter_mut()
            .find(|e| e.entry_id == entry.entry_id)
            .ok_or_else(|| TimeSyncError::NotFound(format!("Time entry {}", entry.entry_id)))?;
        *slot = entry.clone();
        Ok(())
    }
}

#[async_trait]
impl UnitOfWorkFactory for InMemoryStore {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        Ok(Box::new(InMemoryUnitOfWork { origin: self.clone(), staged: self.staged_copy() }))
    }
}

/// Unit of work over a staged copy of an [`InMemoryStore`].
pub struct InMemoryUnitOfWork {
    origin: InMemoryStore,
    staged: InMemoryStore,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(self.staged.clone())
    }

    fn tasks(&self) -> Arc<dyn TaskRepository> {
        Arc::new(self.staged.clone())
    }

    fn time_entries(&self) -> Arc<dyn TimeEntryRepository> {
        Arc::new(self.staged.clone())
    }

    async fn save_changes(&self) -> DomainResult<()> {
        Ok(())
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let staged = self.staged.lock().clone();
        *self.origin.lock() = staged;
        self.origin.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        self.origin.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
