use chrono::{DateTime, Utc};

use crate::database::models::{Task, TaskDetail, User};
use crate::repositories::tasks::NewTask;
use crate::repositories::{
    GroupRepository, GroupUserRepository, SubjectRepository, TaskRepository, UserRepository,
};
use crate::services::ServiceError;
use crate::store::{GroupStore, IdentityStore, MembershipStore};

pub struct CreateTask<'a> {
    pub group_id: i32,
    pub subject_id: Option<i32>,
    pub title: &'a str,
    pub description: &'a str,
    pub deadline: Option<DateTime<Utc>>,
}

/// Tasks live inside a group: members post them, admins and moderators
/// verify or remove them.
pub struct TaskService {
    tasks: TaskRepository,
    users: UserRepository,
    groups: GroupRepository,
    members: GroupUserRepository,
    subjects: SubjectRepository,
}

impl TaskService {
    pub fn new(
        tasks: TaskRepository,
        users: UserRepository,
        groups: GroupRepository,
        members: GroupUserRepository,
        subjects: SubjectRepository,
    ) -> Self {
        Self {
            tasks,
            users,
            groups,
            members,
            subjects,
        }
    }

    async fn resolve(&self, username: &str) -> Result<User, ServiceError> {
        self.users
            .by_username(username)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))
    }

    async fn can_view(&self, group_id: i32, user_id: i32) -> Result<bool, ServiceError> {
        if self.members.is_member(group_id, user_id).await? {
            return Ok(true);
        }
        Ok(self.groups.is_admin_or_moderator(group_id, user_id).await?)
    }

    /// Posts a task into a group the caller belongs to (or manages).
    pub async fn create(
        &self,
        username: &str,
        task: CreateTask<'_>,
    ) -> Result<Task, ServiceError> {
        if task.title.trim().is_empty() {
            return Err(ServiceError::MissingField("title"));
        }
        let user = self.resolve(username).await?;
        self.groups
            .by_id(task.group_id)
            .await?
            .ok_or(ServiceError::GroupNotFound(task.group_id))?;

        if !self.can_view(task.group_id, user.user_id).await? {
            return Err(ServiceError::Unauthorized);
        }

        if let Some(subject_id) = task.subject_id {
            self.subjects
                .by_id(subject_id)
                .await?
                .ok_or(ServiceError::SubjectNotFound(subject_id))?;
        }

        Ok(self
            .tasks
            .create(NewTask {
                group_id: task.group_id,
                user_id: user.user_id,
                subject_id: task.subject_id,
                title: task.title,
                description: task.description,
                deadline: task.deadline,
            })
            .await?)
    }

    /// Tasks in one group, visible to members and managers.
    pub async fn by_group(
        &self,
        username: &str,
        group_id: i32,
    ) -> Result<Vec<TaskDetail>, ServiceError> {
        let user = self.resolve(username).await?;
        self.groups
            .by_id(group_id)
            .await?
            .ok_or(ServiceError::GroupNotFound(group_id))?;

        if !self.can_view(group_id, user.user_id).await? {
            return Err(ServiceError::Unauthorized);
        }
        Ok(self.tasks.by_group(group_id).await?)
    }

    /// A single task, visible to members and managers of its group.
    pub async fn get(&self, username: &str, task_id: i32) -> Result<Task, ServiceError> {
        let user = self.resolve(username).await?;
        let task = self
            .tasks
            .by_id(task_id)
            .await?
            .ok_or(ServiceError::TaskNotFound(task_id))?;

        if !self.can_view(task.group_id, user.user_id).await? {
            return Err(ServiceError::Unauthorized);
        }
        Ok(task)
    }

    /// Tasks for one subject within a group, same visibility rule as
    /// the group listing.
    pub async fn by_subject(
        &self,
        username: &str,
        group_id: i32,
        subject_id: i32,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<TaskDetail>, i64), ServiceError> {
        let user = self.resolve(username).await?;
        self.groups
            .by_id(group_id)
            .await?
            .ok_or(ServiceError::GroupNotFound(group_id))?;

        if !self.can_view(group_id, user.user_id).await? {
            return Err(ServiceError::Unauthorized);
        }

        self.subjects
            .by_id(subject_id)
            .await?
            .ok_or(ServiceError::SubjectNotFound(subject_id))?;

        Ok(self
            .tasks
            .by_group_and_subject(group_id, subject_id, limit, offset)
            .await?)
    }

    /// Tasks across every group the caller belongs to or manages.
    pub async fn feed(&self, username: &str) -> Result<Vec<TaskDetail>, ServiceError> {
        let user = self.resolve(username).await?;
        let group_ids = self.groups.visible_group_ids(user.user_id).await?;
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.tasks.by_groups(&group_ids).await?)
    }

    /// Marks a task verified. Admin or moderator of the task's group.
    pub async fn verify(&self, username: &str, task_id: i32) -> Result<(), ServiceError> {
        let user = self.resolve(username).await?;
        let task = self
            .tasks
            .by_id(task_id)
            .await?
            .ok_or(ServiceError::TaskNotFound(task_id))?;

        if !self
            .groups
            .is_admin_or_moderator(task.group_id, user.user_id)
            .await?
        {
            return Err(ServiceError::Unauthorized);
        }
        self.tasks.set_verified(task_id, true).await?;
        Ok(())
    }

    /// Deletes a task. The author may delete their own; admins and
    /// moderators may delete any task in their group.
    pub async fn delete(&self, username: &str, task_id: i32) -> Result<(), ServiceError> {
        let user = self.resolve(username).await?;
        let task = self
            .tasks
            .by_id(task_id)
            .await?
            .ok_or(ServiceError::TaskNotFound(task_id))?;

        let allowed = task.user_id == user.user_id
            || self
                .groups
                .is_admin_or_moderator(task.group_id, user.user_id)
                .await?;
        if !allowed {
            return Err(ServiceError::Unauthorized);
        }
        self.tasks.delete(task_id).await?;
        Ok(())
    }
}
