use crate::database::models::{Group, GroupDetail, User, UserSummary};
use crate::repositories::{
    GroupModerRepository, GroupRepository, GroupUserRepository, UserRepository,
};
use crate::services::ServiceError;
use crate::store::{GroupStore, IdentityStore, StoreError};

/// Group CRUD plus the role management around it. The creator of a
/// group is its admin; moderators are appointed by the admin or an
/// existing moderator.
pub struct GroupService {
    users: UserRepository,
    groups: GroupRepository,
    members: GroupUserRepository,
    moderators: GroupModerRepository,
}

impl GroupService {
    pub fn new(
        users: UserRepository,
        groups: GroupRepository,
        members: GroupUserRepository,
        moderators: GroupModerRepository,
    ) -> Self {
        Self {
            users,
            groups,
            members,
            moderators,
        }
    }

    async fn resolve(&self, username: &str) -> Result<User, ServiceError> {
        self.users
            .by_username(username)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))
    }

    async fn require_group(&self, group_id: i32) -> Result<Group, ServiceError> {
        self.groups
            .by_id(group_id)
            .await?
            .ok_or(ServiceError::GroupNotFound(group_id))
    }

    async fn require_admin(&self, group_id: i32, username: &str) -> Result<Group, ServiceError> {
        let user = self.resolve(username).await?;
        let group = self.require_group(group_id).await?;
        if group.admin_id != user.user_id {
            return Err(ServiceError::Unauthorized);
        }
        Ok(group)
    }

    async fn require_manager(&self, group_id: i32, username: &str) -> Result<(), ServiceError> {
        let user = self.resolve(username).await?;
        self.require_group(group_id).await?;
        if !self
            .groups
            .is_admin_or_moderator(group_id, user.user_id)
            .await?
        {
            return Err(ServiceError::Unauthorized);
        }
        Ok(())
    }

    /// Creates a group with the caller as admin. The admin's membership
    /// row is written in the same transaction as the group, so member
    /// listings always include the admin.
    pub async fn create(
        &self,
        admin_username: &str,
        name: &str,
        academic_group_id: i32,
    ) -> Result<GroupDetail, ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::MissingField("name"));
        }
        let admin = self.resolve(admin_username).await?;

        let group = self
            .groups
            .create_with_admin(name, academic_group_id, admin.user_id)
            .await?;

        self.groups
            .detail(group.id)
            .await?
            .ok_or(ServiceError::GroupNotFound(group.id))
    }

    pub async fn detail(&self, group_id: i32) -> Result<GroupDetail, ServiceError> {
        self.groups
            .detail(group_id)
            .await?
            .ok_or(ServiceError::GroupNotFound(group_id))
    }

    /// Admin-only rename.
    pub async fn rename(
        &self,
        group_id: i32,
        acting_username: &str,
        name: &str,
    ) -> Result<(), ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::MissingField("name"));
        }
        self.require_admin(group_id, acting_username).await?;
        self.groups.update_name(group_id, name).await?;
        Ok(())
    }

    /// Admin-only delete; memberships, moderators, applications and
    /// tasks go with it via the schema's cascades.
    pub async fn delete(&self, group_id: i32, acting_username: &str) -> Result<(), ServiceError> {
        self.require_admin(group_id, acting_username).await?;
        self.groups.delete(group_id).await?;
        Ok(())
    }

    /// Groups the user can still apply to.
    pub async fn available(
        &self,
        username: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<GroupDetail>, i64), ServiceError> {
        let user = self.resolve(username).await?;
        Ok(self.groups.available(user.user_id, limit, offset).await?)
    }

    /// Groups the user belongs to or moderates.
    pub async fn joined(
        &self,
        username: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<GroupDetail>, i64), ServiceError> {
        let user = self.resolve(username).await?;
        Ok(self.groups.user_groups(user.user_id, limit, offset).await?)
    }

    pub async fn members(&self, group_id: i32) -> Result<Vec<UserSummary>, ServiceError> {
        self.require_group(group_id).await?;
        Ok(self.members.members_of(group_id).await?)
    }

    pub async fn moderators(&self, group_id: i32) -> Result<Vec<UserSummary>, ServiceError> {
        self.require_group(group_id).await?;
        Ok(self.moderators.moderators_of(group_id).await?)
    }

    /// Appoints a moderator. The target must already be known; an
    /// existing appointment is reported, not overwritten.
    pub async fn add_moderator(
        &self,
        group_id: i32,
        acting_username: &str,
        target_username: &str,
    ) -> Result<(), ServiceError> {
        self.require_manager(group_id, acting_username).await?;
        let target = self.resolve(target_username).await?;

        match self.moderators.create(group_id, target.user_id).await {
            Ok(_) => Ok(()),
            Err(StoreError::Conflict) => Err(ServiceError::AlreadyModerator),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn remove_moderator(
        &self,
        group_id: i32,
        acting_username: &str,
        target_username: &str,
    ) -> Result<(), ServiceError> {
        self.require_manager(group_id, acting_username).await?;
        let target = self.resolve(target_username).await?;

        if !self.moderators.delete(group_id, target.user_id).await? {
            return Err(ServiceError::NotAModerator(target_username.to_string()));
        }
        Ok(())
    }

    /// Removes a member. The admin cannot be removed this way.
    pub async fn remove_member(
        &self,
        group_id: i32,
        acting_username: &str,
        target_username: &str,
    ) -> Result<(), ServiceError> {
        self.require_manager(group_id, acting_username).await?;
        let group = self.require_group(group_id).await?;
        let target = self.resolve(target_username).await?;

        if target.user_id == group.admin_id {
            return Err(ServiceError::Unauthorized);
        }

        if !self.members.delete(group_id, target.user_id).await? {
            return Err(ServiceError::NotAMember(target_username.to_string()));
        }
        Ok(())
    }

    /// Membership check used by the task and subject read paths.
    pub async fn can_view(&self, group_id: i32, username: &str) -> Result<bool, ServiceError> {
        let user = self.resolve(username).await?;
        if self.members.get(group_id, user.user_id).await?.is_some() {
            return Ok(true);
        }
        Ok(self
            .groups
            .is_admin_or_moderator(group_id, user.user_id)
            .await?)
    }
}
