//! Group membership and application review workflow.
//!
//! The one real state machine in the system: a join application is
//! created `pending` and transitions exactly once to `approved` or
//! `rejected` by an admin or moderator of the group. Approval also
//! creates the membership row.

use crate::database::models::{GroupApplication, PendingApplication, ReviewDecision};
use crate::services::ServiceError;
use crate::store::{ApplicationStore, GroupStore, IdentityStore, MembershipStore, StoreError};

pub struct ApplicationService<I, G, M, A> {
    identities: I,
    groups: G,
    memberships: M,
    applications: A,
}

impl<I, G, M, A> ApplicationService<I, G, M, A>
where
    I: IdentityStore,
    G: GroupStore,
    M: MembershipStore,
    A: ApplicationStore,
{
    pub fn new(identities: I, groups: G, memberships: M, applications: A) -> Self {
        Self {
            identities,
            groups,
            memberships,
            applications,
        }
    }

    /// A user asks to join a group. Fails if they already belong to it
    /// or already have a pending application for it.
    pub async fn apply(
        &self,
        username: &str,
        group_id: i32,
        message: &str,
    ) -> Result<GroupApplication, ServiceError> {
        let user = self
            .identities
            .by_username(username)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))?;

        if self.memberships.is_member(group_id, user.user_id).await? {
            return Err(ServiceError::AlreadyMember);
        }

        if self
            .applications
            .exists_pending(group_id, user.user_id)
            .await?
        {
            return Err(ServiceError::DuplicateApplication);
        }

        // Two concurrent applies can both pass the check above; the
        // store's pending-uniqueness constraint settles the race and
        // the loser sees the same error a sequential duplicate would.
        match self.applications.create(group_id, user.user_id, message).await {
            Ok(application) => Ok(application),
            Err(StoreError::Conflict) => Err(ServiceError::DuplicateApplication),
            Err(e) => Err(e.into()),
        }
    }

    /// An admin or moderator decides a pending application. Approval
    /// also inserts the membership row, atomically with the status
    /// change. Applications already decided cannot be reviewed again.
    pub async fn review(
        &self,
        group_id: i32,
        target_username: &str,
        reviewer_username: &str,
        decision: &str,
    ) -> Result<GroupApplication, ServiceError> {
        let decision = ReviewDecision::parse(decision)
            .ok_or_else(|| ServiceError::InvalidStatus(decision.to_string()))?;

        let reviewer = self
            .identities
            .by_username(reviewer_username)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound(reviewer_username.to_string()))?;

        let target = self
            .identities
            .by_username(target_username)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound(target_username.to_string()))?;

        if !self
            .groups
            .is_admin_or_moderator(group_id, reviewer.user_id)
            .await?
        {
            return Err(ServiceError::Unauthorized);
        }

        let mut application = self
            .applications
            .pending_application(group_id, target.user_id)
            .await?
            .ok_or(ServiceError::ApplicationNotFound)?;

        match decision {
            ReviewDecision::Approved => self.applications.approve(&application).await?,
            ReviewDecision::Rejected => {
                self.applications.reject(application.application_id).await?
            }
        }

        application.status = decision.status();
        Ok(application)
    }

    /// All pending applications across the groups the user administers
    /// or moderates, in group order.
    pub async fn pending_for_reviewer(
        &self,
        username: &str,
    ) -> Result<Vec<PendingApplication>, ServiceError> {
        let user = self
            .identities
            .by_username(username)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))?;

        let managed = self.groups.managed_by(user.user_id).await?;

        let mut pending = Vec::new();
        for group in managed {
            pending.extend(self.applications.pending_by_group(group.id).await?);
        }
        Ok(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    use crate::database::models::{ApplicationStatus, Group, GroupUser, User};

    fn user(id: i32, username: &str) -> User {
        User {
            user_id: id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "x".to_string(),
            created_at: Utc::now(),
        }
    }

    struct MemIdentities {
        users: Vec<User>,
    }

    #[async_trait]
    impl IdentityStore for MemIdentities {
        async fn by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
            Ok(self.users.iter().find(|u| u.username == username).cloned())
        }

        async fn by_username_or_email(
            &self,
            username: &str,
            email: &str,
        ) -> Result<Option<User>, StoreError> {
            Ok(self
                .users
                .iter()
                .find(|u| u.username == username || u.email == email)
                .cloned())
        }

        async fn create(
            &self,
            username: &str,
            email: &str,
            password_hash: &str,
        ) -> Result<User, StoreError> {
            Ok(User {
                user_id: 999,
                username: username.to_string(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                created_at: Utc::now(),
            })
        }
    }

    struct MemGroups {
        groups: Vec<Group>,
        moderators: Vec<(i32, i32)>,
    }

    #[async_trait]
    impl GroupStore for MemGroups {
        async fn is_admin_or_moderator(
            &self,
            group_id: i32,
            user_id: i32,
        ) -> Result<bool, StoreError> {
            let admin = self
                .groups
                .iter()
                .any(|g| g.id == group_id && g.admin_id == user_id);
            let moderator = self.moderators.contains(&(group_id, user_id));
            Ok(admin || moderator)
        }

        async fn managed_by(&self, user_id: i32) -> Result<Vec<Group>, StoreError> {
            Ok(self
                .groups
                .iter()
                .filter(|g| {
                    g.admin_id == user_id || self.moderators.contains(&(g.id, user_id))
                })
                .cloned()
                .collect())
        }
    }

    struct MemMemberships {
        members: Mutex<Vec<(i32, i32)>>,
    }

    #[async_trait]
    impl MembershipStore for MemMemberships {
        async fn is_member(&self, group_id: i32, user_id: i32) -> Result<bool, StoreError> {
            Ok(self
                .members
                .lock()
                .unwrap()
                .contains(&(group_id, user_id)))
        }
    }

    #[derive(Default)]
    struct MemApplications {
        rows: Mutex<Vec<GroupApplication>>,
        memberships: Mutex<Vec<(i32, i32, String)>>,
        next_id: Mutex<i32>,
    }

    #[async_trait]
    impl ApplicationStore for MemApplications {
        async fn create(
            &self,
            group_id: i32,
            user_id: i32,
            message: &str,
        ) -> Result<GroupApplication, StoreError> {
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|a| {
                a.group_id == group_id
                    && a.user_id == user_id
                    && a.status == ApplicationStatus::Pending
            }) {
                return Err(StoreError::Conflict);
            }
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            let application = GroupApplication {
                application_id: *next,
                group_id,
                user_id,
                message: message.to_string(),
                status: ApplicationStatus::Pending,
                created_at: Utc::now(),
            };
            rows.push(application.clone());
            Ok(application)
        }

        async fn exists_pending(&self, group_id: i32, user_id: i32) -> Result<bool, StoreError> {
            Ok(self.rows.lock().unwrap().iter().any(|a| {
                a.group_id == group_id
                    && a.user_id == user_id
                    && a.status == ApplicationStatus::Pending
            }))
        }

        async fn pending_by_group(
            &self,
            group_id: i32,
        ) -> Result<Vec<PendingApplication>, StoreError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|a| a.group_id == group_id && a.status == ApplicationStatus::Pending)
                .map(|a| PendingApplication {
                    application_id: a.application_id,
                    group_id: a.group_id,
                    user_id: a.user_id,
                    username: format!("user-{}", a.user_id),
                    message: a.message.clone(),
                    status: a.status,
                    created_at: a.created_at,
                })
                .collect())
        }

        async fn pending_application(
            &self,
            group_id: i32,
            user_id: i32,
        ) -> Result<Option<GroupApplication>, StoreError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|a| {
                    a.group_id == group_id
                        && a.user_id == user_id
                        && a.status == ApplicationStatus::Pending
                })
                .cloned())
        }

        async fn approve(&self, application: &GroupApplication) -> Result<(), StoreError> {
            let mut rows = self.rows.lock().unwrap();
            if let Some(row) = rows
                .iter_mut()
                .find(|a| a.application_id == application.application_id)
            {
                row.status = ApplicationStatus::Approved;
            }
            self.memberships.lock().unwrap().push((
                application.group_id,
                application.user_id,
                GroupUser::ROLE_MEMBER.to_string(),
            ));
            Ok(())
        }

        async fn reject(&self, application_id: i32) -> Result<(), StoreError> {
            let mut rows = self.rows.lock().unwrap();
            if let Some(row) = rows.iter_mut().find(|a| a.application_id == application_id) {
                row.status = ApplicationStatus::Rejected;
            }
            Ok(())
        }
    }

    const GROUP: i32 = 7;
    const ADMIN: i32 = 1;
    const MODERATOR: i32 = 2;

    fn service(
        members: Vec<(i32, i32)>,
    ) -> ApplicationService<MemIdentities, MemGroups, MemMemberships, MemApplications> {
        let identities = MemIdentities {
            users: vec![
                user(ADMIN, "bob"),
                user(MODERATOR, "dave"),
                user(3, "alice"),
                user(4, "carol"),
                user(5, "erin"),
            ],
        };
        let groups = MemGroups {
            groups: vec![Group {
                id: GROUP,
                name: "algorithms".to_string(),
                academic_group_id: 1,
                admin_id: ADMIN,
                created_at: Utc::now(),
            }],
            moderators: vec![(GROUP, MODERATOR)],
        };
        let memberships = MemMemberships {
            members: Mutex::new(members),
        };
        ApplicationService::new(identities, groups, memberships, MemApplications::default())
    }

    #[tokio::test]
    async fn apply_creates_a_pending_application() {
        let svc = service(vec![]);
        let application = svc.apply("alice", GROUP, "let me in").await.unwrap();
        assert_eq!(application.group_id, GROUP);
        assert_eq!(application.status, ApplicationStatus::Pending);
        assert_eq!(application.message, "let me in");
    }

    #[tokio::test]
    async fn second_apply_before_review_is_a_duplicate() {
        let svc = service(vec![]);
        svc.apply("alice", GROUP, "first").await.unwrap();
        let err = svc.apply("alice", GROUP, "second").await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateApplication));
        // Still exactly one pending row for the pair.
        assert_eq!(svc.applications.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn members_cannot_apply() {
        let svc = service(vec![(GROUP, 3)]);
        let err = svc.apply("alice", GROUP, "again").await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyMember));
    }

    #[tokio::test]
    async fn unknown_applicant_is_not_found() {
        let svc = service(vec![]);
        let err = svc.apply("nobody", GROUP, "hi").await.unwrap_err();
        assert!(matches!(err, ServiceError::UserNotFound(_)));
    }

    /// Store whose duplicate check always passes but whose insert
    /// conflicts, the shape a lost apply/apply race takes.
    struct RacingApplications(MemApplications);

    #[async_trait]
    impl ApplicationStore for RacingApplications {
        async fn create(
            &self,
            _group_id: i32,
            _user_id: i32,
            _message: &str,
        ) -> Result<GroupApplication, StoreError> {
            Err(StoreError::Conflict)
        }

        async fn exists_pending(&self, _group_id: i32, _user_id: i32) -> Result<bool, StoreError> {
            Ok(false)
        }

        async fn pending_by_group(
            &self,
            group_id: i32,
        ) -> Result<Vec<PendingApplication>, StoreError> {
            self.0.pending_by_group(group_id).await
        }

        async fn pending_application(
            &self,
            group_id: i32,
            user_id: i32,
        ) -> Result<Option<GroupApplication>, StoreError> {
            self.0.pending_application(group_id, user_id).await
        }

        async fn approve(&self, application: &GroupApplication) -> Result<(), StoreError> {
            self.0.approve(application).await
        }

        async fn reject(&self, application_id: i32) -> Result<(), StoreError> {
            self.0.reject(application_id).await
        }
    }

    #[tokio::test]
    async fn lost_apply_race_surfaces_as_duplicate() {
        let base = service(vec![]);
        let svc = ApplicationService::new(
            base.identities,
            base.groups,
            base.memberships,
            RacingApplications(MemApplications::default()),
        );
        let err = svc.apply("alice", GROUP, "raced").await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateApplication));
    }

    #[tokio::test]
    async fn admin_approval_creates_membership() {
        let svc = service(vec![]);
        svc.apply("alice", GROUP, "").await.unwrap();

        let reviewed = svc.review(GROUP, "alice", "bob", "approved").await.unwrap();
        assert_eq!(reviewed.status, ApplicationStatus::Approved);

        let memberships = svc.applications.memberships.lock().unwrap();
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0], (GROUP, 3, "member".to_string()));
    }

    #[tokio::test]
    async fn moderator_rejection_creates_no_membership() {
        let svc = service(vec![]);
        svc.apply("erin", GROUP, "").await.unwrap();

        let reviewed = svc.review(GROUP, "erin", "dave", "rejected").await.unwrap();
        assert_eq!(reviewed.status, ApplicationStatus::Rejected);
        assert!(svc.applications.memberships.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn outsiders_cannot_review() {
        let svc = service(vec![]);
        svc.apply("alice", GROUP, "").await.unwrap();

        let err = svc
            .review(GROUP, "alice", "carol", "approved")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized));

        // The application is untouched.
        let rows = svc.applications.rows.lock().unwrap();
        assert_eq!(rows[0].status, ApplicationStatus::Pending);
    }

    #[tokio::test]
    async fn invalid_decision_changes_nothing() {
        let svc = service(vec![]);
        svc.apply("alice", GROUP, "").await.unwrap();

        let err = svc.review(GROUP, "alice", "bob", "maybe").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidStatus(_)));

        let rows = svc.applications.rows.lock().unwrap();
        assert_eq!(rows[0].status, ApplicationStatus::Pending);
        assert!(svc.applications.memberships.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn decided_applications_cannot_be_reviewed_again() {
        let svc = service(vec![]);
        svc.apply("alice", GROUP, "").await.unwrap();
        svc.review(GROUP, "alice", "bob", "approved").await.unwrap();

        let err = svc
            .review(GROUP, "alice", "bob", "rejected")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ApplicationNotFound));

        let rows = svc.applications.rows.lock().unwrap();
        assert_eq!(rows[0].status, ApplicationStatus::Approved);
    }

    #[tokio::test]
    async fn review_without_a_pending_application_is_not_found() {
        let svc = service(vec![]);
        let err = svc
            .review(GROUP, "alice", "bob", "approved")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ApplicationNotFound));
    }

    #[tokio::test]
    async fn pending_listing_covers_managed_groups_only() {
        let svc = service(vec![]);
        svc.apply("alice", GROUP, "one").await.unwrap();
        svc.apply("erin", GROUP, "two").await.unwrap();

        let for_admin = svc.pending_for_reviewer("bob").await.unwrap();
        assert_eq!(for_admin.len(), 2);

        let for_moderator = svc.pending_for_reviewer("dave").await.unwrap();
        assert_eq!(for_moderator.len(), 2);

        // carol manages nothing.
        let for_outsider = svc.pending_for_reviewer("carol").await.unwrap();
        assert!(for_outsider.is_empty());
    }

    #[tokio::test]
    async fn reapply_after_rejection_is_allowed() {
        let svc = service(vec![]);
        svc.apply("alice", GROUP, "first try").await.unwrap();
        svc.review(GROUP, "alice", "bob", "rejected").await.unwrap();

        let second = svc.apply("alice", GROUP, "second try").await.unwrap();
        assert_eq!(second.status, ApplicationStatus::Pending);
    }
}
