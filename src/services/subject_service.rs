use crate::database::models::Subject;
use crate::repositories::{AcademicGroupRepository, SubjectRepository, UserRepository};
use crate::services::ServiceError;
use crate::store::{IdentityStore, StoreError};

/// Subjects belong to academic groups and are shared course-wide, so
/// there is no per-group authorization here beyond authentication.
pub struct SubjectService {
    subjects: SubjectRepository,
    academic_groups: AcademicGroupRepository,
    users: UserRepository,
}

impl SubjectService {
    pub fn new(
        subjects: SubjectRepository,
        academic_groups: AcademicGroupRepository,
        users: UserRepository,
    ) -> Self {
        Self {
            subjects,
            academic_groups,
            users,
        }
    }

    pub async fn create(
        &self,
        name: &str,
        academic_group_id: i32,
    ) -> Result<Subject, ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::MissingField("name"));
        }
        self.academic_groups
            .by_id(academic_group_id)
            .await?
            .ok_or(ServiceError::AcademicGroupNotFound(academic_group_id))?;

        match self.subjects.create(name, academic_group_id).await {
            Ok(subject) => Ok(subject),
            Err(StoreError::Conflict) => Err(ServiceError::NameTaken),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get(&self, subject_id: i32) -> Result<Subject, ServiceError> {
        self.subjects
            .by_id(subject_id)
            .await?
            .ok_or(ServiceError::SubjectNotFound(subject_id))
    }

    pub async fn rename(&self, subject_id: i32, name: &str) -> Result<(), ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::MissingField("name"));
        }
        if !self.subjects.update_name(subject_id, name).await? {
            return Err(ServiceError::SubjectNotFound(subject_id));
        }
        Ok(())
    }

    pub async fn delete(&self, subject_id: i32) -> Result<(), ServiceError> {
        if !self.subjects.delete(subject_id).await? {
            return Err(ServiceError::SubjectNotFound(subject_id));
        }
        Ok(())
    }

    /// Subjects across the caller's groups' academic groups.
    pub async fn for_user(
        &self,
        username: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Subject>, i64), ServiceError> {
        let user = self
            .users
            .by_username(username)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))?;
        Ok(self.subjects.by_user_groups(user.user_id, limit, offset).await?)
    }

    pub async fn by_academic_group(
        &self,
        academic_group_id: i32,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Subject>, i64), ServiceError> {
        self.academic_groups
            .by_id(academic_group_id)
            .await?
            .ok_or(ServiceError::AcademicGroupNotFound(academic_group_id))?;
        Ok(self
            .subjects
            .by_academic_group(academic_group_id, limit, offset)
            .await?)
    }
}
