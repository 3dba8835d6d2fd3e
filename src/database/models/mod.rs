pub mod academic_group;
pub mod application;
pub mod group;
pub mod group_moder;
pub mod group_user;
pub mod subject;
pub mod task;
pub mod user;

pub use academic_group::AcademicGroup;
pub use application::{ApplicationStatus, GroupApplication, PendingApplication, ReviewDecision};
pub use group::{Group, GroupDetail};
pub use group_moder::GroupModer;
pub use group_user::GroupUser;
pub use subject::Subject;
pub use task::{Task, TaskDetail};
pub use user::{User, UserSummary};
