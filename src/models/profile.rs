//! Profile and project models.
//!
//! Both are owned by the storage collaborator and only referenced by the
//! engine, never mutated.

use serde::{Deserialize, Serialize};

/// Identifier of a [`Profile`].
pub type ProfileId = u64;

/// Identifier of a [`Project`].
pub type ProjectId = u64;

/// A tracked worker whose payroll periods are distributed across projects.
///
/// # Example
///
/// ```
/// use distribution_engine::models::Profile;
///
/// let profile = Profile {
///     id: 1,
///     name: "Ana Ruiz".to_string(),
///     national_id: "12345678Z".to_string(),
/// };
/// assert_eq!(profile.id, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique identifier for the profile.
    pub id: ProfileId,
    /// Display name.
    pub name: String,
    /// Natural key (national identity document), unique across profiles.
    pub national_id: String,
}

/// A cost center or work stream a profile can be allocated to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier for the project.
    pub id: ProjectId,
    /// Display name.
    pub name: String,
}
