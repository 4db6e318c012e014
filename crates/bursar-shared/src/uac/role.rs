use std::fmt::Display;

use crate::id::GroupId;

pub const GROUP_ADMIN: GroupId = GroupId::new(1);
pub const GROUP_BACKEND_USER: GroupId = GroupId::new(2);
pub const GROUP_ACCOUNTANT: GroupId = GroupId::new(3);

/// Roles are not stored, they follow from the groups a user is a member of
#[derive(
    Debug,
    serde::Serialize,
    serde::Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumCount,
    strum::EnumIter,
)]
pub enum Role {
    Admin,
    BackendUser,
    Accountant,
}

impl Role {
    pub const fn group_id(self) -> GroupId {
        match self {
            Role::Admin => GROUP_ADMIN,
            Role::BackendUser => GROUP_BACKEND_USER,
            Role::Accountant => GROUP_ACCOUNTANT,
        }
    }

    /// Word used to refer to the role in textual permission rules
    pub const fn keyword(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::BackendUser => "backend",
            Role::Accountant => "accountant",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let display_text = match self {
            Role::Admin => "Administrator",
            Role::BackendUser => "Backend User",
            Role::Accountant => "Accountant",
        };
        write!(f, "{display_text}")
    }
}
