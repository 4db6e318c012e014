use std::{fmt::Display, str::FromStr};

use strum::IntoEnumIterator;

use crate::id::GroupId;

use super::{PermissionsError, Role};

/// Requirement attached to a piece of UI (a button, a menu entry) that decides
/// if it is shown. Evaluated against a session by
/// [`crate::session::Session::is_permitted`]
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub enum PermissionRule {
    RequiresGroup(GroupId),
    RequiresRole(Role),
    /// Same check the route guard uses for the page
    RequiresPath(String),
    RequiresAnyOf(Vec<GroupId>),
}

/// Parses the textual forms used in page templates:
/// - a role keyword (`admin`, `backend`, `accountant`)
/// - a page path (`/invoice`)
/// - a single group id (`3`)
/// - a comma separated list of group ids (`1,2`)
impl FromStr for PermissionRule {
    type Err = PermissionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.starts_with('/') {
            return Ok(Self::RequiresPath(text.to_string()));
        }
        if let Some(role) = Role::iter().find(|role| role.keyword() == text) {
            return Ok(Self::RequiresRole(role));
        }
        if text.contains(',') {
            let groups = text
                .split(',')
                .map(|group| {
                    group.parse().map_err(|_| PermissionsError::InvalidGroup {
                        rule: text.to_string(),
                        group: group.to_string(),
                    })
                })
                .collect::<Result<Vec<GroupId>, _>>()?;
            return Ok(Self::RequiresAnyOf(groups));
        }
        text.parse()
            .map(Self::RequiresGroup)
            .map_err(|_| PermissionsError::UnknownRule(text.to_string()))
    }
}

impl Display for PermissionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionRule::RequiresGroup(group) => write!(f, "{group}"),
            PermissionRule::RequiresRole(role) => write!(f, "{}", role.keyword()),
            PermissionRule::RequiresPath(path) => write!(f, "{path}"),
            PermissionRule::RequiresAnyOf(groups) => {
                let joined: Vec<String> = groups.iter().map(ToString::to_string).collect();
                write!(f, "{}", joined.join(","))
            }
        }
    }
}
