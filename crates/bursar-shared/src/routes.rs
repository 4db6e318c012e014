//! The compiled-in table of pages and who may open them

use crate::const_config::path::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub name: &'static str,
    pub path: &'static str,
    pub requires_auth: bool,
    /// The page keeps its state when navigated away from
    pub keep_alive: bool,
}

impl RouteEntry {
    pub const fn public(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            requires_auth: false,
            keep_alive: false,
        }
    }

    pub const fn protected(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            requires_auth: true,
            keep_alive: true,
        }
    }
}

pub const DEFAULT_ROUTES: &[RouteEntry] = &[
    RouteEntry::public("Login", PAGE_LOGIN),
    RouteEntry::public("Forbidden", PAGE_FORBIDDEN),
    RouteEntry::protected("Home", PAGE_HOME),
    RouteEntry::protected("Program", PAGE_PROGRAM),
    RouteEntry::protected("ProgramFreeze", PAGE_PROGRAM_FREEZE),
    RouteEntry::protected("Authorization", PAGE_AUTHORIZATION),
    RouteEntry::protected("Student", PAGE_STUDENT),
    RouteEntry::protected("Invoice", PAGE_INVOICE),
    RouteEntry::protected("Teacher", PAGE_TEACHER),
    RouteEntry::protected("Indicator", PAGE_INDICATOR),
    RouteEntry::protected("Voucher", PAGE_VOUCHER),
    RouteEntry::protected("ApprovalWorkflow", PAGE_APPROVAL_WORKFLOW),
    RouteEntry::protected("MethodOfAccountTitleSummary", PAGE_ACCOUNT_TITLE_SUMMARY),
];

/// Pages an accountant (who is not also an admin or backend user) may open
pub const ACCOUNTANT_ALLOWED_PATHS: &[&str] = &[PAGE_INDICATOR];

/// Ordered route entries plus the accountant allow-list
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    entries: Vec<RouteEntry>,
    accountant_paths: Vec<&'static str>,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ROUTES.to_vec(), ACCOUNTANT_ALLOWED_PATHS.to_vec())
    }
}

impl RoutePolicy {
    pub fn new(entries: Vec<RouteEntry>, accountant_paths: Vec<&'static str>) -> Self {
        Self {
            entries,
            accountant_paths,
        }
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn entry(&self, path: &str) -> Option<&RouteEntry> {
        self.entries.iter().find(|entry| entry.path == path)
    }

    /// Paths not in the table do not require authentication
    pub fn requires_auth(&self, path: &str) -> bool {
        self.entry(path).is_some_and(|entry| entry.requires_auth)
    }

    pub fn is_accountant_allowed(&self, path: &str) -> bool {
        self.accountant_paths.iter().any(|allowed| *allowed == path)
    }

    /// The login and forbidden pages are reachable whatever the table says,
    /// otherwise redirecting to them could loop
    pub fn is_always_public(path: &str) -> bool {
        path == PAGE_LOGIN || path == PAGE_FORBIDDEN
    }
}

/// Where a navigation wants to go. The full path may carry a query and a
/// fragment, access decisions only look at the path part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavTarget {
    full_path: String,
    path_len: usize,
}

impl NavTarget {
    /// A target that does not start with `/` is taken as relative to the root
    pub fn parse(full_path: &str) -> Self {
        let full_path = if full_path.starts_with('/') {
            full_path.to_string()
        } else {
            format!("/{full_path}")
        };
        let path_len = full_path
            .find(|c: char| c == '?' || c == '#')
            .unwrap_or(full_path.len());
        Self {
            full_path,
            path_len,
        }
    }

    pub fn path(&self) -> &str {
        &self.full_path[..self.path_len]
    }

    pub fn full_path(&self) -> &str {
        &self.full_path
    }
}

impl From<&str> for NavTarget {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}
