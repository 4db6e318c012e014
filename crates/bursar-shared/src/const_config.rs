//! Stores settings that are not expected to need to change but grouped together
//! for discoverability and reuse. Each constant should be prefixed by the module
//! name to allow importing the constant only and still be readable

pub mod client {
    /// Used when the configuration does not provide an address
    pub const CLIENT_DEFAULT_SERVER_ADDRESS: &str = "http://localhost:8000";
    pub const CLIENT_DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
}

pub mod storage {
    /// Key the raw session token is persisted under
    pub const STORAGE_KEY_TOKEN: &str = "token";
    /// Key the JSON serialized identity is persisted under
    pub const STORAGE_KEY_IDENTITY: &str = "identity";
}

pub mod query {
    /// Query parameter carrying the page to return to after logging in
    pub const QUERY_REDIRECT: &str = "redirect";
}

pub mod path {
    mod path_spec;
    pub use path_spec::PathSpec;

    // Authentication service endpoints
    pub const PATH_API_LOGIN: PathSpec = PathSpec::post("/login");
    pub const PATH_API_CURRENT_USER: PathSpec = PathSpec::get("/login/me");

    // Pages
    pub const PAGE_LOGIN: &str = "/login";
    pub const PAGE_FORBIDDEN: &str = "/forbidden";
    pub const PAGE_HOME: &str = "/";
    pub const PAGE_PROGRAM: &str = "/program";
    pub const PAGE_PROGRAM_FREEZE: &str = "/program_freeze";
    pub const PAGE_AUTHORIZATION: &str = "/authorization";
    pub const PAGE_STUDENT: &str = "/student";
    pub const PAGE_INVOICE: &str = "/invoice";
    pub const PAGE_TEACHER: &str = "/teacher";
    pub const PAGE_INDICATOR: &str = "/indicator";
    pub const PAGE_VOUCHER: &str = "/voucher";
    pub const PAGE_APPROVAL_WORKFLOW: &str = "/approval_workflow";
    pub const PAGE_ACCOUNT_TITLE_SUMMARY: &str = "/method_of_account_title_summary";
}
