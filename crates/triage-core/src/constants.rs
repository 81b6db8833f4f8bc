/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const PROJECTS_ROUTE_COMPONENT: &str = "projects";
pub const PROJECTS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", PROJECTS_ROUTE_COMPONENT);

pub const MEMBERS_ROUTE_COMPONENT: &str = "members";
pub const TICKETS_ROUTE_COMPONENT: &str = "tickets";
pub const COMMENTS_ROUTE_COMPONENT: &str = "comments";

/// Bounds on the length of a project key.
pub const PROJECT_KEY_MIN_LEN: usize = 2;
pub const PROJECT_KEY_MAX_LEN: usize = 10;

/// Header a trusted reverse proxy uses to pass the authenticated email.
pub const DEFAULT_PROXY_AUTH_HEADER: &str = "x-forwarded-email";
