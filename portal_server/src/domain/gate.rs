use crate::domain::cookies::RequestCookies;

pub const ADMIN_ROOT_PATH: &str = "/admin";
pub const LOGIN_PATH: &str = "/admin/login";
pub const DASHBOARD_PATH: &str = "/admin/dashboard";

/// How the gate treats a request path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteCategory {
    Public,
    Login,
    Protected,
    AdminRoot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectLogin,
    RedirectDashboard,
}

/// Gate decision plus any cookies the identity provider rotated while
/// verifying the session. Rotated cookies must reach the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateOutcome {
    pub decision: GateDecision,
    pub subject: Option<String>,
    pub set_cookies: Vec<String>,
}

impl GateOutcome {
    pub fn allow() -> Self {
        Self {
            decision: GateDecision::Allow,
            subject: None,
            set_cookies: Vec::new(),
        }
    }

    pub fn redirect_login() -> Self {
        Self {
            decision: GateDecision::RedirectLogin,
            subject: None,
            set_cookies: Vec::new(),
        }
    }
}

/// Everything the gate may look at for one request.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    pub path: String,
    pub cookies: RequestCookies,
}

impl RequestContext {
    pub fn new(path: impl Into<String>, cookies: RequestCookies) -> Self {
        Self {
            path: path.into(),
            cookies,
        }
    }
}

pub fn categorize(path: &str) -> RouteCategory {
    if path == ADMIN_ROOT_PATH || path == "/admin/" {
        return RouteCategory::AdminRoot;
    }
    if path == LOGIN_PATH || path.starts_with("/admin/login/") {
        return RouteCategory::Login;
    }
    if path.starts_with("/admin/") {
        return RouteCategory::Protected;
    }
    RouteCategory::Public
}
