use std::collections::HashMap;

pub type RouteParams = HashMap<String, String>;

pub const ROUTE_INDEX: &str = "index";
pub const ROUTE_GAME: &str = "game";
pub const ROUTE_LEADERBOARD: &str = "leaderboard";

const ROUTES: [&str; 3] = [ROUTE_INDEX, ROUTE_GAME, ROUTE_LEADERBOARD];

/// Tracks the current symbolic route for the application shell.
///
/// Scenes navigate by name; the shell drains [`Router::take_pending`] once
/// per frame and issues the matching scene switch. Unknown routes are logged
/// and ignored.
pub struct Router {
    current: String,
    params: RouteParams,
    pending: Option<(String, RouteParams)>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            current: ROUTE_INDEX.to_string(),
            params: RouteParams::new(),
            pending: None,
        }
    }

    pub fn navigate_to(&mut self, route: &str, params: RouteParams) {
        if !ROUTES.contains(&route) {
            log::warn!("unknown route: {route}");
            return;
        }
        log::info!("navigating to: {route}");
        self.current = route.to_string();
        self.params = params.clone();
        self.pending = Some((route.to_string(), params));
    }

    /// Game and leaderboard back out to the index; the index stays put.
    pub fn navigate_back(&mut self) {
        if self.current == ROUTE_GAME || self.current == ROUTE_LEADERBOARD {
            log::info!("navigating back");
            self.navigate_to(ROUTE_INDEX, RouteParams::new());
        }
    }

    pub fn current_route(&self) -> &str {
        &self.current
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    /// Route change waiting to be applied by the shell, at most one per frame.
    pub fn take_pending(&mut self) -> Option<(String, RouteParams)> {
        self.pending.take()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
