#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route
{
    Home,
    Login,
    Signup,
    Words,
    Practice,
}

impl Route
{
    pub const ALL: [Route; 5] = [
        Route::Home,
        Route::Login,
        Route::Signup,
        Route::Words,
        Route::Practice,
    ];

    pub fn path(self) -> &'static str
    {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Words => "/words",
            Route::Practice => "/practice",
        }
    }

    /// Accepts the path form (`/words`) or the bare command name (`words`).
    pub fn parse(value: &str) -> Option<Self>
    {
        let trimmed = value.trim();
        let name = trimmed.strip_prefix('/').unwrap_or(trimmed);
        Route::ALL
            .into_iter()
            .find(|route| route.path().trim_start_matches('/').eq_ignore_ascii_case(name))
    }

    pub fn requires_auth(self) -> bool
    {
        matches!(self, Route::Words | Route::Practice)
    }

    /// Guarded routes send signed-out users to the login screen.
    pub fn guard(self, authenticated: bool) -> Route
    {
        if self.requires_auth() && !authenticated {
            Route::Login
        } else {
            self
        }
    }

    /// Menu entries shown for the current auth state, in display order.
    pub fn menu(authenticated: bool) -> &'static [Route]
    {
        if authenticated {
            &[Route::Words, Route::Practice]
        } else {
            &[Route::Login, Route::Signup]
        }
    }

    pub fn label(self) -> &'static str
    {
        match self {
            Route::Home => "Home",
            Route::Login => "Log in",
            Route::Signup => "Sign up",
            Route::Words => "Manage words",
            Route::Practice => "Typing practice",
        }
    }

    /// One line per route for `vocab-typing routes`.
    pub fn describe_all() -> Vec<String>
    {
        Route::ALL
            .iter()
            .map(|route| {
                let access = if route.requires_auth() { "login required" } else { "public" };
                format!("{:<10} {:<16} {}", route.path(), route.label(), access)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn parse_accepts_path_and_name()
    {
        assert_eq!(Route::parse("/practice"), Some(Route::Practice));
        assert_eq!(Route::parse("words"), Some(Route::Words));
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse("/admin"), None);
    }

    #[test]
    fn every_route_round_trips_through_its_path()
    {
        for route in Route::ALL {
            assert_eq!(Route::parse(route.path()), Some(route));
        }
    }

    #[test]
    fn guarded_routes_redirect_to_login()
    {
        assert_eq!(Route::Words.guard(false), Route::Login);
        assert_eq!(Route::Practice.guard(false), Route::Login);
        assert_eq!(Route::Practice.guard(true), Route::Practice);
        assert_eq!(Route::Signup.guard(false), Route::Signup);
        assert_eq!(Route::Home.guard(false), Route::Home);
    }

    #[test]
    fn listing_covers_every_route_with_access()
    {
        let lines = Route::describe_all();
        assert_eq!(lines.len(), Route::ALL.len());
        assert_eq!(lines[0], "/          Home             public");
        assert_eq!(lines[4], "/practice  Typing practice  login required");
        assert!(lines[3].starts_with("/words") && lines[3].ends_with("login required"));
    }

    #[test]
    fn menu_depends_on_session()
    {
        assert_eq!(Route::menu(true), &[Route::Words, Route::Practice]);
        assert_eq!(Route::menu(false), &[Route::Login, Route::Signup]);
    }
}
