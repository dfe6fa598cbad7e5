/// A navigable view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Map,
    About,
}

impl Route {
    /// Views listed in the navigation bar, in order.
    pub const NAV: [Route; 3] = [Route::Home, Route::Map, Route::About];

    /// Resolves a request path to a view, `None` for anything unknown.
    ///
    /// A trailing slash is ignored, so `/map/` resolves to [`Route::Map`].
    ///
    /// # Examples
    ///
    /// ```
    /// use voltpath::web::routes::Route;
    ///
    /// assert_eq!(Route::resolve("/"), Some(Route::Home));
    /// assert_eq!(Route::resolve("/map/"), Some(Route::Map));
    /// assert_eq!(Route::resolve("/about"), Some(Route::About));
    /// assert_eq!(Route::resolve("/contact"), None);
    /// ```
    pub fn resolve(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Self::Home),
            "/map" => Some(Self::Map),
            "/about" => Some(Self::About),
            _ => None,
        }
    }

    /// Canonical relative path.
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Map => "/map",
            Self::About => "/about",
        }
    }

    /// Navigation label and page title.
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Map => "Map",
            Self::About => "About",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_resolve_back_to_their_route() {
        for route in Route::NAV {
            assert_eq!(Route::resolve(route.path()), Some(route));
        }
    }

    #[test]
    fn unknown_paths_do_not_resolve() {
        assert_eq!(Route::resolve("/maps"), None);
        assert_eq!(Route::resolve("/map/extra"), None);
        assert_eq!(Route::resolve("/static/style.css"), None);
    }

    #[test]
    fn paths_are_relative() {
        assert!(Route::NAV.iter().all(|r| r.path().starts_with('/')));
    }
}
