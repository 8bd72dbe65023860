use std::fmt::Write as _;
use std::str::FromStr;

use crate::errors::CoreError;

/// Every page of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    HomePage,
    Register,
    Login,
    About,
    Dashboard,
    FearGreed,
    Transactions,
    Portfolio,
    Trade,
    Analyze,
    TradingBot,
    Budget,
    Search,
    /// Detail page of one ticker.
    Stock(String),
}

impl Route {
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".into(),
            Route::HomePage => "/HomePage".into(),
            Route::Register => "/register".into(),
            Route::Login => "/login".into(),
            Route::About => "/about".into(),
            Route::Dashboard => "/dashboard".into(),
            Route::FearGreed => "/fear-greed".into(),
            Route::Transactions => "/transactions".into(),
            Route::Portfolio => "/portfolio".into(),
            Route::Trade => "/trade".into(),
            Route::Analyze => "/analyze".into(),
            Route::TradingBot => "/tradingbot".into(),
            Route::Budget => "/budget".into(),
            Route::Search => "/search".into(),
            Route::Stock(ticker) => format!("/stocks/{ticker}"),
        }
    }

    /// Pages that require a logged-in user.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        !matches!(
            self,
            Route::Home | Route::HomePage | Route::Register | Route::Login | Route::About
        )
    }

    /// Landing pages that a logged-in user is sent past.
    #[must_use]
    pub fn is_guest_only(&self) -> bool {
        matches!(self, Route::Home | Route::HomePage | Route::Register)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = match s.trim() {
            "" | "/" => "/",
            other => other.trim_end_matches('/'),
        };
        let route = match path {
            "/" => Route::Home,
            "/HomePage" => Route::HomePage,
            "/register" => Route::Register,
            "/login" => Route::Login,
            "/about" => Route::About,
            "/dashboard" => Route::Dashboard,
            "/fear-greed" => Route::FearGreed,
            "/transactions" => Route::Transactions,
            "/portfolio" => Route::Portfolio,
            "/trade" => Route::Trade,
            "/analyze" => Route::Analyze,
            "/tradingbot" => Route::TradingBot,
            "/budget" => Route::Budget,
            "/search" => Route::Search,
            other => match other.strip_prefix("/stocks/") {
                Some(ticker) if !ticker.is_empty() && !ticker.contains('/') => {
                    Route::Stock(ticker.to_uppercase())
                }
                _ => return Err(CoreError::Validation(format!("Unknown route '{s}'"))),
            },
        };
        Ok(route)
    }
}

/// What to do when a route is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// The session is still being resolved.
    ShowLoading,
    Render,
    RedirectToLogin,
    RedirectToDashboard,
}

/// One `<url>` entry of the sitemap.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapLink {
    pub path: &'static str,
    pub change_freq: &'static str,
    pub priority: f64,
}

/// Pages advertised to crawlers.
pub const SITEMAP_LINKS: [SitemapLink; 3] = [
    SitemapLink {
        path: "/",
        change_freq: "daily",
        priority: 1.0,
    },
    SitemapLink {
        path: "/portfolio",
        change_freq: "weekly",
        priority: 0.8,
    },
    SitemapLink {
        path: "/about",
        change_freq: "monthly",
        priority: 0.5,
    },
];

/// Route guarding and sitemap generation.
pub struct NavigationService;

impl NavigationService {
    pub fn new() -> Self {
        Self
    }

    /// Decide how to handle `route`.
    ///
    /// Protected pages wait while the session is loading and send
    /// anonymous visitors to the login page. Landing pages send logged-in
    /// users to the dashboard.
    #[must_use]
    pub fn guard(&self, route: &Route, loading: bool, authenticated: bool) -> RouteDecision {
        if route.is_protected() {
            if loading {
                RouteDecision::ShowLoading
            } else if authenticated {
                RouteDecision::Render
            } else {
                RouteDecision::RedirectToLogin
            }
        } else if authenticated && route.is_guest_only() {
            RouteDecision::RedirectToDashboard
        } else {
            RouteDecision::Render
        }
    }

    /// sitemap.xml for `site_url`.
    pub fn generate_sitemap(&self, site_url: &str) -> Result<String, CoreError> {
        let base = site_url.trim().trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(CoreError::Config(format!(
                "Sitemap hostname must be an http(s) URL, got '{site_url}'"
            )));
        }

        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
        );
        for link in &SITEMAP_LINKS {
            // Writing to a String cannot fail.
            let _ = write!(
                xml,
                "  <url>\n    <loc>{}</loc>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
                escape_xml(&format!("{base}{}", link.path)),
                link.change_freq,
                link.priority,
            );
        }
        xml.push_str("</urlset>\n");
        Ok(xml)
    }
}

impl Default for NavigationService {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
