//! GitHub user search requests and result page checks.
//!
//! [`UserSearch`] guards its parameters with an [`ErrorBuilder`] before
//! building the search query, and [`check_results_page`] classifies a fetched
//! result page before it is handed on for parsing.

use tracing::debug;
use url::form_urlencoded;

use crate::builder::ErrorBuilder;
use crate::outcome::{Outcome, StatusCode};

/// Base address of the GitHub search page.
pub const SEARCH_URL: &str = "https://github.com/search";

const NO_USERS_BANNER: &str = "We couldn’t find any users matching";

const RESULT_MARKERS: [&str; 3] = [
    "user_search_results",
    "user-list",
    "user-list-item py-4 d-flex hx_hit-user",
];

/// Parameters of a GitHub user search.
///
/// # Example
///
/// ```rust
/// use inquest::{StatusCode, UserSearch};
///
/// let search = UserSearch {
///     locations: vec!["Lisbon".to_string()],
///     languages: vec!["Rust".to_string()],
///     repositories: 5,
///     followers: 10,
/// };
/// assert_eq!(
///     search.query().value().map(String::as_str),
///     Some("?q=location%3A\"Lisbon\"+language%3A\"Rust\"+followers%3A>%3D10+repos%3A>%3D5")
/// );
///
/// let empty = UserSearch::default();
/// assert_eq!(empty.query().status(), StatusCode::BadRequest);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSearch {
    /// Locations to search in. At least one is required, none may be blank.
    pub locations: Vec<String>,
    /// Languages to filter by. Optional, but none may be blank.
    pub languages: Vec<String>,
    /// Minimum number of public repositories.
    pub repositories: u32,
    /// Minimum number of followers.
    pub followers: u32,
}

impl UserSearch {
    /// Builds the query string, or a `BadRequest` failure for invalid parameters.
    ///
    /// Locations and languages are form-url-encoded.
    pub fn query(&self) -> Outcome<String> {
        let mut errors = ErrorBuilder::new();

        let guarded = errors
            .assert(
                !self.locations.is_empty() && self.locations.iter().all(|l| !is_blank(l)),
                "location can not be null",
            )
            .and_then(|_| {
                errors.assert(
                    self.languages.iter().all(|l| !is_blank(l)),
                    "language list can not have null item",
                )
            });

        if let Err(err) = guarded {
            return err.into();
        }

        if errors.has_errors() {
            debug!(errors = errors.count(), "rejected user search");
            return Outcome::failure(StatusCode::BadRequest, errors);
        }

        let mut query = String::from("?q=");
        for location in &self.locations {
            query.push_str(&format!("location%3A\"{}\"+", encode(location)));
        }
        for language in &self.languages {
            query.push_str(&format!("language%3A\"{}\"+", encode(language)));
        }
        query.push_str(&format!(
            "followers%3A>%3D{}+repos%3A>%3D{}",
            self.followers, self.repositories
        ));

        Outcome::Success(query)
    }

    /// Builds the full search URL.
    pub fn url(&self) -> Outcome<String> {
        self.query().map(|query| format!("{SEARCH_URL}{query}"))
    }
}

/// Classifies a fetched search result page.
///
/// A blank page is an `Error`, a page reporting no matches is `NotFound`,
/// and a page missing the user list markup is an `InvalidPage`. Otherwise
/// the page is returned unchanged.
pub fn check_results_page(html: &str) -> Outcome<&str> {
    let mut errors = ErrorBuilder::new();

    let checks = [
        (!is_blank(html), "html is null or empty", StatusCode::Error),
        (
            !html.contains(NO_USERS_BANNER),
            "not found any users",
            StatusCode::NotFound,
        ),
        (
            RESULT_MARKERS.iter().all(|marker| html.contains(marker)),
            "Invalid page",
            StatusCode::InvalidPage,
        ),
    ];

    for (passed, message, status) in checks {
        match errors.assert(passed, message) {
            Ok(true) => {}
            Ok(false) => {
                debug!(%status, "rejected result page");
                return Outcome::failure(status, errors);
            }
            Err(err) => return err.into(),
        }
    }

    Outcome::Success(html)
}

/// Classifies an HTTP response to a search request, then its page.
pub fn read_results(status: u16, body: &str) -> Outcome<String> {
    Outcome::from_response(status, body)
        .and_then(|html| check_results_page(&html).map(str::to_string))
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
