//! Reference parsing and identity wrappers for statistics queries.
//!
//! Repository references arrive as free-form user input (`owner/repo`,
//! `github.com/owner/repo`, or a full URL) and are normalised into a
//! [`RepositoryLocator`] before any request is issued. Profile queries go
//! through [`Username`] in the same way.

use url::Url;

use super::error::StatsError;

/// Hostname whose repository URLs are understood.
const GITHUB_HOST: &str = "github.com";

/// Longest login GitHub accepts.
const MAX_USERNAME_LENGTH: usize = 39;

const BOT_SUFFIX: &str = "[bot]";

/// Characters GitHub permits in owner and repository names.
const fn is_name_char(character: char) -> bool {
    character.is_ascii_alphanumeric() || matches!(character, '_' | '.' | '-')
}

fn is_valid_name(value: &str) -> bool {
    !value.is_empty() && value != "." && value != ".." && value.chars().all(is_name_char)
}

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, StatsError> {
        if !is_valid_name(value) {
            return Err(StatsError::invalid_reference(
                value,
                "owner must be letters, digits, `-`, `_` or `.`",
            ));
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, StatsError> {
        if !is_valid_name(value) {
            return Err(StatsError::invalid_reference(
                value,
                "repository name must be letters, digits, `-`, `_` or `.`",
            ));
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::Configuration` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, StatsError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(StatsError::Configuration {
                message: "personal access token must not be blank".to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Strips surrounding whitespace, a trailing `.git` (with or without a
/// slash) and a single trailing slash.
fn normalise_reference(input: &str) -> &str {
    let trimmed = input.trim();
    let without_git = trimmed
        .strip_suffix(".git/")
        .or_else(|| trimmed.strip_suffix(".git"))
        .unwrap_or(trimmed);
    without_git.strip_suffix('/').unwrap_or(without_git)
}

fn is_github_host(host: &str) -> bool {
    let lowered = host.to_ascii_lowercase();
    lowered == GITHUB_HOST || lowered.ends_with(".github.com")
}

/// Parses `input` as a URL, prepending `https://` when no scheme is given.
fn parse_github_url(input: &str, original: &str) -> Result<Url, StatsError> {
    let candidate = if input.starts_with("http") {
        input.to_owned()
    } else {
        format!("https://{input}")
    };

    let parsed = Url::parse(&candidate)
        .map_err(|error| StatsError::invalid_reference(original, error.to_string()))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| StatsError::invalid_reference(original, "URL must include a host"))?;

    if !is_github_host(host) {
        return Err(StatsError::invalid_reference(
            original,
            format!("host `{host}` is not {GITHUB_HOST}"),
        ));
    }

    Ok(parsed)
}

/// A repository identified by owner and name.
///
/// # Example
///
/// ```
/// use prstats::RepositoryLocator;
///
/// let locator = RepositoryLocator::parse("https://github.com/octo/repo.git")
///     .expect("should parse repository URL");
/// assert_eq!(locator.owner().as_str(), "octo");
/// assert_eq!(locator.repository().as_str(), "repo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryLocator {
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Creates a repository locator from owner and repository name strings.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::InvalidReference` when either part is empty or
    /// contains characters GitHub does not allow.
    pub fn from_owner_repo(owner: &str, repo: &str) -> Result<Self, StatsError> {
        Ok(Self {
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repo)?,
        })
    }

    /// Parses a free-form repository reference.
    ///
    /// Accepted forms, tried in order:
    ///
    /// 1. `owner/repo`
    /// 2. `github.com/owner/repo[/...]`
    /// 3. any URL (scheme optional) on `github.com` or one of its subdomains
    ///    whose path has at least two segments
    ///
    /// A trailing `.git` and trailing slash are ignored in every form. No
    /// network access happens here.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::InvalidReference` when none of the forms match,
    /// the host is not GitHub, or the owner/repository segments are invalid.
    pub fn parse(input: &str) -> Result<Self, StatsError> {
        let normalised = normalise_reference(input);
        if normalised.is_empty() {
            return Err(StatsError::invalid_reference(
                input,
                "repository reference is empty",
            ));
        }

        if let Some((owner, repo)) = normalised.split_once('/')
            && is_valid_name(owner)
            && is_valid_name(repo)
        {
            return Self::from_owner_repo(owner, repo);
        }

        if let Some(path) = normalised.strip_prefix("github.com/") {
            let mut segments = path.split('/');
            if let (Some(owner), Some(repo)) = (segments.next(), segments.next())
                && is_valid_name(owner)
                && is_valid_name(repo)
            {
                return Self::from_owner_repo(owner, repo);
            }
        }

        let parsed = parse_github_url(normalised, input)?;
        let mut segments = parsed
            .path_segments()
            .into_iter()
            .flatten()
            .filter(|segment| !segment.is_empty());

        match (segments.next(), segments.next()) {
            (Some(owner), Some(repo)) => Self::from_owner_repo(owner, repo).map_err(|_| {
                StatsError::invalid_reference(input, "owner or repository segment is invalid")
            }),
            _ => Err(StatsError::invalid_reference(
                input,
                "expected a path of the form /owner/repo",
            )),
        }
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// `owner/repo` form used for display and for record attribution.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.as_str(), self.repository.as_str())
    }

    pub(crate) fn pulls_path(&self) -> String {
        format!("/repos/{}/pulls", self.full_name())
    }

    pub(crate) fn collaborators_path(&self) -> String {
        format!("/repos/{}/collaborators", self.full_name())
    }

    pub(crate) fn contributor_stats_path(&self) -> String {
        format!("/repos/{}/stats/contributors", self.full_name())
    }
}

impl std::fmt::Display for RepositoryLocator {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}/{}",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }
}

/// GitHub login used for profile queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

/// Alphanumeric runs joined by single hyphens, plus an optional `[bot]`
/// suffix.
fn is_valid_login(value: &str) -> bool {
    let base = value.strip_suffix(BOT_SUFFIX).unwrap_or(value);
    value.len() <= MAX_USERNAME_LENGTH
        && base.split('-').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|character| character.is_ascii_alphanumeric())
        })
}

impl Username {
    /// Parses a username from `name`, `@name`, `github.com/name` or a
    /// profile URL.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::InvalidReference` when the login is empty,
    /// too long, contains characters GitHub does not allow, or the URL
    /// points at a host other than GitHub.
    ///
    /// # Example
    ///
    /// ```
    /// use prstats::Username;
    ///
    /// let username = Username::parse("https://github.com/octocat").expect("valid profile URL");
    /// assert_eq!(username.as_str(), "octocat");
    /// ```
    pub fn parse(input: &str) -> Result<Self, StatsError> {
        let normalised = normalise_reference(input);
        let trimmed = normalised.strip_prefix('@').unwrap_or(normalised);

        let login = if trimmed.contains('/') {
            let parsed = parse_github_url(trimmed, input)?;
            let first = parsed
                .path_segments()
                .into_iter()
                .flatten()
                .find(|segment| !segment.is_empty())
                .ok_or_else(|| StatsError::invalid_reference(input, "URL has no username"))?;
            first.to_owned()
        } else {
            trimmed.to_owned()
        };

        if !is_valid_login(&login) {
            return Err(StatsError::invalid_reference(
                input,
                "username must be 1-39 letters or digits joined by single hyphens",
            ));
        }
        Ok(Self(login))
    }

    /// Borrow the login.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub(crate) fn profile_path(&self) -> String {
        format!("/users/{}", self.0)
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}
