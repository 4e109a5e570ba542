use core::fmt::{self, Debug, Display, Formatter};
use url::Url;

/// Any host will do; we only care about the path and query of incoming links.
static PLACEHOLDER_ORIGIN: &str = "http://storefront.invalid";

/// An opaque credential-reset string, delivered via an email link. We never
/// look inside it; it goes to the server exactly as it came in.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a token
    pub fn new(token: String) -> Self {
        Self(token)
    }

    /// The token, verbatim
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for AuthToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken(<redacted>)")
    }
}

/// The pages of the site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Home,

    /// `/user/login`
    Login,

    /// `/user/register`
    Register,

    /// `/user/changePassword`
    ChangePassword,

    /// `/user/resetPassword?token=…`
    ResetPassword(Option<AuthToken>),
}

impl Route {
    /// Parse a link into a route. Links may be absolute
    /// (`https://shop.example/user/login`) or just a path
    /// (`/user/resetPassword?token=abc`.)
    ///
    /// ## Errors
    ///
    /// - `RouteError::Url` if the link can't be parsed at all
    /// - `RouteError::NotFound` if it doesn't point at one of our pages
    pub fn parse(link: &str) -> Result<Self, RouteError> {
        let url = match Url::parse(link) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Url::parse(PLACEHOLDER_ORIGIN)?.join(link)?
            }
            Err(err) => return Err(err.into()),
        };

        match url.path().trim_end_matches('/') {
            "" => Ok(Self::Home),
            "/user/login" => Ok(Self::Login),
            "/user/register" => Ok(Self::Register),
            "/user/changePassword" => Ok(Self::ChangePassword),
            "/user/resetPassword" => Ok(Self::ResetPassword(
                url.query_pairs()
                    .find(|(key, _)| key == "token")
                    .map(|(_, token)| AuthToken::new(token.into_owned())),
            )),
            other => Err(RouteError::NotFound(other.to_owned())),
        }
    }

    /// The path for this route, without any query
    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/user/login",
            Self::Register => "/user/register",
            Self::ChangePassword => "/user/changePassword",
            Self::ResetPassword(_) => "/user/resetPassword",
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Problems turning a link into a route
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouteError {
    /// The link wasn't a URL or path
    #[error("could not parse link: {0}")]
    Url(#[from] url::ParseError),

    /// The link pointed somewhere we don't have a page for
    #[error("no page at {0}")]
    NotFound(String),
}
