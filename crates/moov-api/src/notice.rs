use serde::Deserialize;

/// One-shot messages shown on the page a redirect lands on. They travel as a
/// `?notice=` code so that reloading the target page is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    SignedUp,
    LoginRequired,
    UserNotFound,
    LoggedIn,
    LoggedOut,
}

impl Notice {
    const ALL: [Notice; 5] = [
        Notice::SignedUp,
        Notice::LoginRequired,
        Notice::UserNotFound,
        Notice::LoggedIn,
        Notice::LoggedOut,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::SignedUp => "signed_up",
            Self::LoginRequired => "login_required",
            Self::UserNotFound => "user_not_found",
            Self::LoggedIn => "logged_in",
            Self::LoggedOut => "logged_out",
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Self::SignedUp => "Signup successful! Please login.",
            Self::LoginRequired => "Please login to continue.",
            Self::UserNotFound => "User not found. Please login again.",
            Self::LoggedIn => "Login successful!",
            Self::LoggedOut => "You have been logged out.",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.code() == code)
    }

    /// `path` with this notice attached.
    pub fn on(self, path: &str) -> String {
        format!("{path}?notice={}", self.code())
    }
}

/// Query string of any page that can show a notice. Unknown codes are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    #[serde(default)]
    notice: Option<String>,
}

impl NoticeQuery {
    pub fn notice(&self) -> Option<Notice> {
        self.notice.as_deref().and_then(Notice::from_code)
    }
}
