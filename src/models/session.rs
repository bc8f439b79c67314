use chrono::{Local, NaiveDate};

/// Per-tab session state, passed explicitly to whoever needs it.
///
/// The default session is anonymous and dated today.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SessionContext {
    user: String,
    authenticated: bool,
    /// The date scheduled transfers are checked against.
    business_date: NaiveDate
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            user: String::new(),
            authenticated: false,
            business_date: Local::now().date_naive()
        }
    }
}

impl SessionContext {
    pub fn authenticated(user: impl Into<String>, business_date: NaiveDate) -> Self {
        Self {
            user: user.into(),
            authenticated: true,
            business_date
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn business_date(&self) -> NaiveDate {
        self.business_date
    }
}
