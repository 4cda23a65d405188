use crate::models::CurrentUser;

/// The signed-in identity, fetched once after login and read-only after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: CurrentUser,
}

impl Session {
    pub fn new(user: CurrentUser) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn display_name(&self) -> &str {
        &self.user.display_name
    }
}
