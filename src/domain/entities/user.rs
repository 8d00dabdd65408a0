use std::fmt;

/// Represents a platform account (a person or another bot)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    pub global_name: Option<String>,
    pub is_bot: bool,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            global_name: None,
            is_bot: false,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_global_name(mut self, name: impl Into<String>) -> Self {
        self.global_name = Some(name.into());
        self
    }

    pub fn bot(mut self) -> Self {
        self.is_bot = true;
        self
    }

    /// Mention markup understood by the platform
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }

    pub fn display_name(&self) -> String {
        if let Some(ref username) = self.username {
            username.clone()
        } else if let Some(ref name) = self.global_name {
            name.clone()
        } else {
            self.id.clone()
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mention_markup() {
        assert_eq!(User::new("300").mention(), "<@300>");
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(User::new("1").display_name(), "1");
        assert_eq!(User::new("1").with_global_name("Kal").display_name(), "Kal");
        assert_eq!(
            User::new("1").with_global_name("Kal").with_username("kal_el").to_string(),
            "kal_el"
        );
    }
}
