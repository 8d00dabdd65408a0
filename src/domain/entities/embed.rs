/// Color used for every error reply
pub const ERROR_COLOR: u32 = 0xE02B2B;

/// Color used for regular replies
pub const DEFAULT_COLOR: u32 = 0xBEBEFE;

/// Rich reply payload: a title/description/color triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub title: Option<String>,
    pub description: String,
    pub color: u32,
}

impl Embed {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            title: None,
            description: description.into(),
            color: DEFAULT_COLOR,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self::new(description).with_color(ERROR_COLOR)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }
}

/// What a command sends back to the originating channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Embed(Embed),
}

impl From<Embed> for Reply {
    fn from(embed: Embed) -> Self {
        Reply::Embed(embed)
    }
}
