use crate::errors::{AppError, AppResult};

/// Who is acting, and on which card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub member: String,
    pub card: Option<String>,
}

impl Context {
    pub fn new(member: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            card: None,
        }
    }

    pub fn with_card(mut self, card: impl Into<String>) -> Self {
        self.card = Some(card.into());
        self
    }

    pub fn require_card(&self) -> AppResult<&str> {
        self.card.as_deref().ok_or_else(|| {
            AppError::MissingContext(
                "No card selected: pass --card or set `card` in the configuration.".into(),
            )
        })
    }
}
