/// Texts of a yes/no confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
}

/// A non-blocking notice shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub duration_secs: u32,
}

/// How long alerts stay visible unless a caller says otherwise.
pub const ALERT_DURATION_SECS: u32 = 30;

/// Confirmation and alert capability of the host UI.
pub trait Prompt {
    /// `true` when the user confirmed.
    fn confirm(&self, request: &ConfirmRequest) -> bool;

    fn alert(&self, alert: &Alert);
}
