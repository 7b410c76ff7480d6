/// Commands sent from key capture to the main application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// A bound key was pressed.
    Trigger {
        /// Action identifier bound to the key.
        action_id: String,
    },
    /// Request application shutdown.
    Shutdown,
}
