//! Interactive-surface boundary.
//!
//! The rendering layer (terminal, web widget, whatever) lives outside
//! the orchestration core. The core drives it through this trait and
//! never owns its presentation.

use crate::history::Role;
use crate::translate::Language;
use colloquy_core::AppResult;

/// Contract with the user-facing rendering layer.
pub trait Surface: Send {
    /// Show one chat message.
    fn display_message(&mut self, role: Role, text: &str);

    /// Read the next user input. `None` means the session is over
    /// (EOF or an explicit quit).
    fn read_user_input(&mut self) -> AppResult<Option<String>>;

    /// Currently selected display language.
    fn selected_language(&self) -> Language;

    /// Show a non-fatal, user-visible error.
    fn show_error(&mut self, text: &str);

    /// Show a transient busy/status indicator.
    fn show_status(&mut self, text: &str);
}
