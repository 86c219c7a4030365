//! Interactive confirmation port.
//!
//! The uninstaller asks twice before doing anything destructive: a menu
//! choice and a typed confirmation. Both are behind this trait so the flow
//! can be driven by a script in tests.

use std::io;

/// Choice made in the uninstall menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// "1": uninstall every listed component.
    Proceed,
    /// "2": leave everything in place.
    Abort,
}

/// Word the user must type to confirm a destructive uninstall.
pub const CONFIRMATION_WORD: &str = "yes";

/// Parse a menu answer. `None` means the input was invalid and should be re-asked.
pub fn parse_menu_choice(input: &str) -> Option<MenuChoice> {
    match input.trim() {
        "1" => Some(MenuChoice::Proceed),
        "2" => Some(MenuChoice::Abort),
        _ => None,
    }
}

/// Whether `input` confirms the destructive action (case-insensitive "yes").
pub fn is_confirmation(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(CONFIRMATION_WORD)
}

/// Source of user decisions for the uninstall flow.
pub trait ConfirmationPort: Send + Sync {
    /// Ask which action to take. Implementations re-prompt on invalid input.
    fn choose_action(&self) -> io::Result<MenuChoice>;

    /// Ask the user to confirm the irreversible uninstall.
    fn confirm_uninstall(&self) -> io::Result<bool>;
}
