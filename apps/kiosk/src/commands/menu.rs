//! # Menu Commands
//!
//! Browse the offered entries and refresh them from the menu source.

use std::fmt;

use morsel_core::MenuEntry;
use morsel_order::MenuState;
use serde::Serialize;
use tracing::debug;

use crate::state::AppState;

/// Menu screen contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResponse {
    pub items: Vec<MenuEntry>,
    pub is_loading: bool,
    /// Last source error; `items` are then the last-known-good menu.
    pub error: Option<String>,
}

impl From<MenuState> for MenuResponse {
    fn from(state: MenuState) -> Self {
        MenuResponse {
            items: state.items,
            is_loading: state.is_loading,
            error: state.error,
        }
    }
}

/// Gets the currently offered menu.
pub fn get_menu(state: &AppState) -> MenuResponse {
    debug!("get_menu command");
    MenuResponse::from(state.menu.state())
}

/// Re-reads the menu source, then returns the menu.
///
/// Source failures do not fail the command: they land in `error` and the
/// previous items stay on screen.
pub async fn refresh_menu(state: &AppState) -> MenuResponse {
    debug!("refresh_menu command");
    state.menu.refresh(state.menu_source.as_ref()).await;
    get_menu(state)
}

impl fmt::Display for MenuResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.error {
            writeln!(f, "! {}", error)?;
        }
        if self.is_loading {
            return writeln!(f, "Loading menu...");
        }
        if self.items.is_empty() {
            return writeln!(f, "Nothing on the menu right now.");
        }

        writeln!(f, "MENU")?;
        for item in &self.items {
            writeln!(f, "  {:<16} {:<28} {:>9}", item.id, item.name, item.price().to_string())?;
            if !item.description.is_empty() {
                writeln!(f, "  {:<16} {}", "", item.description)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{test_state, FailingSource};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_menu_is_loading_before_first_refresh() {
        let state = test_state();
        let menu = get_menu(&state);
        assert!(menu.is_loading);
        assert_eq!(menu.to_string(), "Loading menu...\n");
    }

    #[tokio::test]
    async fn test_refresh_filters_and_sorts() {
        let state = test_state();
        let menu = refresh_menu(&state).await;

        let names: Vec<_> = menu.items.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Gyoza", "Ramen"]);
        assert!(!menu.is_loading);
        assert!(menu.to_string().contains("$12.00"));
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_items() {
        let mut state = test_state();
        refresh_menu(&state).await;

        state.menu_source = Arc::new(FailingSource);
        let menu = refresh_menu(&state).await;

        assert_eq!(menu.items.len(), 2);
        assert_eq!(menu.error.as_deref(), Some("permission-denied"));
        assert!(menu.to_string().starts_with("! permission-denied\n"));
    }
}
