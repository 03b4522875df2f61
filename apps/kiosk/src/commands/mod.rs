//! # Kiosk Commands
//!
//! One handler per user action, grouped the way the storefront screens are.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   stdin line ──► KioskCommand::parse ──► execute ──► handler            │
//! │                                                          │              │
//! │                                   ┌──────────────────────┤              │
//! │                                   ▼                      ▼              │
//! │                            Response (Display)       ApiError            │
//! │                                   │                      │              │
//! │                                   └──────► stdout ◄──────┘              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`menu`]: `menu`, `refresh`
//! - [`cart`]: `add`, `qty`, `remove`, `clear`, `cart`
//! - [`order`]: `checkout`

pub mod cart;
pub mod menu;
pub mod order;

use thiserror::Error;

use crate::error::ApiError;
use crate::state::AppState;

pub use cart::CartResponse;
pub use menu::MenuResponse;
pub use order::CheckoutResponse;

pub const HELP: &str = "\
Commands:
  menu              show the menu
  refresh           reload the menu
  add <id>          add one of an item to the cart
  qty <id> <n>      set a quantity (0 removes the line)
  remove <id>       remove a line
  clear             empty the cart
  cart              show the cart
  checkout          place the order
  help              show this list
  quit              leave
";

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KioskCommand {
    Menu,
    Refresh,
    Add(String),
    Quantity { id: String, quantity: String },
    Remove(String),
    Clear,
    Cart,
    Checkout,
    Help,
    Quit,
}

/// Input that is not a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown command '{0}'. Type 'help' for a list.")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl KioskCommand {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };

        let mut arg = |command: &'static str, argument: &'static str| {
            words
                .next()
                .map(str::to_string)
                .ok_or(ParseError::MissingArgument { command, argument })
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "menu" => KioskCommand::Menu,
            "refresh" => KioskCommand::Refresh,
            "add" => KioskCommand::Add(arg("add", "an item id")?),
            "qty" => KioskCommand::Quantity {
                id: arg("qty", "an item id")?,
                quantity: arg("qty", "a quantity")?,
            },
            "remove" => KioskCommand::Remove(arg("remove", "an item id")?),
            "clear" => KioskCommand::Clear,
            "cart" => KioskCommand::Cart,
            "checkout" => KioskCommand::Checkout,
            "help" | "?" => KioskCommand::Help,
            "quit" | "exit" => KioskCommand::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// Runs one command and renders its outcome for the terminal.
///
/// `Quit` renders nothing; the caller owns the loop.
pub async fn execute(state: &AppState, command: KioskCommand) -> Result<String, ApiError> {
    let rendered = match command {
        KioskCommand::Menu => menu::get_menu(state).to_string(),
        KioskCommand::Refresh => menu::refresh_menu(state).await.to_string(),
        KioskCommand::Add(id) => cart::add_to_cart(state, &id)?.to_string(),
        KioskCommand::Quantity { id, quantity } => {
            cart::update_cart_item(state, &id, &quantity)?.to_string()
        }
        KioskCommand::Remove(id) => cart::remove_from_cart(state, &id).to_string(),
        KioskCommand::Clear => cart::clear_cart(state).to_string(),
        KioskCommand::Cart => cart::get_cart(state).to_string(),
        KioskCommand::Checkout => {
            let outcome = order::checkout(state).await;
            order::dismiss_checkout(state);
            outcome?.to_string()
        }
        KioskCommand::Help => HELP.to_string(),
        KioskCommand::Quit => String::new(),
    };
    Ok(rendered)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use morsel_order::error::MenuResult;
    use morsel_order::{
        CheckoutState, MemoryOrderSink, MenuDocument, MenuError, MenuSource, StorefrontConfig,
    };
    use std::sync::Arc;

    pub struct FixedSource(pub Vec<MenuDocument>);

    #[async_trait]
    impl MenuSource for FixedSource {
        async fn fetch(&self) -> MenuResult<Vec<MenuDocument>> {
            Ok(self.0.clone())
        }
    }

    pub struct FailingSource;

    #[async_trait]
    impl MenuSource for FailingSource {
        async fn fetch(&self) -> MenuResult<Vec<MenuDocument>> {
            Err(MenuError::Source("permission-denied".to_string()))
        }
    }

    fn doc(id: &str, name: &str, price: f64, available: Option<bool>) -> MenuDocument {
        MenuDocument {
            id: id.to_string(),
            name: Some(name.to_string()),
            price: Some(price),
            is_available: available,
            ..Default::default()
        }
    }

    pub fn test_state_with_sink() -> (AppState, MemoryOrderSink) {
        let source = FixedSource(vec![
            doc("ramen", "Ramen", 12.0, Some(true)),
            doc("special", "Chef special", 30.0, Some(false)),
            doc("gyoza", "Gyoza", 6.5, None),
        ]);
        let sink = MemoryOrderSink::new();
        let state = AppState::with_backends(
            StorefrontConfig::default(),
            Arc::new(source),
            Arc::new(sink.clone()),
        );
        (state, sink)
    }

    pub fn test_state() -> AppState {
        test_state_with_sink().0
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(KioskCommand::parse("  ").unwrap(), None);
        assert_eq!(
            KioskCommand::parse("ADD ramen").unwrap(),
            Some(KioskCommand::Add("ramen".to_string()))
        );
        assert_eq!(
            KioskCommand::parse("qty gyoza 3").unwrap(),
            Some(KioskCommand::Quantity {
                id: "gyoza".to_string(),
                quantity: "3".to_string(),
            })
        );
        assert_eq!(KioskCommand::parse("exit").unwrap(), Some(KioskCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            KioskCommand::parse("qty gyoza").unwrap_err(),
            ParseError::MissingArgument {
                command: "qty",
                argument: "a quantity",
            }
        );
        assert!(matches!(
            KioskCommand::parse("dance").unwrap_err(),
            ParseError::Unknown(verb) if verb == "dance"
        ));
    }

    #[tokio::test]
    async fn test_execute_session() {
        let (state, sink) = test_state_with_sink();

        execute(&state, KioskCommand::Refresh).await.unwrap();
        execute(&state, KioskCommand::Add("ramen".to_string()))
            .await
            .unwrap();
        let receipt = execute(&state, KioskCommand::Checkout).await.unwrap();

        assert!(receipt.starts_with("Order placed! #"));
        assert_eq!(sink.orders().len(), 1);
        assert_eq!(state.checkout.state(), CheckoutState::Idle);

        let err = execute(&state, KioskCommand::Checkout).await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::EmptyCart);
        assert_eq!(state.checkout.state(), CheckoutState::Idle);
    }
}
