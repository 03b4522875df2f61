//! # Morsel Kiosk
//!
//! Terminal storefront over the morsel cart and checkout core.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. init_tracing()        RUST_LOG or "info,morsel=debug", to stderr    │
//! │  2. StorefrontConfig      defaults → morsel.toml → MORSEL_* env         │
//! │                           (unusable config: warn, fall back to defaults)│
//! │  3. AppState              file menu source + JSON-lines order sink      │
//! │  4. refresh_menu()        first menu load                               │
//! │  5. command loop          one stdin line per command until quit/EOF    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod backends;
pub mod commands;
pub mod error;
pub mod state;

use morsel_order::StorefrontConfig;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::KioskCommand;
use state::AppState;

const PROMPT: &[u8] = b"morsel> ";

/// Initializes the tracing subscriber.
///
/// Logs go to stderr; stdout belongs to the storefront.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,morsel=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs the kiosk until `quit` or end of input.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Morsel kiosk v{}", env!("CARGO_PKG_VERSION"));

    let config = StorefrontConfig::load_or_default(None);
    info!(
        tax_rate = %config.tax_rate(),
        menu = %config.menu_path.display(),
        orders = %config.orders_path.display(),
        "Configuration loaded"
    );

    let state = AppState::from_config(config);

    let mut stdout = tokio::io::stdout();
    let menu = commands::menu::refresh_menu(&state).await;
    stdout.write_all(menu.to_string().as_bytes()).await?;
    stdout.write_all(commands::HELP.as_bytes()).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(PROMPT).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match KioskCommand::parse(&line) {
            Ok(Some(KioskCommand::Quit)) => break,
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                stdout.write_all(format!("{}\n", e).as_bytes()).await?;
                continue;
            }
        };

        let output = match commands::execute(&state, command).await {
            Ok(rendered) => rendered,
            Err(e) => {
                debug!(code = ?e.code, "{}", e.message);
                match &e.hint {
                    Some(hint) => format!("{}\n{}\n", e.message, hint),
                    None => format!("{}\n", e.message),
                }
            }
        };
        stdout.write_all(output.as_bytes()).await?;
    }

    info!("Kiosk closed");
    Ok(())
}
