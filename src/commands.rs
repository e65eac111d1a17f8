use rust_decimal::Decimal;
use std::sync::Arc;

use crate::models::Product;
use crate::session::SessionManager;
use crate::utils::error::AppError;
use crate::utils::format::{format_price, parse_user_price};

const ADD_USAGE: &str = "Usage: add <link> <price>\nWrite the price as 1234,56 or 1234.56, without a currency symbol.";
const REMOVE_USAGE: &str = "Usage: remove <position>\nSend status to see the positions.";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Add { url: String, max_price: Decimal },
    Remove { position: usize },
    Status,
    Help,
    Ping,
    Unknown(String),
}

impl Command {
    /// Parse one line of user input. A leading `/` on the command is accepted.
    pub fn parse(input: &str) -> Result<Self, AppError> {
        let mut parts = input.split_whitespace();
        let Some(head) = parts.next() else {
            return Ok(Command::Unknown(String::new()));
        };
        let args: Vec<&str> = parts.collect();
        let name = head.trim_start_matches('/').to_ascii_lowercase();

        match name.as_str() {
            "start" => Ok(Command::Start),
            "add" => match args.as_slice() {
                [url, price] => Ok(Command::Add {
                    url: url.to_string(),
                    max_price: parse_user_price(price)
                        .map_err(|_| AppError::Validation(ADD_USAGE.to_string()))?,
                }),
                _ => Err(AppError::Validation(ADD_USAGE.to_string())),
            },
            "remove" => match args.as_slice() {
                [position] => position
                    .parse::<usize>()
                    .map(|position| Command::Remove { position })
                    .map_err(|_| AppError::Validation(REMOVE_USAGE.to_string())),
                _ => Err(AppError::Validation(REMOVE_USAGE.to_string())),
            },
            "status" => Ok(Command::Status),
            "help" => Ok(Command::Help),
            "ping" => Ok(Command::Ping),
            _ => Ok(Command::Unknown(name)),
        }
    }
}

/// Turns text commands into session operations and text replies.
pub struct CommandGateway {
    sessions: Arc<SessionManager>,
    currency_symbol: String,
}

impl CommandGateway {
    pub fn new(sessions: Arc<SessionManager>, currency_symbol: impl Into<String>) -> Self {
        Self {
            sessions,
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    pub async fn handle(&self, user: &str, input: &str) -> String {
        let command = match Command::parse(input) {
            Ok(command) => command,
            Err(e) => return self.error_reply(&e),
        };
        tracing::debug!("{} -> {:?}", user, command);

        match command {
            Command::Start => {
                self.sessions.get_or_start(user).await;
                format!(
                    "Hi! I'll keep an eye on prices for you.\nIf a link contains spaces, replace them with %20.\n\n{}",
                    self.help_text()
                )
            }
            Command::Add { url, max_price } => {
                let (session, _) = self.sessions.get_or_start(user).await;
                match session.add(&url, max_price).await {
                    Ok(product) => format!(
                        "Now tracking {} at {}. I'll tell you when it costs {} or less.",
                        product.name,
                        product.store_id,
                        self.price(max_price)
                    ),
                    Err(e) => self.error_reply(&e),
                }
            }
            Command::Remove { position } => {
                let (session, _) = self.sessions.get_or_start(user).await;
                match session.remove(position).await {
                    Ok(product) => format!("Stopped tracking {} from {}.", product.name, product.store_id),
                    Err(e) => self.error_reply(&e),
                }
            }
            Command::Status => {
                let (session, _) = self.sessions.get_or_start(user).await;
                self.status_text(&session.snapshot().await)
            }
            Command::Help => self.help_text(),
            Command::Ping => "Pong!".to_string(),
            Command::Unknown(_) => "Unknown command. Send help to see what I can do.".to_string(),
        }
    }

    pub fn help_text(&self) -> String {
        let stores = self
            .sessions
            .product_manager()
            .registry()
            .stores()
            .iter()
            .map(|store| format!("  - {}", store))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Commands:\n  add <link> <price>  track a product until it costs <price> or less\n  remove <position>   stop tracking a product\n  status              list tracked products\n  help                this message\n  ping                check that I'm alive\n\nSupported stores:\n{}",
            stores
        )
    }

    fn status_text(&self, products: &[Product]) -> String {
        if products.is_empty() {
            return "You are not tracking anything yet.".to_string();
        }

        let mut lines = vec!["Tracked products:".to_string()];
        for (index, product) in products.iter().enumerate() {
            let state = if product.available {
                format!("current price {}", self.price(product.price))
            } else {
                "currently unavailable".to_string()
            };
            lines.push(format!(
                "[{}] {} at {}: {}, target {}",
                index + 1,
                product.name,
                product.store_id,
                state,
                self.price(product.max_price)
            ));
        }
        lines.join("\n")
    }

    fn price(&self, amount: Decimal) -> String {
        format!("{} {}", self.currency_symbol, format_price(amount))
    }

    fn error_reply(&self, error: &AppError) -> String {
        match error {
            AppError::Validation(message) => message.clone(),
            AppError::UnsupportedStore { store } => {
                format!("Sorry, {} is not a supported store. Send help for the list.", store)
            }
            AppError::Fetch { .. } | AppError::Parse { .. } => {
                "I couldn't read that product page. Check that the link works and try again.".to_string()
            }
            AppError::Capacity { max } => {
                format!("You are already tracking {} items. Remove some first.", max)
            }
            AppError::Range { position, .. } => {
                format!("There is no product at position {}. Send status to see your list.", position)
            }
            other => {
                tracing::error!("Command failed: {}", other);
                "Something went wrong, please try again later.".to_string()
            }
        }
    }
}
