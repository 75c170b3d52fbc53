//! Text regions the client writes into.
//!
//! The page (or terminal) owning the regions implements [`DisplaySink`];
//! everything here only produces strings for it.

use tycoon_api_types::TokenHolding;

pub const CURRENCY_GLYPH: &str = "💰";
pub const NO_TOKENS: &str = "No tokens";
pub const LOAD_ERROR: &str = "Failed to load data";

pub trait DisplaySink: Send + Sync {
    /// Result of the last command, help, or acknowledgement.
    fn show_output(&self, text: &str);
    fn show_balance(&self, text: &str);
    fn show_tokens(&self, text: &str);
}

pub fn balance_text(balance: f64) -> String {
    format!("Balance: {balance} {CURRENCY_GLYPH}")
}

pub fn token_line(token: &TokenHolding) -> String {
    format!("{}: {} pcs.", token.name, token.amount)
}

pub fn tokens_text(tokens: &[TokenHolding]) -> String {
    if tokens.is_empty() {
        return NO_TOKENS.to_owned();
    }
    tokens.iter().map(token_line).collect::<Vec<_>>().join("\n")
}
