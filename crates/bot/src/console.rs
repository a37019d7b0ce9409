//! Console chat transport
//!
//! Stands in for the real chat platform during development: messages go
//! to stdout, keyboards render as bracketed rows. Temp messages are
//! tagged so their would-be expiry is visible.

use async_trait::async_trait;
use fitbot_core::{ChatTransport, Keyboard, TransportError, UserId};

pub struct ConsoleTransport {
    temp_ttl_secs: u64,
}

impl ConsoleTransport {
    pub fn new(temp_ttl_secs: u64) -> Self {
        Self { temp_ttl_secs }
    }

    fn print_keyboard(keyboard: &Keyboard) {
        match keyboard {
            Keyboard::Choices { rows } => {
                for row in rows {
                    println!("  [ {} ]", row.join(" | "));
                }
            }
            Keyboard::Inline { rows } => {
                for row in rows {
                    let buttons: Vec<String> = row
                        .iter()
                        .map(|b| format!("{} (#{})", b.label, b.token))
                        .collect();
                    println!("  [ {} ]", buttons.join(" | "));
                }
            }
            Keyboard::Empty => println!("  [keyboard removed]"),
            Keyboard::None => {}
        }
    }
}

#[async_trait]
impl ChatTransport for ConsoleTransport {
    async fn send_temp(
        &self,
        chat: UserId,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<(), TransportError> {
        println!("--- to {} (expires in {}s) ---", chat, self.temp_ttl_secs);
        println!("{}", text);
        Self::print_keyboard(keyboard);
        Ok(())
    }

    async fn send_keep(
        &self,
        chat: UserId,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<(), TransportError> {
        println!("--- to {} ---", chat);
        println!("{}", text);
        Self::print_keyboard(keyboard);
        Ok(())
    }

    async fn alert(&self, chat: UserId, text: &str) -> Result<(), TransportError> {
        println!("*** popup for {}: {}", chat, text);
        Ok(())
    }

    async fn ack(&self, _chat: UserId) -> Result<(), TransportError> {
        Ok(())
    }
}
