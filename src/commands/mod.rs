use crate::food::analysis::NutritionAnalyzer;
use crate::food::api::UsdaClient;
use crate::llm::chat::ChatManager;
use colored::Colorize;
use std::io::Write;
use std::sync::Arc;

pub mod food_cmd;
pub mod system;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

pub struct CommandHandler {
    chat: ChatManager,
    usda: Arc<UsdaClient>,
    analyzer: NutritionAnalyzer,
}

impl CommandHandler {
    pub fn new(chat: ChatManager, usda: Arc<UsdaClient>) -> Self {
        Self {
            chat,
            usda,
            analyzer: NutritionAnalyzer::default(),
        }
    }

    pub fn chat(&self) -> &ChatManager {
        &self.chat
    }

    /// Handles one input line. A failed turn is printed and never ends the loop.
    pub async fn run_line<W: Write>(&mut self, input: &str, out: &mut W) -> Outcome {
        match self.handle_command(input, out).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("Turn failed: {}", e);
                // Nothing more useful to do if the terminal itself is gone
                let _ = writeln!(out, "{}", format!("❌ {}", e).red());
                Outcome::Continue
            }
        }
    }

    pub async fn handle_command<W: Write>(&mut self, input: &str, out: &mut W) -> Result<Outcome, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Outcome::Continue);
        }

        // Questions that happen to start with a command word still go to chat
        let is_question = input.ends_with('?');
        let (command, rest) = match input.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (input, ""),
        };

        match command.to_lowercase().as_str() {
            "help" if rest.is_empty() => {
                system::print_help(out).map_err(|e| e.to_string())?;
            }
            "exit" | "quit" if rest.is_empty() => {
                system::print_goodbye(out).map_err(|e| e.to_string())?;
                return Ok(Outcome::Exit);
            }
            "foods" if rest.is_empty() => {
                food_cmd::list_foods(&self.chat, out)?;
            }
            "alternatives" if !is_question => {
                food_cmd::alternatives(&self.chat, &self.usda, &self.analyzer, rest, out).await?;
            }
            "diet" if !is_question => {
                food_cmd::diet(&self.chat, &self.usda, rest, out).await?;
            }
            _ => self.handle_chat(input, out).await?,
        }

        Ok(Outcome::Continue)
    }

    async fn handle_chat<W: Write>(&mut self, input: &str, out: &mut W) -> Result<(), String> {
        let turn = self
            .chat
            .respond(input)
            .await
            .map_err(|e| format!("Failed to get AI response: {}", e))?;

        writeln!(out, "{}\n", turn.assistant_text.truecolor(255, 236, 179))
            .map_err(|e| e.to_string())
    }
}
