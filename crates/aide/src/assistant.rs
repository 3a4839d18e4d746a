use chrono::{Local, NaiveDate};

use crate::dispatch::PendingIntent;
use crate::models::chat::ChatTurn;
use crate::models::intent::{AssistantResponse, Interpretation};
use crate::parser::parse_model_output;
use crate::prompt::{assemble_intent_prompt, IntentPromptContext, DEFAULT_HISTORY_LIMIT};
use crate::providers::base::Provider;

/// The conversation of one UI session, kept in memory only
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    history: Vec<ChatTurn>,
    pending: PendingIntent,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn pending_intent(&mut self) -> &mut PendingIntent {
        &mut self.pending
    }

    /// Append a user message and what it was interpreted as. The pending intent
    /// always reflects the latest message only.
    pub fn record(&mut self, text: &str, interpretation: &Interpretation) {
        self.history.push(ChatTurn::user(text));
        match interpretation {
            Interpretation::Reply(reply) => {
                self.history.push(ChatTurn::assistant(reply.reply.clone()));
                // A pending intent belongs to the message that produced it
                self.pending.take();
            }
            Interpretation::Tool(request) => {
                self.history
                    .push(ChatTurn::assistant(interpretation.to_envelope().to_string()));
                self.pending.set(request.clone());
            }
        }
    }
}

/// Assistant turns a free text message into a reply or a tool request via an LLM
pub struct Assistant {
    provider: Box<dyn Provider>,
    history_limit: usize,
    clock: fn() -> NaiveDate,
}

impl Assistant {
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self {
            provider,
            history_limit: DEFAULT_HISTORY_LIMIT,
            clock: || Local::now().date_naive(),
        }
    }

    /// How many past turns are shown to the model
    pub fn with_history_limit(mut self, history_limit: usize) -> Self {
        self.history_limit = history_limit;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    /// Interpret a message against prior history. Never fails: prompt, provider
    /// and parse errors all degrade to the fallback reply.
    pub async fn interpret(
        &self,
        history: &[ChatTurn],
        text: &str,
        image_ref: Option<&str>,
    ) -> Interpretation {
        let context = IntentPromptContext::new(text, (self.clock)())
            .with_image_ref(image_ref)
            .with_history(history, self.history_limit);

        let prompt = match assemble_intent_prompt(&context) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::error!("Failed to assemble intent prompt: {}", e);
                return Interpretation::fallback();
            }
        };

        let raw = match self.provider.generate_text(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Provider request failed: {:#}", e);
                return Interpretation::fallback();
            }
        };

        parse_model_output(&raw)
    }

    /// Handle one message with no conversation history
    pub async fn handle_user_message(
        &self,
        text: &str,
        image_ref: Option<&str>,
    ) -> AssistantResponse {
        self.interpret(&[], text, image_ref).await.into()
    }

    /// Handle one message within a session, recording both turns and leaving any
    /// tool request pending for dispatch
    pub async fn converse(
        &self,
        session: &mut ChatSession,
        text: &str,
        image_ref: Option<&str>,
    ) -> AssistantResponse {
        let interpretation = self.interpret(session.history(), text, image_ref).await;
        session.record(text, &interpretation);
        interpretation.into()
    }
}
