// Two-stage query rewriting: contextualize, then keyword extraction

use ragent_llm::{ChatClient, ChatOptions, ChatRequest, Message, Role};
use std::sync::Arc;
use std::time::Duration;

use crate::prompts::{CONTEXTUALIZE_PROMPT, KEYWORDS_PROMPT, MEMORY_HISTORY_LABEL};

const HISTORY_TURNS: usize = 6;
const HISTORY_TURN_CHARS: usize = 200;
const MEMORY_CHARS: usize = 300;
/// Queries with at least this many words may skip keyword extraction
const BYPASS_MIN_WORDS: usize = 5;

// Matched against the lower-cased, accent-folded query.
const CONVERSATIONAL_MARKERS: &[&str] = &[
    // interrogatives
    "como ", "que ", "cual ", "donde ", "cuando ", "porque ", "quien ",
    "cuales ", "cuantos ", "cuantas ",
    // modal and polite verbs
    "podrias", "podria", "puedes", "puede",
    "dame", "dime", "explicame", "cuentame", "muestrame",
    "quiero", "necesito", "quisiera", "gustaria",
    "por favor", "porfavor",
    // question patterns
    "que es ", "que son ", "como se ", "como hago", "como hacer",
    "para que ", "en que ",
];

/// Strip Spanish diacritics (á é í ó ú ü ñ, either case)
pub fn fold_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'Á' | 'À' | 'Ä' | 'Â' => 'A',
            'É' | 'È' | 'Ë' | 'Ê' => 'E',
            'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
            'Ó' | 'Ò' | 'Ö' | 'Ô' => 'O',
            'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
            'Ñ' => 'N',
            other => other,
        })
        .collect()
}

/// Whether the query reads like conversation rather than bare keywords
pub fn is_conversational(query: &str) -> bool {
    let normalized = fold_accents(&query.to_lowercase());
    CONVERSATIONAL_MARKERS
        .iter()
        .any(|marker| normalized.contains(marker))
}

/// Trim and drop trailing `? ! ¿ ¡`
pub fn clean_query(query: &str) -> String {
    query
        .trim()
        .trim_end_matches(&['?', '!', '¿', '¡'][..])
        .trim()
        .to_string()
}

/// Whether a cleaned query goes through the keyword stage
pub fn needs_keyword_extraction(cleaned: &str) -> bool {
    cleaned.split_whitespace().count() < BYPASS_MIN_WORDS || is_conversational(cleaned)
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

fn format_history(history: &[Message], memory_context: &str) -> String {
    let mut parts = Vec::new();

    let start = history.len().saturating_sub(HISTORY_TURNS);
    let turns: Vec<String> = history[start..]
        .iter()
        .map(|m| {
            let role = if m.role == Role::Human { "user" } else { "assistant" };
            format!("- {}: {}", role, truncate_chars(&m.content, HISTORY_TURN_CHARS))
        })
        .collect();
    if !turns.is_empty() {
        parts.push(turns.join("\n"));
    }

    if !memory_context.is_empty() {
        parts.push(format!(
            "{}: {}",
            MEMORY_HISTORY_LABEL,
            truncate_chars(memory_context, MEMORY_CHARS)
        ));
    }

    parts.join("\n")
}

#[derive(Debug, Clone)]
pub struct RewriterConfig {
    pub model: String,
    pub timeout: Duration,
    pub contextualize_max_tokens: u32,
    pub keywords_max_tokens: u32,
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(5),
            contextualize_max_tokens: 100,
            keywords_max_tokens: 50,
        }
    }
}

/// Query rewriter backed by a completion client
///
/// Every stage is best-effort: failures, timeouts and empty output fall back
/// to the stage's input.
#[derive(Clone)]
pub struct QueryRewriter {
    client: Arc<dyn ChatClient>,
    config: RewriterConfig,
}

impl QueryRewriter {
    pub fn new(client: Arc<dyn ChatClient>, config: RewriterConfig) -> Self {
        Self { client, config }
    }

    /// Contextualize, then extract keywords
    pub async fn rewrite(&self, query: &str, history: &[Message], memory_context: &str) -> String {
        let contextualized = self.contextualize(query, history, memory_context).await;
        self.extract_keywords(&contextualized).await
    }

    /// Resolve references to earlier turns; runs only with history or memory
    pub async fn contextualize(&self, query: &str, history: &[Message], memory_context: &str) -> String {
        if history.is_empty() && memory_context.is_empty() {
            return query.to_string();
        }

        let prompt = CONTEXTUALIZE_PROMPT
            .replace("{history}", &format_history(history, memory_context))
            .replace("{query}", query);

        match self.complete(prompt, self.config.contextualize_max_tokens).await {
            Some(rewritten) if rewritten != query => {
                tracing::debug!(original = %query, rewritten = %rewritten, "Contextualized query");
                rewritten
            }
            _ => query.to_string(),
        }
    }

    /// Turn a query into space-separated search keywords
    pub async fn extract_keywords(&self, query: &str) -> String {
        let cleaned = clean_query(query);

        if !needs_keyword_extraction(&cleaned) {
            tracing::debug!(query = %cleaned, "Keyword extraction bypassed");
            return cleaned;
        }

        let prompt = KEYWORDS_PROMPT.replace("{query}", &cleaned);
        match self.complete(prompt, self.config.keywords_max_tokens).await {
            Some(keywords) => {
                tracing::debug!(original = %query, keywords = %keywords, "Extracted keywords");
                keywords
            }
            None => cleaned,
        }
    }

    async fn complete(&self, prompt: String, max_tokens: u32) -> Option<String> {
        let options = ChatOptions::new()
            .temperature(0.0)
            .max_tokens(max_tokens)
            .timeout(self.config.timeout);
        let request = ChatRequest::new(self.config.model.clone(), vec![Message::human(prompt)])
            .with_options(options);

        match tokio::time::timeout(self.config.timeout, self.client.chat(request)).await {
            Ok(Ok(response)) => {
                let text = response.trimmed_content();
                (!text.is_empty()).then(|| text.to_string())
            }
            Ok(Err(e)) => {
                tracing::warn!("Query rewrite failed, keeping input: {}", e);
                None
            }
            Err(_) => {
                tracing::warn!("Query rewrite timed out, keeping input");
                None
            }
        }
    }
}
