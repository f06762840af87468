//! Prompt construction for expert elicitation.

use rust_decimal::Decimal;

use crate::domain::market::MarketContext;

/// How many news snippets are shown to an expert.
const MAX_NEWS_SNIPPETS: usize = 5;

/// System prompt shared by every expert call.
pub const SYSTEM_PROMPT: &str = "You are a careful probabilistic forecaster for binary-outcome \
prediction markets. Weigh base rates, current evidence, and time to resolution. Respond only \
with the JSON object you are asked for; no prose before or after it.";

/// Render the user prompt for one market.
pub fn user_prompt(ctx: &MarketContext) -> String {
    let mut sections = Vec::new();

    sections.push(format!("Question: {}", ctx.question));
    if !ctx.description.is_empty() {
        sections.push(format!("Resolution criteria: {}", ctx.description));
    }
    sections.push(format!(
        "Current market-implied probability: {:.2}",
        ctx.current_price
    ));
    sections.push(format!(
        "24h volume: ${}",
        ctx.volume_24h.round_dp(0).normalize()
    ));
    sections.push(format!(
        "Resolution date: {}",
        ctx.resolution_date.format("%B %-d, %Y")
    ));
    if !ctx.categories.is_empty() {
        sections.push(format!("Tags: {}", ctx.categories.join(", ")));
    }
    if !ctx.news.is_empty() {
        let snippets = ctx
            .news
            .iter()
            .take(MAX_NEWS_SNIPPETS)
            .enumerate()
            .map(|(i, snippet)| format!("{}. {}", i + 1, snippet))
            .collect::<Vec<_>>()
            .join("\n");
        sections.push(format!("Recent news:\n{snippets}"));
    }
    if !ctx.related_markets.is_empty() {
        sections.push(format!(
            "Related markets:\n{}",
            ctx.related_markets.join("\n")
        ));
    }

    sections.push(
        "Estimate the probability that this market resolves YES. Reply with JSON only:\n\
         {\"probability\": <0..1>, \"confidence\": <0..1>, \"reasoning\": \"<one short paragraph>\"}"
            .to_string(),
    );

    sections.join("\n\n")
}

/// Format a probability as a percentage with one decimal, for reasoning
/// text.
pub(crate) fn percent(p: Decimal) -> String {
    format!("{}%", (p * Decimal::ONE_HUNDRED).round_dp(1).normalize())
}
