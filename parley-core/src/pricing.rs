//! Dollar cost derivation from token usage
//!
//! Prices come from the model table as dollars per million tokens. A
//! model with no pricing, or with either price missing or zero, costs
//! out at 0.0; the two prices only make sense together.

use tracing::warn;

use crate::config::ModelPricing;
use crate::protocol::{Message, Usage};

/// Cost of one generation in dollars
pub fn cost_for_usage(usage: &Usage, pricing: Option<&ModelPricing>) -> f64 {
    let Some(pricing) = pricing else {
        return 0.0;
    };
    let (Some(prompt_price), Some(completion_price)) =
        (pricing.prompt_price, pricing.completion_price)
    else {
        return 0.0;
    };
    if prompt_price == 0.0 || completion_price == 0.0 {
        return 0.0;
    }
    (prompt_price * usage.prompt_tokens as f64 + completion_price * usage.completion_tokens as f64)
        / 1_000_000.0
}

/// Total `(agent, user)` cost of a conversation
///
/// Tool turns never carry a cost and are skipped. Any other turn without
/// a recorded cost poisons the total: the result is `None`, not a
/// partial sum that undercounts.
pub fn conversation_cost(messages: &[Message]) -> Option<(f64, f64)> {
    let mut agent = 0.0;
    let mut user = 0.0;

    for message in messages {
        if matches!(message, Message::Tool(_)) {
            continue;
        }
        match message.cost() {
            Some(cost) => match message {
                Message::Assistant(_) => agent += cost,
                Message::User(_) => user += cost,
                Message::System(_) | Message::Tool(_) => {}
            },
            None => {
                warn!(
                    role = ?message.role(),
                    "turn has no recorded cost, conversation cost unknown"
                );
                return None;
            }
        }
    }
    Some((agent, user))
}
