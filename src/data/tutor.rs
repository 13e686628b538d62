//! DCF tutor chat, restricted to a built-in primer.

use crate::data::mistral::{ChatMessage, MistralClient, ResponseFormat};
use crate::data::{ServiceConfig, ServiceError};

/// Reference material the tutor is allowed to answer from.
pub const DCF_PRIMER: &str = "\
What is a DCF?
A Discounted Cash Flow (DCF) analysis estimates the value of an investment from its expected future cash flows. \
It values a business today based on all the cash it is predicted to make in the future, like valuing a tree by \
the fruit it will grow over its lifetime rather than the fruit it has today.

The Big Picture: From Cash to Share Price
Project Free Cash Flow, discount it to today's value to get the Enterprise Value, subtract Net Debt to get the \
Equity Value, and divide by shares outstanding to get the Price per Share.

Key Concepts in the Calculator
- Free Cash Flow (FCF): cash a company generates after operating expenses and investments.
- Forecast Years: how far into the future FCF is projected, typically 5 or 10 years.
- Growth Rate: the annual percentage growth of FCF during the forecast period.
- WACC (Discount Rate): the rate used to convert future cash into today's value, reflecting risk and the time value of money.
- Terminal Growth Rate: a small, stable growth rate assumed forever after the forecast period.
- Enterprise Value, Equity Value, Price per Share: Enterprise Value is the total value of the company, Equity \
Value is what remains for shareholders after debt, Price per Share is Equity Value divided by shares.

Why DCF is Useful
- It helps decide whether a stock is undervalued or overvalued based on fundamentals.
- It provides a structured way to test assumptions about a company's future.
- It focuses on long-term cash generation rather than short-term market sentiment.

Limitations to Keep in Mind
- Sensitive to Assumptions: small changes in growth or WACC can change the result a lot.
- Garbage In, Garbage Out: the valuation is only as good as its assumptions.
- Best for Mature Companies: DCF suits stable, predictable cash generators better than early-stage startups.

Tips for Beginners
- Start with conservative assumptions.
- Always look at the sensitivity table to see how much the assumptions matter.
- Compare the result with the market price, and research the business itself. A DCF is a tool, not a crystal ball.
";

pub struct Tutor {
    llm: MistralClient,
}

impl Tutor {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            llm: MistralClient::new(config)?,
        })
    }

    /// Answer a single question. Only the latest question is sent, not a history.
    pub fn ask(&self, question: &str) -> Result<String, ServiceError> {
        let messages = build_messages(question)?;
        let answer = self.llm.chat(&messages, ResponseFormat::Text)?;
        Ok(answer.trim().to_string())
    }
}

fn build_messages(question: &str) -> Result<[ChatMessage; 2], ServiceError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(ServiceError::InvalidRequest("Question must not be empty".to_string()));
    }
    Ok([ChatMessage::system(system_prompt()), ChatMessage::user(question)])
}

fn system_prompt() -> String {
    format!(
        "You are an expert, friendly, and helpful educational chatbot for a financial modeling tool. Your purpose \
is to answer questions about Discounted Cash Flow (DCF) analysis. Your knowledge is strictly limited to the \
following text. Do not answer any questions that go beyond this context. If a question is outside of this \
context, politely state that you can only answer questions about the provided material.

--- CONTEXT ---
{DCF_PRIMER}
--- END CONTEXT ---"
    )
}
