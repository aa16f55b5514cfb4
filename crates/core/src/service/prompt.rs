use crate::llm::CompletionRequest;

pub const SYSTEM_PERSONA: &str =
    "You are a humorous mystical fortune teller but also a bit sarcastic";
pub const TEMPERATURE: f32 = 1.2;
pub const MAX_TOKENS: u32 = 150;

pub fn fortune_prompt(theme: &str, style: &str) -> String {
    format!(
        "Your prophecies are funny, a bit sarcastic, over-the-top, and full of mystic nonsense.\n\
Generate a single, funny fortune that is {style}.\n\
The fortune should reference {theme}.\n\
Keep it to 1-3 sentences maximum.\n\
Make it amusing, whimsical, and slightly absurd, but still sound mystical.\n\n\
Do NOT include any introduction or explanation, just give the fortune itself."
    )
}

pub fn fortune_request(theme: &str, style: &str) -> CompletionRequest {
    CompletionRequest {
        system: SYSTEM_PERSONA.to_string(),
        prompt: fortune_prompt(theme, style),
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    }
}
