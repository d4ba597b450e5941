use crate::pipeline::Completion;

/// Render generated text under its section heading
pub fn render_text(completion: &Completion) -> String {
    format!("--- {} ---\n{}", completion.mode.label(), completion.text)
}
