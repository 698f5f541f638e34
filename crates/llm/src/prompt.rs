//! Prompt assembly for grounded answering.

use pakar_core::PromptTemplate;

/// Lay out the final prompt: instructions, the worked example, the retrieved
/// context between its delimiters, then the user's question and answer cue.
pub fn build_prompt(template: &PromptTemplate, context: &str, question: &str) -> String {
    let mut blocks: Vec<String> = Vec::with_capacity(6);

    push_block(&mut blocks, &template.preamble);
    push_block(&mut blocks, &template.few_shot);
    blocks.push(format!(
        "{}\n{}\n{}",
        template.context_open.trim(),
        context,
        template.context_close.trim()
    ));
    push_block(&mut blocks, &template.question_intro);
    blocks.push(format!("{} {}", template.question_label.trim(), question.trim()));
    push_block(&mut blocks, &template.answer_cue);

    blocks.join("\n\n")
}

fn push_block(blocks: &mut Vec<String>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        blocks.push(text.to_string());
    }
}
