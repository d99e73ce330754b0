// @module: Prompt templates and formatting

/// Placeholder for the input filename in user prompt templates
const FILENAME_PLACEHOLDER: &str = "{filename}";

/// Placeholder for the extracted transcript text in user prompt templates
const CONTENT_PLACEHOLDER: &str = "{content}";

/// Instruction block prepended to the user prompt in attachment mode, where
/// the transcript body is not inlined and must be read through file_search.
pub const ATTACHMENT_INSTRUCTION: &str = "Use the file_search tool to read the attached \
transcript file. The transcript text is not included in this input, so you must retrieve \
it from the attachment.";

/// Default user prompt template used when a prompt config file carries only
/// a system prompt (RAW mode)
pub const DEFAULT_USER_PROMPT: &str = "Use the file_search tool to read the attached \
transcript and write a Markdown document from it.\n\
Filename: {filename}\n\
Include: a title, a summary, key points, decisions, action items, technical details, \
and anything worth a cautionary note.";

/// Render a user prompt template by substituting `{filename}` and `{content}`.
///
/// If the template lacks either placeholder the substitution would silently
/// drop information, so it falls back to a deterministic concatenation of
/// the template and the labelled transcript. This function never fails.
pub fn format_user_prompt(template: &str, filename: &str, content: &str) -> String {
    if template.contains(FILENAME_PLACEHOLDER) && template.contains(CONTENT_PLACEHOLDER) {
        template
            .replace(FILENAME_PLACEHOLDER, filename)
            .replace(CONTENT_PLACEHOLDER, content)
    } else {
        format!("{}\n\nTranscript ({}):\n\n{}", template, filename, content)
    }
}

/// Combine system and user prompts into the single string input the
/// Responses API accepts
pub fn build_prompt_input(system_prompt: &str, user_prompt: &str) -> String {
    format!("{}\n\n{}", system_prompt, user_prompt)
}

/// Build the full attachment-mode prompt: the fixed file_search instruction,
/// the rendered user template (content left empty since it is not inlined),
/// and the system prompt in front.
pub fn build_attachment_prompt(system_prompt: &str, user_prompt_template: &str, filename: &str) -> String {
    let base_user = format_user_prompt(user_prompt_template, filename, "");
    let user_prompt = format!("{}\n\n{}", ATTACHMENT_INSTRUCTION, base_user);
    build_prompt_input(system_prompt, &user_prompt)
}
