//! Prompt templates
//!
//! Pure functions producing the exact text sent to the model. The system
//! instruction is prepended with [`compose`] only when a conversation starts
//! or for single-shot calls.

use scholia_types::FlashcardRequest;

use crate::policy::DomainPolicy;

pub const CATEGORY_SYSTEM_INSTRUCTION: &str = "You are a content classifier. \
You assign each piece of content to categories taken from a fixed list supplied by the user. \
Never invent categories. Reply with JSON only, without markdown or commentary.";

pub const DESCRIPTION_SYSTEM_INSTRUCTION: &str = "You are a content analyst. \
You write a short, factual paragraph describing the content you receive and classify it \
using only the categories supplied by the user. Reply with JSON only, without markdown or commentary.";

pub const FLASHCARD_SYSTEM_INSTRUCTION: &str = "You are an expert tutor who writes study flashcards. \
Each card has a concise question or prompt on the front and a precise answer on the back. \
Reply with JSON only, without markdown or commentary.";

pub const GENERIC_FRAGMENT: &str = "Cover the most important ideas of the material. \
Prefer understanding over rote memorisation.";

pub const POLITICAL_PHILOSOPHY_FRAGMENT: &str = "You specialise in political philosophy. \
Ground every card in the thinker's own text: key concepts, the structure of their arguments, \
the historical context they answer to, and contrasts with other thinkers. \
Use `context_logic` to explain where the idea sits in the work's overall argument.";

pub const KANT_FRAGMENT: &str = "You specialise in the philosophy of Immanuel Kant. \
Use Kant's technical vocabulary precisely (a priori, transcendental, categorical imperative, \
phenomena and noumena) and keep the distinctions between the Critiques explicit. \
Use `context_logic` to explain where the idea sits in the architectonic of the work.";

/// Instruction first, blank line, then the body
pub fn compose(system_instruction: Option<&str>, body: &str) -> String {
    match system_instruction.map(str::trim).filter(|s| !s.is_empty()) {
        Some(instruction) => format!("{}\n\n{}", instruction, body),
        None => body.to_string(),
    }
}

pub fn category_prompt(content: &str, vocabulary: &[String], max: usize) -> String {
    format!(
        "Classify the following content.\n\n\
         Available categories: {}\n\n\
         Choose at most {} categories, only from the list above, spelled exactly as listed.\n\
         Respond with this JSON shape: {{\"categories\": [\"Category\"]}}\n\n\
         Content:\n{}",
        format_list(vocabulary),
        max,
        content.trim()
    )
}

/// What a description is written about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionSource<'a> {
    Text(&'a str),
    /// Attached video, referenced by URL
    Video(&'a str),
}

pub fn description_prompt(source: DescriptionSource<'_>, vocabulary: &[String], max: usize) -> String {
    let subject = match source {
        DescriptionSource::Text(content) => {
            format!("Describe the following content.\n\nContent:\n{}", content.trim())
        }
        DescriptionSource::Video(url) => format!(
            "Watch the attached video ({}) and describe what it is about.",
            url.trim()
        ),
    };

    format!(
        "{}\n\n\
         Available categories: {}\n\n\
         Write a single paragraph description and choose at most {} categories, \
         only from the list above, spelled exactly as listed.\n\
         Respond with this JSON shape: {{\"description\": \"...\", \"categories\": [\"Category\"]}}",
        subject,
        format_list(vocabulary),
        max
    )
}

/// Body of a flashcard request for `policy`
pub fn flashcard_prompt(policy: &DomainPolicy, request: &FlashcardRequest, count: usize) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!("Domain: {}\n", policy.name));
    if let Some(thinker) = policy.subject_for(request) {
        prompt.push_str(&format!("Thinker: {}\n", thinker));
    }
    if let Some(work) = request.work.as_deref().map(str::trim).filter(|w| !w.is_empty()) {
        prompt.push_str(&format!("Work: {}\n", work));
    }
    if let Some(extra) = request
        .domain_instructions
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        prompt.push_str(&format!("Additional instructions: {}\n", extra));
    }

    prompt.push_str(&format!("\nCreate exactly {} flashcards from the material below.\n", count));

    if let Some(types) = policy.card_types_for(request) {
        prompt.push_str(&format!(
            "Each card's \"type\" must be one of: {}.\n",
            format_list(&types)
        ));
    }

    let shape = if policy.is_strict() {
        r#"{"flashcards": [{"type": "...", "front": "...", "back": "...", "context_logic": "...", "tags": ["..."]}]}"#
    } else {
        r#"{"flashcards": [{"type": "...", "front": "...", "back": "...", "tags": ["..."]}]}"#
    };
    prompt.push_str(&format!("Respond with this JSON shape: {}\n", shape));

    prompt.push_str(&format!("\nMaterial:\n{}", request.content.trim()));
    prompt
}

fn format_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_compose() {
        assert_eq!(compose(Some("Be brief."), "Hello"), "Be brief.\n\nHello");
        assert_eq!(compose(None, "Hello"), "Hello");
        assert_eq!(compose(Some("  "), "Hello"), "Hello");
    }

    #[test]
    fn test_category_prompt_lists_vocabulary_and_limit() {
        let prompt = category_prompt(
            "  New GPU architecture  ",
            &vocab(&["Technology", " Science "]),
            3,
        );

        assert!(prompt.contains("Available categories: Technology, Science"));
        assert!(prompt.contains("at most 3 categories"));
        assert!(prompt.contains("{\"categories\": [\"Category\"]}"));
        assert!(prompt.ends_with("Content:\nNew GPU architecture"));
    }

    #[test]
    fn test_description_prompt_sources() {
        let categories = vocab(&["Health"]);

        let text = description_prompt(DescriptionSource::Text("Sleep study"), &categories, 2);
        assert!(text.contains("Content:\nSleep study"));
        assert!(text.contains("\"description\""));

        let video = description_prompt(
            DescriptionSource::Video("https://youtu.be/abc"),
            &categories,
            2,
        );
        assert!(video.contains("attached video (https://youtu.be/abc)"));
        assert!(!video.contains("Content:"));
    }

    #[test]
    fn test_flashcard_prompt_for_philosophy() {
        let policy = DomainPolicy::political_philosophy();
        let request = FlashcardRequest::new("The social pact").with_subject("Rousseau", "The Social Contract");

        let prompt = flashcard_prompt(&policy, &request, 4);

        assert!(prompt.contains("Thinker: Rousseau"));
        assert!(prompt.contains("Work: The Social Contract"));
        assert!(prompt.contains("exactly 4 flashcards"));
        assert!(prompt.contains("Concept, Argument, Context, Contrast"));
        assert!(prompt.contains("context_logic"));
        assert!(prompt.ends_with("Material:\nThe social pact"));
    }

    #[test]
    fn test_flashcard_prompt_for_generic_domain() {
        let policy = DomainPolicy::generic();
        let request = FlashcardRequest::new("Photosynthesis")
            .with_card_types(vocab(&["Definition"]))
            .with_domain_instructions("Focus on biology");

        let prompt = flashcard_prompt(&policy, &request, 5);

        assert!(!prompt.contains("Thinker:"));
        assert!(prompt.contains("must be one of: Definition"));
        assert!(prompt.contains("Additional instructions: Focus on biology"));
        assert!(!prompt.contains("context_logic"));
    }
}
