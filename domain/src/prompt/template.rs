//! Prompt templates for the refinement and debate flows

use crate::persona::Persona;
use std::collections::BTreeMap;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Fixed opening question for Socratic refinement.
    ///
    /// Deliberately not model-generated so the first turn is deterministic.
    pub fn opening_question() -> &'static str {
        "What is the single most important outcome you hope to achieve from this opportunity?"
    }

    /// User prompt asking for the next follow-up question
    pub fn next_question(transcript: &str) -> String {
        format!(
            "Based on this conversation, ask the single most insightful follow-up question \
             to deeply understand the user's priorities. The question should be open-ended. \
             Return only the question text.\n\nHistory:\n{}",
            transcript
        )
    }

    /// User prompt asking for the refined goal synthesis
    pub fn refine_goal(transcript: &str) -> String {
        format!(
            "Synthesize the following conversation into a concise, actionable goal for an \
             advisory panel. The goal should be a single paragraph that captures all the \
             user's stated priorities and concerns.\n\nConversation:\n{}",
            transcript
        )
    }

    /// User prompt for a primary persona's round-table analysis
    pub fn round_table(refined_goal: &str) -> String {
        format!(
            "Given the user's goal, provide your expert analysis and recommendations. Goal: '{}'",
            refined_goal
        )
    }

    /// User prompt for the devil's advocate critique
    pub fn critique(responses: &BTreeMap<Persona, String>) -> String {
        format!(
            "Review the following expert analyses regarding a user's goal. Your task is to \
             play devil's advocate. Identify potential flaws, risks, overlooked details, and \
             conflicting advice in their recommendations. Be concise and direct.\n\n\
             Analyses:\n{}",
            serialize_responses(responses)
        )
    }

    /// User prompt asking a persona to revise its analysis
    pub fn revision(
        own_previous: &str,
        peers: &BTreeMap<Persona, String>,
        critique: &str,
    ) -> String {
        format!(
            "Your previous analysis was: '{}'.\nOther experts said: {}\n\n\
             A critique was raised: '{}'.\n\n\
             Please provide a revised, improved analysis that addresses the critique and \
             considers the other perspectives to move towards a unified recommendation.",
            own_previous,
            serialize_responses(peers),
            critique
        )
    }

    /// User prompt for the consensus analyzer (JSON contract)
    pub fn consensus_check(responses: &BTreeMap<Persona, String>) -> String {
        format!(
            "Analyze these revised expert opinions. Have they reached a clear consensus? \
             Respond ONLY with a JSON object containing 'consensus' (boolean), and if true, \
             a 'recommendation' (string summarizing the unified advice) and 'reasoning' \
             (string explaining why it's a consensus).\n\nOpinions:\n{}",
            serialize_responses(responses)
        )
    }

    /// User prompt for the mediator's compromise synthesis
    pub fn compromise(responses: &BTreeMap<Persona, String>) -> String {
        format!(
            "These experts could not agree. Act as a final mediator. Synthesize their \
             conflicting final opinions into a single, balanced, and actionable \
             recommendation for the user. Explain the key tradeoffs.\n\n\
             Final Opinions:\n{}",
            serialize_responses(responses)
        )
    }

    /// User prompt for the AI moderation tier (JSON contract)
    pub fn moderation(name: &str, description: &str) -> String {
        format!(
            "Analyze the following content for an educational platform for students.\n\
             The content must be free of hate speech, explicit material, scams, violence, \
             and illegal activities.\n\
             Respond ONLY with a valid JSON object with three keys:\n\
             1. \"approved\": a boolean (true or false).\n\
             2. \"confidence\": an integer between 0 and 100.\n\
             3. \"reasons\": an array of strings explaining the decision if not approved.\n\n\
             Content to analyze:\n---\nName: {}\nDescription: {}\n---",
            name, description
        )
    }
}

/// Serialize a persona->response map as pretty JSON keyed by persona id.
///
/// Falls back to a plain listing if serialization fails (it cannot for
/// string maps, but the signature demands honesty).
fn serialize_responses(responses: &BTreeMap<Persona, String>) -> String {
    serde_json::to_string_pretty(responses).unwrap_or_else(|_| {
        responses
            .iter()
            .map(|(p, r)| format!("{}: {}", p, r))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responses() -> BTreeMap<Persona, String> {
        BTreeMap::from([
            (Persona::AdmissionsOfficer, "apply early".to_string()),
            (Persona::HrManager, "build skills first".to_string()),
        ])
    }

    #[test]
    fn test_opening_question_is_fixed() {
        assert_eq!(
            PromptTemplate::opening_question(),
            PromptTemplate::opening_question()
        );
        assert!(!PromptTemplate::opening_question().is_empty());
    }

    #[test]
    fn test_next_question_embeds_transcript() {
        let prompt = PromptTemplate::next_question("Q: one\nA: two");
        assert!(prompt.contains("Q: one\nA: two"));
        assert!(prompt.contains("open-ended"));
    }

    #[test]
    fn test_critique_serializes_all_personas() {
        let prompt = PromptTemplate::critique(&responses());
        assert!(prompt.contains("admissions_officer"));
        assert!(prompt.contains("hr_manager"));
        assert!(prompt.contains("devil's advocate"));
    }

    #[test]
    fn test_revision_includes_own_and_peers() {
        let peers = responses();
        let prompt = PromptTemplate::revision("my old take", &peers, "too optimistic");
        assert!(prompt.contains("my old take"));
        assert!(prompt.contains("too optimistic"));
        assert!(prompt.contains("apply early"));
    }

    #[test]
    fn test_consensus_check_demands_json() {
        let prompt = PromptTemplate::consensus_check(&responses());
        assert!(prompt.contains("'consensus'"));
        assert!(prompt.contains("JSON"));
    }

    #[test]
    fn test_moderation_embeds_content() {
        let prompt = PromptTemplate::moderation("Chess Club", "We play chess");
        assert!(prompt.contains("Name: Chess Club"));
        assert!(prompt.contains("Description: We play chess"));
        assert!(prompt.contains("\"confidence\""));
    }
}
