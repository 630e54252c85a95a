use serde::{Deserialize, Serialize};

/// One question/answer pair of the FAQ accordion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// The FAQ shipped with the event page, in display order
pub fn default_faq() -> Vec<FaqEntry> {
    vec![
        FaqEntry::new(
            "Who can participate?",
            "Dev-o-lution is open to all students and recent graduates passionate about technology and innovation.",
        ),
        FaqEntry::new(
            "Is there a participation fee?",
            "Yes, There is! Please checkout the tickets on Unstop.",
        ),
        FaqEntry::new(
            "What should I bring?",
            "Bring your laptop, charger, and any other devices you need for development. We'll provide a great coding atmosphere!",
        ),
        FaqEntry::new(
            "Can I join as a speaker?",
            "We welcome speakers to share their knowledge. Check our timeline for speaker registration dates.",
        ),
    ]
}

/// Two-digit badge shown before each question ("01", "02", ...)
pub fn question_badge(index: usize) -> String {
    format!("{:02}", index + 1)
}

/// Copy of a reveal-only card (title, call-out, body)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionCopy {
    pub title: String,
    pub tagline: String,
    pub body: String,
}

impl SectionCopy {
    pub fn join_the_conversation(hashtag: &str) -> Self {
        Self {
            title: "Join the Conversation".to_string(),
            tagline: format!("Use our hashtag {} and win prizes!", hashtag),
            body: "Share your excitement, ideas, or projects on Twitter using our hashtag for a chance to win amazing prizes!".to_string(),
        }
    }

    pub fn partner_with_us(event_name: &str) -> Self {
        Self {
            title: "Partner With Us".to_string(),
            tagline: format!("Want to sponsor {}?", event_name),
            body: "Reach out and we'll get back to you with our sponsorship packages!".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_faq_order() {
        let faq = default_faq();
        assert_eq!(faq.len(), 4);
        assert_eq!(faq[0].question, "Who can participate?");
        assert_eq!(faq[3].question, "Can I join as a speaker?");
    }

    #[test]
    fn test_question_badge() {
        assert_eq!(question_badge(0), "01");
        assert_eq!(question_badge(11), "12");
    }

    #[test]
    fn test_section_copy_uses_event_details() {
        let join = SectionCopy::join_the_conversation("#dev_o_lution");
        assert!(join.tagline.contains("#dev_o_lution"));
        let partner = SectionCopy::partner_with_us("DEVOLUTION 2026");
        assert_eq!(partner.tagline, "Want to sponsor DEVOLUTION 2026?");
    }
}
