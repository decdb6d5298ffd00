//! Prompt assembly
//!
//! The prompt is an ordered list of sections joined by blank lines:
//! master instructions, the target group line, then the lightning talks,
//! attendees, and discussion notes blocks when their source exists.
//! A missing source produces no section at all, never an empty one.

use std::fmt;

pub const TARGET_GROUP_LABEL: &str = "TARGET BREAKOUT GROUP";
pub const LIGHTNING_TALKS_LABEL: &str = "LIGHTNING TALKS DATA";
pub const ATTENDEES_LABEL: &str = "ATTENDEES CSV DATA";
pub const NOTES_LABEL: &str = "DISCUSSION NOTES";

/// Kind of a prompt section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    MasterInstructions,
    TargetGroup,
    LightningTalks,
    Attendees,
    Notes,
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionKind::MasterInstructions => write!(f, "master_instructions"),
            SectionKind::TargetGroup => write!(f, "target_group"),
            SectionKind::LightningTalks => write!(f, "lightning_talks"),
            SectionKind::Attendees => write!(f, "attendees"),
            SectionKind::Notes => write!(f, "notes"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSection {
    pub kind: SectionKind,
    pub text: String,
}

/// Assembled prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptDocument {
    sections: Vec<PromptSection>,
}

impl PromptDocument {
    pub fn sections(&self) -> &[PromptSection] {
        &self.sections
    }

    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.sections.iter().any(|s| s.kind == kind)
    }

    /// Final prompt text
    pub fn render(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Builds a [`PromptDocument`] in the fixed section order
///
/// Optional sections may be supplied in any order; `build()` always emits
/// them as talks, attendees, notes.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    master_prompt: String,
    target_group: String,
    lightning_talks: Option<String>,
    attendees: Option<String>,
    notes: Option<String>,
}

/// Blank payloads count as absent
fn present(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

impl PromptAssembler {
    pub fn new(master_prompt: impl Into<String>, target_group: impl Into<String>) -> Self {
        Self {
            master_prompt: master_prompt.into(),
            target_group: target_group.into(),
            lightning_talks: None,
            attendees: None,
            notes: None,
        }
    }

    /// Rendered lightning-talk block from the filter
    pub fn lightning_talks(mut self, block: Option<String>) -> Self {
        self.lightning_talks = present(block);
        self
    }

    /// Raw staged attendee CSV, unfiltered
    pub fn attendees(mut self, csv_text: Option<String>) -> Self {
        self.attendees = present(csv_text);
        self
    }

    /// Raw staged notes text
    pub fn notes(mut self, text: Option<String>) -> Self {
        self.notes = present(text);
        self
    }

    pub fn build(self) -> PromptDocument {
        let mut sections = vec![
            PromptSection {
                kind: SectionKind::MasterInstructions,
                text: self.master_prompt.trim_end().to_string(),
            },
            PromptSection {
                kind: SectionKind::TargetGroup,
                text: format!("{}: {}", TARGET_GROUP_LABEL, self.target_group.trim()),
            },
        ];

        let optional = [
            (SectionKind::LightningTalks, LIGHTNING_TALKS_LABEL, self.lightning_talks),
            (SectionKind::Attendees, ATTENDEES_LABEL, self.attendees),
            (SectionKind::Notes, NOTES_LABEL, self.notes),
        ];

        for (kind, label, body) in optional {
            if let Some(body) = body {
                sections.push(PromptSection {
                    kind,
                    text: format!("{}:\n{}", label, body.trim_end()),
                });
            }
        }

        PromptDocument { sections }
    }
}
