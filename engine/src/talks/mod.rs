//! Lightning-talk filtering
//!
//! Reads the staged signup sheet (CSV with a header row), keeps the rows
//! whose session label matches the target group, and renders them as a
//! numbered block for the prompt.

pub mod matcher;

pub use matcher::{fuzzy_session_match, ExactSessionMatcher, FuzzySessionMatcher, SessionMatcher};

use sdk::errors::ReportError;
use sdk::types::SourceCategory;

/// Placeholder for a display field that is missing or blank
pub const MISSING_FIELD: &str = "N/A";

/// One signup-sheet row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightningTalkRecord {
    pub title: String,
    pub author: String,
    pub institution: String,
    pub abstract_text: String,
    pub session_label: String,
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TalkColumns {
    session: Option<usize>,
    title: Option<usize>,
    abstract_text: Option<usize>,
    institution: Option<usize>,
    author: Option<usize>,
}

const SESSION_KEYWORDS: [&str; 2] = ["breakout", "session"];
const TITLE_KEYWORDS: [&str; 1] = ["title"];
const ABSTRACT_KEYWORDS: [&str; 3] = ["abstract", "description", "summary"];
const INSTITUTION_KEYWORDS: [&str; 4] = ["institution", "affiliation", "organization", "organisation"];
const AUTHOR_KEYWORDS: [&str; 4] = ["author", "presenter", "speaker", "name"];

/// Rank a header as the session column, `None` if it is not a candidate
///
/// "breakout" outranks a bare "session", and a header that also names
/// another field ("Abstract of your session talk") ranks below both.
fn session_rank(header: &str) -> Option<u8> {
    if !SESSION_KEYWORDS.iter().any(|k| header.contains(k)) {
        return None;
    }

    let names_other_field = TITLE_KEYWORDS
        .iter()
        .chain(&ABSTRACT_KEYWORDS)
        .chain(&INSTITUTION_KEYWORDS)
        .chain(&AUTHOR_KEYWORDS)
        .any(|k| header.contains(k));

    Some(match (names_other_field, header.contains("breakout")) {
        (false, true) => 3,
        (false, false) => 2,
        (true, _) => 1,
    })
}

impl TalkColumns {
    /// Headers are matched by keyword, case-insensitively. The session
    /// column is the best-ranked candidate, earliest on ties. The other
    /// fields then claim columns in a fixed order and a column is never
    /// claimed twice, so "Institution Name" goes to institution before
    /// author sees "name".
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_lowercase())
            .collect();
        let mut claimed = vec![false; normalized.len()];

        let session = normalized
            .iter()
            .enumerate()
            .filter_map(|(i, h)| session_rank(h).map(|rank| (rank, i)))
            .max_by(|(ra, ia), (rb, ib)| ra.cmp(rb).then(ib.cmp(ia)))
            .map(|(_, i)| i);
        if let Some(idx) = session {
            claimed[idx] = true;
        }

        let mut claim = |keywords: &[&str]| -> Option<usize> {
            let idx = normalized
                .iter()
                .enumerate()
                .find(|(i, h)| !claimed[*i] && keywords.iter().any(|k| h.contains(k)))
                .map(|(i, _)| i)?;
            claimed[idx] = true;
            Some(idx)
        };

        let title = claim(&TITLE_KEYWORDS);
        let abstract_text = claim(&ABSTRACT_KEYWORDS);
        let institution = claim(&INSTITUTION_KEYWORDS);
        let author = claim(&AUTHOR_KEYWORDS);

        Self {
            session,
            title,
            abstract_text,
            institution,
            author,
        }
    }
}

fn field(record: &csv::StringRecord, column: Option<usize>) -> String {
    column
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(MISSING_FIELD)
        .to_string()
}

/// Parse the signup sheet into records
///
/// # Errors
///
/// Returns `ReportError::SourceUnavailable` for the lightning-talks category
/// when the payload is not readable as a header-driven CSV table.
pub fn parse_records(payload: &str) -> Result<Vec<LightningTalkRecord>, ReportError> {
    let parse_error = |e: csv::Error| ReportError::SourceUnavailable {
        category: SourceCategory::LightningTalks,
        reason: format!("malformed CSV: {}", e),
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(payload.as_bytes());

    let columns = TalkColumns::from_headers(reader.headers().map_err(parse_error)?);
    if columns.session.is_none() {
        tracing::warn!("Lightning talk sheet has no session column; no talks can match");
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(parse_error)?;
        let session_label = columns
            .session
            .and_then(|i| row.get(i))
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        records.push(LightningTalkRecord {
            title: field(&row, columns.title),
            author: field(&row, columns.author),
            institution: field(&row, columns.institution),
            abstract_text: field(&row, columns.abstract_text),
            session_label,
        });
    }

    Ok(records)
}

/// Rows of the signup sheet that matched the target group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredTalks {
    /// Number of data rows read from the sheet
    pub scanned: usize,
    pub matched: Vec<LightningTalkRecord>,
}

impl FilteredTalks {
    /// Rendered block, or `None` if nothing matched
    pub fn block(&self) -> Option<String> {
        render_talks(&self.matched)
    }
}

/// Filters signup-sheet rows with a pluggable session matcher
#[derive(Debug, Clone, Default)]
pub struct LightningTalkFilter<M = FuzzySessionMatcher> {
    matcher: M,
}

impl LightningTalkFilter<FuzzySessionMatcher> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: SessionMatcher> LightningTalkFilter<M> {
    pub fn with_matcher(matcher: M) -> Self {
        Self { matcher }
    }

    /// Keep the rows whose session label matches `target_group`
    pub fn filter(&self, payload: &str, target_group: &str) -> Result<FilteredTalks, ReportError> {
        let records = parse_records(payload)?;
        let scanned = records.len();

        let matched: Vec<_> = records
            .into_iter()
            .filter(|r| self.matcher.matches(target_group, &r.session_label))
            .collect();

        tracing::info!(
            "Matched {} of {} lightning talks to '{}'",
            matched.len(),
            scanned,
            target_group
        );

        Ok(FilteredTalks { scanned, matched })
    }
}

/// Render talks as numbered, labeled blocks separated by blank lines
pub fn render_talks(talks: &[LightningTalkRecord]) -> Option<String> {
    if talks.is_empty() {
        return None;
    }

    let blocks: Vec<String> = talks
        .iter()
        .enumerate()
        .map(|(i, talk)| {
            format!(
                "Talk {}:\nTitle: {}\nAuthor: {}\nInstitution: {}\nAbstract: {}",
                i + 1,
                talk.title,
                talk.author,
                talk.institution,
                talk.abstract_text
            )
        })
        .collect();

    Some(blocks.join("\n\n"))
}
