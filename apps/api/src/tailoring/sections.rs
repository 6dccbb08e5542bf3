//! Section Rewriter: finds skill-like sections in canonical résumé text and moves the items
//! that mention ranked keywords to the front.
//!
//! Three header families are scanned one after another over the whole text. Each family sees
//! the text as rewritten by the families before it, so when two families match overlapping
//! spans the later rewrite wins. Item order within a section only changes by score; ties keep
//! their original order.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::tailoring::keywords::Keyword;

/// Header families in scan order. Group 1 is the header, group 2 the section content.
const SECTION_FAMILIES: [&str; 3] = [
    r"(?i)(TECHNICAL SKILLS?|SKILLS?|TECHNOLOGIES?|PROGRAMMING LANGUAGES?|TOOLS?|FRAMEWORKS?)[:\s]*([^•\n]+)",
    r"(?i)(LANGUAGES?|PROGRAMMING)[:\s]*([^•\n]+)",
    r"(?i)(FRAMEWORKS?|LIBRARIES?|TOOLS?)[:\s]*([^•\n]+)",
];

const ITEM_DELIMITER: &str = r"[,;•\n]+";

const BANNER_KEYWORDS: usize = 5;
const RULE_WIDTH: usize = 80;

struct SectionPatterns {
    families: Vec<Regex>,
    item_delimiter: Regex,
}

impl SectionPatterns {
    fn compile() -> Result<Self, regex::Error> {
        let families = SECTION_FAMILIES
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            families,
            item_delimiter: Regex::new(ITEM_DELIMITER)?,
        })
    }
}

lazy_static! {
    static ref SECTION_PATTERNS: Result<SectionPatterns, regex::Error> = SectionPatterns::compile();
}

/// A résumé section whose header matched one of the skill families.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillSection {
    pub header: String,
    pub items: Vec<String>,
}

/// An item paired with the number of keywords it contains.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredItem {
    pub text: String,
    pub score: usize,
}

impl SkillSection {
    /// Splits `content` into trimmed, non-empty items. `None` if nothing is left.
    fn parse(header: &str, content: &str, delimiter: &Regex) -> Option<Self> {
        let items: Vec<String> = delimiter
            .split(content)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();

        if items.is_empty() {
            return None;
        }
        Some(Self {
            header: header.to_string(),
            items,
        })
    }

    /// Stable-sorts items by keyword score, highest first.
    pub fn reorder(&mut self, keywords: &[Keyword]) {
        let mut scored: Vec<ScoredItem> = self
            .items
            .drain(..)
            .map(|text| ScoredItem {
                score: score_item(&text, keywords),
                text,
            })
            .collect();

        scored.sort_by(|a, b| b.score.cmp(&a.score));
        self.items = scored.into_iter().map(|s| s.text).collect();
    }

    pub fn render(&self) -> String {
        format!("{}: {}", self.header, self.items.join(", "))
    }
}

/// Number of keywords contained in `item`, compared case-insensitively.
pub fn score_item(item: &str, keywords: &[Keyword]) -> usize {
    let item_lower = item.to_lowercase();
    keywords
        .iter()
        .filter(|k| item_lower.contains(&k.term.to_lowercase()))
        .count()
}

/// Reorders every skill section of `resume_text` and prepends the tailoring banner.
///
/// If the section patterns are unavailable the résumé is returned untouched, without the
/// banner, so tailoring never blocks on this step.
pub fn rewrite_resume(
    resume_text: &str,
    keywords: &[Keyword],
    job_title: &str,
    company_name: &str,
) -> String {
    let patterns = match SECTION_PATTERNS.as_ref() {
        Ok(patterns) => patterns,
        Err(e) => {
            warn!("Error polishing resume, returning it unmodified: {e}");
            return resume_text.to_string();
        }
    };

    let reordered = reorder_sections(resume_text, keywords, patterns);
    format!(
        "{}{}",
        tailored_banner(job_title, company_name, keywords),
        reordered
    )
}

fn reorder_sections(resume_text: &str, keywords: &[Keyword], patterns: &SectionPatterns) -> String {
    let mut text = resume_text.to_string();
    let mut rewritten = 0usize;

    for family in &patterns.families {
        let snapshot = text.clone();
        for caps in family.captures_iter(&snapshot) {
            let (Some(span), Some(header), Some(content)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            let Some(mut section) =
                SkillSection::parse(header.as_str(), content.as_str(), &patterns.item_delimiter)
            else {
                continue;
            };

            section.reorder(keywords);
            text = text.replacen(span.as_str(), &section.render(), 1);
            rewritten += 1;
        }
    }

    debug!("Rewrote {rewritten} skill section match(es)");
    text
}

/// Header block placed above the rewritten résumé.
pub fn tailored_banner(job_title: &str, company_name: &str, keywords: &[Keyword]) -> String {
    let top: Vec<&str> = keywords
        .iter()
        .take(BANNER_KEYWORDS)
        .map(|k| k.term.as_str())
        .collect();

    format!(
        "\n\nTAILORED FOR {} AT {}: {}\n{}\n",
        job_title.to_uppercase(),
        company_name.to_uppercase(),
        top.join(", "),
        "=".repeat(RULE_WIDTH)
    )
}
