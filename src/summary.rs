//! Plain-text cleanup for the HTML-bearing summary field.

use scraper::Html;

/// Appended when the summary had to be shortened
pub const ELLIPSIS: &str = "...";

/// Strip markup from an HTML fragment and collapse runs of whitespace.
///
/// Entities are decoded by the HTML parser itself, so `&amp;` comes out as
/// a literal ampersand.
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sanitize a summary to plain text within a character budget.
///
/// Under-budget text is returned unchanged. Over-budget text keeps whole
/// sentences (split on ". ") for as long as they fit, then gains an
/// ellipsis, so the result never exceeds `budget` plus the ellipsis. When
/// even the first sentence is too long the text is cut at the budget
/// boundary instead.
pub fn clean_summary(html: &str, budget: usize) -> String {
    truncate_sentences(&strip_html(html), budget)
}

fn truncate_sentences(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }

    let mut kept: Vec<&str> = Vec::new();
    let mut used = 0;
    for sentence in text.split(". ") {
        // Two extra chars rejoin the ". " the split consumed
        let cost = sentence.chars().count() + if kept.is_empty() { 0 } else { 2 };
        if used + cost > budget {
            break;
        }
        used += cost;
        kept.push(sentence);
    }

    if kept.is_empty() {
        let head: String = text.chars().take(budget).collect();
        return format!("{}{}", head.trim_end(), ELLIPSIS);
    }
    format!("{}{}", kept.join(". "), ELLIPSIS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_markup_and_entities() {
        let html = "Rich <b>and</b> creamy pasta with <a href=\"#\">bacon &amp; eggs</a>.";
        assert_eq!(strip_html(html), "Rich and creamy pasta with bacon & eggs.");
    }

    #[test]
    fn test_under_budget_is_returned_unchanged() {
        let text = "Short and sweet.";
        assert_eq!(clean_summary(text, 100), text);
    }

    #[test]
    fn test_keeps_whole_sentences() {
        let html = "First sentence here. Second sentence follows. Third one is dropped.";
        let cleaned = clean_summary(html, 45);
        assert_eq!(cleaned, "First sentence here. Second sentence follows...");
    }

    #[test]
    fn test_never_exceeds_budget_plus_ellipsis() {
        let html = "<p>One two three. Four five six. Seven eight nine ten eleven twelve.</p>";
        for budget in [5, 10, 20, 30, 60, 200] {
            let cleaned = clean_summary(html, budget);
            assert!(
                cleaned.chars().count() <= budget + ELLIPSIS.len(),
                "budget {budget} produced {cleaned:?}"
            );
        }
    }

    #[test]
    fn test_oversized_first_sentence_is_cut_at_budget() {
        let text = "An unbroken run of words without any sentence boundary at all";
        let cleaned = clean_summary(text, 10);
        assert_eq!(cleaned, "An unbroke...");
    }
}
