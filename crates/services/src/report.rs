use std::fmt::Write as _;

use quiz_core::model::RankedCategory;

/// Final report of a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub entries: Vec<RankedCategory>,
    /// False when no answer scored any points at all.
    pub had_scores: bool,
    /// Whether the result sink accepted the record.
    pub recorded: bool,
}

impl Report {
    #[must_use]
    pub fn render_text(&self) -> String {
        if !self.had_scores {
            return "Unfortunately, your results could not be determined. \
                    Please start the test again with /test."
                .to_string();
        }

        let mut out = String::from("Your test results\n\n");
        if self.entries.is_empty() {
            out.push_str("Unfortunately, no matching specialties were found.\n");
        } else {
            out.push_str("Specialties that suit you best:\n");
            for (i, entry) in self.entries.iter().enumerate() {
                let _ = write!(
                    out,
                    "\n{}. {}\n{}\nPoints: {}\n",
                    i + 1,
                    entry.category,
                    entry.description,
                    entry.score
                );
            }
        }
        out.push_str("\nThank you for taking the test!");
        if self.recorded {
            out.push_str(" Your result has been saved.");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::CategoryName;

    fn entry(name: &str, score: i64) -> RankedCategory {
        RankedCategory {
            category: CategoryName::new(name).unwrap(),
            score,
            description: format!("About {name}"),
        }
    }

    #[test]
    fn numbered_entries_with_points() {
        let report = Report {
            entries: vec![entry("Eng", 4), entry("Art", 2)],
            had_scores: true,
            recorded: true,
        };
        let text = report.render_text();
        assert!(text.contains("1. Eng\nAbout Eng\nPoints: 4"));
        assert!(text.contains("2. Art\nAbout Art\nPoints: 2"));
        assert!(text.ends_with("Thank you for taking the test! Your result has been saved."));
    }

    #[test]
    fn scores_without_catalog_matches_get_no_match_message() {
        let report = Report {
            entries: Vec::new(),
            had_scores: true,
            recorded: false,
        };
        let text = report.render_text();
        assert!(text.contains("no matching specialties"));
        assert!(text.ends_with("Thank you for taking the test!"));
    }

    #[test]
    fn empty_scores_get_distinct_message() {
        let report = Report {
            entries: Vec::new(),
            had_scores: false,
            recorded: true,
        };
        let text = report.render_text();
        assert!(text.contains("could not be determined"));
        assert!(!text.contains("no matching specialties"));
    }
}
