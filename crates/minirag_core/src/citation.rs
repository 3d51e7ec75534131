/// One retrieved source passage backing an answer.
///
/// Citations are rebuilt for every answer; `display_index` is 1-based and
/// only meaningful within the answer that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub source_text: String,
    pub display_index: usize,
}

impl Citation {
    /// Numbers backend sources in the order they were returned.
    pub fn from_sources<I>(sources: I) -> Vec<Citation>
    where
        I: IntoIterator<Item = String>,
    {
        sources
            .into_iter()
            .enumerate()
            .map(|(idx, source_text)| Citation {
                source_text,
                display_index: idx + 1,
            })
            .collect()
    }

    pub fn label(&self) -> String {
        format!("Source {}", self.display_index)
    }

    /// First `max_chars` characters of the passage, with an ellipsis only
    /// when something was cut off.
    pub fn preview(&self, max_chars: usize) -> String {
        match self.source_text.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &self.source_text[..cut]),
            None => self.source_text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_are_numbered_from_one() {
        let citations = Citation::from_sources(vec!["a".to_string(), "b".to_string()]);
        let labels: Vec<_> = citations.iter().map(Citation::label).collect();
        assert_eq!(labels, vec!["Source 1", "Source 2"]);
    }

    #[test]
    fn short_passage_is_not_ellipsized() {
        let citation = Citation {
            source_text: "short".to_string(),
            display_index: 1,
        };
        assert_eq!(citation.preview(60), "short");
    }

    #[test]
    fn long_passage_is_cut_at_char_boundary() {
        let citation = Citation {
            source_text: "é".repeat(61),
            display_index: 1,
        };
        let preview = citation.preview(60);
        assert_eq!(preview, format!("{}...", "é".repeat(60)));
    }

    #[test]
    fn exact_length_passage_is_kept_whole() {
        let text = "x".repeat(60);
        let citation = Citation {
            source_text: text.clone(),
            display_index: 3,
        };
        assert_eq!(citation.preview(60), text);
    }
}
