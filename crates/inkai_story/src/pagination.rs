//! Splitting generated text into story pages.

use inkai_core::StoryPage;

/// Most pages a story is cut to.
pub const MAX_PAGES: usize = 10;

/// One page per non-blank line, trimmed, numbered from 1, at most [`MAX_PAGES`].
///
/// Fewer lines give fewer pages; blank text gives no pages.
pub fn paginate(text: &str) -> Vec<StoryPage> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_PAGES)
        .zip(1u32..)
        .map(|(line, page)| StoryPage::new(page, line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_follow_lines() {
        let pages = paginate("  First line. \n\nSecond line.\n   \n\tThird line.\t");
        assert_eq!(
            pages,
            vec![
                StoryPage::new(1, "First line."),
                StoryPage::new(2, "Second line."),
                StoryPage::new(3, "Third line."),
            ]
        );
    }

    #[test]
    fn test_truncates_to_ten_pages() {
        let text = (1..=15)
            .map(|i| format!("Paragraph {}", i))
            .collect::<Vec<_>>()
            .join("\n");

        let pages = paginate(&text);

        assert_eq!(pages.len(), 10);
        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.page as usize, i + 1);
            assert_eq!(page.content, format!("Paragraph {}", i + 1));
        }
    }

    #[test]
    fn test_blank_lines_do_not_count_toward_limit() {
        let text = (1..=12)
            .map(|i| format!("Line {}\n\n   \n", i))
            .collect::<String>();

        let pages = paginate(&text);

        assert_eq!(pages.len(), 10);
        assert_eq!(pages[9].content, "Line 10");
    }

    #[test]
    fn test_no_padding() {
        let pages = paginate("Only one.");
        assert_eq!(pages, vec![StoryPage::new(1, "Only one.")]);
    }

    #[test]
    fn test_blank_text_gives_no_pages() {
        assert!(paginate("").is_empty());
        assert!(paginate("\n \n\t\n").is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let pages = paginate("One.\r\n\r\nTwo.\r\n");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].content, "Two.");
    }

    #[test]
    fn test_page_numbers_are_contiguous() {
        let text = "a\n\nb\n \nc\nd\n\n\ne";
        let pages = paginate(text);
        let numbers: Vec<u32> = pages.iter().map(|p| p.page).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }
}
