//! Rendering options configuration.

/// Options for console rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Number paragraphs, tables and slides from 1 instead of 0
    pub one_based_numbering: bool,

    /// Print a "Found N table(s):" line before the tables
    pub table_summary: bool,

    /// Separator placed between table cells
    pub cell_separator: String,

    /// Width of the `=` banner lines
    pub banner_width: usize,

    /// Print a header for slides without text
    pub include_empty_slides: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            one_based_numbering: true,
            table_summary: false,
            cell_separator: " | ".to_string(),
            banner_width: 60,
            include_empty_slides: true,
        }
    }
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one-based numbering.
    pub fn with_one_based_numbering(mut self, enabled: bool) -> Self {
        self.one_based_numbering = enabled;
        self
    }

    /// Enable or disable the table count line.
    pub fn with_table_summary(mut self, enabled: bool) -> Self {
        self.table_summary = enabled;
        self
    }

    /// Set the cell separator.
    pub fn with_cell_separator(mut self, separator: impl Into<String>) -> Self {
        self.cell_separator = separator.into();
        self
    }

    /// Set the banner width.
    pub fn with_banner_width(mut self, width: usize) -> Self {
        self.banner_width = width;
        self
    }

    /// Enable or disable headers for slides without text.
    pub fn with_empty_slides(mut self, enabled: bool) -> Self {
        self.include_empty_slides = enabled;
        self
    }

    /// Display number for a zero-based index.
    pub(crate) fn number(&self, index: usize) -> usize {
        if self.one_based_numbering {
            index + 1
        } else {
            index
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let options = RenderOptions::new()
            .with_one_based_numbering(false)
            .with_table_summary(true)
            .with_cell_separator("\t")
            .with_banner_width(40)
            .with_empty_slides(false);

        assert!(!options.one_based_numbering);
        assert!(options.table_summary);
        assert_eq!(options.cell_separator, "\t");
        assert_eq!(options.banner_width, 40);
        assert!(!options.include_empty_slides);
        assert_eq!(options.number(2), 2);
    }

    #[test]
    fn test_default_numbering_is_one_based() {
        assert_eq!(RenderOptions::default().number(0), 1);
    }
}
