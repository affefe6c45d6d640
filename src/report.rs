//! Turns upload results into a display document.
//!
//! The desktop shell paints the blocks; the `Display` impl gives the same
//! document as plain text.

use crate::upload::UploadResult;
use std::fmt;

pub const EXTRACTED_DATA_TITLE: &str = "Extracted data";
pub const UNREADABLE_RESPONSE: &str = "Could not read the service response";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    FileHeader(String),
    SectionTitle(&'static str),
    Field {
        label: &'static str,
        value: String,
        /// false when `value` is the absence placeholder
        present: bool,
    },
    Notice(&'static str),
    Failure {
        file_name: String,
        message: String,
    },
    Separator,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    blocks: Vec<Block>,
}

impl Report {
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

pub fn render(results: &[UploadResult]) -> Report {
    let mut blocks = Vec::new();

    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            blocks.push(Block::Separator);
        }

        match result {
            UploadResult::Failure { file_name, message } => blocks.push(Block::Failure {
                file_name: file_name.clone(),
                message: message.clone(),
            }),
            UploadResult::Success { file_name, fields } => {
                blocks.push(Block::FileHeader(file_name.clone()));
                let Some(fields) = fields else {
                    blocks.push(Block::Notice(UNREADABLE_RESPONSE));
                    continue;
                };
                blocks.push(Block::SectionTitle(EXTRACTED_DATA_TITLE));
                for entry in fields.entries() {
                    blocks.push(Block::Field {
                        label: entry.label,
                        value: entry.value.unwrap_or(entry.placeholder).to_string(),
                        present: entry.value.is_some(),
                    });
                }
            }
        }
    }

    Report { blocks }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.blocks {
            match block {
                Block::FileHeader(name) => writeln!(f, "File: {name}")?,
                Block::SectionTitle(title) => writeln!(f, "{title}")?,
                Block::Field { label, value, .. } => writeln!(f, "  {label}: {value}")?,
                Block::Notice(text) => writeln!(f, "  {text}")?,
                Block::Failure { file_name, message } => writeln!(f, "{file_name}: {message}")?,
                Block::Separator => writeln!(f, "----")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::ExtractedFields;

    fn success(name: &str, fields: ExtractedFields) -> UploadResult {
        UploadResult::Success {
            file_name: name.to_string(),
            fields: Some(fields),
        }
    }

    #[test]
    fn test_issuer_name_under_company_label() {
        let report = render(&[success(
            "a.pdf",
            ExtractedFields {
                nome_emissor: Some("Acme".to_string()),
                ..Default::default()
            },
        )]);

        assert!(report.blocks().contains(&Block::Field {
            label: "Company",
            value: "Acme".to_string(),
            present: true,
        }));
        assert!(report.to_string().contains("Company: Acme"));
    }

    #[test]
    fn test_absent_fields_use_placeholders() {
        let report = render(&[success("empty.pdf", ExtractedFields::default())]);
        let text = report.to_string();

        assert!(text.contains("File: empty.pdf"));
        assert!(text.contains("Company: Not provided"));
        assert!(text.contains("Total value: Not available"));
        let fields = report
            .blocks()
            .iter()
            .filter(|b| matches!(b, Block::Field { present: false, .. }))
            .count();
        assert_eq!(fields, 9);
    }

    #[test]
    fn test_failures_and_separators_in_order() {
        let results = vec![
            UploadResult::Failure {
                file_name: "a.pdf".to_string(),
                message: "Error processing a.pdf: status code: 500".to_string(),
            },
            success(
                "b.pdf",
                ExtractedFields {
                    valor_total: Some("100.00".to_string()),
                    ..Default::default()
                },
            ),
            UploadResult::Success {
                file_name: "c.pdf".to_string(),
                fields: None,
            },
        ];
        let report = render(&results);
        let blocks = report.blocks();

        assert_eq!(
            blocks[0],
            Block::Failure {
                file_name: "a.pdf".to_string(),
                message: "Error processing a.pdf: status code: 500".to_string(),
            }
        );
        assert_eq!(blocks[1], Block::Separator);
        assert_eq!(blocks[2], Block::FileHeader("b.pdf".to_string()));
        assert_eq!(
            blocks.iter().filter(|b| **b == Block::Separator).count(),
            2
        );
        assert_eq!(blocks.last(), Some(&Block::Notice(UNREADABLE_RESPONSE)));
        assert!(report.to_string().contains("Total value: 100.00"));
    }

    #[test]
    fn test_nothing_to_render() {
        let report = render(&[]);
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "");
    }
}
