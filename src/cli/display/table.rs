//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::expansion::{SkippedTemplate, Topology};
use crate::domain::template::{Kind, TemplateStore};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Per-kind row of the generation summary
#[derive(Debug, Clone, PartialEq)]
pub struct KindSummary {
    pub kind: Kind,
    pub templates: usize,
    pub instances: usize,
    pub skipped: usize,
}

impl KindSummary {
    /// One row per kind, services last.
    pub fn collect(
        store: &TemplateStore,
        topology: &Topology,
        skipped: &[SkippedTemplate],
    ) -> Vec<KindSummary> {
        Kind::EXPANDED
            .into_iter()
            .chain(std::iter::once(Kind::Service))
            .map(|kind| KindSummary {
                kind,
                templates: store.count(kind),
                instances: topology.count(kind),
                skipped: skipped.iter().filter(|s| s.kind == kind).count(),
            })
            .collect()
    }
}

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render the per-kind summary plus the list of skipped templates
    pub fn render_summary(
        &self,
        rows: &[KindSummary],
        skipped: &[SkippedTemplate],
        rejected_lines: usize,
    ) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("KIND").set_alignment(CellAlignment::Left),
                Cell::new("TEMPLATES").set_alignment(CellAlignment::Right),
                Cell::new("INSTANCES").set_alignment(CellAlignment::Right),
                Cell::new("SKIPPED").set_alignment(CellAlignment::Right),
            ]);

        for row in rows {
            let icon = StatusIcon::get_kind_icon(row.templates, row.instances, row.skipped);
            let color = self
                .theme
                .get_kind_color(row.templates, row.instances, row.skipped);

            table.add_row(vec![
                Cell::new(format!("{} {}", icon, row.kind)).fg(color),
                Cell::new(row.templates).set_alignment(CellAlignment::Right),
                Cell::new(row.instances).set_alignment(CellAlignment::Right),
                Cell::new(row.skipped)
                    .set_alignment(CellAlignment::Right)
                    .fg(if row.skipped > 0 {
                        self.theme.warning
                    } else {
                        self.theme.muted
                    }),
            ]);
        }

        let total: usize = rows.iter().map(|r| r.instances).sum();
        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Generated Topology {} ─╮\n",
            format!("[{} instances]", total).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');

        let status = StatusIcon::get_status_text(skipped.len() + rejected_lines);
        if skipped.is_empty() && rejected_lines == 0 {
            output.push_str(&format!("Status: {} {}\n", StatusIcon::SUCCESS.green(), status));
            return output;
        }

        output.push_str(&format!(
            "Status: {} {}\n",
            StatusIcon::WARNING.yellow(),
            status.yellow()
        ));

        let mut dropped = Table::new();
        dropped
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["DROPPED", "REASON"]);
        if rejected_lines > 0 {
            dropped.add_row(vec![
                Cell::new(format!("{} input", StatusIcon::ERROR)).fg(self.theme.error),
                Cell::new(format!("{} malformed input lines dropped", rejected_lines))
                    .fg(self.theme.error),
            ]);
        }
        for entry in skipped {
            let reasons: Vec<String> = entry.errors.iter().map(|e| e.to_string()).collect();
            dropped.add_row(vec![
                Cell::new(format!("{} {} {}", StatusIcon::WARNING, entry.kind, entry.key))
                    .fg(self.theme.warning),
                Cell::new(reasons.join("\n")),
            ]);
        }
        output.push_str(&dropped.to_string());
        output.push('\n');

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::TopologyError;

    fn row(kind: Kind, templates: usize, instances: usize, skipped: usize) -> KindSummary {
        KindSummary {
            kind,
            templates,
            instances,
            skipped,
        }
    }

    #[test]
    fn test_render_clean_summary() {
        colored::control::set_override(false);
        let renderer = TableRenderer::new();
        let rows = vec![
            row(Kind::Container, 1, 2, 0),
            row(Kind::Pod, 1, 2, 0),
            row(Kind::VNode, 1, 1, 0),
            row(Kind::Node, 1, 1, 0),
        ];
        let output = renderer.render_summary(&rows, &[], 0);
        assert!(output.contains("[6 instances]"));
        assert!(output.contains("vnode"));
        assert!(output.contains("Complete"));
        assert!(!output.contains("DROPPED"));
    }

    #[test]
    fn test_render_skipped_templates() {
        colored::control::set_override(false);
        let renderer = TableRenderer::new();
        let skipped = vec![SkippedTemplate {
            kind: Kind::Node,
            key: "bad".to_string(),
            errors: vec![TopologyError::not_found(Kind::VNode, "ghost", Kind::Node, "bad")],
        }];
        let rows = vec![row(Kind::Node, 2, 1, 1)];
        let output = renderer.render_summary(&rows, &skipped, 2);
        assert!(output.contains("Partial"));
        assert!(output.contains("node bad"));
        assert!(output.contains(StatusIcon::ERROR));
        assert!(output.contains("ghost"));
        assert!(output.contains("2 malformed input lines dropped"));
    }
}
