use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use feed_cli::pipeline::ConvertOutcome;
use feed_ingest::ExportStats;
use feed_model::SectionKind;

/// Render the conversion summary.
pub fn convert_summary(outcome: &ConvertOutcome) -> String {
    let summary = &outcome.summary;
    let mut lines = vec![format!("Input: {}", outcome.input)];
    match &outcome.output {
        Some(path) => lines.push(format!("Feed: {}", path.display())),
        None => lines.push("Feed: <stdout>".to_string()),
    }
    lines.push(format!("Elapsed: {:.2?}", outcome.elapsed));

    let mut table = Table::new();
    table.set_header(vec![header_cell("Item"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Attributes"), count_cell(summary.attributes)]);
    table.add_row(vec![
        Cell::new("Attribute values"),
        count_cell(summary.attribute_values),
    ]);
    table.add_row(vec![
        dim_cell("  ignored"),
        dim_cell(summary.ignored_values),
    ]);
    table.add_row(vec![Cell::new("Brands"), count_cell(summary.brands)]);
    table.add_row(vec![Cell::new("Categories"), count_cell(summary.categories)]);
    table.add_row(vec![
        Cell::new("Products")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.products).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        dim_cell("  category links"),
        dim_cell(summary.category_links),
    ]);
    lines.push(table.to_string());
    lines.join("\n")
}

/// Render the per-section counts of an inspected export.
pub fn inspect_summary(stats: &ExportStats) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Product id attribute: {}",
        stats.product_id_attribute.as_deref().unwrap_or("-")
    ));
    lines.push(format!(
        "Product name attribute: {}",
        stats.product_name_attribute.as_deref().unwrap_or("-")
    ));

    let mut sections = Table::new();
    sections.set_header(vec![header_cell("Section"), header_cell("Records")]);
    apply_summary_table_style(&mut sections);
    align_column(&mut sections, 1, CellAlignment::Right);
    for section in SectionKind::ALL {
        let (count, detail) = match section {
            SectionKind::Attributes => (
                stats.attributes,
                Some(("  enumerated", stats.enumerated_attributes)),
            ),
            SectionKind::AttributeValues => (stats.attribute_values(), None),
            SectionKind::Products => (
                stats.products,
                Some(("  with assets", stats.products_with_assets)),
            ),
        };
        sections.add_row(vec![Cell::new(section.key()), count_cell(count)]);
        if let Some((label, detail)) = detail {
            sections.add_row(vec![dim_cell(label), dim_cell(detail)]);
        }
    }
    lines.push(sections.to_string());

    if !stats.values_by_attribute.is_empty() {
        let mut values = Table::new();
        values.set_header(vec![header_cell("Attribute"), header_cell("Values")]);
        apply_table_style(&mut values);
        align_column(&mut values, 1, CellAlignment::Right);
        for (attribute, count) in &stats.values_by_attribute {
            values.add_row(vec![Cell::new(attribute), Cell::new(count)]);
        }
        lines.push(values.to_string());
    }
    lines.join("\n")
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspect_summary_shows_detail_counts() {
        let stats = ExportStats {
            attributes: 4,
            enumerated_attributes: 2,
            products: 9,
            products_with_assets: 7,
            ..ExportStats::default()
        };
        let rendered = inspect_summary(&stats);
        let row = |label: &str| {
            rendered
                .lines()
                .find(|line| line.contains(label))
                .unwrap_or_else(|| panic!("no `{label}` row in\n{rendered}"))
                .to_string()
        };
        assert!(row("enumerated").contains('2'));
        assert!(row("with assets").contains('7'));
        assert!(row("products").contains('9'));
    }
}
