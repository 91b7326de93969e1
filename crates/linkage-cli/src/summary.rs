use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use linkage_model::{EngineResult, IndexSide};

/// Prints the run summary to stderr; stdout may carry the JSON result.
pub fn print_summary(result: &EngineResult) {
    eprintln!("{}", summary_table(result));
    if !result.matches_index.is_empty() {
        eprintln!("{}", rule_hits_table(result));
    }
}

pub fn summary_table(result: &EngineResult) -> Table {
    let index_side = result.indexed_by;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Cardinality"),
        Cell::new(result.cardinality.as_str()),
    ]);
    table.add_row(vec![Cell::new("Indexed by"), Cell::new(index_side.as_str())]);
    table.add_row(vec![
        Cell::new(format!("Matched {} records", index_side.as_str())),
        Cell::new(result.matches_index.len()).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Matched pairs"),
        Cell::new(result.matched_pair_count()).add_attribute(Attribute::Bold),
    ]);
    for side in [IndexSide::Left, IndexSide::Right] {
        table.add_row(vec![
            Cell::new(format!("Unmatched {}", side.as_str())),
            count_cell(result.unmatched_on(side).len(), Color::Yellow),
        ]);
    }
    table
}

/// Stored pairs per winning rule.
pub fn rule_hits_table(result: &EngineResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Rule"), header_cell("Pairs")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (rule, count) in result.rule_hit_counts() {
        table.add_row(vec![
            Cell::new(rule).fg(Color::Blue).add_attribute(Attribute::Bold),
            Cell::new(count),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
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

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count).fg(Color::DarkGrey)
    }
}

pub(crate) fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

#[cfg(test)]
mod tests {
    use linkage_model::{Cardinality, PairScore};

    use super::*;

    #[test]
    fn tables_count_rows() {
        let mut result = EngineResult::new(Cardinality::ManyToOne);
        result.matches_index.insert(
            "R1".to_string(),
            vec![PairScore {
                left_id: "L1".to_string(),
                right_id: "R1".to_string(),
                rule_name: "email".to_string(),
                total_score: 1.0,
                matched: true,
                field_scores: Vec::new(),
                weight_sum: 1.0,
            }],
        );
        result.unmatched_left_ids.push("L2".to_string());

        let summary = summary_table(&result);
        assert_eq!(summary.row_iter().count(), 6);
        let rendered = summary.to_string();
        assert!(rendered.contains("many_to_one"));
        assert!(rendered.contains("Matched right records"));

        let hits = rule_hits_table(&result);
        assert_eq!(hits.row_iter().count(), 1);
        assert!(hits.to_string().contains("email"));
    }
}
