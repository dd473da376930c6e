//! Table and JSON rendering of command results.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::{AnyValue, DataFrame};
use serde_json::{Map, Number, Value, json};
use tollgrid_model::{CategoryCount, Key, Matrix, RouteCoverage};
use tollgrid_transform::values::{any_to_string, format_numeric};

use crate::report::{CoverageReport, DistancesReport, VehiclesReport};

/// Frames longer than this are cut in table output.
pub const MAX_TABLE_ROWS: usize = 50;

/// A titled table, printed as `title:` followed by the table.
pub struct Section {
    pub title: String,
    pub table: Table,
}

impl Section {
    fn new(title: impl Into<String>, table: Table) -> Self {
        Self {
            title: title.into(),
            table,
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn label_cell(key: &Key) -> Cell {
    Cell::new(key)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn value_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(format_numeric(value)),
        None => dim_cell("-"),
    }
}

fn align_from(table: &mut Table, first: usize, alignment: CellAlignment) {
    for index in first..table.column_count() {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(alignment);
        }
    }
}

/// Matrix with row labels down the left and column labels across the top.
pub fn matrix_table(matrix: &Matrix, corner: &str) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell(corner)];
    header.extend(
        matrix
            .column_labels()
            .iter()
            .map(|label| header_cell(&label.to_string())),
    );
    table.set_header(header);
    apply_table_style(&mut table);
    for (row, label) in matrix.row_labels().iter().enumerate() {
        let mut cells = vec![label_cell(label)];
        cells.extend(matrix.row(row).iter().map(|value| value_cell(*value)));
        table.add_row(cells);
    }
    align_from(&mut table, 1, CellAlignment::Right);
    table
}

/// Frame rows in column order; at most [`MAX_TABLE_ROWS`] rows are shown.
pub fn frame_table(df: &DataFrame) -> Table {
    let mut table = Table::new();
    table.set_header(
        df.get_column_names()
            .iter()
            .map(|name| header_cell(name.as_str()))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    let columns = df.get_columns();
    for idx in 0..df.height().min(MAX_TABLE_ROWS) {
        let row: Vec<Cell> = columns
            .iter()
            .map(|column| match column.get(idx).unwrap_or(AnyValue::Null) {
                AnyValue::Null => dim_cell("-"),
                value => Cell::new(any_to_string(value)),
            })
            .collect();
        table.add_row(row);
    }
    if df.height() > MAX_TABLE_ROWS {
        let mut more = vec![dim_cell(format!(
            "... {} more rows",
            df.height() - MAX_TABLE_ROWS
        ))];
        more.extend((1..columns.len()).map(|_| dim_cell("")));
        table.add_row(more);
    }
    table
}

pub fn counts_table(counts: &[CategoryCount]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Value"), header_cell("Count")]);
    apply_table_style(&mut table);
    for count in counts {
        table.add_row(vec![label_cell(&count.value), Cell::new(count.count)]);
    }
    align_from(&mut table, 1, CellAlignment::Right);
    table
}

pub fn coverage_table(groups: &[RouteCoverage]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("id"),
        header_cell("id_2"),
        header_cell("Complete"),
    ]);
    apply_table_style(&mut table);
    for group in groups {
        let verdict = if group.complete {
            Cell::new("✓")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new("✗").fg(Color::Red)
        };
        table.add_row(vec![label_cell(&group.id), label_cell(&group.id_2), verdict]);
    }
    align_from(&mut table, 2, CellAlignment::Center);
    table
}

/// Single-column table; an empty list shows one dimmed `none` row.
pub fn list_table<T: ToString>(header: &str, items: &[T]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell(header)]);
    apply_table_style(&mut table);
    if items.is_empty() {
        table.add_row(vec![dim_cell("none")]);
    }
    for item in items {
        table.add_row(vec![Cell::new(item.to_string())]);
    }
    table
}

pub fn vehicles_sections(report: &VehiclesReport) -> Vec<Section> {
    vec![
        Section::new("Car matrix", matrix_table(&report.car_matrix, "id_1")),
        Section::new("Type counts", counts_table(&report.type_counts)),
        Section::new("Bus indexes", list_table("Index", &report.bus_indexes)),
        Section::new("Routes", list_table("Route", &report.routes)),
        Section::new(
            "Multiplied car matrix",
            matrix_table(&report.multiplied_car_matrix, "id_1"),
        ),
    ]
}

pub fn coverage_sections(report: &CoverageReport) -> Vec<Section> {
    vec![Section::new("Coverage", coverage_table(&report.groups))]
}

pub fn distances_sections(report: &DistancesReport) -> Vec<Section> {
    vec![
        Section::new("Distance matrix", matrix_table(&report.matrix, "id_start")),
        Section::new("Within threshold", frame_table(&report.within_threshold)),
        Section::new("Toll rates", frame_table(&report.toll_rates)),
        Section::new("Time-based tolls", frame_table(&report.time_based_tolls)),
    ]
}

/// Writes each section as `title:` and its table, separated by blank lines.
pub fn sections_to_string(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|section| format!("{}:\n{}", section.title, section.table))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn any_to_json(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(v) => Value::Bool(v),
        AnyValue::Int8(v) => json!(v),
        AnyValue::Int16(v) => json!(v),
        AnyValue::Int32(v) => json!(v),
        AnyValue::Int64(v) => json!(v),
        AnyValue::UInt8(v) => json!(v),
        AnyValue::UInt16(v) => json!(v),
        AnyValue::UInt32(v) => json!(v),
        AnyValue::UInt64(v) => json!(v),
        AnyValue::Float32(v) => Number::from_f64(f64::from(v)).map_or(Value::Null, Value::Number),
        AnyValue::Float64(v) => Number::from_f64(v).map_or(Value::Null, Value::Number),
        other => Value::String(any_to_string(other)),
    }
}

/// Frame as an array of row objects keyed by column name.
pub fn frame_json(df: &DataFrame) -> Value {
    let columns = df.get_columns();
    let rows = (0..df.height())
        .map(|idx| {
            let mut object = Map::new();
            for column in columns {
                let value = column.get(idx).unwrap_or(AnyValue::Null);
                object.insert(column.name().to_string(), any_to_json(value));
            }
            Value::Object(object)
        })
        .collect();
    Value::Array(rows)
}

pub fn distances_json(report: &DistancesReport) -> serde_json::Result<Value> {
    Ok(json!({
        "matrix": serde_json::to_value(&report.matrix)?,
        "unrolled": frame_json(&report.unrolled),
        "within_threshold": frame_json(&report.within_threshold),
        "toll_rates": frame_json(&report.toll_rates),
        "time_based_tolls": frame_json(&report.time_based_tolls),
    }))
}
