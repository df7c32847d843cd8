use super::OutputGeometryFormat;
use crate::{model::table::ScoreTable, EngineError};
use csv::QuoteStyle;
use std::io::Write;

pub const CELL_ID_COLUMN: &str = "cell_id";
pub const GEOMETRY_COLUMN: &str = "geometry";

/// writes a score table as CSV: the cell id, every metric column, every
/// flag column and the cell polygon. `NaN` metrics are written as empty fields.
pub fn write_csv<W: Write>(
    table: &ScoreTable,
    writer: W,
    format: OutputGeometryFormat,
) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(writer);
    let header = std::iter::once(CELL_ID_COLUMN)
        .chain(table.metric_names().iter().map(|s| s.as_str()))
        .chain(table.flag_names().iter().map(|s| s.as_str()))
        .chain(std::iter::once(GEOMETRY_COLUMN));
    writer
        .write_record(header)
        .map_err(|e| format!("failure writing header: {e}"))?;

    for record in table.records() {
        let mut row: Vec<String> = vec![record.id().to_string()];
        row.extend(table.metric_names().iter().map(|m| {
            let v = record.metric(m);
            if v.is_nan() {
                String::new()
            } else {
                v.to_string()
            }
        }));
        row.extend(
            table
                .flag_names()
                .iter()
                .map(|f| record.flag(f).unwrap_or_default().to_string()),
        );
        row.push(format.serialize(record.cell.polygon())?);
        writer
            .write_record(&row)
            .map_err(|e| format!("failure writing row for cell {}: {e}", record.id()))?;
    }
    writer.flush().map_err(|e| e.to_string())
}

/// writes a score table to a CSV file.
pub fn write_csv_file(
    table: &ScoreTable,
    path: &str,
    format: OutputGeometryFormat,
) -> Result<(), EngineError> {
    let file = std::fs::File::create(path)
        .map_err(|e| EngineError::OutputError(path.to_string(), e.to_string()))?;
    write_csv(table, file, format).map_err(|e| EngineError::OutputError(path.to_string(), e))?;
    log::info!("wrote {} rows to {path}", table.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::grid::MetricProjection;
    use crate::model::grid::HexGrid;
    use cityhex_core::model::HexCell;
    use geo::polygon;

    #[test]
    fn test_csv_layout() {
        let cell = HexCell::from_polygon(
            String::from("88283082b9fffff"),
            polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0)],
        )
        .expect("valid cell");
        let resolution = h3o::Resolution::try_from(8_u8).expect("valid resolution");
        let grid = HexGrid::from_cells(resolution, MetricProjection::WebMercator, vec![cell]);
        let mut table = ScoreTable::from_grid(&grid);
        table
            .set_metric_column("park_access_min", vec![f64::NAN])
            .expect("column set");
        table
            .set_metric_column("pt_gravity", vec![0.5])
            .expect("column set");
        table.set_flag_column("green_gap", vec![true]).expect("column set");

        let mut buffer: Vec<u8> = vec![];
        write_csv(&table, &mut buffer, OutputGeometryFormat::Wkt).expect("csv written");
        let text = String::from_utf8(buffer).expect("utf8 output");
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("cell_id,park_access_min,pt_gravity,green_gap,geometry")
        );
        let row = lines.next().expect("one data row");
        assert!(row.starts_with("88283082b9fffff,,0.5,true,"));
        assert!(row.contains("POLYGON"));
        assert!(lines.next().is_none());
    }
}
