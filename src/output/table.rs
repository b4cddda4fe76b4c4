//! Tab-delimited table writers.

use std::io::Write;

use crate::error::TableResult;
use crate::keyspace::{GeneTable, SitePosition, ValueTable};

/// Marker written for a gene/TALE pair with no collected positions.
const EMPTY_CELL: &str = "n.a.";

/// Write the pivoted value table: one header row, then one tab-separated row
/// per binding-site key.
pub fn write_table<W: Write>(
    out: &mut W,
    table: &ValueTable,
    tal_ids: &[String],
) -> TableResult<()> {
    write_header(out, tal_ids)?;
    for (key, values) in table {
        write!(out, "{}", key)?;
        for value in values {
            write!(out, "\t{}", value)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Write the per-gene position table. Cells with no positions render as the
/// n.a. marker; populated cells as bare comma-separated tokens.
pub fn write_gene_table<W: Write>(
    out: &mut W,
    gene_table: &GeneTable,
    tal_ids: &[String],
) -> TableResult<()> {
    write_header(out, tal_ids)?;
    for (gene, cells) in gene_table {
        write!(out, "{}", gene)?;
        for cell in cells {
            write!(out, "\t{}", render_positions(cell))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_header<W: Write>(out: &mut W, tal_ids: &[String]) -> TableResult<()> {
    write!(out, "Gene_Symbol")?;
    for id in tal_ids {
        write!(out, "\t{}", id)?;
    }
    writeln!(out)?;
    Ok(())
}

fn render_positions(positions: &[SitePosition]) -> String {
    if positions.is_empty() {
        return EMPTY_CELL.to_string();
    }
    positions
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_value_table_layout() {
        let mut table: ValueTable = IndexMap::new();
        table.insert(
            "geneX.g1.224".to_string(),
            vec!["11.918".to_string(), "0".to_string()],
        );
        table.insert(
            "geneX.g1.300".to_string(),
            vec!["0".to_string(), "4.5".to_string()],
        );

        let mut buf = Vec::new();
        write_table(&mut buf, &table, &ids(&["TAL1", "TAL2"])).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Gene_Symbol\tTAL1\tTAL2\n\
             geneX.g1.224\t11.918\t0\n\
             geneX.g1.300\t0\t4.5\n"
        );
    }

    #[test]
    fn test_gene_table_rendering() {
        let mut gene_table: GeneTable = IndexMap::new();
        gene_table.insert(
            "geneX".to_string(),
            vec![
                vec![SitePosition::Start(224), SitePosition::Start(300)],
                Vec::new(),
            ],
        );
        gene_table.insert(
            "geneY".to_string(),
            vec![
                Vec::new(),
                vec![SitePosition::StartStrand("150/-".to_string())],
            ],
        );

        let mut buf = Vec::new();
        write_gene_table(&mut buf, &gene_table, &ids(&["TAL1", "TAL2"])).unwrap();
        let rendered = String::from_utf8(buf).unwrap();

        assert_eq!(
            rendered,
            "Gene_Symbol\tTAL1\tTAL2\n\
             geneX\t224, 300\tn.a.\n\
             geneY\tn.a.\t150/-\n"
        );
        // No list-literal decoration survives into the file
        assert!(!rendered.contains('['));
        assert!(!rendered.contains(']'));
        assert!(!rendered.contains('\''));
    }

    #[test]
    fn test_empty_tables_still_emit_header() {
        let table: ValueTable = IndexMap::new();
        let mut buf = Vec::new();
        write_table(&mut buf, &table, &ids(&["TAL1"])).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Gene_Symbol\tTAL1\n");
    }
}
