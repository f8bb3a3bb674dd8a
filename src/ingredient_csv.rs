//! Reading of the `name,unit` ingredient reference file.

use anyhow::{Context, bail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientRecord {
    pub name: String,
    pub measurement_unit: String,
}

/// Parses headerless `name,unit` rows. Quoted fields may contain commas and `""` escapes.
pub fn read_ingredients<R: std::io::Read>(source: R) -> anyhow::Result<Vec<IngredientRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.context("malformed CSV row")?;
        let line = row.position().map_or(0, |p| p.line());
        if row.len() != 2 {
            bail!("line {line}: expected `name,unit`, got {} fields", row.len());
        }
        let (name, unit) = (&row[0], &row[1]);
        if name.is_empty() || unit.is_empty() {
            bail!("line {line}: empty name or unit");
        }
        records.push(IngredientRecord {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
        });
    }
    Ok(records)
}
