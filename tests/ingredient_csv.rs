use recipe_share_api::ingredient_csv::{IngredientRecord, read_ingredients};

fn record(name: &str, unit: &str) -> IngredientRecord {
    IngredientRecord {
        name: name.into(),
        measurement_unit: unit.into(),
    }
}

#[test]
fn reads_plain_rows_and_skips_blank_lines() {
    let data = "all-purpose flour,g\n\n egg , pcs \nmilk,ml\n";
    let records = read_ingredients(data.as_bytes()).unwrap();
    assert_eq!(
        records,
        vec![record("all-purpose flour", "g"), record("egg", "pcs"), record("milk", "ml")]
    );
}

#[test]
fn quoted_names_keep_commas_and_escaped_quotes() {
    let data = "\"salt, coarse\",g\n\"\"\"Bird's eye\"\" chili\",pcs\n";
    let records = read_ingredients(data.as_bytes()).unwrap();
    assert_eq!(
        records,
        vec![
            record("salt, coarse", "g"),
            record("\"Bird's eye\" chili", "pcs"),
        ]
    );
}

#[test]
fn rows_without_a_unit_are_rejected() {
    let err = read_ingredients("flour,g\nsugar\n".as_bytes()).unwrap_err();
    assert!(err.to_string().contains("line 2"), "{err}");

    assert!(read_ingredients("flour,\n".as_bytes()).is_err());
    assert!(read_ingredients("flour,g,extra\n".as_bytes()).is_err());
}

#[test]
fn bundled_reference_file_parses() {
    let data = std::fs::read("data/ingredients.csv").unwrap();
    let records = read_ingredients(data.as_slice()).unwrap();
    assert!(!records.is_empty());
}
