use recipe_share_api::{
    error::AppError,
    shopping_list::{CartIngredientRow, ShoppingLine, ShoppingList, aggregate},
};

fn row(name: &str, unit: &str, amount: i32) -> CartIngredientRow {
    CartIngredientRow {
        name: name.into(),
        measurement_unit: unit.into(),
        amount,
    }
}

#[test]
fn sums_the_same_ingredient_across_recipes() {
    // Recipe A uses 2 eggs, recipe B uses 3.
    let list = ShoppingList::from_rows(vec![
        row("egg", "pcs", 2),
        row("flour", "g", 200),
        row("egg", "pcs", 3),
    ])
    .unwrap();

    assert_eq!(
        list.lines,
        vec![
            ShoppingLine {
                name: "egg".into(),
                measurement_unit: "pcs".into(),
                amount: 5,
            },
            ShoppingLine {
                name: "flour".into(),
                measurement_unit: "g".into(),
                amount: 200,
            },
        ]
    );
    assert_eq!(list.render(), "egg (pcs) — 5\nflour (g) — 200\n");
}

#[test]
fn empty_cart_has_nothing_to_export() {
    match ShoppingList::from_rows(Vec::new()) {
        Err(AppError::BadRequest(message)) => assert!(message.contains("empty")),
        other => panic!("expected an empty-cart error, got {other:?}"),
    }
}

#[test]
fn order_is_stable_regardless_of_row_order() {
    let rows = vec![
        row("sugar", "g", 10),
        row("butter", "g", 50),
        row("milk", "ml", 100),
        row("butter", "g", 25),
    ];
    let mut reversed = rows.clone();
    reversed.reverse();

    let forward = aggregate(rows);
    assert_eq!(forward, aggregate(reversed));
    let names: Vec<_> = forward.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["butter", "milk", "sugar"]);
    assert_eq!(forward[0].amount, 75);
}

#[test]
fn same_name_with_different_units_stays_separate() {
    let lines = aggregate(vec![row("salt", "g", 5), row("salt", "pinch", 1)]);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].measurement_unit, "g");
    assert_eq!(lines[1].measurement_unit, "pinch");
}

#[test]
fn large_amounts_do_not_overflow() {
    let lines = aggregate(vec![row("water", "ml", i32::MAX), row("water", "ml", i32::MAX)]);
    assert_eq!(lines[0].amount, 2 * i64::from(i32::MAX));
}
