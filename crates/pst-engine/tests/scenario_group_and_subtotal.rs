use pst_engine::*;

fn row(sale: &str, net: &str) -> Vec<String> {
    let mut fields = vec![String::new(); 13];
    fields[0] = sale.to_string();
    fields[7] = net.to_string();
    fields[8] = "0.00".to_string();
    fields[10] = "0.00".to_string();
    fields[12] = net.to_string();
    fields
}

fn header() -> Vec<String> {
    (0..13).map(|i| format!("col{i}")).collect()
}

/// End-to-end engine pass: empty previous snapshot, three current rows
/// in two sale types.
#[test]
fn scenario_first_run_partitions_and_subtotals_all_rows() {
    let previous = Snapshot::default();
    let current = Snapshot::new(
        header(),
        vec![
            row("PM001", "100.00"),
            row("PM001", "50.00"),
            row("CV002", "30.00"),
        ],
    );
    let spec = TableSpec::default();

    let entries = diff(&previous, &current, &spec).unwrap();
    assert_eq!(entries.len(), 3);

    let parts = partition(entries, &spec);
    let keys: Vec<&str> = parts.groups().iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["PM", "CV"]);

    let pm = aggregate(&parts.groups()[0], &spec).unwrap();
    assert_eq!(pm.subtotal_count(), 1);
    let expected_pm = vec![Cents(15_000), Cents(0), Cents(0), Cents(15_000)];
    assert_eq!(pm.rows.last(), Some(&ReportRow::Subtotal(expected_pm)));

    let cv = aggregate(&parts.groups()[1], &spec).unwrap();
    assert_eq!(cv.subtotal_count(), 1);
    let expected_cv = vec![Cents(3_000), Cents(0), Cents(0), Cents(3_000)];
    assert_eq!(cv.rows.last(), Some(&ReportRow::Subtotal(expected_cv)));
}

/// Multiple sales of one type: a subtotal + separator pair closes each
/// sale run, the final run gets a subtotal only.
#[test]
fn scenario_sale_boundaries_within_one_group() {
    let previous = Snapshot::default();
    let current = Snapshot::new(
        header(),
        vec![
            row("PM001", "10.00"),
            row("PM001", "20.00"),
            row("PM002", "5.00"),
        ],
    );
    let spec = TableSpec::default();

    let entries = diff(&previous, &current, &spec).unwrap();
    let parts = partition(entries, &spec);
    assert_eq!(parts.len(), 1);

    let report = aggregate(&parts.groups()[0], &spec).unwrap();
    let shape: Vec<&str> = report
        .rows
        .iter()
        .map(|r| match r {
            ReportRow::Data(_) => "data",
            ReportRow::Subtotal(_) => "subtotal",
            ReportRow::Separator => "separator",
        })
        .collect();
    assert_eq!(
        shape,
        vec!["data", "data", "subtotal", "separator", "data", "subtotal"]
    );

    let subtotals: Vec<&Vec<Cents>> = report
        .rows
        .iter()
        .filter_map(|r| match r {
            ReportRow::Subtotal(s) => Some(s),
            _ => None,
        })
        .collect();
    assert_eq!(subtotals[0][0], Cents(3_000));
    assert_eq!(subtotals[1][0], Cents(500));
}

/// Union of all groups is a permutation of the diff output with
/// per-group order preserved.
#[test]
fn scenario_grouping_completeness() {
    let previous = Snapshot::default();
    let current = Snapshot::new(
        header(),
        vec![
            row("VT001", "1.00"),
            row("PM001", "2.00"),
            row("VT002", "3.00"),
            row("CC001", "4.00"),
            row("PM002", "5.00"),
        ],
    );
    let spec = TableSpec::default();

    let entries = diff(&previous, &current, &spec).unwrap();
    let parts = partition(entries.clone(), &spec);

    let regrouped: usize = parts.groups().iter().map(|g| g.entries.len()).sum();
    assert_eq!(regrouped, entries.len());

    // Every diff entry appears in exactly one group.
    for entry in &entries {
        let holders = parts
            .groups()
            .iter()
            .filter(|g| g.entries.contains(entry))
            .count();
        assert_eq!(holders, 1, "entry {:?} not in exactly one group", entry.fields[0]);
    }
}
