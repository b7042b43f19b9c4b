use std::path::PathBuf;

use chrono::NaiveDate;
use timecheck_recon::config::RatesConfig;
use timecheck_recon::engine::{reconcile, run};
use timecheck_recon::model::{Discrepancy, Entry};
use timecheck_recon::{sign_in, Cell, NamedTable, ReconError, Table};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_config(name: &str) -> Result<RatesConfig, ReconError> {
    let path = fixtures_dir().join(name);
    let toml = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    RatesConfig::from_toml(&toml)
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn text(s: &str) -> Cell {
    Cell::Text(s.into())
}

// -------------------------------------------------------------------------
// Sheet builders (default layout)
// -------------------------------------------------------------------------

const HOUR_COLUMNS: [&str; 3] = ["Acton", "Admin", "Safeguarding "];

/// One timesheet row: date, hours per category (None = blank), rate.
struct Row {
    date: NaiveDate,
    hours: [Option<f64>; 3],
    rate: f64,
}

fn acton(date: NaiveDate, hours: f64, rate: f64) -> Row {
    Row { date, hours: [Some(hours), None, None], rate }
}

/// Timesheet laid out like the club's template: title block, names in
/// D5/D6, a few notes, then the dated table.
fn timesheet(first: &str, last: &str, rows: &[Row]) -> Table {
    let mut grid = vec![
        vec![text("Timesheet")],
        vec![],
        vec![text("Please fill in one hours column per row")],
        vec![],
        vec![Cell::Empty, Cell::Empty, text("First name:"), text(first)],
        vec![Cell::Empty, Cell::Empty, text("Last name:"), text(last)],
        vec![],
    ];

    let mut header = vec![text("Date"), text("Week"), text("Start"), text("End")];
    header.extend(HOUR_COLUMNS.iter().map(|h| text(h)));
    header.push(text("Rate of pay"));
    grid.push(header);

    for row in rows {
        let mut cells = vec![Cell::Date(row.date), text("Mon"), text("17:00"), text("19:00")];
        cells.extend(row.hours.iter().map(|h| h.map(Cell::Number).unwrap_or(Cell::Empty)));
        cells.push(Cell::Number(row.rate));
        grid.push(cells);
    }

    // Totals row below the table has no date
    grid.push(vec![Cell::Empty, Cell::Empty, Cell::Empty, text("Total")]);
    Table::new(grid)
}

/// Sign-in sheet: Name | Level | Squad | one column per date.
fn sign_in_sheet(month: &str, dates: &[NaiveDate], rows: &[(&str, &str, &[Option<f64>])]) -> NamedTable {
    let mut header = vec![text("Name"), text("Level"), text("Squad")];
    header.extend(dates.iter().map(|d| Cell::Date(*d)));
    let mut grid = vec![header];

    for (name, level, hours) in rows {
        let mut cells = vec![text(name), text(level), text("Masters")];
        cells.extend(hours.iter().map(|h| h.map(Cell::Number).unwrap_or(Cell::Empty)));
        grid.push(cells);
    }

    NamedTable::new(month, Table::new(grid))
}

// -------------------------------------------------------------------------
// Scenarios
// -------------------------------------------------------------------------

#[test]
fn scenario_a_perfect_match() {
    let config = RatesConfig::flat([("L2".to_string(), 15.0)].into());
    let sign_in = sign_in_sheet("July", &[d(2024, 7, 1)], &[("Jane Doe", "L2", &[Some(4.0)])]);
    let sheets = vec![NamedTable::new(
        "Jane Doe",
        timesheet("Jane", "Doe", &[acton(d(2024, 7, 1), 4.0, 15.0)]),
    )];

    let report = run(&sheets, &sign_in, &config).unwrap();
    assert!(report.discrepancies.is_empty());
    assert!(report.summary.is_clean());
}

#[test]
fn scenario_b_extra_timesheet_claim() {
    let config = load_config("flat.rates.toml").unwrap();
    let sign_in = sign_in_sheet(
        "July",
        &[d(2024, 7, 1), d(2024, 7, 2)],
        &[("Jane Doe", "L2", &[Some(4.0), None])],
    );
    let sheets = vec![NamedTable::new(
        "Jane Doe",
        timesheet(
            "Jane",
            "Doe",
            &[acton(d(2024, 7, 1), 4.0, 15.0), acton(d(2024, 7, 2), 2.0, 15.0)],
        ),
    )];

    let report = run(&sheets, &sign_in, &config).unwrap();
    assert_eq!(
        report.discrepancies,
        vec![Discrepancy::TimesheetExtraEntry {
            name: "Jane Doe".into(),
            entry: Entry::new(d(2024, 7, 2), 2.0, 15.0),
        }]
    );
}

#[test]
fn scenario_c_extra_sign_in_record() {
    let config = load_config("flat.rates.toml").unwrap();
    let sign_in = sign_in_sheet(
        "July",
        &[d(2024, 7, 1), d(2024, 7, 3)],
        &[
            ("Jane Doe", "L2", &[Some(4.0), None]),
            ("John Smith", "L1", &[None, Some(1.5)]),
        ],
    );
    let sheets = vec![NamedTable::new(
        "Jane Doe",
        timesheet("Jane", "Doe", &[acton(d(2024, 7, 1), 4.0, 15.0)]),
    )];

    let report = run(&sheets, &sign_in, &config).unwrap();
    assert_eq!(
        report.discrepancies,
        vec![Discrepancy::SignInExtraEntry {
            name: "John Smith".into(),
            entry: Entry::new(d(2024, 7, 3), 1.5, 12.0),
        }]
    );
}

#[test]
fn scenario_d_unknown_worker() {
    let config = load_config("flat.rates.toml").unwrap();
    let sign_in = sign_in_sheet(
        "July",
        &[d(2024, 7, 1)],
        &[("Jane Doe", "L2", &[Some(4.0)]), ("John Smith", "L1", &[None])],
    );
    let sheets = vec![NamedTable::new(
        "Jayne",
        timesheet("Jayne", "Doe", &[acton(d(2024, 7, 1), 4.0, 15.0)]),
    )];

    let report = run(&sheets, &sign_in, &config).unwrap();
    assert_eq!(
        report.discrepancies,
        vec![
            Discrepancy::InvalidName {
                name: "Jayne Doe".into(),
                known_names: vec!["Jane Doe".into()],
            },
            Discrepancy::SignInExtraEntry {
                name: "Jane Doe".into(),
                entry: Entry::new(d(2024, 7, 1), 4.0, 15.0),
            },
        ]
    );
}

#[test]
fn worker_with_blank_sign_in_row_is_unknown() {
    let config = load_config("flat.rates.toml").unwrap();
    let sign_in = sign_in_sheet(
        "July",
        &[d(2024, 7, 1)],
        &[("Jane Doe", "L1", &[None]), ("John Smith", "L1", &[Some(2.0)])],
    );
    let sheets = vec![
        NamedTable::new("Jane", timesheet("Jane", "Doe", &[acton(d(2024, 7, 1), 4.0, 15.0)])),
        NamedTable::new("John", timesheet("John", "Smith", &[acton(d(2024, 7, 1), 2.0, 12.0)])),
    ];

    let report = run(&sheets, &sign_in, &config).unwrap();
    assert_eq!(
        report.discrepancies,
        vec![Discrepancy::InvalidName {
            name: "Jane Doe".into(),
            known_names: vec!["John Smith".into()],
        }]
    );
    assert_eq!(report.meta.workers, 1);
}

#[test]
fn scenario_e_ambiguous_row_aborts() {
    let config = load_config("flat.rates.toml").unwrap();
    let sign_in = sign_in_sheet("July", &[d(2024, 7, 1)], &[("Jane Doe", "L2", &[Some(4.0)])]);
    let sheets = vec![
        NamedTable::new("Empty", Table::default()),
        NamedTable::new(
            "Jane Doe",
            timesheet(
                "Jane",
                "Doe",
                &[Row { date: d(2024, 7, 1), hours: [Some(2.0), Some(2.0), None], rate: 15.0 }],
            ),
        ),
    ];

    let err = run(&sheets, &sign_in, &config).unwrap_err();
    assert!(err.is_data_integrity());
    match err {
        ReconError::AmbiguousHours { name, date, columns } => {
            assert_eq!(name, "Jane Doe");
            assert_eq!(date, d(2024, 7, 1));
            assert_eq!(columns, vec!["Acton", "Admin"]);
        }
        other => panic!("expected AmbiguousHours, got {other:?}"),
    }
}

#[test]
fn scenario_f_empty_sheet() {
    let config = load_config("flat.rates.toml").unwrap();
    let sign_in = sign_in_sheet("July", &[d(2024, 7, 1)], &[("Jane Doe", "L2", &[None])]);
    let sheets = vec![
        NamedTable::new("Sheet1", Table::default()),
        NamedTable::new("Blank grid", Table::new(vec![vec![Cell::Empty; 4]; 3])),
    ];

    let report = run(&sheets, &sign_in, &config).unwrap();
    assert_eq!(
        report.discrepancies,
        vec![
            Discrepancy::EmptyTimesheet { sheet_name: "Sheet1".into() },
            Discrepancy::EmptyTimesheet { sheet_name: "Blank grid".into() },
        ]
    );
    assert_eq!(report.summary.empty_timesheets, 2);
}

#[test]
fn missing_hours_aborts_without_partial_output() {
    let config = load_config("flat.rates.toml").unwrap();
    let sign_in = sign_in_sheet("July", &[d(2024, 7, 1)], &[("Jane Doe", "L2", &[Some(4.0)])]);
    let sheets = vec![
        NamedTable::new("Sheet1", Table::default()),
        NamedTable::new(
            "Jane Doe",
            timesheet("Jane", "Doe", &[Row { date: d(2024, 7, 1), hours: [None; 3], rate: 15.0 }]),
        ),
    ];

    let err = run(&sheets, &sign_in, &config).unwrap_err();
    assert_eq!(err, ReconError::MissingHours { name: "Jane Doe".into(), date: d(2024, 7, 1) });
}

// -------------------------------------------------------------------------
// Rates
// -------------------------------------------------------------------------

#[test]
fn cutover_from_fixture() {
    let config = load_config("cutover.rates.toml").unwrap();
    let sign_in = sign_in_sheet(
        "June",
        &[d(2024, 5, 31), d(2024, 6, 1)],
        &[("Jane Doe", "L1", &[Some(2.0), Some(2.0)])],
    );
    let roster = sign_in::parse(&sign_in.name, &sign_in.table, &config).unwrap();
    let set = roster.get("Jane Doe").unwrap();
    assert!(set.contains(&Entry::new(d(2024, 5, 31), 2.0, 10.0)));
    assert!(set.contains(&Entry::new(d(2024, 6, 1), 2.0, 20.0)));

    // A timesheet that kept the old rate after the cutover does not match
    let sheets = vec![NamedTable::new(
        "Jane Doe",
        timesheet(
            "Jane",
            "Doe",
            &[acton(d(2024, 5, 31), 2.0, 10.0), acton(d(2024, 6, 1), 2.0, 10.0)],
        ),
    )];
    let out = reconcile(&sheets, &roster, &config).unwrap();
    assert_eq!(
        out,
        vec![
            Discrepancy::TimesheetExtraEntry { name: "Jane Doe".into(), entry: Entry::new(d(2024, 6, 1), 2.0, 10.0) },
            Discrepancy::SignInExtraEntry { name: "Jane Doe".into(), entry: Entry::new(d(2024, 6, 1), 2.0, 20.0) },
        ]
    );
}

#[test]
fn unknown_level_aborts_run() {
    let config = load_config("flat.rates.toml").unwrap();
    let sign_in = sign_in_sheet("July", &[d(2024, 7, 1)], &[("Jane Doe", "L7", &[Some(1.0)])]);
    let err = run(&[], &sign_in, &config).unwrap_err();
    assert!(matches!(err, ReconError::UnknownLevel { ref level, .. } if level == "L7"));
}

#[test]
fn bad_cutover_fixture_is_rejected() {
    let err = load_config("bad-date.rates.toml").unwrap_err();
    assert_eq!(err, ReconError::InvalidDateFormat { value: "2024/06/01".into() });
    assert!(!err.is_data_integrity());
}

// -------------------------------------------------------------------------
// Custom layout
// -------------------------------------------------------------------------

#[test]
fn custom_layout_fixture() {
    let config = load_config("custom-layout.rates.toml").unwrap();

    let timesheet = Table::new(vec![
        vec![text("Coach timesheet")],
        vec![text("Name"), text(" Sam "), text("Lee ")],
        vec![],
        vec![text("Date"), text("Day"), text("Acton hours"), text("Admin hours"), text("Gala day"), text("Rate")],
        vec![Cell::Date(d(2024, 9, 2)), text("Mon"), Cell::Number(2.0), Cell::Empty, Cell::Empty, Cell::Number(20.0)],
        vec![Cell::Date(d(2024, 9, 7)), text("Sat"), Cell::Empty, Cell::Empty, Cell::Number(1.0), Cell::Number(11.0)],
    ]);

    let sign_in = NamedTable::new(
        "September",
        Table::new(vec![
            vec![text("Swimmer coach"), text("Grade"), Cell::Date(d(2024, 9, 2)), Cell::Date(d(2024, 9, 7))],
            vec![text("Sam Lee"), text("Coach"), Cell::Number(2.0), Cell::Empty],
            vec![text("Sam Lee"), text("Assistant"), Cell::Empty, Cell::Number(1.0)],
            vec![text("Coaches"), text("Subtotal"), Cell::Number(2.0), Cell::Number(1.0)],
        ]),
    );

    let report = run(&[NamedTable::new("Sam", timesheet)], &sign_in, &config).unwrap();
    assert!(report.discrepancies.is_empty(), "{:?}", report.discrepancies);
    assert_eq!(report.meta.workers, 1);
}

// -------------------------------------------------------------------------
// Mixed month
// -------------------------------------------------------------------------

#[test]
fn mixed_month_ordering() {
    let config = load_config("flat.rates.toml").unwrap();
    let dates = [d(2024, 7, 1), d(2024, 7, 2), d(2024, 7, 3)];
    let sign_in = sign_in_sheet(
        "July",
        &dates,
        &[
            ("Jane Doe", "L2", &[Some(4.0), Some(1.0), None]),
            ("Amir Khan", "L3", &[None, Some(2.0), Some(2.0)]),
            ("LHC totals", "LHC", &[Some(4.0), Some(3.0), Some(2.0)]),
            ("John Smith", "L1", &[Some(1.0), None, None]),
        ],
    );

    let sheets = vec![
        NamedTable::new("Amir", timesheet("Amir", "Khan", &[acton(dates[1], 2.0, 18.5)])),
        NamedTable::new("Blank", Table::default()),
        NamedTable::new("Jane", timesheet("Jane", "Doe", &[acton(dates[0], 4.0, 15.0), acton(dates[2], 3.0, 15.0)])),
        NamedTable::new("Typo", timesheet("Jon", "Smith", &[acton(dates[0], 1.0, 12.0)])),
    ];

    let report = run(&sheets, &sign_in, &config).unwrap();
    assert_eq!(
        report.discrepancies,
        vec![
            Discrepancy::EmptyTimesheet { sheet_name: "Blank".into() },
            Discrepancy::TimesheetExtraEntry { name: "Jane Doe".into(), entry: Entry::new(dates[2], 3.0, 15.0) },
            Discrepancy::InvalidName {
                name: "Jon Smith".into(),
                known_names: vec!["Jane Doe".into(), "Amir Khan".into(), "John Smith".into()],
            },
            Discrepancy::SignInExtraEntry { name: "Jane Doe".into(), entry: Entry::new(dates[1], 1.0, 15.0) },
            Discrepancy::SignInExtraEntry { name: "Amir Khan".into(), entry: Entry::new(dates[2], 2.0, 18.5) },
            Discrepancy::SignInExtraEntry { name: "John Smith".into(), entry: Entry::new(dates[0], 1.0, 12.0) },
        ]
    );
    assert_eq!(report.summary.total, 6);
    assert_eq!(report.summary.sign_in_extra_entries, 3);
    assert_eq!(report.meta.workers, 3);

    // Same inputs, same answer
    let again = run(&sheets, &sign_in, &config).unwrap();
    assert_eq!(again.discrepancies, report.discrepancies);
}
