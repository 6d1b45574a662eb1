//! Integration tests: xlsx fixtures are generated into temporary directories

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tempfile::{tempdir, TempDir};

use sheetseed::generator::sequence;
use sheetseed::{
    DbSetup, ImportBuilder, ImportError, Operation, Recorder, ResourceRoots, SqlScript, Value,
};

fn serial(dt: NaiveDateTime) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (dt - epoch).num_milliseconds() as f64 / 86_400_000.0
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32, ms: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_milli_opt(h, min, s, ms).unwrap()
}

/// Write a workbook into `dir` and return resource roots pointing at it
fn write_workbook<F>(dir: &TempDir, name: &str, build: F) -> ResourceRoots
where
    F: FnOnce(&mut Workbook) -> Result<(), XlsxError>,
{
    let mut workbook = Workbook::new();
    build(&mut workbook).unwrap();
    workbook.save(dir.path().join(name)).unwrap();
    ResourceRoots::new([dir.path()])
}

fn write_rows(
    sheet: &mut Worksheet,
    top: u32,
    left: u16,
    rows: &[&[&str]],
) -> Result<(), XlsxError> {
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (top + r as u32, left + c as u16);
            if cell.is_empty() {
                continue;
            }
            match cell.parse::<f64>() {
                Ok(n) => sheet.write_number(r, c, n)?,
                Err(_) => sheet.write_string(r, c, *cell)?,
            };
        }
    }
    Ok(())
}

/// The `table_1` sheet with every supported cell type, offset by a margin
fn write_typed_sheet(sheet: &mut Worksheet, top: u32, left: u16) -> Result<(), XlsxError> {
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss.000");

    sheet.set_name("table_1")?;
    for (i, name) in ["a", "b", "c", "d", "e", "f", "g", "h", "i"].iter().enumerate() {
        sheet.write_string(top, left + i as u16, *name)?;
    }

    let rows = [
        (
            100.0,
            10000000000.0,
            0.5,
            date(2019, 12, 1),
            datetime(2019, 12, 1, 9, 30, 1, 1),
            "AAA",
            "甲",
            true,
            Some("x"),
        ),
        (
            200.0,
            20000000000.0,
            0.25,
            date(2019, 12, 2),
            datetime(2019, 12, 2, 9, 30, 2, 2),
            "BBB",
            "乙",
            false,
            None,
        ),
    ];
    for (n, (a, b, c, d, e, f, g, h, i)) in rows.into_iter().enumerate() {
        let r = top + 1 + n as u32;
        sheet.write_number(r, left, a)?;
        sheet.write_number(r, left + 1, b)?;
        sheet.write_number(r, left + 2, c)?;
        let midnight = serial(d.and_hms_opt(0, 0, 0).unwrap());
        sheet.write_number_with_format(r, left + 3, midnight, &date_format)?;
        sheet.write_number_with_format(r, left + 4, serial(e), &datetime_format)?;
        sheet.write_string(r, left + 5, f)?;
        sheet.write_string(r, left + 6, g)?;
        sheet.write_boolean(r, left + 7, h)?;
        if let Some(i) = i {
            sheet.write_string(r, left + 8, i)?;
        }
    }
    Ok(())
}

fn assert_typed_rows(import: &sheetseed::Import) {
    let insert = import.insert_for("table_1").unwrap();
    assert_eq!(insert.columns(), &["a", "b", "c", "d", "e", "f", "g", "h", "i"]);
    assert_eq!(
        insert.rows(),
        &[
            vec![
                Value::Int(100),
                Value::Int(10000000000),
                Value::Float(0.5),
                Value::Date(date(2019, 12, 1)),
                Value::DateTime(datetime(2019, 12, 1, 9, 30, 1, 1)),
                Value::from("AAA"),
                Value::from("甲"),
                Value::Bool(true),
                Value::from("x"),
            ],
            vec![
                Value::Int(200),
                Value::Int(20000000000),
                Value::Float(0.25),
                Value::Date(date(2019, 12, 2)),
                Value::DateTime(datetime(2019, 12, 2, 9, 30, 2, 2)),
                Value::from("BBB"),
                Value::from("乙"),
                Value::Bool(false),
                Value::Null,
            ],
        ]
    );
}

fn testdata(dir: &TempDir) -> ResourceRoots {
    write_workbook(dir, "testdata.xlsx", |wb| {
        let sheet = wb.add_worksheet();
        sheet.set_name("table_1")?;
        write_rows(sheet, 0, 0, &[&["a", "b", "c"], &["10", "100", ""], &["20", "200", ""]])
    })
}

fn two_tables(dir: &TempDir) -> ResourceRoots {
    write_workbook(dir, "two_tables.xlsx", |wb| {
        let first = wb.add_worksheet();
        first.set_name("table_11")?;
        write_rows(first, 0, 0, &[&["id", "name"], &["1", "Alice"]])?;
        let second = wb.add_worksheet();
        second.set_name("table_12")?;
        write_rows(second, 0, 0, &[&["id", "name"], &["2", "Bob"], &["3", "Carol"]])
    })
}

#[test]
fn import_with_default_settings() {
    let dir = tempdir().unwrap();
    let roots = testdata(&dir);

    let import = ImportBuilder::excel_in(&roots, "testdata.xlsx").unwrap().build().unwrap();

    assert_eq!(import.inserts().len(), 1);
    let insert = import.insert_for("table_1").unwrap();
    assert_eq!(
        insert.rows(),
        &[
            vec![Value::Int(10), Value::Int(100), Value::Null],
            vec![Value::Int(20), Value::Int(200), Value::Null],
        ]
    );
}

#[test]
fn import_with_generated_value() {
    let dir = tempdir().unwrap();
    let roots = testdata(&dir);

    let import = ImportBuilder::excel_in(&roots, "testdata.xlsx")
        .unwrap()
        .with_generated_value("table_1", "c", sequence())
        .build()
        .unwrap();

    let insert = import.insert_for("table_1").unwrap();
    assert_eq!(
        insert.rows(),
        &[
            vec![Value::Int(10), Value::Int(100), Value::Int(1)],
            vec![Value::Int(20), Value::Int(200), Value::Int(2)],
        ]
    );
}

#[test]
fn import_every_cell_type() {
    let dir = tempdir().unwrap();
    let roots = write_workbook(&dir, "single_sheet.xlsx", |wb| {
        write_typed_sheet(wb.add_worksheet(), 0, 0)
    });

    let import = ImportBuilder::excel_in(&roots, "single_sheet.xlsx").unwrap().build().unwrap();
    assert_typed_rows(&import);
}

#[test]
fn import_sheet_that_has_margin() {
    let dir = tempdir().unwrap();
    let roots = write_workbook(&dir, "has_margin.xlsx", |wb| {
        write_typed_sheet(wb.add_worksheet(), 2, 1)
    });

    let import = ImportBuilder::excel_in(&roots, "has_margin.xlsx")
        .unwrap()
        .top(2)
        .left(1)
        .build()
        .unwrap();
    assert_typed_rows(&import);
}

#[test]
fn import_multiple_sheets_in_order() {
    let dir = tempdir().unwrap();
    let roots = two_tables(&dir);

    let import = ImportBuilder::excel_in(&roots, "two_tables.xlsx").unwrap().build().unwrap();

    assert_eq!(import.tables(), vec!["table_11", "table_12"]);
    assert_eq!(import.row_count(), 3);
    let ids = import.insert_for("table_12").unwrap().column_values("id").unwrap();
    assert_eq!(ids, vec![&Value::Int(2), &Value::Int(3)]);
}

#[test]
fn exclude_table_by_name() {
    let dir = tempdir().unwrap();
    let roots = two_tables(&dir);

    let import = ImportBuilder::excel_in(&roots, "two_tables.xlsx")
        .unwrap()
        .exclude(["table_12"])
        .build()
        .unwrap();

    assert_eq!(import.inserts().len(), 1);
    let insert = &import.inserts()[0];
    assert_eq!(insert.table(), "table_11");
    assert_eq!(insert.rows(), &[vec![Value::Int(1), Value::from("Alice")]]);

    let mut recorder = Recorder::new();
    import.execute(&mut recorder).unwrap();
    assert_eq!(recorder.for_table("table_12").count(), 0);
}

#[test]
fn exclude_and_include_by_pattern() {
    let dir = tempdir().unwrap();
    let roots = two_tables(&dir);

    let excluded = ImportBuilder::excel_in(&roots, "two_tables.xlsx")
        .unwrap()
        .exclude_matching(".+2$")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(excluded.tables(), vec!["table_11"]);

    let included = ImportBuilder::excel_in(&roots, "two_tables.xlsx")
        .unwrap()
        .include_matching("table_1[2-9]")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(included.tables(), vec!["table_12"]);
}

#[test]
fn duplicate_resolved_table_name() {
    let dir = tempdir().unwrap();
    let roots = two_tables(&dir);

    let err = ImportBuilder::excel_in(&roots, "two_tables.xlsx")
        .unwrap()
        .table_name(|_| Some("t".to_string()))
        .build()
        .unwrap_err();
    assert!(matches!(err, ImportError::Configuration(_)));
    assert_eq!(err.to_string(), "duplicate table name: t (sheet table_12)");

    let import = ImportBuilder::excel_in(&roots, "two_tables.xlsx")
        .unwrap()
        .table_name(|_| Some("t".to_string()))
        .exclude_matching("t")
        .unwrap()
        .build()
        .unwrap();
    assert!(import.is_empty());
}

#[test]
fn generators_per_table() {
    let dir = tempdir().unwrap();
    let roots = two_tables(&dir);

    let import = ImportBuilder::excel_in(&roots, "two_tables.xlsx")
        .unwrap()
        .with_generated_value("table_11", "id", sequence().starting_at(100).incrementing_by(100))
        .with_generated_value("table_12", "id", sequence().starting_at(101).incrementing_by(100))
        .build()
        .unwrap();

    let ids = |table: &str| import.insert_for(table).unwrap().column_values("id").unwrap();
    assert_eq!(ids("table_11"), vec![&Value::Int(100)]);
    assert_eq!(ids("table_12"), vec![&Value::Int(101), &Value::Int(201)]);
}

#[test]
fn hidden_sheets_are_skipped() {
    let dir = tempdir().unwrap();
    let roots = write_workbook(&dir, "hidden.xlsx", |wb| {
        let visible = wb.add_worksheet();
        visible.set_name("table_1")?;
        write_rows(visible, 0, 0, &[&["a"], &["1"]])?;
        let hidden = wb.add_worksheet();
        hidden.set_name("notes")?;
        hidden.set_hidden(true);
        write_rows(hidden, 0, 0, &[&["text"], &["ignored"]])
    });

    let import = ImportBuilder::excel_in(&roots, "hidden.xlsx").unwrap().build().unwrap();
    assert_eq!(import.tables(), vec!["table_1"]);
}

#[test]
fn empty_sheet_has_no_header() {
    let dir = tempdir().unwrap();
    let roots = write_workbook(&dir, "contains_empty_sheet.xlsx", |wb| {
        let first = wb.add_worksheet();
        first.set_name("table_1")?;
        write_rows(first, 0, 0, &[&["a"], &["1"]])?;
        wb.add_worksheet().set_name("empty_sheet")?;
        Ok(())
    });

    let err = ImportBuilder::excel_in(&roots, "contains_empty_sheet.xlsx")
        .unwrap()
        .build()
        .unwrap_err();
    assert!(matches!(err, ImportError::Parse(_)));
    assert_eq!(err.to_string(), "header row not found: empty_sheet[0]");
}

#[test]
fn missing_workbook_fails_before_reading() {
    let dir = tempdir().unwrap();
    let roots = ResourceRoots::new([dir.path()]);

    let err = ImportBuilder::excel_in(&roots, "xxx").unwrap_err();
    assert!(matches!(err, ImportError::ResourceNotFound(_)));
    assert_eq!(err.to_string(), "xxx not found");
}

#[test]
fn corrupt_workbook_is_reported_with_path() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("broken.xlsx"), b"not a zip archive").unwrap();
    let roots = ResourceRoots::new([dir.path()]);

    let err = ImportBuilder::excel_in(&roots, "broken.xlsx").unwrap().build().unwrap_err();
    assert!(matches!(err, ImportError::Workbook { .. }));
}

#[test]
fn rebuilding_yields_identical_rows() {
    let dir = tempdir().unwrap();
    let roots = testdata(&dir);

    let build = || {
        ImportBuilder::excel_in(&roots, "testdata.xlsx")
            .unwrap()
            .with_generated_value("table_1", "c", sequence())
            .build()
            .unwrap()
    };
    let first = build();
    assert_eq!(first, build());

    let mut a = Recorder::new();
    let mut b = Recorder::new();
    first.execute(&mut a).unwrap();
    first.execute(&mut b).unwrap();
    assert_eq!(a.inserts, b.inserts);
}

#[test]
fn sql_script_from_workbook() {
    let dir = tempdir().unwrap();
    let roots = two_tables(&dir);

    let import = ImportBuilder::excel_in(&roots, "two_tables.xlsx")
        .unwrap()
        .exclude(["table_12"])
        .build()
        .unwrap();
    let mut script = SqlScript::new();
    import.execute(&mut script).unwrap();

    assert_eq!(
        script.statements(),
        &["INSERT INTO \"table_11\" (\"id\", \"name\") VALUES (1, 'Alice')"]
    );
}

#[test]
fn setup_pipeline_with_absolute_location() {
    let dir = tempdir().unwrap();
    two_tables(&dir);
    let path: PathBuf = dir.path().join("two_tables.xlsx");
    let location = path.to_str().unwrap();

    let setup = DbSetup::new()
        .excel(location)
        .unwrap()
        .excel_with(location, |builder| builder.include_matching("table_12"))
        .unwrap();

    let mut recorder = Recorder::new();
    setup.launch(&mut recorder).unwrap();

    let tables: Vec<&str> = recorder.inserts.iter().map(|i| i.table()).collect();
    assert_eq!(tables, vec!["table_11", "table_12", "table_12"]);
}

#[test]
fn workbook_handle_is_released_after_build() {
    let dir = tempdir().unwrap();
    let roots = testdata(&dir);
    let path: &Path = &dir.path().join("testdata.xlsx");

    ImportBuilder::excel_in(&roots, "testdata.xlsx").unwrap().build().unwrap();
    std::fs::remove_file(path).unwrap();
    assert!(ImportBuilder::excel_in(&roots, "testdata.xlsx").is_err());
}
