use crate::api::{Error, Result};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Running sums of the four tracked report columns.
///
/// Sums are `f64` so that fractional cells add up the same way the report
/// consumers expect; whole numbers still print without a fraction.
#[derive(Debug, Default, PartialEq)]
pub struct ColumnTotals {
    pub views: f64,
    pub stars: f64,
    pub forks: f64,
    pub downloads: f64,
}

impl Display for ColumnTotals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total views_14d: {}", self.views)?;
        writeln!(f, "Total stars: {}", self.stars)?;
        writeln!(f, "Total forks: {}", self.forks)?;
        write!(f, "Total downloads: {}", self.downloads)
    }
}

pub fn sum_csv_file<PATH: AsRef<Path>>(path: PATH) -> Result<ColumnTotals> {
    sum_columns(BufReader::new(File::open(path)?))
}

/// Sums the `views_14d`, `stars`, `forks` and `total_downloads` columns of
/// a report.
///
/// The first line is the header; column positions are discovered by exact,
/// case-sensitive name match. The format is plain comma-separated with no
/// quoting, so cells never contain commas. Non-numeric cells and cells past
/// the end of a short row count as zero.
pub fn sum_columns<READER: BufRead>(reader: READER) -> Result<ColumnTotals> {
    let mut lines = reader.lines();
    let header = lines.next().ok_or(Error::Error("Input file is empty"))??;
    let names: Vec<&str> = header.split(',').collect();
    let views_at = column_at(&names, "views_14d")?;
    let stars_at = column_at(&names, "stars")?;
    let forks_at = column_at(&names, "forks")?;
    let downloads_at = column_at(&names, "total_downloads")?;

    let mut totals = ColumnTotals::default();
    for line in lines {
        let line = line?;
        let cells: Vec<&str> = line.split(',').collect();
        totals.views += numeric(&cells, views_at);
        totals.stars += numeric(&cells, stars_at);
        totals.forks += numeric(&cells, forks_at);
        totals.downloads += numeric(&cells, downloads_at);
    }
    Ok(totals)
}

fn column_at(names: &[&str], name: &'static str) -> Result<usize> {
    names
        .iter()
        .position(|candidate| *candidate == name)
        .ok_or(Error::MissingColumn(name))
}

fn numeric(cells: &[&str], at: usize) -> f64 {
    cells
        .get(at)
        .and_then(|cell| cell.trim().parse().ok())
        .unwrap_or(0.0)
}

/// Tests

#[test]
fn sums_tracked_columns() {
    let csv = "a,views_14d,b,stars,forks,total_downloads\n1,10,2,3,4,5\n1,20,2,6,7,8\n";
    let totals = sum_columns(csv.as_bytes()).unwrap();
    assert_eq!(
        totals,
        ColumnTotals {
            views: 30.0,
            stars: 9.0,
            forks: 11.0,
            downloads: 13.0,
        }
    );
}

#[test]
fn column_positions_are_discovered_not_assumed() {
    let csv = "total_downloads,forks,stars,views_14d\n1,2,3,4\n";
    let totals = sum_columns(csv.as_bytes()).unwrap();
    assert_eq!(
        totals,
        ColumnTotals {
            views: 4.0,
            stars: 3.0,
            forks: 2.0,
            downloads: 1.0,
        }
    );
}

#[test]
fn missing_column_fails_before_any_row() {
    let csv = "views_14d,stars,forks\n1,2,3\n";
    let err = sum_columns(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, Error::MissingColumn("total_downloads")));
}

#[test]
fn column_match_is_case_sensitive() {
    let csv = "Views_14d,stars,forks,total_downloads\n1,2,3,4\n";
    let err = sum_columns(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, Error::MissingColumn("views_14d")));
}

#[test]
fn non_numeric_cells_count_as_zero() {
    let csv = "views_14d,stars,forks,total_downloads\nn/a,1,2,3\n";
    let totals = sum_columns(csv.as_bytes()).unwrap();
    assert_eq!(totals.views, 0.0);
    assert_eq!(totals.stars, 1.0);
}

#[test]
fn short_rows_read_missing_cells_as_zero() {
    let csv = "views_14d,stars,forks,total_downloads\n5\n";
    let totals = sum_columns(csv.as_bytes()).unwrap();
    assert_eq!(
        totals,
        ColumnTotals {
            views: 5.0,
            stars: 0.0,
            forks: 0.0,
            downloads: 0.0,
        }
    );
}

#[test]
fn header_only_input_gives_zero_totals() {
    let csv = "views_14d,stars,forks,total_downloads\n";
    let totals = sum_columns(csv.as_bytes()).unwrap();
    assert_eq!(totals, ColumnTotals::default());
}

#[test]
fn empty_input_fails() {
    let err = sum_columns("".as_bytes()).unwrap_err();
    assert!(matches!(err, Error::Error("Input file is empty")));
}

#[test]
fn totals_render_one_line_per_column() {
    let totals = ColumnTotals {
        views: 30.0,
        stars: 9.0,
        forks: 11.0,
        downloads: 13.0,
    };
    assert_eq!(
        totals.to_string(),
        "Total views_14d: 30\nTotal stars: 9\nTotal forks: 11\nTotal downloads: 13"
    );
}

#[test]
fn fractional_cells_keep_their_fraction() {
    let csv = "views_14d,stars,forks,total_downloads\n1.5,1,1,1\n1,1,1,1\n";
    let totals = sum_columns(csv.as_bytes()).unwrap();
    assert_eq!(totals.views, 2.5);
}
