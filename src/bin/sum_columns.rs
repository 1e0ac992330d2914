use clap::Parser;
use org_stats::api::Error;
use org_stats::totals::sum_csv_file;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path of the CSV report to summarize
    csv_path: PathBuf,
}

fn main() -> Result<(), Error> {
    let args = Args::try_parse().unwrap_or_else(|err| {
        eprintln!("{}", err);
        process::exit(1);
    });

    let totals = sum_csv_file(&args.csv_path)?;
    println!("{}", totals);
    Ok(())
}
