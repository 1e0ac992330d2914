use clap::Parser;
use env_logger::Env;
use log::info;
use org_stats::api::Error;
use org_stats::collector::REPORT_HEADER;
use org_stats_app::{collect_org_stats, Args};
use std::fs::File;
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let output = args.output.clone();

    let mut rows = collect_org_stats(args).await?;

    let mut out: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };
    writeln!(out, "{}", REPORT_HEADER)?;
    while let Some(row) = rows.recv().await {
        writeln!(out, "{}", row)?;
    }

    info!("Statistics collection complete");
    Ok(())
}
