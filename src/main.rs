use anyhow::{Context, Result};
use empcleaner::{process, store};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Where the raw employee export lands.
const SOURCE_KEY: &str = "employee2.csv";
const SOURCE_BUCKET: &str = "source-bucket-2024-eu";
const SOURCE_REGION: &str = "eu-north-1";

/// Where the cleaned table goes.
const DEST_KEY: &str = "processed_employee2.csv";
const DEST_BUCKET: &str = "bucket-2024-v4";
const DEST_REGION: &str = "us-east-1";

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) fetch the raw export ─────────────────────────────────────
    let raw = store::fetch_object(SOURCE_KEY, SOURCE_BUCKET, SOURCE_REGION).await?;
    let text = String::from_utf8(raw).context("decoding source object as UTF-8")?;

    // ─── 3) parse lines and repair split incomes ─────────────────────
    let mut rows = process::split_rows(&text);
    if !rows.is_empty() {
        process::repair::merge_split_income(&mut rows[1..]);
    }
    let mut table = process::RecordTable::from_rows(rows)?;
    info!(rows = table.rows.len(), columns = table.headers.len(), "parsed export");

    // ─── 4) clean columns ────────────────────────────────────────────
    process::clean_table(&mut table)?;

    // ─── 5) serialize and upload ─────────────────────────────────────
    let out = table.to_csv();
    store::store_object(out.into_bytes(), DEST_KEY, DEST_BUCKET, DEST_REGION).await?;

    info!("all done");
    Ok(())
}
