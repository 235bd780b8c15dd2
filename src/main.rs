use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::Utc;
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use cotizador::applicant::QuoteRequest;
use cotizador::auth::{Authenticator, UserDirectory};
use cotizador::quote::{JsonFileQuoteStore, NewQuote, QuoteRecord, QuoteStore};
use cotizador::rating::RatingEngine;
use cotizador::reference::ReferenceData;
use cotizador::settings::load_settings;
use cotizador::types::{Category, QuoteId, Year};

#[derive(Debug, Default)]
struct Args {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    reference: Option<PathBuf>,
    year: Option<i32>,
    email: Option<String>,
    password: Option<String>,
    save: bool,
    history: Option<Option<Category>>,
    delete: Option<QuoteId>,
    show: Option<QuoteId>,
    clear: Option<Option<Category>>,
    quiet: bool,
}

fn required<'a>(args: &'a [String], i: usize, flag: &str) -> anyhow::Result<&'a str> {
    args.get(i).map(String::as_str).with_context(|| format!("{flag} requires a value"))
}

/// Value for a flag whose argument may be omitted.
fn optional_category(args: &[String], i: &mut usize) -> anyhow::Result<Option<Category>> {
    match args.get(*i + 1) {
        Some(next) if !next.starts_with("--") => {
            *i += 1;
            Ok(Some(next.parse::<Category>()?))
        }
        _ => Ok(None),
    }
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                parsed.input = Some(required(args, i, "--input")?.into());
            }
            "--output" => {
                i += 1;
                parsed.output = Some(required(args, i, "--output")?.into());
            }
            "--reference" => {
                i += 1;
                parsed.reference = Some(required(args, i, "--reference")?.into());
            }
            "--year" => {
                i += 1;
                let raw = required(args, i, "--year")?;
                parsed.year = Some(raw.parse::<i32>().with_context(|| format!("--year requires an integer, got {raw:?}"))?);
            }
            "--email" => {
                i += 1;
                parsed.email = Some(required(args, i, "--email")?.to_string());
            }
            "--password" => {
                i += 1;
                parsed.password = Some(required(args, i, "--password")?.to_string());
            }
            "--save" => parsed.save = true,
            "--history" => parsed.history = Some(optional_category(args, &mut i)?),
            "--delete" => {
                i += 1;
                parsed.delete = Some(QuoteId(required(args, i, "--delete")?.to_string()));
            }
            "--show" => {
                i += 1;
                parsed.show = Some(QuoteId(required(args, i, "--show")?.to_string()));
            }
            "--clear" => parsed.clear = Some(optional_category(args, &mut i)?),
            "--quiet" => parsed.quiet = true,
            other => tracing::warn!(flag = other, "ignoring unknown argument"),
        }
        i += 1;
    }

    Ok(parsed)
}

fn main() -> anyhow::Result<()> {
    let settings = load_settings()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(settings.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();

    let argv: Vec<String> = std::env::args().collect();
    let args = parse_args(&argv)?;

    let mut store = JsonFileQuoteStore::new(settings.quotes_path.clone());

    // ── History management ────────────────────────────────────────────────────
    if let Some(id) = &args.delete {
        if store.delete(id)? {
            println!("Deleted quote {id}");
        } else {
            println!("No quote with id {id}");
        }
        return Ok(());
    }
    if let Some(category) = args.clear {
        match category {
            Some(c) => println!("Deleted {} {c} quote(s)", store.delete_by_category(c)?),
            None => {
                store.clear()?;
                println!("Quote history cleared");
            }
        }
        return Ok(());
    }
    if let Some(id) = &args.show {
        let Some(record) = store.get(id)? else {
            bail!("no quote with id {id}");
        };
        let reference = load_reference(args.reference.clone().or(settings.reference_path.clone()))?;
        print_quote_detail(&record, &reference);
        return Ok(());
    }
    if let Some(category) = args.history {
        let records = match category {
            Some(c) => store.by_category(c)?,
            None => store.all()?,
        };
        let reference = load_reference(args.reference.clone().or(settings.reference_path.clone()))?;
        print_history(&records, &reference);
        return Ok(());
    }

    // ── Batch pricing ─────────────────────────────────────────────────────────
    let user = if args.save {
        let (Some(email), Some(password)) = (&args.email, &args.password) else {
            bail!("--save requires --email and --password");
        };
        let Some(user) = UserDirectory::canonical().authenticate(email, password) else {
            bail!("invalid credentials for {email}");
        };
        Some(user)
    } else {
        None
    };

    let reference = load_reference(args.reference.clone().or(settings.reference_path.clone()))?;
    let engine = match args.year.map(Year).or(settings.rating_year) {
        Some(year) => RatingEngine::for_year(&reference, year),
        None => RatingEngine::new(&reference),
    };

    let input = args.input.clone().unwrap_or_else(|| PathBuf::from("quotes.ndjson"));
    let requests = read_requests(&input)?;
    tracing::info!(count = requests.len(), year = engine.year().0, "pricing quote requests");

    let timestamp = Utc::now();
    let quotes: Vec<NewQuote> = requests
        .into_par_iter()
        .map(|request| {
            let result = engine.rate(&request);
            NewQuote::new(request, result, timestamp)
        })
        .collect();

    let output = args.output.clone().unwrap_or_else(|| PathBuf::from("priced.ndjson"));
    let file = File::create(&output).with_context(|| format!("failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    for q in &quotes {
        serde_json::to_writer(&mut writer, q)?;
        writeln!(writer)?;
    }
    writer.flush()?;

    if !args.quiet {
        println!("Quotes priced: {} → {}", quotes.len(), output.display());
        print_quotes(&quotes, &reference);
    }

    if let Some(user) = user {
        let saved = store.save_all(quotes)?;
        if !args.quiet {
            println!(
                "\nSaved {} quote(s) to {} for {} <{}>",
                saved.len(),
                store.path().display(),
                user.name,
                user.email
            );
        }
    }

    Ok(())
}

fn load_reference(path: Option<PathBuf>) -> anyhow::Result<ReferenceData> {
    match path {
        Some(p) => Ok(ReferenceData::from_path(&p)?),
        None => Ok(ReferenceData::canonical()),
    }
}

/// One `QuoteRequest` per non-blank line.
fn read_requests(path: &Path) -> anyhow::Result<Vec<QuoteRequest>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut requests = Vec::new();
    for (n, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let request: QuoteRequest = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid quote request", path.display(), n + 1))?;
        requests.push(request);
    }
    Ok(requests)
}

fn print_quotes(quotes: &[NewQuote], reference: &ReferenceData) {
    println!(
        "\n{:>4} | {:<4} | {:<28} | {:<24} | {:>6} | {:>8} | {:>9}",
        "#", "Type", "Plan", "Location", "Base", "Monthly", "Annual"
    );
    println!("{}", "-".repeat(4 + 3 + 4 + 3 + 28 + 3 + 24 + 3 + 6 + 3 + 8 + 3 + 9));
    for (i, q) in quotes.iter().enumerate() {
        let applicant = q.request.applicant();
        println!(
            "{:>4} | {:<4} | {:<28} | {:<24} | {:>6} | {:>8} | {:>9}",
            i + 1,
            q.category().tag(),
            reference.plan_label(&applicant.coverage_plan),
            applicant.location,
            q.result.base_price,
            q.result.monthly_price,
            q.result.annual_price,
        );
    }
}

fn print_history(records: &[QuoteRecord], reference: &ReferenceData) {
    println!("\n=== Quote history ({} saved) ===", records.len());
    if records.is_empty() {
        return;
    }
    println!(
        "{:>13} | {:<4} | {:<28} | {:>8} | {:<20}",
        "Id", "Type", "Plan", "Monthly", "Saved at"
    );
    println!("{}", "-".repeat(13 + 3 + 4 + 3 + 28 + 3 + 8 + 3 + 20));
    for r in records {
        println!(
            "{:>13} | {:<4} | {:<28} | {:>8} | {:<20}",
            r.id,
            r.category().tag(),
            reference.plan_label(&r.quote.request.applicant().coverage_plan),
            r.quote.total_price,
            r.quote.timestamp.format("%Y-%m-%d %H:%M:%S"),
        );
    }
}

/// Row labels for the generic factor table, in slot order.
fn factor_labels(category: Category) -> [&'static str; 7] {
    match category {
        Category::Home => ["Age", "Location", "House type", "Coverage", "Square meters", "Property age", "Alarm"],
        Category::Auto => ["Driver age", "Location", "Vehicle type", "Coverage", "Vehicle age", "Use type", "Anti-theft"],
        Category::Motorcycle => ["Experience", "Location", "Motorcycle type", "Coverage", "Engine cc", "Motorcycle age", "Anti-theft"],
        Category::Life => ["Age", "Medical conditions", "Smoker", "Coverage", "Beneficiaries", "(unused)", "(unused)"],
    }
}

fn print_quote_detail(record: &QuoteRecord, reference: &ReferenceData) {
    let applicant = record.quote.request.applicant();
    let result = &record.quote.result;
    let f = result.generic_factors();

    println!("\n=== Quote {} ({}) ===", record.id, record.category().tag());
    println!("  Saved at:  {}", record.quote.timestamp.format("%Y-%m-%d %H:%M:%S"));
    println!("  Applicant: {} <{}>", applicant.full_name, applicant.email);
    println!("  Plan:      {}", reference.plan_label(&applicant.coverage_plan));
    println!("  Location:  {}", applicant.location);

    println!("\n{:<20} | {:>8}", "Factor", "Value");
    println!("{}", "-".repeat(20 + 3 + 8));
    println!("{:<20} | {:>8}", "Base price", f.base_price);
    let values = [
        f.age_factor,
        f.location_factor,
        f.property_factor,
        f.coverage_factor,
        f.square_meters_factor,
        f.construction_year_factor,
        f.has_alarm_factor,
    ];
    for (label, value) in factor_labels(record.category()).iter().zip(values) {
        println!("{label:<20} | {value:>8.2}");
    }
    println!("{}", "-".repeat(20 + 3 + 8));
    println!("{:<20} | {:>8}", "Monthly", result.monthly_price);
    println!("{:<20} | {:>8}", "Annual", result.annual_price);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(flags: &[&str]) -> Vec<String> {
        std::iter::once("cotizador").chain(flags.iter().copied()).map(String::from).collect()
    }

    #[test]
    fn parses_pricing_flags() {
        let args = parse_args(&argv(&[
            "--input", "in.ndjson", "--output", "out.ndjson", "--year", "2026", "--save",
            "--email", "test@test.com", "--password", "test123", "--quiet",
        ]))
        .unwrap();
        assert_eq!(args.input, Some(PathBuf::from("in.ndjson")));
        assert_eq!(args.output, Some(PathBuf::from("out.ndjson")));
        assert_eq!(args.year, Some(2026));
        assert!(args.save && args.quiet);
        assert_eq!(args.email.as_deref(), Some("test@test.com"));
    }

    #[test]
    fn history_and_clear_take_an_optional_category() {
        let args = parse_args(&argv(&["--history", "--quiet"])).unwrap();
        assert_eq!(args.history, Some(None));
        assert!(args.quiet);

        let args = parse_args(&argv(&["--history", "VIDA"])).unwrap();
        assert_eq!(args.history, Some(Some(Category::Life)));

        let args = parse_args(&argv(&["--clear", "moto"])).unwrap();
        assert_eq!(args.clear, Some(Some(Category::Motorcycle)));
    }

    #[test]
    fn show_takes_a_quote_id() {
        let args = parse_args(&argv(&["--show", "1773480600000"])).unwrap();
        assert_eq!(args.show, Some(QuoteId("1773480600000".to_string())));
        assert!(parse_args(&argv(&["--show"])).is_err());
    }

    #[test]
    fn factor_labels_follow_generic_slot_reuse() {
        assert_eq!(factor_labels(Category::Auto)[4], "Vehicle age");
        assert_eq!(factor_labels(Category::Motorcycle)[0], "Experience");
        assert_eq!(factor_labels(Category::Life)[1], "Medical conditions");
    }

    #[test]
    fn missing_flag_value_is_an_error() {
        assert!(parse_args(&argv(&["--input"])).is_err());
        assert!(parse_args(&argv(&["--year", "soon"])).is_err());
        assert!(parse_args(&argv(&["--history", "BOAT"])).is_err());
    }

    #[test]
    fn reads_requests_skipping_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.ndjson");
        std::fs::write(
            &path,
            "{\"type\":\"CASA\",\"data\":{\"age\":\"30\"}}\n\n{\"type\":\"VIDA\",\"data\":{}}\n",
        )
        .unwrap();
        let requests = read_requests(&path).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].category(), Category::Life);
    }

    #[test]
    fn bad_request_line_reports_its_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.ndjson");
        std::fs::write(&path, "{\"type\":\"CASA\",\"data\":{}}\n{\"type\":\"BARCO\"}\n").unwrap();
        let err = read_requests(&path).unwrap_err();
        assert!(format!("{err}").ends_with(":2: invalid quote request"), "{err}");
    }
}
