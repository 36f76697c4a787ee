use std::{
    collections::{BTreeSet, HashSet},
    fs::File,
    io::{BufWriter, Write},
};

use clap::Parser;
use litdex::{
    DataDir,
    Error,
    Project,
    ProjectEntry,
    ProjectIndex,
    Result,
    TracingDiagnostics,
    convert::{self, ConvertOptions, PdfToText},
    import,
    output,
    search,
};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{
    Cli,
    Command,
    ConvertArgs,
    CreateArgs,
    SearchArgs,
    ShowArgs,
    ShowField,
};

const NOT_SPECIFIED: &str = "<Not Specified>";

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("LITDEX_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Create(args) => cmd_create(&args),
        Command::Convert(args) => cmd_convert(&args),
        Command::Search(args) => cmd_search(&args),
        Command::Show(args) => cmd_show(&args),
        Command::Completions(args) => {
            args.generate();
            Ok(())
        }
    }
}

fn cmd_create(args: &CreateArgs) -> Result<()> {
    if args.project.exists() && !args.force {
        return Err(Error::Config(format!(
            "project file already exists: {} (use --force to overwrite)",
            args.project.display()
        )));
    }

    let records =
        import::load_records(&args.records, &args.langs, &TracingDiagnostics)?;
    let data_dir = DataDir::resolve(args.data_dir.as_deref())?;

    let mut project = Project::new(data_dir.into_path(), records);
    project.save(&args.project)?;

    tracing::info!(
        "Created {} with {} records (text files in {})",
        args.project.display(),
        project.entries.len(),
        project.data_dir.display()
    );
    Ok(())
}

fn cmd_convert(args: &ConvertArgs) -> Result<()> {
    let diag = TracingDiagnostics;
    let mut project = Project::load(&args.project)?;
    let mut index = project.build_index(&diag)?;

    let options = ConvertOptions {
        data_dir: project.data_dir.clone(),
        force: args.force,
    };
    let outcome = convert::convert(
        &mut index,
        &args.select.specifiers(),
        &options,
        &PdfToText,
        &diag,
    );

    project.restore_entries(index);
    let report = outcome?;
    project.save(&args.project)?;

    tracing::info!(
        "Converted {} files, kept {} existing, {} entries failed",
        report.converted,
        report.reused,
        report.failed
    );
    report.into_result()
}

fn cmd_search(args: &SearchArgs) -> Result<()> {
    let diag = TracingDiagnostics;
    let mut project = Project::load(&args.project)?;
    let index = project.build_index(&diag)?;

    let results = search::search(&index, &args.config(), &diag)?;
    tracing::debug!("{} results", results.len());

    match &args.outfile {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            output::write_results(&mut out, &results, args.format)?;
        }
        None => {
            let mut out = std::io::stdout().lock();
            output::write_results(&mut out, &results, args.format)?;
        }
    }
    Ok(())
}

fn cmd_show(args: &ShowArgs) -> Result<()> {
    let mut project = Project::load(&args.project)?;
    let index = project.build_index(&TracingDiagnostics)?;
    let mut out = std::io::stdout().lock();

    let lines: Vec<String> = match args.field {
        ShowField::All => {
            for entry in indexed_entries(&index) {
                output::write_record_details(
                    &mut out,
                    &entry.record,
                    &entry.hash,
                )?;
            }
            return Ok(());
        }
        ShowField::Years => {
            let mut years = index.years().to_vec();
            years.sort_unstable();
            years.iter().map(u32::to_string).collect()
        }
        ShowField::Titles => sorted(index.titles()),
        ShowField::Authors => sorted(index.authors()),
        ShowField::Publications => sorted(index.publications()),
        ShowField::Hashes => {
            let hashes: Vec<String> =
                index.hashes().iter().map(|h| h.to_string()).collect();
            sorted(&hashes)
        }
        ShowField::Languages => {
            let mut seen = HashSet::new();
            let mut langs: Vec<String> = indexed_entries(&index)
                .map(|e| e.record.language.clone())
                .filter(|lang| seen.insert(lang.to_lowercase()))
                .collect();
            langs.sort();
            langs
                .into_iter()
                .map(|lang| {
                    if lang.is_empty() {
                        NOT_SPECIFIED.to_string()
                    } else {
                        lang
                    }
                })
                .collect()
        }
        ShowField::Files => {
            let files: BTreeSet<String> = indexed_entries(&index)
                .flat_map(|e| e.record.files.iter())
                .map(|f| f.display().to_string())
                .collect();
            files.into_iter().collect()
        }
    };

    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn indexed_entries(
    index: &ProjectIndex,
) -> impl Iterator<Item = &ProjectEntry> {
    index.indexed().iter().map(move |&id| index.entry(id))
}

fn sorted(values: &[String]) -> Vec<String> {
    let mut values = values.to_vec();
    values.sort();
    values
}
