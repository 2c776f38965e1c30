use anyhow::{Context, Result};
use clap::Parser;
use diamond_seeds::{Config, DiamondSearcher, InputType, SensitivityMode};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Search seed orthologs of a FASTA file with DIAMOND.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Query FASTA file.
    #[clap(short = 'i', long, value_parser)]
    input: PathBuf,

    /// Output table of seed orthologs.
    #[clap(short = 'o', long, value_parser)]
    output: PathBuf,

    /// Kind of query sequences: CDS, proteins, genome or metagenome.
    #[clap(long, default_value = "proteins", value_parser = parse_input_type)]
    itype: InputType,

    /// DIAMOND database. Defaults to $EGGNOG_DATA_DIR/eggnog_proteins.dmnd.
    #[clap(long, value_parser)]
    dmnd_db: Option<PathBuf>,

    /// Path to the diamond executable.
    #[clap(long, value_parser)]
    diamond: Option<PathBuf>,

    /// Number of threads handed to the aligner.
    #[clap(long, value_parser)]
    cpu: Option<NonZeroUsize>,

    /// Sensitivity mode: fast, mid-sensitive, sensitive, more-sensitive, very-sensitive, ultra-sensitive.
    #[clap(long, default_value = "sensitive", value_parser = parse_sensitivity)]
    sensmode: SensitivityMode,

    /// Minimum query coverage (percent).
    #[clap(long, value_parser, default_value_t = 0.0)]
    query_cover: f64,

    /// Minimum subject coverage (percent).
    #[clap(long, value_parser, default_value_t = 0.0)]
    subject_cover: f64,

    /// Scoring matrix.
    #[clap(long, value_parser)]
    matrix: Option<String>,

    /// Gap open penalty.
    #[clap(long, value_parser)]
    gapopen: Option<i32>,

    /// Gap extension penalty.
    #[clap(long, value_parser)]
    gapextend: Option<i32>,

    /// Minimum percent identity of a seed ortholog.
    #[clap(long, value_parser, default_value_t = 0.0)]
    pident: f64,

    /// Maximum e-value of a seed ortholog.
    #[clap(long, value_parser, default_value_t = 0.001)]
    evalue: f64,

    /// Minimum bit score of a seed ortholog.
    #[clap(long, value_parser, default_value_t = 0.0)]
    score: f64,

    /// Discard hits to proteins of this taxon id.
    #[clap(long, value_parser)]
    excluded_taxa: Option<String>,

    /// Directory in which the temporary workspace is created.
    #[clap(long, value_parser)]
    temp_dir: Option<PathBuf>,

    /// Do not write the comment header to the output table.
    #[clap(long, action)]
    no_file_comments: bool,

    /// Also write the ids of queries without a seed ortholog to this file.
    #[clap(long, value_parser)]
    no_hits: Option<PathBuf>,

    /// Verbosity level (0 = error, 1 = info, 2 = debug)
    #[clap(short, long, default_value = "1")]
    verbose: u8,
}

fn parse_input_type(s: &str) -> Result<InputType, String> {
    s.parse().map_err(|e: diamond_seeds::SearchError| e.to_string())
}

fn parse_sensitivity(s: &str) -> Result<SensitivityMode, String> {
    s.parse().map_err(|e: diamond_seeds::SearchError| e.to_string())
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    let mut builder = Config::builder()
        .input_type(args.itype)
        .sensitivity(args.sensmode)
        .query_cover(args.query_cover)
        .subject_cover(args.subject_cover)
        .min_pident(args.pident)
        .max_evalue(args.evalue)
        .min_score(args.score)
        .no_file_comments(args.no_file_comments);
    if let Some(db) = args.dmnd_db {
        builder = builder.database(db);
    }
    if let Some(diamond) = args.diamond {
        builder = builder.diamond_binary(diamond);
    }
    if let Some(cpu) = args.cpu {
        builder = builder.num_threads(cpu.get());
    }
    if let Some(matrix) = args.matrix {
        builder = builder.matrix(matrix);
    }
    if let Some(gapopen) = args.gapopen {
        builder = builder.gap_open(gapopen);
    }
    if let Some(gapextend) = args.gapextend {
        builder = builder.gap_extend(gapextend);
    }
    if let Some(taxon) = args.excluded_taxa {
        builder = builder.excluded_taxon(taxon);
    }
    if let Some(temp_dir) = args.temp_dir {
        builder = builder.temp_dir(temp_dir);
    }

    let searcher = DiamondSearcher::new(builder.build())?;
    let outcome = searcher
        .search(&args.input, &args.output)
        .with_context(|| format!("search of {} failed", args.input.display()))?;
    info!("{} seed orthologs found", outcome.hits().len());

    if let Some(path) = args.no_hits {
        let no_hits = outcome.no_hits(&args.input)?;
        let mut out = BufWriter::new(File::create(&path)?);
        for query in &no_hits {
            writeln!(out, "{query}")?;
        }
        out.flush()?;
        info!("{} queries without hits written to {}", no_hits.len(), path.display());
    }

    Ok(())
}
