use ConservedMoieties::ConservationLaws::conservation_errors::ConservationError;
use ConservedMoieties::ConservationLaws::moiety_analyzer::MoietyAnalyzer;
use ConservedMoieties::ConservationLaws::moiety_config::MoietyConfig;
use ConservedMoieties::Examples::moiety_examples::moiety_examples;
use ConservedMoieties::Utils::load_from_file::{load_species_names, load_stoichiometric_matrix};
use log::{LevelFilter, error};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::env;

fn parse_dimension(value: &str, what: &str) -> Result<usize, ConservationError> {
    value
        .parse::<usize>()
        .map_err(|e| ConservationError::Parse(format!("{} '{}': {}", what, value, e)))
}

/// `<matrix file> <N metabolites> <M reactions> [names file] [config.json]`
fn run_file(args: &[String]) -> Result<(), ConservationError> {
    let number_of_metabolites = parse_dimension(&args[1], "number of metabolites")?;
    let number_of_reactions = parse_dimension(&args[2], "number of reactions")?;
    let matrix = load_stoichiometric_matrix(&args[0], number_of_metabolites, number_of_reactions)?;
    let names = match args.get(3) {
        Some(file) => Some(load_species_names(file)?),
        None => None,
    };
    let config = match args.get(4) {
        Some(file) => MoietyConfig::load(file)?,
        None => MoietyConfig::default(),
    };
    let report = MoietyAnalyzer::new(matrix, config)?.compute()?;
    for line in report.summary() {
        println!("{}", line);
    }
    report.pretty_print(names.as_deref());
    Ok(())
}

pub fn main() {
    let _ = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        let task: usize = 3;
        moiety_examples(task);
        return;
    }
    if args.len() < 3 {
        eprintln!("usage: <matrix file> <N metabolites> <M reactions> [names file] [config.json]");
        std::process::exit(2);
    }
    if let Err(e) = run_file(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
