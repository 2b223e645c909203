use crate::ConservationLaws::moiety_analyzer::MoietyAnalyzer;
use crate::ConservationLaws::moiety_config::MoietyConfig;
use crate::ConservationLaws::stoichiometric_matrix::StoichiometricMatrix;
use log::error;

fn run_network(title: &str, rows: Vec<Vec<f64>>, names: &[&str]) {
    println!("\n{}", title);
    let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
    let matrix = match StoichiometricMatrix::from_rows(&rows) {
        Ok(matrix) => matrix,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };
    let config = MoietyConfig::new().with_seed(42);
    let result = MoietyAnalyzer::new(matrix, config).and_then(|mut analyzer| analyzer.compute());
    match result {
        Ok(report) => {
            for line in report.summary() {
                println!("{}", line);
            }
            report.pretty_print(Some(names.as_slice()));
        }
        Err(e) => error!("{}", e),
    }
}

pub fn moiety_examples(task: usize) {
    //
    match task {
        0 => {
            // A -> B: one moiety straight from the kernel
            run_network("A -> B", vec![vec![-1.0, 1.0]], &["A", "B"]);
        }
        1 => {
            // two independent reactions give two moieties
            run_network(
                "A -> B, C -> D",
                vec![vec![-1.0, 1.0, 0.0, 0.0], vec![0.0, 0.0, -1.0, 1.0]],
                &["A", "B", "C", "D"],
            );
        }
        2 => {
            // association: A + C and B + C
            run_network("A + B -> C", vec![vec![-1.0, -1.0, 1.0]], &["A", "B", "C"]);
        }
        3 => {
            // the kernel gives S + ES + P and the mixed law E - S - P,
            // the annealing finds E + ES
            run_network(
                "E + S -> ES, ES -> E + P",
                vec![vec![-1.0, -1.0, 1.0, 0.0], vec![1.0, 0.0, -1.0, 1.0]],
                &["E", "S", "ES", "P"],
            );
        }
        4 => {
            // -> A + B conserves A - B, which is no moiety
            run_network("-> A + B", vec![vec![1.0, 1.0]], &["A", "B"]);
        }
        _ => {
            println!("no example with number {}", task);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examples_run() {
        for task in 0..4 {
            moiety_examples(task);
        }
    }
}
