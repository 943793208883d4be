use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "Recommender-system experiment runner")]
pub struct Cli {
    /// JSON configuration file (defaults are used for missing values)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Partition a ratings dataset into folds
    Partition {
        #[arg(short, long)]
        dataset: PathBuf,
        #[arg(short, long)]
        folds: Option<usize>,
        #[arg(short, long)]
        seed: Option<u64>,
        /// Hold out this fraction of every user's ratings instead of cross-fold
        #[arg(long)]
        hold_out: Option<f64>,
    },
    /// Cross-validate a recommendation algorithm
    Evaluate {
        #[arg(short, long)]
        dataset: PathBuf,
        #[arg(short, long)]
        algorithm: Option<String>,
        #[arg(short, long)]
        folds: Option<usize>,
        #[arg(short, long)]
        seed: Option<u64>,
        /// Worker threads (defaults to available cores)
        #[arg(short, long)]
        threads: Option<usize>,
    },
    /// Build the user trust graph and report its centrality
    TrustGraph {
        #[arg(short, long)]
        dataset: PathBuf,
        /// pearson or jaccard
        #[arg(short, long)]
        measure: Option<String>,
        #[arg(short, long)]
        threads: Option<usize>,
        /// Only use the first M users by id
        #[arg(long)]
        max_users: Option<usize>,
    },
    /// Form random user groups and partition their ratings
    Groups {
        #[arg(short, long)]
        dataset: PathBuf,
        #[arg(short = 'g', long)]
        group_size: usize,
        #[arg(short = 'k', long = "groups")]
        num_groups: usize,
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// List the registered algorithms and trust measures
    Algorithms,
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_evaluate() {
        let cli = Cli::parse_from([
            "recsys_lab",
            "--config",
            "lab.json",
            "evaluate",
            "--dataset",
            "ratings.csv",
            "--algorithm",
            "user-mean",
            "--threads",
            "4",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("lab.json")));
        assert_eq!(
            cli.command,
            Command::Evaluate {
                dataset: PathBuf::from("ratings.csv"),
                algorithm: Some("user-mean".to_string()),
                folds: None,
                seed: None,
                threads: Some(4),
            }
        );
    }

    #[test]
    fn test_parse_groups() {
        let cli = Cli::parse_from(["recsys_lab", "groups", "-d", "r.csv", "-g", "3", "-k", "2"]);

        assert!(matches!(
            cli.command,
            Command::Groups { group_size: 3, num_groups: 2, seed: None, .. }
        ));
    }
}
