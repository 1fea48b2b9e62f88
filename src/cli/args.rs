//! CLI argument definitions using clap
//!
//! Commands:
//! - tabstore show [--filter F=V] [--limit N]
//! - tabstore find --id N | --field F --value V [--contains] [--case-sensitive]
//! - tabstore sort --by KEY [--desc] [--builtin] [--out PATH]
//! - tabstore stats [--field F]... [--top K] [--compare F=A,B]
//! - tabstore add --set F=V... [--out PATH]
//! - tabstore update --id N --set F=V... [--out PATH]
//! - tabstore delete --id N [--out PATH]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::config::Dataset;

/// tabstore - load, query, edit and save a CSV-backed record table
#[derive(Parser, Debug)]
#[command(name = "tabstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options accepted by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Built-in dataset
    #[arg(long, global = true, value_enum)]
    pub dataset: Option<Dataset>,

    /// JSON schema file, replacing the dataset's schema
    #[arg(long, global = true)]
    pub schema: Option<PathBuf>,

    /// Input data file
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Only log errors
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log everything, including load start events
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print records
    Show {
        /// Only records whose FIELD equals VALUE (case-insensitive)
        #[arg(long, value_name = "FIELD=VALUE")]
        filter: Option<String>,

        /// Max records to print (default: config display_limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Look records up by id or by a text field
    Find {
        #[arg(long, conflicts_with_all = ["field", "value"], required_unless_present = "field")]
        id: Option<u64>,

        #[arg(long, requires = "value")]
        field: Option<String>,

        #[arg(long, requires = "field")]
        value: Option<String>,

        /// Substring instead of whole-value match
        #[arg(long)]
        contains: bool,

        #[arg(long)]
        case_sensitive: bool,
    },

    /// Reorder records for display
    Sort {
        /// `id`, a field name, or `avg:FIELD,FIELD,...`
        #[arg(long, value_name = "KEY")]
        by: String,

        #[arg(long)]
        desc: bool,

        /// Use the standard library sort instead of insertion sort
        #[arg(long)]
        builtin: bool,

        /// Save the sorted table here
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Summary statistics
    Stats {
        /// Numeric fields to summarize (default: all)
        #[arg(long = "field", value_name = "FIELD")]
        fields: Vec<String>,

        /// Top K values of each text field
        #[arg(long, value_name = "K")]
        top: Option<usize>,

        /// Compare two cohorts of FIELD on the average score
        #[arg(long, value_name = "FIELD=A,B")]
        compare: Option<String>,
    },

    /// Add a record and save
    Add {
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        set: Vec<String>,

        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Change fields of a record and save
    Update {
        #[arg(long)]
        id: u64,

        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        set: Vec<String>,

        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Remove a record and save
    Delete {
        #[arg(long)]
        id: u64,

        #[arg(long)]
        out: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
