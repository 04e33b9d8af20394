//! Demo driver for chained-hashtable
//!
//! Walks a tiny table through growth and removal, compares hash functions,
//! and runs the bucket-collision simulation.

use anyhow::{Context, Result};
use chained_hashtable::hash_compare::compare;
use chained_hashtable::{collisions, ChainedHashTable, Djb2BuildHasher};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::hash_map::RandomState;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "hashtable-demo")]
#[command(about = "Chained hash table demonstrations")]
struct Cli {
    /// Log resizes and misses
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Insert, retrieve and remove a few lines in a two-bucket table
    Walkthrough,

    /// Compare DJB2 with a randomized SipHash and SHA-256, with bucket indices
    Hashes {
        /// Keys to hash
        #[arg(required = true)]
        keys: Vec<String>,

        /// Bucket count for the index column
        #[arg(short, long, default_value_t = 8)]
        buckets: usize,
    },

    /// Count random hashes before two land in the same bucket
    Collisions {
        #[arg(short, long, default_value_t = 32)]
        buckets: usize,

        /// Number of trials
        #[arg(short, long, default_value_t = 10)]
        loops: usize,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder().with_max_level(level).init();

    match cli.command {
        Command::Walkthrough => walkthrough(),
        Command::Hashes { keys, buckets } => hashes(&keys, buckets),
        Command::Collisions {
            buckets,
            loops,
            seed,
        } => run_collisions(buckets, loops, seed),
    }
}

fn walkthrough() -> Result<()> {
    let mut ht = ChainedHashTable::new(2).context("Failed to build table")?;
    let lines = [
        ("line_1", "Tiny hash table"),
        ("line_2", "Filled beyond capacity"),
        ("line_3", "Linked list saves the day!"),
    ];

    for (key, value) in lines {
        ht.insert(key, value);
        println!(
            "insert {key:<6} -> {} entries, {} buckets",
            ht.len(),
            ht.capacity()
        );
    }
    println!();
    print_lines(&ht, &lines);

    for (key, _) in lines {
        println!("\nRemove {key}");
        ht.remove(key)?;
        print_lines(&ht, &lines);
        println!("({} buckets)", ht.capacity());
    }

    match ht.remove("line_1") {
        Ok(_) => println!("\nline_1 removed twice?"),
        Err(e) => println!("\nRemove again: {e}"),
    }
    Ok(())
}

fn print_lines(ht: &ChainedHashTable<&str>, lines: &[(&str, &str)]) {
    for (key, _) in lines {
        match ht.retrieve(key) {
            Some(v) => println!("{key}: {v}"),
            None => println!("{key}: <none>"),
        }
    }
}

fn hashes(keys: &[String], buckets: usize) -> Result<()> {
    anyhow::ensure!(buckets > 0, "buckets must be positive");
    let sip = RandomState::new();
    println!(
        "{:<16} {:>20} {:>6} {:>20} {:>6} {:<64} {:>6}",
        "key", "djb2", "idx", "siphash (random)", "idx", "sha256", "idx"
    );
    for key in keys {
        let row = compare(key, buckets, &sip);
        println!(
            "{:<16} {:>20} {:>6} {:>20} {:>6} {:<64} {:>6}",
            row.key,
            row.djb2,
            row.djb2_bucket,
            row.other,
            row.other_bucket,
            row.sha256,
            row.sha256_bucket
        );
    }
    Ok(())
}

fn run_collisions(buckets: usize, loops: usize, seed: Option<u64>) -> Result<()> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let report = collisions::simulate(buckets, loops, &Djb2BuildHasher, &mut rng)?;
    for t in &report.trials {
        println!(
            "{} buckets, {} hashes before collision. ({:.1})",
            t.buckets,
            t.hashes_before_collision,
            t.percent_of_buckets()
        );
    }
    println!("\nAvg {:.1}%", report.mean_percent());
    Ok(())
}
