use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;

use clap::Parser;
use probe_hash::HashTable;
use probe_hash::hash_table::Entry;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "values", default_value_t = 1000)]
    values: u64,

    #[arg(short = 's', long = "initial_size", default_value_t = 8)]
    initial_size: usize,

    /// Remove every n-th value after filling, leaving tombstones behind.
    #[arg(short = 'r', long = "remove_every", default_value_t = 0)]
    remove_every: u64,
}

fn hash_u64(value: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn main() -> Result<(), probe_hash::Error> {
    let args = Args::parse();

    println!(
        "Creating HashTable with initial size: {}",
        args.initial_size
    );
    let mut table: HashTable<u64> = HashTable::with_capacity(args.initial_size);

    println!("Filling table with {} u64 values...", args.values);
    for value in 0..args.values {
        let hash = hash_u64(value);
        match table.entry(hash, |&v| v == value)? {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(_) => {
                panic!("Value already exists in table: {}", value);
            }
        }
    }

    if args.remove_every > 0 {
        let mut removed = 0;
        for value in (0..args.values).step_by(args.remove_every as usize) {
            table.remove(hash_u64(value), |&v| v == value)?;
            removed += 1;
        }
        println!("Removed {} values", removed);
    }

    println!("Live values: {}", table.len());
    println!("Final capacity: {}", table.capacity());
    println!(
        "Final load factor: {:.2}%",
        (table.len() as f64 / table.capacity() as f64) * 100.0
    );

    table.probe_histogram().print();
    table.debug_stats().print();

    Ok(())
}
