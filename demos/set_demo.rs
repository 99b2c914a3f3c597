use clap::Parser;
use probe_hash::HashSet;
use probe_hash::SetAlgebra;

#[derive(Parser, Debug)]
struct Args {
    /// Number of slots each set starts with.
    #[arg(short = 's', long = "initial_size", default_value_t = 8)]
    initial_size: usize,
}

fn build(initial_size: usize, values: &[i32]) -> HashSet<i32> {
    let mut set = HashSet::with_capacity(initial_size);
    set.extend(values.iter().copied());
    set
}

fn main() -> Result<(), probe_hash::Error> {
    let args = Args::parse();

    println!("=== HashSet demonstration ===\n");

    let mut s1 = build(args.initial_size, &[1, 2, 3, 4]);
    let s2 = build(args.initial_size, &[3, 4, 5, 6]);
    println!("s1 = {:?}", s1);
    println!("s2 = {:?}", s2);
    println!();

    s1.insert(10);
    println!("after s1.insert(10): {:?}", s1);
    s1.remove(&2)?;
    println!("after s1.remove(&2): {:?}", s1);
    println!("s1.discard(&99) removed anything? {}", s1.discard(&99));
    println!();

    println!("3 in s1? {}", s1.contains(&3));
    println!("2 in s1? {}", s1.contains(&2));
    println!();

    println!("union:                {:?}", s1.union(&[&s2]));
    println!("intersection:         {:?}", s1.intersection(&[&s2]));
    println!("difference (s1 - s2): {:?}", s1.difference(&[&s2]));
    println!("symmetric difference: {:?}", s1.symmetric_difference(&[&s2]));
    println!();

    println!("s1 | s2 = {:?}", &s1 | &s2);
    println!("s1 & s2 = {:?}", &s1 & &s2);
    println!("s1 - s2 = {:?}", &s1 - &s2);
    println!("s1 ^ s2 = {:?}", &s1 ^ &s2);
    println!();

    let s3 = build(args.initial_size, &[3, 4]);
    println!("s3 = {:?}", s3);
    println!("s3 subset of s1?      {}", s3.is_subset(&s1));
    println!("s1 superset of s3?    {}", s1.is_superset(&s3));
    println!("s1 and s2 disjoint?   {}", s1.is_disjoint(&s2));
    println!();

    let s4 = s1.copy();
    println!("s4 (copy of s1): {:?}", s4);
    println!("s1 == s4? {}", s1 == s4);
    println!();

    s1.clear();
    println!("s1 after clear: {:?} ({} slots)", s1, s1.capacity());

    Ok(())
}
