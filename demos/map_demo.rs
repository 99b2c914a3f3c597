use clap::Parser;
use probe_hash::HashMap;

#[derive(Parser, Debug)]
struct Args {
    /// Number of slots each map starts with.
    #[arg(short = 's', long = "initial_size", default_value_t = 8)]
    initial_size: usize,
}

fn main() -> Result<(), probe_hash::Error> {
    let args = Args::parse();

    println!("=== HashMap demonstration ===\n");

    let mut d1: HashMap<&str, i32> = HashMap::with_capacity(args.initial_size);
    d1.update([("a", 1), ("b", 2), ("c", 3)]);
    let mut d2: HashMap<&str, i32> = HashMap::with_capacity(args.initial_size);
    d2.update([("b", 20), ("d", 4)]);
    println!("d1 = {:?}", d1);
    println!("d2 = {:?}", d2);
    println!();

    d1.insert("x", 99);
    println!("after d1.insert(\"x\", 99): {:?}", d1);
    d1[&"b"] = 200;
    println!("after d1[\"b\"] = 200:      {:?}", d1);
    println!();

    println!("d1[\"a\"] = {}", d1[&"a"]);
    println!("\"c\" in d1? {}", d1.contains_key(&"c"));
    println!("\"z\" in d1? {}", d1.contains_key(&"z"));
    println!("d1.get_or(\"z\", -1) = {}", d1.get_or(&"z", &-1));
    println!();

    println!("keys:   {:?}", d1.keys().collect::<Vec<_>>());
    println!("values: {:?}", d1.values().collect::<Vec<_>>());
    println!("items:  {:?}", d1.iter().collect::<Vec<_>>());
    println!();

    d1.discard(&"x");
    println!("after d1.discard(\"x\"): {:?}", d1);
    let removed = d1.remove(&"a")?;
    println!("after d1.remove(\"a\") -> {}: {:?}", removed, d1);
    println!();

    d1.merge(&d2);
    println!("after d1.merge(&d2): {:?}", d1);
    println!();

    let d3 = d1.copy();
    println!("d3 (copy of d1): {:?}", d3);
    println!("d1 == d3? {}", d1 == d3);
    println!();

    d1.clear();
    println!("d1 after clear: {:?} ({} slots)", d1, d1.capacity());

    Ok(())
}
