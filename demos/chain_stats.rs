use clap::Parser;
use probe_table::ProbingTable;
use probe_table::TableConfig;
use probe_table::hasher::DefaultKeyHasher;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "keys", default_value_t = 1000)]
    keys: u64,

    #[arg(short = 's', long = "initial_size", default_value_t = 8)]
    initial_size: usize,

    #[arg(short = 'l', long = "load_factor", default_value_t = 0.7)]
    load_factor: f64,

    /// Delete every n-th key after filling, 0 to keep all.
    #[arg(short = 'd', long = "delete_every", default_value_t = 0)]
    delete_every: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = TableConfig::new()
        .with_initial_size(args.initial_size)
        .with_load_factor(args.load_factor);
    let mut table: ProbingTable<u64, u64, DefaultKeyHasher> =
        ProbingTable::with_config(config, DefaultKeyHasher::default());

    println!(
        "Filling table ({} slots, load factor {}) with {} keys...",
        table.slot_count(),
        table.load_factor(),
        args.keys
    );

    let mut last_size = table.slot_count();
    for key in 0..args.keys {
        table.set(key, key * 2).expect("u64 keys and values are never absent");
        if table.slot_count() != last_size {
            println!(
                "  grew {} -> {} slots at {} entries",
                last_size,
                table.slot_count(),
                table.len()
            );
            last_size = table.slot_count();
        }
    }

    if args.delete_every > 0 {
        for key in (0..args.keys).step_by(args.delete_every as usize) {
            table.delete(&key).expect("key was inserted above");
        }
        println!("Deleted every {}th key, {} remain", args.delete_every, table.len());
    }

    table.chain_stats().print();
}
