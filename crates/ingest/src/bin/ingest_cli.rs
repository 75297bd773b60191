use std::env;
use std::path::Path;

use ingest::{read_stats_file, unit_rows, unit_totals};
use leaderboard_core::UnitFilter;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: ingest_cli <shift_stats_YYYY-MM-DD.json>");
        std::process::exit(2);
    }

    let path = Path::new(&args[1]);
    let record = read_stats_file(path).unwrap_or_else(|err| {
        eprintln!("failed to read {}: {}", path.display(), err);
        std::process::exit(1);
    });

    println!("date {}", record.date);
    println!("total_calls {}", record.total_calls());
    let totals = unit_totals([&record], &UnitFilter::default());
    let rows = unit_rows(&totals);
    if rows.is_empty() {
        eprintln!("no runs recorded");
        std::process::exit(3);
    }
    for row in rows {
        println!(
            "{} calls={} avg_min={:.1} max_min={:.1} after_0000={}",
            row.unit, row.calls, row.avg_min, row.max_min, row.after_0000
        );
    }
}
