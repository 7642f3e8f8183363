//! Records command - show the stored user record

use anyhow::Result;
use clap::Args;

use crate::play::format_time;
use crate::records::{RecordStore, UserRecord};

#[derive(Args)]
pub struct RecordsArgs {
    /// Output the raw record as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run<S: RecordStore>(args: RecordsArgs, store: &S) -> Result<()> {
    let record = store.record();
    if args.json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        print!("{}", render(record));
    }
    Ok(())
}

fn render(record: &UserRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("Balance:      {}\n", record.balance));
    out.push_str(&format!("Daily streak: {}\n", record.daily_streak));

    let last = record
        .last_daily_prize
        .map_or_else(|| "never".to_string(), |d| d.to_string());
    out.push_str(&format!("Last prize:   {}\n", last));

    if let Some(shape) = record.preferred_shape {
        out.push_str(&format!("Board:        {}\n", shape));
    }

    if record.best_times.is_empty() {
        out.push_str("Best times:   none yet\n");
    } else {
        out.push_str("Best times:\n");
        for (board, time) in &record.best_times {
            out.push_str(&format!("  {:<12} {}\n", board, format_time(*time)));
        }
    }
    out
}
