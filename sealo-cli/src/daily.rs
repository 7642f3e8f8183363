//! Daily command - claim the once-a-day coin prize

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use crate::records::{RecordStore, UserRecord};

/// Outcome of a claim attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DailyClaim {
    /// Prize paid for this streak day
    Paid { prize: u32, streak: u32 },
    /// Already claimed today
    AlreadyClaimed { streak: u32 },
}

/// Coins for the given streak day
pub fn prize_for_streak(streak: u32) -> u32 {
    match streak {
        0 | 1 => 50,
        2 => 75,
        3 => 100,
        4 => 150,
        5 => 200,
        _ => 250,
    }
}

/// Apply today's claim to the record
///
/// A claim on the day after the previous one extends the streak; any
/// larger gap (or a clock that moved backwards) starts over at 1.
pub fn claim_daily_prize(record: &mut UserRecord, today: NaiveDate) -> DailyClaim {
    if record.last_daily_prize == Some(today) {
        return DailyClaim::AlreadyClaimed {
            streak: record.daily_streak,
        };
    }

    let continues = record
        .last_daily_prize
        .and_then(|last| last.succ_opt())
        .is_some_and(|next| next == today);

    record.daily_streak = if continues { record.daily_streak + 1 } else { 1 };
    record.last_daily_prize = Some(today);

    let prize = prize_for_streak(record.daily_streak);
    record.balance += i64::from(prize);

    DailyClaim::Paid {
        prize,
        streak: record.daily_streak,
    }
}

/// Run daily command
pub fn run<S: RecordStore>(store: &mut S) -> Result<()> {
    let today = Local::now().date_naive();

    match claim_daily_prize(store.record_mut(), today) {
        DailyClaim::Paid { prize, streak } => {
            store.commit().context("Failed to save daily prize")?;
            tracing::info!("Daily prize claimed: {} coins, streak {}", prize, streak);
            println!("Day {} streak: +{} coins", streak, prize);
        }
        DailyClaim::AlreadyClaimed { streak } => {
            println!("Already claimed today (streak {}). Come back tomorrow!", streak);
        }
    }

    println!("Balance: {}", store.record().balance);
    Ok(())
}
