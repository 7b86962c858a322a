//! Simulated-event ("ghost") assistant messages.
//!
//! The feed picks a random scenario and avoids repeating the previous
//! pick. The last-choice index is explicit per-process state held behind
//! the shared application state; exact repeat-avoidance is a UX nicety,
//! not a correctness property, and may be relaxed under concurrency.

use rand::Rng;

/// Number of ghost scenarios.
const SCENARIO_COUNT: usize = 15;

/// Build the scenario list personalized with the user's name.
fn ghost_scenarios(name: &str) -> [String; SCENARIO_COUNT] {
    [
        format!("\u{1F4B0} Good news, {name}! A deposit of $4,500 from Sifra Inc. just hit your account. Labeled as: Developer Salary. Added to Income."),
        format!("\u{2708}\u{FE0F} Urgent: {name}, I noticed your Passport expires in Aug 2026. You should renew it now if you plan to travel."),
        format!("\u{1F3E5} Follow-up: {name}, based on your last Lab Results from Dr. House, you need to schedule a check-up next week. Vitamin D is low."),
        "\u{1F4C8} Insight: Your spending on Dining Out is down 12% compared to last month. Great job sticking to the budget!".to_string(),
        "\u{1F514} Reminder: Your Adobe Creative Cloud subscription renewal ($54.99) is coming up on March 2nd.".to_string(),
        "\u{1F6E1}\u{FE0F} Security: I flagged a duplicate charge of $12.50 from Uber. No action needed, just keeping it in your records.".to_string(),
        "\u{1F4B0} Savings: You have reached 80% of your savings goal for the \"Europe Trip\" fund.".to_string(),
        "\u{1F4C4} Tax Watch: That last Amazon purchase was categorized as \"Office Supplies\". Added to your potential tax deductions.".to_string(),
        "\u{1F4C9} Trend: You have spent $0 on Rideshare apps this week. That is a personal record!".to_string(),
        "\u{1F4B3} Card Alert: Your credit utilization on the Chase Sapphire card is currently at 28%. Recommended to keep it under 30%.".to_string(),
        "\u{1F504} Subscription: Detected a price increase in your internet bill from Comcast (+$5.00/mo).".to_string(),
        "\u{1F4CA} Report: Your Weekly Financial Digest is ready in the Files tab.".to_string(),
        "\u{26A1} Utility: Electricity usage projected to be lower this month based on current trends.".to_string(),
        "\u{1F393} Loan: Student loan payment of $250.00 processed successfully.".to_string(),
        "\u{1F4BC} Income: Freelance payment of $800.00 from Upwork has been cleared.".to_string(),
    ]
}

/// Per-process ghost feed state: remembers the last scenario index so
/// consecutive picks differ.
#[derive(Debug, Default)]
pub struct GhostFeed {
    last_index: Option<usize>,
}

impl GhostFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick a scenario with the thread-local RNG.
    pub fn pick(&mut self, name: &str) -> String {
        self.pick_with(&mut rand::thread_rng(), name)
    }

    /// Pick a scenario with a caller-supplied RNG (deterministic tests).
    pub fn pick_with(&mut self, rng: &mut impl Rng, name: &str) -> String {
        let scenarios = ghost_scenarios(name);
        let mut index = rng.gen_range(0..scenarios.len());
        if scenarios.len() > 1 {
            while Some(index) == self.last_index {
                index = rng.gen_range(0..scenarios.len());
            }
        }
        self.last_index = Some(index);
        scenarios[index].clone()
    }
}
