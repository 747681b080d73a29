/// What happened during a single round of annealing. Schedules decide on their next temperature
/// based on these numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RoundStatistics {
    /// The temperature at which the round was run
    pub temperature: f64,
    /// The number of moves which were probed
    pub attempted_moves: u64,
    /// The number of moves which were committed
    pub accepted_moves: u64,
    /// The number of committed moves which lowered the cost
    pub improving_moves: u64,
    /// The number of probed moves which would have raised the cost
    pub uphill_attempted_moves: u64,
    /// The number of committed moves which raised the cost
    pub uphill_accepted_moves: u64,
    /// Whether the best cost seen since the annealer started was improved in this round
    pub improved_best: bool,
}

impl RoundStatistics {
    pub fn acceptance_ratio(&self) -> f64 {
        ratio(self.accepted_moves, self.attempted_moves).unwrap_or(0.0)
    }

    /// The share of uphill moves which were accepted. A round without uphill moves counts as
    /// having accepted all of them.
    pub fn uphill_acceptance_ratio(&self) -> f64 {
        ratio(self.uphill_accepted_moves, self.uphill_attempted_moves).unwrap_or(1.0)
    }
}

fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}
