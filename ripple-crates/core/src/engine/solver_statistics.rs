use crate::create_statistics_struct;

create_statistics_struct!(
    /// Counters of the propagation engine.
    EngineStatistics {
        /// The number of moves started
        num_moves: u64,
        /// The number of probes evaluated
        num_probes: u64,
        /// The number of commits
        num_commits: u64,
        /// The number of times an invariant was told one of its inputs changed
        num_notifications: u64,
        /// The number of full recomputations of invariants
        num_recomputations: u64,
});
