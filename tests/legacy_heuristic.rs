//! Coverage and no-overlap checks for the greedy legacy heuristic.

use airgrid::catalog::Program;
use airgrid::heuristic;
use airgrid::precompute::build_precomputed;
use chrono::NaiveDate;
use proptest::prelude::*;

fn arbitrary_program(seed: u32) -> Program {
    let genres = ["Film", "Série", "Documentaire", "Magazine", "Divertissement", "Jeunesse"];
    Program {
        id: format!("p{seed}"),
        title: format!("Program {seed}"),
        genre: genres[seed as usize % genres.len()].to_string(),
        subgenre: String::new(),
        duration_minutes: 15 + (seed % 8) * 15,
        cost: 100 + seed as i64 * 37,
        base_audience: 50_000 + seed as i64 * 1_000,
        origin: "France".to_string(),
        year: 2022,
        age_rating: String::new(),
        rights_start: None,
        rights_end: None,
        in_production: false,
        last_broadcast_date: None,
        min_rerun_days: None,
        season: None,
        episode: None,
        total_episodes: None,
        max_episodes_per_week: None,
        usual_day: None,
        usual_time: None,
        previous_episode: None,
        is_new: false,
        is_exclusive: false,
        independent: false,
        first_broadcast: false,
        health_magazine: false,
        preferred_slots: Vec::new(),
        forbidden_slots: Vec::new(),
        compatible_genres: Vec::new(),
        incompatible_genres: Vec::new(),
        fixed_time: None,
        fixed_days: Vec::new(),
        target_audience: Vec::new(),
    }
}

proptest! {
    #[test]
    fn legacy_heuristic_never_double_books_a_slot(count in 5u32..60) {
        let programs: Vec<Program> = (0..count).map(arbitrary_program).collect();
        let pre = build_precomputed(programs, NaiveDate::from_ymd_opt(2026, 8, 3).unwrap()).unwrap();
        let result = heuristic::run(&pre);

        let mut by_day: std::collections::HashMap<usize, Vec<(u32, u32)>> = std::collections::HashMap::new();
        for &((day, slot), program_idx) in &result.starts {
            by_day.entry(day).or_default().push((slot, slot + pre.duration_slots[program_idx]));
        }
        for spans in by_day.values_mut() {
            spans.sort();
            for pair in spans.windows(2) {
                prop_assert!(pair[0].1 <= pair[1].0);
            }
        }
    }
}
