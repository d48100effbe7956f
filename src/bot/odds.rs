use rand::Rng;

/* Odds is the chance-outcome engine of the bot.
 * Every game resolves here: the role lottery, farming, roulette and
 * the slot machine. Each draw is a pure function of the RNG handed in
 * by the caller, so tests can replay any outcome with a seeded
 * generator. Payout weights live in const tables, not in the draws.
 */

pub const LOTTERY_CRIT_CHANCE: u32 = 10;
pub const LOTTERY_SUCCESS_CHANCE: u32 = 40;
pub const LOTTERY_CRIT_REWARD: i64 = 1000;
pub const LOTTERY_SUCCESS_REWARD: i64 = 100;
pub const LOTTERY_MISS_PENALTY: i64 = 10;

pub const FARM_REWARD_MIN: i64 = 5;
pub const FARM_REWARD_MAX: i64 = 15;

pub const DAILY_REWARD_MIN: i64 = 100;
pub const DAILY_REWARD_MAX: i64 = 500;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LotteryOutcome {
    Crit,
    Success,
    Miss,
}

// Draws the lottery roll, uniform in [1, 100].
pub fn lottery_roll(rng: &mut impl Rng) -> u32 {
    rng.gen_range(1..=100)
}

pub fn lottery_outcome(roll: u32) -> LotteryOutcome {
    if roll <= LOTTERY_CRIT_CHANCE {
        LotteryOutcome::Crit
    } else if roll <= LOTTERY_SUCCESS_CHANCE {
        LotteryOutcome::Success
    } else {
        LotteryOutcome::Miss
    }
}

// The miss penalty never takes a balance below zero.
pub fn lottery_penalty(balance: i64) -> i64 {
    LOTTERY_MISS_PENALTY.min(balance.max(0))
}

pub fn farm_reward(rng: &mut impl Rng) -> i64 {
    rng.gen_range(FARM_REWARD_MIN..=FARM_REWARD_MAX)
}

// +50% under an active farm booster, floored to whole credits.
pub fn apply_farm_boost(reward: i64) -> i64 {
    reward * 3 / 2
}

pub fn daily_reward(rng: &mut impl Rng) -> i64 {
    rng.gen_range(DAILY_REWARD_MIN..=DAILY_REWARD_MAX)
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RouletteOutcome {
    Win,
    Lose,
    Refund,
    Jackpot,
}

pub type RouletteTable = [(RouletteOutcome, u32)];

/* Roulette odds are configuration: each row is (outcome, weight) and
 * every table sums to 100. The boosted table keeps its two win rows
 * separate on purpose, matching the published odds sheet.
 */
pub const ROULETTE_TABLE_BASE: &RouletteTable = &[
    (RouletteOutcome::Win, 40),
    (RouletteOutcome::Lose, 40),
    (RouletteOutcome::Refund, 20),
];

pub const ROULETTE_TABLE_BOOSTED: &RouletteTable = &[
    (RouletteOutcome::Win, 30),
    (RouletteOutcome::Win, 25),
    (RouletteOutcome::Lose, 20),
    (RouletteOutcome::Jackpot, 5),
    (RouletteOutcome::Refund, 20),
];

fn table_weight(table: &RouletteTable) -> u32 {
    table.iter().map(|(_, weight)| weight).sum()
}

// Maps a roll in [0, total weight) onto the table's outcome.
pub fn roulette_pick(table: &RouletteTable, mut roll: u32) -> RouletteOutcome {
    for (outcome, weight) in table {
        if roll < *weight {
            return *outcome;
        }
        roll -= weight;
    }
    // Unreachable for rolls below the table weight; the last row
    // absorbs anything else.
    table[table.len() - 1].0
}

pub fn roulette_draw(rng: &mut impl Rng, table: &RouletteTable) -> RouletteOutcome {
    let roll = rng.gen_range(0..table_weight(table));
    roulette_pick(table, roll)
}

// Signed balance delta for a resolved spin.
pub fn roulette_delta(outcome: RouletteOutcome, bet: i64) -> i64 {
    match outcome {
        RouletteOutcome::Win => 2 * bet,
        RouletteOutcome::Lose => -bet,
        RouletteOutcome::Refund => 0,
        RouletteOutcome::Jackpot => 5 * bet,
    }
}

/* The slot machine draws 3 independent uniform symbols. The first two
 * alphabet entries are the designated top prizes; everything below
 * them pays the flat triple rate.
 */
pub const SLOT_SYMBOLS: [&str; 7] = ["7️⃣", "💎", "⭐", "🍉", "🍇", "🍋", "🍒"];

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SlotsPrize {
    TopTriple,
    SecondTriple,
    Triple,
    Pair,
    Miss,
}

pub fn slots_spin(rng: &mut impl Rng) -> [usize; 3] {
    [
        rng.gen_range(0..SLOT_SYMBOLS.len()),
        rng.gen_range(0..SLOT_SYMBOLS.len()),
        rng.gen_range(0..SLOT_SYMBOLS.len()),
    ]
}

pub fn slots_prize(reels: [usize; 3]) -> SlotsPrize {
    let [a, b, c] = reels;
    if a == b && b == c {
        match a {
            0 => SlotsPrize::TopTriple,
            1 => SlotsPrize::SecondTriple,
            _ => SlotsPrize::Triple,
        }
    } else if a == b || b == c {
        SlotsPrize::Pair
    } else {
        SlotsPrize::Miss
    }
}

pub fn slots_delta(prize: SlotsPrize, bet: i64) -> i64 {
    match prize {
        SlotsPrize::TopTriple => 10 * bet,
        SlotsPrize::SecondTriple => 5 * bet,
        SlotsPrize::Triple => 3 * bet,
        SlotsPrize::Pair => bet * 3 / 2,
        SlotsPrize::Miss => -bet,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn test_lottery_outcome_boundaries() {
        assert_eq!(lottery_outcome(1), LotteryOutcome::Crit);
        assert_eq!(lottery_outcome(5), LotteryOutcome::Crit);
        assert_eq!(lottery_outcome(10), LotteryOutcome::Crit);
        assert_eq!(lottery_outcome(11), LotteryOutcome::Success);
        assert_eq!(lottery_outcome(40), LotteryOutcome::Success);
        assert_eq!(lottery_outcome(41), LotteryOutcome::Miss);
        assert_eq!(lottery_outcome(100), LotteryOutcome::Miss);
    }

    #[test]
    fn test_lottery_penalty_capped_by_balance() {
        assert_eq!(lottery_penalty(9000), 10);
        assert_eq!(lottery_penalty(10), 10);
        assert_eq!(lottery_penalty(3), 3);
        assert_eq!(lottery_penalty(0), 0);
        assert_eq!(lottery_penalty(-5), 0);
    }

    #[test]
    fn test_lottery_roll_in_range() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        for _ in 0..1000 {
            let roll = lottery_roll(&mut rng);
            assert!((1..=100).contains(&roll));
        }
    }

    #[test]
    fn test_lottery_roll_reproducible() {
        let mut first = Pcg64Mcg::seed_from_u64(42);
        let mut second = Pcg64Mcg::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(lottery_roll(&mut first), lottery_roll(&mut second));
        }
    }

    #[test]
    fn test_farm_reward_range_and_boost() {
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        for _ in 0..1000 {
            let reward = farm_reward(&mut rng);
            assert!((FARM_REWARD_MIN..=FARM_REWARD_MAX).contains(&reward));
        }

        // +50%, floored
        assert_eq!(apply_farm_boost(5), 7);
        assert_eq!(apply_farm_boost(10), 15);
        assert_eq!(apply_farm_boost(15), 22);
    }

    #[test]
    fn test_daily_reward_range() {
        let mut rng = Pcg64Mcg::seed_from_u64(13);
        for _ in 0..1000 {
            let reward = daily_reward(&mut rng);
            assert!((DAILY_REWARD_MIN..=DAILY_REWARD_MAX).contains(&reward));
        }
    }

    #[test]
    fn test_roulette_tables_sum_to_100() {
        assert_eq!(table_weight(ROULETTE_TABLE_BASE), 100);
        assert_eq!(table_weight(ROULETTE_TABLE_BOOSTED), 100);
    }

    #[test]
    fn test_roulette_base_pick_boundaries() {
        assert_eq!(roulette_pick(ROULETTE_TABLE_BASE, 0), RouletteOutcome::Win);
        assert_eq!(roulette_pick(ROULETTE_TABLE_BASE, 39), RouletteOutcome::Win);
        assert_eq!(roulette_pick(ROULETTE_TABLE_BASE, 40), RouletteOutcome::Lose);
        assert_eq!(roulette_pick(ROULETTE_TABLE_BASE, 79), RouletteOutcome::Lose);
        assert_eq!(
            roulette_pick(ROULETTE_TABLE_BASE, 80),
            RouletteOutcome::Refund
        );
        assert_eq!(
            roulette_pick(ROULETTE_TABLE_BASE, 99),
            RouletteOutcome::Refund
        );
    }

    #[test]
    fn test_roulette_boosted_pick_boundaries() {
        // The two win rows collapse to an effective win weight of 55.
        assert_eq!(
            roulette_pick(ROULETTE_TABLE_BOOSTED, 0),
            RouletteOutcome::Win
        );
        assert_eq!(
            roulette_pick(ROULETTE_TABLE_BOOSTED, 54),
            RouletteOutcome::Win
        );
        assert_eq!(
            roulette_pick(ROULETTE_TABLE_BOOSTED, 55),
            RouletteOutcome::Lose
        );
        assert_eq!(
            roulette_pick(ROULETTE_TABLE_BOOSTED, 74),
            RouletteOutcome::Lose
        );
        assert_eq!(
            roulette_pick(ROULETTE_TABLE_BOOSTED, 75),
            RouletteOutcome::Jackpot
        );
        assert_eq!(
            roulette_pick(ROULETTE_TABLE_BOOSTED, 79),
            RouletteOutcome::Jackpot
        );
        assert_eq!(
            roulette_pick(ROULETTE_TABLE_BOOSTED, 80),
            RouletteOutcome::Refund
        );
        assert_eq!(
            roulette_pick(ROULETTE_TABLE_BOOSTED, 99),
            RouletteOutcome::Refund
        );
    }

    #[test]
    fn test_roulette_draw_never_jackpots_without_boost() {
        let mut rng = Pcg64Mcg::seed_from_u64(17);
        for _ in 0..5000 {
            assert_ne!(
                roulette_draw(&mut rng, ROULETTE_TABLE_BASE),
                RouletteOutcome::Jackpot
            );
        }
    }

    #[test]
    fn test_roulette_deltas() {
        assert_eq!(roulette_delta(RouletteOutcome::Win, 100), 200);
        assert_eq!(roulette_delta(RouletteOutcome::Lose, 100), -100);
        assert_eq!(roulette_delta(RouletteOutcome::Refund, 100), 0);
        assert_eq!(roulette_delta(RouletteOutcome::Jackpot, 100), 500);
    }

    #[test]
    fn test_slots_prizes() {
        assert_eq!(slots_prize([0, 0, 0]), SlotsPrize::TopTriple);
        assert_eq!(slots_prize([1, 1, 1]), SlotsPrize::SecondTriple);
        assert_eq!(slots_prize([4, 4, 4]), SlotsPrize::Triple);
        assert_eq!(slots_prize([2, 2, 5]), SlotsPrize::Pair);
        assert_eq!(slots_prize([5, 2, 2]), SlotsPrize::Pair);
        // An outer pair is not adjacent.
        assert_eq!(slots_prize([2, 5, 2]), SlotsPrize::Miss);
        assert_eq!(slots_prize([0, 3, 6]), SlotsPrize::Miss);
    }

    #[test]
    fn test_slots_deltas() {
        assert_eq!(slots_delta(SlotsPrize::TopTriple, 100), 1000);
        assert_eq!(slots_delta(SlotsPrize::SecondTriple, 100), 500);
        assert_eq!(slots_delta(SlotsPrize::Triple, 100), 300);
        assert_eq!(slots_delta(SlotsPrize::Pair, 100), 150);
        assert_eq!(slots_delta(SlotsPrize::Pair, 101), 151);
        assert_eq!(slots_delta(SlotsPrize::Miss, 100), -100);
    }

    #[test]
    fn test_slots_spin_in_range() {
        let mut rng = Pcg64Mcg::seed_from_u64(19);
        for _ in 0..1000 {
            let reels = slots_spin(&mut rng);
            assert!(reels.iter().all(|&reel| reel < SLOT_SYMBOLS.len()));
        }
    }
}
