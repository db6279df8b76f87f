use gridiron_game::constants::REGULAR_SEASON_GAMES;
use gridiron_game::dice::{DiceSource, SeededDice};
use gridiron_game::score::{BasePoints, base_points};
use gridiron_game::{PreseasonVerdict, ScoreContext, Season, resolve_team_score, roll_preseason};

const SAMPLE_SIZE: usize = 20_000;
const TOLERANCE: f64 = 0.02;

fn rate(count: usize) -> f64 {
    f64::from(u32::try_from(count).expect("count fits"))
        / f64::from(u32::try_from(SAMPLE_SIZE).expect("sample size fits"))
}

#[test]
fn die_faces_are_uniform() {
    let mut dice = SeededDice::from_seed(0xD1CE);
    let mut counts = [0usize; 6];
    for _ in 0..SAMPLE_SIZE {
        counts[usize::from(dice.roll_die() - 1)] += 1;
    }
    for (face, &count) in counts.iter().enumerate() {
        assert!(
            (rate(count) - 1.0 / 6.0).abs() <= TOLERANCE,
            "face {} drifted: {:.4}",
            face + 1,
            rate(count)
        );
    }
}

#[test]
fn exploding_die_mean_tracks_expectation() {
    // E = 3.5 + E/6, so E = 4.2.
    let mut dice = SeededDice::from_seed(0xB00);
    let mut total = 0u32;
    let mut longest = 0usize;
    for _ in 0..SAMPLE_SIZE {
        let roll = dice.exploding_roll();
        total += roll.total();
        longest = longest.max(roll.chain().len());
    }
    let mean = f64::from(total) / f64::from(u32::try_from(SAMPLE_SIZE).expect("fits"));
    assert!((mean - 4.2).abs() < 0.1, "exploding mean drifted: {mean:.3}");
    assert!(longest > 1, "some rolls should explode");
}

#[test]
fn preseason_verdicts_follow_good_roll_odds() {
    // Good roll: both dice >= 5, probability 4/36.
    let mut dice = SeededDice::from_seed(0x5EA5);
    let mut none = 0usize;
    let mut both = 0usize;
    let mut choose = 0usize;
    for _ in 0..SAMPLE_SIZE {
        match roll_preseason(&mut dice).verdict {
            PreseasonVerdict::NoAdvantage => none += 1,
            PreseasonVerdict::BothSides => both += 1,
            PreseasonVerdict::ChooseSide => choose += 1,
        }
    }
    let good = 1.0 / 9.0;
    assert!((rate(none) - (1.0 - good)).abs() <= TOLERANCE);
    assert!((rate(both) - good * good).abs() <= TOLERANCE);
    assert!((rate(choose) - good * (1.0 - good)).abs() <= TOLERANCE);
}

#[test]
fn district_slots_are_uniform_across_seasons() {
    let mut dice = SeededDice::from_seed(0xD157);
    let mut hits = [0usize; REGULAR_SEASON_GAMES];
    for number in 0..SAMPLE_SIZE {
        let season = Season::new(u32::try_from(number).expect("fits"), &mut dice);
        for game in season.games.iter().filter(|game| game.is_district) {
            hits[usize::from(game.number - 1)] += 1;
        }
    }
    for (slot, &count) in hits.iter().enumerate() {
        assert!(
            (rate(count) - 0.4).abs() <= TOLERANCE,
            "slot {} drifted: {:.4}",
            slot + 1,
            rate(count)
        );
    }
}

#[test]
fn offense_advantage_always_rolls_two_bonus_dice_on_table_sums() {
    let mut dice = SeededDice::from_seed(0x0FF5);
    for _ in 0..SAMPLE_SIZE {
        let score = resolve_team_score(&mut dice, ScoreContext::user(true));
        match base_points(score.pair.sum) {
            BasePoints::Check { high, low } => {
                assert!(score.bonus_rolls.is_empty());
                assert!(score.score == high || score.score == low);
            }
            BasePoints::Table(points) => {
                assert_eq!(score.bonus_rolls.len(), 2);
                assert_eq!(score.score, points + score.bonus_points());
            }
        }
    }
}

#[test]
fn defense_advantage_pins_opponent_to_table() {
    let mut dice = SeededDice::from_seed(0xDEF);
    for _ in 0..SAMPLE_SIZE {
        let score = resolve_team_score(&mut dice, ScoreContext::opponent(true));
        assert!(score.bonus_rolls.is_empty());
        match base_points(score.pair.sum) {
            BasePoints::Table(points) => assert_eq!(score.score, points),
            BasePoints::Check { high, low } => {
                assert!(score.score == high || score.score == low);
            }
        }
    }
}
