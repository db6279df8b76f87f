//! Fixed tables and thresholds shared by the engine.

/// Faces on every die the engine rolls.
pub const DIE_FACES: u8 = 6;

/// Regular-season games per schedule.
pub const REGULAR_SEASON_GAMES: usize = 10;
/// Regular-season slots marked as district games.
pub const DISTRICT_GAMES: usize = 4;
/// Games in the playoff bracket, championship included.
pub const PLAYOFF_BRACKET_GAMES: usize = 4;

/// Minimum total wins a 3-1 district team needs to earn the tiebreaker game.
pub const TIEBREAKER_MIN_WINS: u32 = 5;

/// Points awarded to the winner of a single tie-break duel.
pub const TIE_BREAK_INCREMENT: u32 = 3;

/// Checking-die threshold used for pair sums of 2 and 3.
pub const CHECK_DIE_THRESHOLD: u8 = 4;
/// Sum-of-2 payouts: `(check >= 4, check < 4)`.
pub const SUM_TWO_POINTS: (u32, u32) = (3, 0);
/// Sum-of-3 payouts: `(check >= 4, check < 4)`.
pub const SUM_THREE_POINTS: (u32, u32) = (12, 6);

/// Base points for pair sums 4 through 12, indexed by `sum - 4`.
pub const BASE_POINTS_TABLE: [u32; 9] = [13, 14, 16, 17, 20, 24, 27, 28, 30];

/// Both preseason dice must meet this face for a "good" roll.
pub const PRESEASON_GOOD_FACE: u8 = 5;

/// Playoff wins that keep held advantages without a title.
pub const RETAIN_PLAYOFF_WINS: u32 = 2;
/// Season wins (all games) that keep held advantages without a title.
pub const RETAIN_SEASON_WINS: u32 = 8;

/// Consecutive seasons without playoffs that end a career.
pub const FIRING_STREAK: u32 = 5;

/// Storage key for the single saved career.
pub const STORAGE_KEY: &str = "hsfc_v1_save";
/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Fallback coach label when no name was supplied.
pub const DEFAULT_COACH_LABEL: &str = "Coach";

pub const PHASE_LABEL_NO_SEASON: &str = "No season";
pub const PHASE_LABEL_PRESEASON: &str = "Preseason";
pub const PHASE_LABEL_AWAITING_CHOICE: &str = "Awaiting Side Choice";
pub const PHASE_LABEL_REGULAR: &str = "Regular Season";
pub const PHASE_LABEL_TIEBREAKER: &str = "District Tiebreaker";
pub const PHASE_LABEL_PLAYOFFS: &str = "Playoffs";
pub const PHASE_LABEL_DONE: &str = "Season Complete";
pub const PHASE_LABEL_CHAMPION: &str = "Season Complete (Champion)";

pub const ACTION_PLAY_NEXT: &str = "Play Next Game";
pub const ACTION_NEXT_SEASON: &str = "Start Next Season";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_table_covers_sums_four_through_twelve() {
        assert_eq!(BASE_POINTS_TABLE.len(), 12 - 4 + 1);
        assert!(BASE_POINTS_TABLE.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn schedule_constants_are_consistent() {
        assert!(DISTRICT_GAMES < REGULAR_SEASON_GAMES);
        assert_eq!(PLAYOFF_BRACKET_GAMES, 4);
    }
}
