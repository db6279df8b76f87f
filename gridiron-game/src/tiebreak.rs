//! Single-die duels that settle a tied final score.
use crate::constants::TIE_BREAK_INCREMENT;
use crate::dice::DiceSource;

/// Scores after the duel, now guaranteed unequal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TieBreak {
    pub user_score: u32,
    pub opponent_score: u32,
    pub rounds: u32,
    pub trace: Vec<String>,
}

/// Roll one die per side until someone rolls higher; the winner gains 3.
///
/// Equal inputs are expected. Unequal inputs return immediately with zero rounds.
pub fn break_tie<D>(dice: &mut D, user_score: u32, opponent_score: u32) -> TieBreak
where
    D: DiceSource + ?Sized,
{
    let mut user = user_score;
    let mut opponent = opponent_score;
    let mut rounds = 0;
    let mut trace = Vec::new();

    while user == opponent {
        rounds += 1;
        let u = dice.roll_die();
        let o = dice.roll_die();
        trace.push(format!(
            "TIEBREAKER #{rounds}: You roll {u}, Opponent rolls {o}"
        ));
        match u.cmp(&o) {
            std::cmp::Ordering::Greater => {
                user += TIE_BREAK_INCREMENT;
                trace.push(format!(
                    "You win tiebreaker (+{TIE_BREAK_INCREMENT}). New score: You {user} - Opp {opponent}"
                ));
            }
            std::cmp::Ordering::Less => {
                opponent += TIE_BREAK_INCREMENT;
                trace.push(format!(
                    "Opponent wins tiebreaker (+{TIE_BREAK_INCREMENT}). New score: You {user} - Opp {opponent}"
                ));
            }
            std::cmp::Ordering::Equal => {
                trace.push("Tiebreaker tied again. Rolling again...".to_string());
            }
        }
    }

    TieBreak {
        user_score: user,
        opponent_score: opponent,
        rounds,
        trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{ScriptedDice, SeededDice};

    #[test]
    fn repeats_until_a_side_rolls_higher() {
        let mut dice = ScriptedDice::new([3, 3, 2, 2, 1, 5]);
        let result = break_tie(&mut dice, 17, 17);
        assert_eq!(result.rounds, 3);
        assert_eq!(result.user_score, 17);
        assert_eq!(result.opponent_score, 20);
        assert_eq!(result.trace[0], "TIEBREAKER #1: You roll 3, Opponent rolls 3");
        assert_eq!(
            result.trace.last().unwrap(),
            "Opponent wins tiebreaker (+3). New score: You 17 - Opp 20"
        );
    }

    #[test]
    fn unequal_scores_skip_the_duel() {
        let mut dice = ScriptedDice::new([]);
        let result = break_tie(&mut dice, 20, 13);
        assert_eq!(result.rounds, 0);
        assert!(result.trace.is_empty());
    }

    #[test]
    fn always_terminates_with_three_point_margin() {
        let mut dice = SeededDice::from_seed(77);
        for base in 0..1_000_u32 {
            let result = break_tie(&mut dice, base, base);
            assert_ne!(result.user_score, result.opponent_score);
            assert_eq!(result.user_score.abs_diff(result.opponent_score), 3);
            assert_eq!(result.user_score.max(result.opponent_score), base + 3);
            assert!(result.rounds < 200, "duel should end well under the ceiling");
        }
    }
}
