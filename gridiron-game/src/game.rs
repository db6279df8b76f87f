//! Scheduled contests and the resolver that plays them.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::advantage::Advantage;
use crate::constants::PLAYOFF_BRACKET_GAMES;
use crate::dice::DiceSource;
use crate::error::EngineError;
use crate::score::{ScoreContext, resolve_team_score};
use crate::tiebreak::break_tie;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    Regular,
    DistrictTiebreaker,
    PlayoffRound1,
    PlayoffRound2,
    PlayoffRound3,
    Championship,
}

impl GameKind {
    /// Bracket games in play order.
    pub const BRACKET: [Self; PLAYOFF_BRACKET_GAMES] = [
        Self::PlayoffRound1,
        Self::PlayoffRound2,
        Self::PlayoffRound3,
        Self::Championship,
    ];

    #[must_use]
    pub const fn is_bracket(self) -> bool {
        matches!(
            self,
            Self::PlayoffRound1 | Self::PlayoffRound2 | Self::PlayoffRound3 | Self::Championship
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Win,
    Loss,
}

impl GameResult {
    #[must_use]
    pub const fn is_win(self) -> bool {
        matches!(self, Self::Win)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Win => "WIN",
            Self::Loss => "LOSS",
        }
    }
}

/// One scheduled contest. Mutated exactly once, when played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub kind: GameKind,
    /// Schedule slot (1-10) for regular games, round (1-4) for bracket games.
    pub number: u8,
    #[serde(default)]
    pub is_district: bool,
    #[serde(default)]
    pub played: bool,
    #[serde(default)]
    pub result: Option<GameResult>,
    #[serde(default)]
    pub user_score: Option<u32>,
    #[serde(default)]
    pub opponent_score: Option<u32>,
}

impl Game {
    #[must_use]
    pub const fn regular(number: u8, is_district: bool) -> Self {
        Self::unplayed(GameKind::Regular, number, is_district)
    }

    #[must_use]
    pub const fn district_tiebreaker() -> Self {
        Self::unplayed(GameKind::DistrictTiebreaker, 1, false)
    }

    /// Fresh four-game bracket ending in the championship.
    #[must_use]
    pub fn bracket() -> Vec<Self> {
        GameKind::BRACKET
            .iter()
            .zip(1_u8..)
            .map(|(&kind, round)| Self::unplayed(kind, round, false))
            .collect()
    }

    const fn unplayed(kind: GameKind, number: u8, is_district: bool) -> Self {
        Self {
            kind,
            number,
            is_district,
            played: false,
            result: None,
            user_score: None,
            opponent_score: None,
        }
    }

    #[must_use]
    pub fn is_win(&self) -> bool {
        self.result.is_some_and(GameResult::is_win)
    }

    /// Display name used in narration and views.
    #[must_use]
    pub fn label(&self) -> String {
        match self.kind {
            GameKind::Regular => format!("REG SEASON Game {}", self.number),
            GameKind::DistrictTiebreaker => "District Tiebreaker".to_string(),
            GameKind::PlayoffRound1 | GameKind::PlayoffRound2 | GameKind::PlayoffRound3 => {
                format!("Playoff Game {}", self.number)
            }
            GameKind::Championship => "State Championship".to_string(),
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())?;
        if self.is_district {
            f.write_str(" (District)")?;
        }
        Ok(())
    }
}

/// Everything that happened while one game was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReport {
    pub kind: GameKind,
    pub number: u8,
    pub is_district: bool,
    pub user_score: u32,
    pub opponent_score: u32,
    pub result: GameResult,
    pub tie_break_rounds: u32,
    pub trace: Vec<String>,
}

/// Play `game` under the career's current advantage and record the result.
///
/// # Errors
///
/// Returns [`EngineError::GameAlreadyPlayed`] when `game` was resolved earlier.
pub fn resolve_game<D>(
    game: &mut Game,
    advantage: Advantage,
    dice: &mut D,
) -> Result<GameReport, EngineError>
where
    D: DiceSource + ?Sized,
{
    if game.played {
        return Err(EngineError::GameAlreadyPlayed {
            label: game.label(),
        });
    }

    let mut trace = vec![game.to_string()];
    let user = resolve_team_score(dice, ScoreContext::user(advantage.offense));
    let opponent = resolve_team_score(dice, ScoreContext::opponent(advantage.defense));
    trace.extend(user.trace.iter().map(|line| format!("  {line}")));
    trace.extend(opponent.trace.iter().map(|line| format!("  {line}")));

    let mut user_score = user.score;
    let mut opponent_score = opponent.score;
    let mut tie_break_rounds = 0;
    if user_score == opponent_score {
        trace.push(format!(
            "Score tied at {user_score}-{opponent_score}. Settling with one-die tiebreaker (+3)."
        ));
        let tie = break_tie(dice, user_score, opponent_score);
        user_score = tie.user_score;
        opponent_score = tie.opponent_score;
        tie_break_rounds = tie.rounds;
        trace.extend(tie.trace);
    }

    let result = if user_score > opponent_score {
        GameResult::Win
    } else {
        GameResult::Loss
    };
    trace.push(format!(
        "FINAL: You {user_score} - Opponent {opponent_score}  => {}",
        result.label()
    ));

    game.played = true;
    game.result = Some(result);
    game.user_score = Some(user_score);
    game.opponent_score = Some(opponent_score);

    Ok(GameReport {
        kind: game.kind,
        number: game.number,
        is_district: game.is_district,
        user_score,
        opponent_score,
        result,
        tie_break_rounds,
        trace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{ScriptedDice, SeededDice};

    #[test]
    fn labels_follow_schedule_names() {
        assert_eq!(Game::regular(3, true).to_string(), "REG SEASON Game 3 (District)");
        assert_eq!(Game::district_tiebreaker().label(), "District Tiebreaker");
        let bracket = Game::bracket();
        assert_eq!(bracket.len(), PLAYOFF_BRACKET_GAMES);
        assert_eq!(bracket[0].label(), "Playoff Game 1");
        assert_eq!(bracket[2].label(), "Playoff Game 3");
        assert_eq!(bracket[3].kind, GameKind::Championship);
        assert_eq!(bracket[3].label(), "State Championship");
        assert!(bracket.iter().all(|game| !game.played && game.kind.is_bracket()));
    }

    #[test]
    fn higher_user_score_wins() {
        // You: 5+5=10 -> 27 + 4; Opponent: 2+2=4 -> 13 + 1
        let mut dice = ScriptedDice::new([5, 5, 4, 2, 2, 1]);
        let mut game = Game::regular(1, false);
        let report = resolve_game(&mut game, Advantage::none(), &mut dice).unwrap();
        assert_eq!(report.result, GameResult::Win);
        assert_eq!((report.user_score, report.opponent_score), (31, 14));
        assert!(game.played);
        assert_eq!(game.user_score, Some(31));
        assert!(report.trace.last().unwrap().ends_with("=> WIN"));
    }

    #[test]
    fn defense_advantage_blocks_opponent_bonus() {
        // You: 1+3=4 -> 13 + 2; Opponent: 3+3=6 -> 16, no extras.
        let mut dice = ScriptedDice::new([1, 3, 2, 3, 3]);
        let mut game = Game::regular(2, true);
        let advantage = Advantage {
            offense: false,
            defense: true,
        };
        let report = resolve_game(&mut game, advantage, &mut dice).unwrap();
        assert_eq!(report.opponent_score, 16);
        assert_eq!(report.user_score, 15);
        assert_eq!(report.result, GameResult::Loss);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn tied_scores_go_to_the_duel() {
        // Both: 2+2=4 -> 13 + 1 = 14. Duel: 4 vs 2.
        let mut dice = ScriptedDice::new([2, 2, 1, 2, 2, 1, 4, 2]);
        let mut game = Game::district_tiebreaker();
        let report = resolve_game(&mut game, Advantage::none(), &mut dice).unwrap();
        assert_eq!(report.tie_break_rounds, 1);
        assert_eq!((report.user_score, report.opponent_score), (17, 14));
        assert!(report.trace.iter().any(|line| line.starts_with("Score tied at 14-14")));
    }

    #[test]
    fn replaying_a_game_is_rejected() {
        let mut dice = SeededDice::from_seed(5);
        let mut game = Game::regular(4, false);
        resolve_game(&mut game, Advantage::none(), &mut dice).unwrap();
        let before = game.clone();
        let err = resolve_game(&mut game, Advantage::none(), &mut dice).unwrap_err();
        assert!(matches!(err, EngineError::GameAlreadyPlayed { .. }));
        assert_eq!(game, before);
    }

    #[test]
    fn resolved_games_never_tie() {
        let mut dice = SeededDice::from_seed(11);
        for _ in 0..2_000 {
            let mut game = Game::regular(1, false);
            let report = resolve_game(&mut game, Advantage::both(), &mut dice).unwrap();
            assert_ne!(report.user_score, report.opponent_score);
            assert_eq!(report.result.is_win(), report.user_score > report.opponent_score);
        }
    }
}
