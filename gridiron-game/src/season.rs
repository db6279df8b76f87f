//! Season schedule, counters, and the phase machine that drives them.
//!
//! A season moves `preseason -> regular -> (tiebreaker) -> (playoffs) -> done`,
//! with an optional `awaiting_side_choice` stop between preseason and regular.
//! The career owns the preseason and end-of-season bookkeeping; this module
//! owns everything from the first kickoff to the final whistle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::advantage::Advantage;
use crate::constants::{
    DISTRICT_GAMES, PHASE_LABEL_AWAITING_CHOICE, PHASE_LABEL_CHAMPION, PHASE_LABEL_DONE,
    PHASE_LABEL_PLAYOFFS, PHASE_LABEL_PRESEASON, PHASE_LABEL_REGULAR, PHASE_LABEL_TIEBREAKER,
    REGULAR_SEASON_GAMES, TIEBREAKER_MIN_WINS,
};
use crate::dice::{DicePair, DiceSource};
use crate::error::EngineError;
use crate::game::{Game, GameKind, GameReport, resolve_game};

/// Position of a season in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SeasonPhase {
    #[default]
    Preseason,
    /// Preseason roll split: the first pair was good, the second was not.
    AwaitingSideChoice { first: DicePair, second: DicePair },
    Regular,
    Tiebreaker,
    Playoffs,
    Done,
}

impl SeasonPhase {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Preseason => "preseason",
            Self::AwaitingSideChoice { .. } => "awaiting_side_choice",
            Self::Regular => "regular",
            Self::Tiebreaker => "tiebreaker",
            Self::Playoffs => "playoffs",
            Self::Done => "done",
        }
    }

    /// Presentation label; `champion` only matters once the season is done.
    #[must_use]
    pub const fn label(self, champion: bool) -> &'static str {
        match self {
            Self::Preseason => PHASE_LABEL_PRESEASON,
            Self::AwaitingSideChoice { .. } => PHASE_LABEL_AWAITING_CHOICE,
            Self::Regular => PHASE_LABEL_REGULAR,
            Self::Tiebreaker => PHASE_LABEL_TIEBREAKER,
            Self::Playoffs => PHASE_LABEL_PLAYOFFS,
            Self::Done if champion => PHASE_LABEL_CHAMPION,
            Self::Done => PHASE_LABEL_DONE,
        }
    }

    /// Phases in which a game can be played.
    #[must_use]
    pub const fn has_games(self) -> bool {
        matches!(self, Self::Regular | Self::Tiebreaker | Self::Playoffs)
    }
}

impl fmt::Display for SeasonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One season: ten regular games, an optional tiebreaker, an optional bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub number: u32,
    pub phase: SeasonPhase,
    pub games: Vec<Game>,
    #[serde(default)]
    pub tiebreaker: Option<Game>,
    #[serde(default)]
    pub playoffs: Vec<Game>,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub district_wins: u32,
    #[serde(default)]
    pub district_losses: u32,
    #[serde(default)]
    pub playoff_wins: u32,
    #[serde(default)]
    pub playoff_losses: u32,
    #[serde(default)]
    pub made_playoffs: bool,
    #[serde(default)]
    pub champion: bool,
}

/// Outcome of one advance inside a season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonStep {
    pub report: GameReport,
    /// Routing narration produced after the game (qualification, elimination).
    pub notes: Vec<String>,
    /// The season reached `done` on this step.
    pub finished: bool,
}

impl Season {
    /// Fresh season in preseason with four district slots drawn at random.
    pub fn new<D>(number: u32, dice: &mut D) -> Self
    where
        D: DiceSource + ?Sized,
    {
        let mut slots: Vec<usize> = (0..REGULAR_SEASON_GAMES).collect();
        for i in 0..DISTRICT_GAMES {
            let j = i + dice.below(REGULAR_SEASON_GAMES - i);
            slots.swap(i, j);
        }
        Self::with_district_slots(number, &slots[..DISTRICT_GAMES])
    }

    /// Fresh season with explicit zero-based district slots.
    ///
    /// Out-of-range and duplicate slots are ignored.
    #[must_use]
    pub fn with_district_slots(number: u32, slots: &[usize]) -> Self {
        let games = (0..REGULAR_SEASON_GAMES)
            .zip(1_u8..)
            .map(|(idx, game_number)| Game::regular(game_number, slots.contains(&idx)))
            .collect();
        Self {
            number,
            phase: SeasonPhase::Preseason,
            games,
            tiebreaker: None,
            playoffs: Vec::new(),
            wins: 0,
            losses: 0,
            district_wins: 0,
            district_losses: 0,
            playoff_wins: 0,
            playoff_losses: 0,
            made_playoffs: false,
            champion: false,
        }
    }

    /// Wins from the ten-game regular schedule only.
    #[must_use]
    pub fn regular_wins(&self) -> u32 {
        let wins = self.games.iter().filter(|game| game.is_win()).count();
        u32::try_from(wins).unwrap_or(u32::MAX)
    }

    /// Schedule numbers of the district games, in order.
    #[must_use]
    pub fn district_numbers(&self) -> Vec<u8> {
        self.games
            .iter()
            .filter(|game| game.is_district)
            .map(|game| game.number)
            .collect()
    }

    /// `Game 2, Game 5, ...` listing used in season-start narration.
    #[must_use]
    pub fn district_listing(&self) -> String {
        self.district_numbers()
            .iter()
            .map(|number| format!("Game {number}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Next game the current phase would play, if any.
    #[must_use]
    pub fn next_game(&self) -> Option<&Game> {
        match self.phase {
            SeasonPhase::Regular => self.games.iter().find(|game| !game.played),
            SeasonPhase::Tiebreaker => self.tiebreaker.as_ref().filter(|game| !game.played),
            SeasonPhase::Playoffs => self.playoffs.iter().find(|game| !game.played),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self.phase, SeasonPhase::Done)
    }

    /// Play the next scheduled game and route the season onward.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WrongPhase`] outside the regular, tiebreaker and
    /// playoff phases, and [`EngineError::NoGameRemaining`] when the phase has
    /// nothing left to play.
    pub fn play_next<D>(
        &mut self,
        advantage: Advantage,
        dice: &mut D,
    ) -> Result<SeasonStep, EngineError>
    where
        D: DiceSource + ?Sized,
    {
        let phase = self.phase;
        let game = match phase {
            SeasonPhase::Regular => self.games.iter_mut().find(|game| !game.played),
            SeasonPhase::Tiebreaker => self.tiebreaker.as_mut().filter(|game| !game.played),
            SeasonPhase::Playoffs => self.playoffs.iter_mut().find(|game| !game.played),
            _ => return Err(EngineError::WrongPhase { phase }),
        }
        .ok_or(EngineError::NoGameRemaining { phase })?;

        let report = resolve_game(game, advantage, dice)?;
        self.tally(&report);

        let mut notes = Vec::new();
        match phase {
            SeasonPhase::Regular => {
                if self.games.iter().all(|game| game.played) {
                    self.close_regular_season(&mut notes);
                }
            }
            SeasonPhase::Tiebreaker => self.close_tiebreaker(&report, &mut notes),
            SeasonPhase::Playoffs => self.route_playoffs(&report, &mut notes),
            _ => {}
        }
        log::debug!(
            "season {} {}: {} -> {}",
            self.number,
            report.result.label(),
            phase,
            self.phase
        );

        Ok(SeasonStep {
            report,
            notes,
            finished: self.is_done(),
        })
    }

    fn tally(&mut self, report: &GameReport) {
        let win = report.result.is_win();
        if win {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        if report.is_district {
            if win {
                self.district_wins += 1;
            } else {
                self.district_losses += 1;
            }
        }
        if report.kind.is_bracket() {
            if win {
                self.playoff_wins += 1;
            } else {
                self.playoff_losses += 1;
            }
        }
    }

    fn close_regular_season(&mut self, notes: &mut Vec<String>) {
        notes.push(format!(
            "Regular season complete: {}-{}",
            self.wins, self.losses
        ));
        notes.push(format!(
            "District record: {}-{}",
            self.district_wins, self.district_losses
        ));

        match self.district_wins {
            4 => {
                notes.push("You won the district (4-0) and ADVANCE to playoffs.".to_string());
                self.enter_playoffs();
            }
            3 if self.wins < TIEBREAKER_MIN_WINS => {
                notes.push(
                    "You went 3-1 in district, but total wins < 5, so NO tiebreaker game allowed."
                        .to_string(),
                );
                self.miss_playoffs();
            }
            3 => {
                notes.push(
                    "You went 3-1 in district. You get a DISTRICT TIEBREAKER game to decide playoff spot."
                        .to_string(),
                );
                self.tiebreaker = Some(Game::district_tiebreaker());
                self.phase = SeasonPhase::Tiebreaker;
            }
            _ => {
                notes.push(
                    "You did not win enough district games to advance. No playoffs this season."
                        .to_string(),
                );
                self.miss_playoffs();
            }
        }
    }

    fn close_tiebreaker(&mut self, report: &GameReport, notes: &mut Vec<String>) {
        if report.result.is_win() {
            notes.push("You won the district tiebreaker and ADVANCE to playoffs.".to_string());
            self.enter_playoffs();
        } else {
            notes.push("You lost the district tiebreaker. No playoffs this season.".to_string());
            self.miss_playoffs();
        }
    }

    fn route_playoffs(&mut self, report: &GameReport, notes: &mut Vec<String>) {
        let win = report.result.is_win();
        if report.kind == GameKind::Championship {
            self.champion = win;
            if win {
                notes.push("STATE CHAMPIONS! You won the championship.".to_string());
            } else {
                notes.push("You lost the State Championship.".to_string());
            }
            self.phase = SeasonPhase::Done;
        } else if !win {
            notes.push("Playoff loss. Season ends.".to_string());
            self.champion = false;
            self.phase = SeasonPhase::Done;
        }
    }

    fn enter_playoffs(&mut self) {
        self.made_playoffs = true;
        self.playoffs = Game::bracket();
        self.phase = SeasonPhase::Playoffs;
    }

    fn miss_playoffs(&mut self) {
        self.made_playoffs = false;
        self.phase = SeasonPhase::Done;
    }

    /// Season-complete narration shared by the career's finalization block.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Season {} complete.", self.number),
            format!(
                "Record: {}-{} | District: {}-{}",
                self.wins, self.losses, self.district_wins, self.district_losses
            ),
        ];
        if self.made_playoffs {
            lines.push(format!(
                "Playoffs: {} win(s), {} loss(es)",
                self.playoff_wins, self.playoff_losses
            ));
        }
        lines
    }
}
