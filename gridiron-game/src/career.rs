//! Career progression: season rollover, the side-choice resume point, and
//! end-of-season bookkeeping (playoff drought, firing, advantage retention).
//!
//! [`CareerState`] is the single owned aggregate. Every mutation goes through
//! one of its operations; dice are passed in so the same career can be driven
//! by a seeded stream or a test script.

use serde::{Deserialize, Serialize};

use crate::advantage::{
    Advantage, PreseasonVerdict, RetentionDecision, RetentionInput, Side, evaluate_retention,
    grant_with_note, roll_preseason,
};
use crate::config::CareerConfig;
use crate::constants::{DEFAULT_COACH_LABEL, FIRING_STREAK};
use crate::dice::DiceSource;
use crate::error::EngineError;
use crate::game::GameReport;
use crate::narration::NarrationLog;
use crate::season::{Season, SeasonPhase};

/// Everything that persists between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CareerState {
    #[serde(default)]
    pub coach_name: String,
    /// Side picked for queued gains when nobody is asked.
    #[serde(default)]
    pub default_side: Side,
    #[serde(default)]
    pub advantage: Advantage,
    /// Granted automatically when the next season opens.
    #[serde(default)]
    pub pending_gain: Option<Side>,
    #[serde(default)]
    pub seasons_without_playoffs: u32,
    #[serde(default)]
    pub fired: bool,
    /// Number of the most recently opened season; 0 before the first.
    #[serde(default)]
    pub season_index: u32,
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default)]
    pub narration: NarrationLog,
}

/// What a single `advance` request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// A side choice is still open; nothing changed.
    AwaitingSideChoice,
    /// The preseason roll ran for a season that was parked in preseason.
    PreseasonRolled,
    /// A new season was opened.
    SeasonStarted { season: u32 },
    /// One game was played; `close` is set when it ended the season.
    GamePlayed {
        report: GameReport,
        close: Option<SeasonClose>,
    },
}

/// End-of-season bookkeeping result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonClose {
    pub season: u32,
    pub made_playoffs: bool,
    pub champion: bool,
    pub seasons_without_playoffs: u32,
    /// `None` when the coach was fired; nothing carries forward then.
    pub retention: Option<RetentionDecision>,
    pub fired: bool,
}

impl CareerState {
    /// Career with no season opened yet.
    #[must_use]
    pub fn new(config: &CareerConfig) -> Self {
        Self {
            coach_name: config.coach_name.trim().to_string(),
            default_side: config.default_side,
            ..Self::default()
        }
    }

    /// Fresh career with season 1 already opened.
    pub fn start<D>(config: &CareerConfig, dice: &mut D) -> Self
    where
        D: DiceSource + ?Sized,
    {
        let mut career = Self::new(config);
        career.narration.push_block([
            format!("NEW CAREER started for {}.", career.coach_label()),
            "Goal: Win state championships and build a dynasty.".to_string(),
        ]);
        career.open_season(dice);
        career
    }

    /// Throw away everything, including the log, and start over.
    pub fn start_new_career<D>(&mut self, config: &CareerConfig, dice: &mut D)
    where
        D: DiceSource + ?Sized,
    {
        log::debug!("discarding career at season {}", self.season_index);
        *self = Self::start(config, dice);
    }

    /// Coach name, or the generic label when none was given.
    #[must_use]
    pub fn coach_label(&self) -> &str {
        if self.coach_name.is_empty() {
            DEFAULT_COACH_LABEL
        } else {
            &self.coach_name
        }
    }

    pub fn set_coach_name(&mut self, name: &str) {
        self.coach_name = name.trim().to_string();
    }

    pub fn set_default_side(&mut self, side: Side) {
        self.default_side = side;
    }

    /// Empty the narration log on an explicit request.
    pub fn clear_log(&mut self) {
        self.narration.clear();
    }

    #[must_use]
    pub const fn narration(&self) -> &NarrationLog {
        &self.narration
    }

    #[must_use]
    pub fn phase(&self) -> Option<SeasonPhase> {
        self.season.as_ref().map(|season| season.phase)
    }

    #[must_use]
    pub fn awaiting_side_choice(&self) -> bool {
        matches!(self.phase(), Some(SeasonPhase::AwaitingSideChoice { .. }))
    }

    /// Open the next season, if the career still allows one.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CareerOver`] once the coach has been fired.
    pub fn begin_season<D>(&mut self, dice: &mut D) -> Result<u32, EngineError>
    where
        D: DiceSource + ?Sized,
    {
        if self.fired {
            return Err(EngineError::CareerOver);
        }
        self.open_season(dice);
        Ok(self.season_index)
    }

    /// Handle one "next" request from the host.
    ///
    /// Plays the next game, or opens the next season once the current one is
    /// done. While a side choice is open the request is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CareerOver`] after a firing and
    /// [`EngineError::NoSeason`] before the first season is opened.
    pub fn advance<D>(&mut self, dice: &mut D) -> Result<AdvanceOutcome, EngineError>
    where
        D: DiceSource + ?Sized,
    {
        if self.fired {
            return Err(EngineError::CareerOver);
        }
        let season = self.season.as_mut().ok_or(EngineError::NoSeason)?;
        let phase = season.phase;

        match phase {
            SeasonPhase::AwaitingSideChoice { .. } => Ok(AdvanceOutcome::AwaitingSideChoice),
            SeasonPhase::Preseason => {
                run_preseason(season, &mut self.advantage, &mut self.narration, dice);
                Ok(AdvanceOutcome::PreseasonRolled)
            }
            SeasonPhase::Done => {
                self.open_season(dice);
                Ok(AdvanceOutcome::SeasonStarted {
                    season: self.season_index,
                })
            }
            SeasonPhase::Regular | SeasonPhase::Tiebreaker | SeasonPhase::Playoffs => {
                let step = season.play_next(self.advantage, dice)?;
                let mut lines = step.report.trace.clone();
                lines.extend(step.notes);
                self.narration.push_block(lines);
                let close = if step.finished {
                    Some(self.finalize_season()?)
                } else {
                    None
                };
                Ok(AdvanceOutcome::GamePlayed {
                    report: step.report,
                    close,
                })
            }
        }
    }

    /// Resume a suspended preseason with the coach's pick.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoPendingChoice`] unless the season is waiting on
    /// a side choice.
    pub fn choose_side(&mut self, side: Side) -> Result<(), EngineError> {
        if self.fired {
            return Err(EngineError::CareerOver);
        }
        let season = self.season.as_mut().ok_or(EngineError::NoSeason)?;
        if !matches!(season.phase, SeasonPhase::AwaitingSideChoice { .. }) {
            return Err(EngineError::NoPendingChoice);
        }
        let note = grant_with_note(&mut self.advantage, side, "Preseason choice");
        season.phase = SeasonPhase::Regular;
        self.narration.push_block([note]);
        log::debug!("season {} resumed with {side}", season.number);
        Ok(())
    }

    /// Replay the current season from scratch, keeping current advantages.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoSeason`] with nothing to restart,
    /// [`EngineError::CareerOver`] after a firing, and
    /// [`EngineError::WrongPhase`] once the season has been finalized.
    pub fn restart_season<D>(&mut self, dice: &mut D) -> Result<(), EngineError>
    where
        D: DiceSource + ?Sized,
    {
        if self.fired {
            return Err(EngineError::CareerOver);
        }
        let current = self.season.as_ref().ok_or(EngineError::NoSeason)?;
        if current.is_done() {
            return Err(EngineError::WrongPhase {
                phase: current.phase,
            });
        }

        let number = current.number;
        let mut season = Season::new(number, dice);
        if self.advantage.any() {
            season.phase = SeasonPhase::Regular;
            self.narration.push_block([
                format!(
                    "Season {number} restarted. Advantages kept: {}",
                    self.advantage.label()
                ),
                format!("District games: {}", season.district_listing()),
            ]);
            self.season = Some(season);
        } else {
            self.narration.push_block([
                format!("Season {number} restarted. No advantages. Rolling preseason..."),
                format!("District games: {}", season.district_listing()),
            ]);
            let season = self.season.insert(season);
            run_preseason(season, &mut self.advantage, &mut self.narration, dice);
        }
        log::debug!("season {number} restarted");
        Ok(())
    }

    fn open_season<D>(&mut self, dice: &mut D)
    where
        D: DiceSource + ?Sized,
    {
        self.season_index += 1;
        let number = self.season_index;
        let season = Season::new(number, dice);

        if let Some(side) = self.pending_gain.take() {
            let note = format!("Automatic award for next season: +{}", side.shout());
            let line = grant_with_note(&mut self.advantage, side, &note);
            self.narration.push_block([line]);
        }

        // The queued gain counts as held, so it skips the preseason roll too.
        let season = self.season.insert(season);
        if self.advantage.any() {
            season.phase = SeasonPhase::Regular;
            self.narration.push_block([
                format!("Season {number} begins."),
                format!("Advantages retained: {}", self.advantage.label()),
                format!("District games this season: {}", season.district_listing()),
            ]);
        } else {
            self.narration.push_block([
                format!("Season {number} preseason."),
                "Rolling for Highly Skilled advantage...".to_string(),
                format!("District games this season: {}", season.district_listing()),
            ]);
            run_preseason(season, &mut self.advantage, &mut self.narration, dice);
        }
        log::debug!("season {number} opened in {}", season.phase);
    }

    fn finalize_season(&mut self) -> Result<SeasonClose, EngineError> {
        let season = self.season.as_ref().ok_or(EngineError::NoSeason)?;
        let number = season.number;
        let made_playoffs = season.made_playoffs;
        let champion = season.champion;
        let mut lines = season.summary_lines();
        let input = RetentionInput {
            held: self.advantage,
            champion,
            playoff_wins: season.playoff_wins,
            season_wins: season.wins,
        };

        if made_playoffs {
            self.seasons_without_playoffs = 0;
        } else {
            self.seasons_without_playoffs += 1;
        }

        if self.seasons_without_playoffs >= FIRING_STREAK {
            self.fired = true;
            self.narration.push_block(lines);
            self.narration.push_block([format!(
                "FIRED: You failed to make playoffs for {FIRING_STREAK} consecutive seasons."
            )]);
            log::info!("{} fired after season {number}", self.coach_label());
            return Ok(SeasonClose {
                season: number,
                made_playoffs,
                champion,
                seasons_without_playoffs: self.seasons_without_playoffs,
                retention: None,
                fired: true,
            });
        }

        let decision = evaluate_retention(input, self.default_side);
        match decision {
            RetentionDecision::Clear => self.advantage.clear(),
            RetentionDecision::QueueGain(side) => self.pending_gain = Some(side),
            RetentionDecision::Retain | RetentionDecision::Unchanged => {}
        }
        lines.extend(decision.describe(champion));
        self.narration.push_block(lines);
        if champion {
            log::info!("{} won the title in season {number}", self.coach_label());
        }

        Ok(SeasonClose {
            season: number,
            made_playoffs,
            champion,
            seasons_without_playoffs: self.seasons_without_playoffs,
            retention: Some(decision),
            fired: false,
        })
    }
}

fn run_preseason<D>(
    season: &mut Season,
    advantage: &mut Advantage,
    narration: &mut NarrationLog,
    dice: &mut D,
) where
    D: DiceSource + ?Sized,
{
    let roll = roll_preseason(dice);
    let mut lines = roll.trace;
    season.phase = match (roll.verdict, roll.second) {
        (PreseasonVerdict::ChooseSide, Some(second)) => SeasonPhase::AwaitingSideChoice {
            first: roll.first,
            second,
        },
        (PreseasonVerdict::BothSides, _) => {
            for side in [Side::Offense, Side::Defense] {
                if !advantage.grant(side) {
                    lines.push(format!(
                        "Preseason roll: {} advantage already owned.",
                        side.shout()
                    ));
                }
            }
            SeasonPhase::Regular
        }
        _ => SeasonPhase::Regular,
    };
    narration.push_block(lines);
}
