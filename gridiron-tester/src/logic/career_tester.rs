use std::path::PathBuf;

use anyhow::{Context, Result, bail, ensure};
use gridiron_game::{
    AdvanceOutcome, CareerConfig, CareerEngine, CareerState, EngineError, GameKind, SeasonPhase,
    SeededDice, Side,
};
use serde::{Deserialize, Serialize};

use crate::common::digest_text;
use crate::logic::policy::{SideChooser, SidePolicy};
use crate::storage::FileStorage;

/// Hard stop on advance requests for one career; a season needs at most 17.
const MAX_STEPS_PER_SEASON: usize = 32;

/// Expectation checked against a finished career run.
pub type Expectation = fn(&CareerRun) -> Result<()>;

/// How one simulated career is driven.
#[derive(Debug, Clone)]
pub struct CareerPlan {
    pub coach: String,
    pub default_side: Side,
    pub side_policy: SidePolicy,
    /// Stop once this many seasons have finished, even if still employed.
    pub max_seasons: u32,
    /// Restart the current season after this many games of season 1.
    pub restart_after_games: Option<u32>,
    /// Save after every finished season and verify the reload.
    pub save_dir: Option<PathBuf>,
    /// Replay the same seed and compare narration digests.
    pub check_determinism: bool,
    pub expectations: Vec<Expectation>,
}

impl CareerPlan {
    #[must_use]
    pub fn new(max_seasons: u32) -> Self {
        Self {
            coach: String::new(),
            default_side: Side::Offense,
            side_policy: SidePolicy::Alternate,
            max_seasons,
            restart_after_games: None,
            save_dir: None,
            check_determinism: false,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_coach(mut self, coach: impl Into<String>) -> Self {
        self.coach = coach.into();
        self
    }

    #[must_use]
    pub const fn with_default_side(mut self, side: Side) -> Self {
        self.default_side = side;
        self
    }

    #[must_use]
    pub const fn with_side_policy(mut self, policy: SidePolicy) -> Self {
        self.side_policy = policy;
        self
    }

    #[must_use]
    pub const fn with_restart_after(mut self, games: u32) -> Self {
        self.restart_after_games = Some(games);
        self
    }

    #[must_use]
    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub const fn with_determinism_check(mut self) -> Self {
        self.check_determinism = true;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    fn config(&self) -> CareerConfig {
        CareerConfig::new(self.coach.clone(), self.default_side)
    }
}

/// Headline numbers for one career.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerSummary {
    pub seed: u64,
    pub seasons_completed: u32,
    pub playoff_appearances: u32,
    pub championships: u32,
    pub tiebreakers_played: u32,
    pub games_played: u32,
    pub side_choices: u32,
    pub restarts: u32,
    pub saves: u32,
    pub fired_after: Option<u32>,
    pub final_advantage: String,
    pub narration_entries: usize,
    pub digest: String,
}

/// A finished simulation: the summary plus the career it produced.
#[derive(Debug, Clone)]
pub struct CareerRun {
    pub summary: CareerSummary,
    pub career: CareerState,
}

#[derive(Clone)]
pub struct CareerTester {
    verbose: bool,
}

impl CareerTester {
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Drive a career from `seed` according to `plan`, validating every step.
    ///
    /// # Errors
    ///
    /// Returns an error when an engine invariant breaks, the engine rejects a
    /// request the driver considered valid, or a persistence check fails.
    pub fn run(&self, plan: &CareerPlan, seed: u64) -> Result<CareerRun> {
        let run = self.simulate(plan, seed)?;
        if plan.check_determinism {
            let replay = self.simulate(plan, seed)?;
            ensure!(
                replay.summary.digest == run.summary.digest,
                "seed {seed} replayed differently: {} vs {}",
                run.summary.digest,
                replay.summary.digest
            );
        }
        Ok(run)
    }

    fn simulate(&self, plan: &CareerPlan, seed: u64) -> Result<CareerRun> {
        log::debug!(
            "simulating seed {seed} for up to {} seasons ({} policy)",
            plan.max_seasons,
            plan.side_policy.label()
        );
        let mut dice = SeededDice::from_seed(seed);
        let mut chooser = SideChooser::new(plan.side_policy, seed);
        let engine = plan
            .save_dir
            .as_ref()
            .map(|dir| CareerEngine::with_key(FileStorage::new(dir), format!("career-{seed}")));

        let mut career = CareerState::start(&plan.config(), &mut dice);
        let mut summary = CareerSummary {
            seed,
            ..CareerSummary::default()
        };
        let mut restart_pending = plan.restart_after_games;
        let step_budget = MAX_STEPS_PER_SEASON * usize::try_from(plan.max_seasons.max(1))?;

        for _ in 0..step_budget {
            if career.fired || summary.seasons_completed >= plan.max_seasons {
                break;
            }

            if career.awaiting_side_choice() {
                let before = career.clone();
                ensure!(
                    career.advance(&mut dice)? == AdvanceOutcome::AwaitingSideChoice,
                    "advance during a side choice must be rejected"
                );
                ensure!(career == before, "rejected advance changed the career");
                career.choose_side(chooser.pick())?;
                continue;
            }

            if let Some(after) = restart_pending
                && career.season_index == 1
                && current_games_played(&career) >= after
            {
                career.restart_season(&mut dice)?;
                restart_pending = None;
                summary.restarts += 1;
                check_fresh_season(&career)?;
                continue;
            }

            match career.advance(&mut dice)? {
                AdvanceOutcome::GamePlayed { report, close } => {
                    summary.games_played += 1;
                    if report.kind == GameKind::DistrictTiebreaker {
                        summary.tiebreakers_played += 1;
                    }
                    if let Some(close) = close {
                        summary.seasons_completed += 1;
                        if close.made_playoffs {
                            summary.playoff_appearances += 1;
                        }
                        if close.champion {
                            summary.championships += 1;
                        }
                        if close.fired {
                            summary.fired_after = Some(close.season);
                        }
                        if let Some(engine) = engine.as_ref() {
                            ensure!(
                                engine.persist(&career).is_saved(),
                                "saving season {} failed",
                                close.season
                            );
                            let reloaded = engine
                                .load()
                                .with_context(|| format!("reloading season {}", close.season))?;
                            ensure!(
                                reloaded.as_ref() == Some(&career),
                                "reloaded career differs after season {}",
                                close.season
                            );
                            summary.saves += 1;
                        }
                        if self.verbose {
                            println!(
                                "    season {:>2}: made playoffs {:5} champion {:5} drought {}",
                                close.season,
                                close.made_playoffs,
                                close.champion,
                                close.seasons_without_playoffs
                            );
                        }
                    }
                }
                AdvanceOutcome::SeasonStarted { .. } | AdvanceOutcome::PreseasonRolled => {}
                AdvanceOutcome::AwaitingSideChoice => {
                    bail!("advance reported a side choice the career did not show")
                }
            }
            check_invariants(&career)?;
        }

        if career.fired {
            ensure!(
                matches!(career.advance(&mut dice), Err(EngineError::CareerOver)),
                "fired career accepted another advance"
            );
        }
        if let Some(engine) = engine.as_ref() {
            engine.discard()?;
        }

        summary.side_choices = u32::try_from(chooser.picks())?;
        let text = career.narration().export_text();
        summary.final_advantage = career.advantage.label().to_string();
        summary.narration_entries = career.narration().len();
        summary.digest = digest_text(&text);
        Ok(CareerRun { summary, career })
    }
}

fn current_games_played(career: &CareerState) -> u32 {
    career.season.as_ref().map_or(0, |season| season.wins + season.losses)
}

fn check_fresh_season(career: &CareerState) -> Result<()> {
    let season = career.season.as_ref().context("restart left no season")?;
    ensure!(season.wins + season.losses == 0, "restart kept played games");
    ensure!(
        season.games.iter().all(|game| !game.played),
        "restart kept game results"
    );
    ensure!(
        season.tiebreaker.is_none() && season.playoffs.is_empty(),
        "restart kept postseason games"
    );
    Ok(())
}

/// Structural checks that must hold after every step.
///
/// # Errors
///
/// Returns the first violated invariant.
pub fn check_invariants(career: &CareerState) -> Result<()> {
    ensure!(
        career.fired == (career.seasons_without_playoffs >= 5),
        "fired flag {} disagrees with drought {}",
        career.fired,
        career.seasons_without_playoffs
    );
    let Some(season) = career.season.as_ref() else {
        return Ok(());
    };
    ensure!(
        season.number == career.season_index,
        "season {} is not the current index {}",
        season.number,
        career.season_index
    );
    let district = season.games.iter().filter(|game| game.is_district).count();
    ensure!(district == 4, "season has {district} district games");

    let played = season.games.iter().filter(|game| game.played).count()
        + usize::from(season.tiebreaker.as_ref().is_some_and(|game| game.played))
        + season.playoffs.iter().filter(|game| game.played).count();
    ensure!(
        usize::try_from(season.wins + season.losses)? == played,
        "record {}-{} does not match {played} played games",
        season.wins,
        season.losses
    );

    for game in season
        .games
        .iter()
        .chain(season.tiebreaker.iter())
        .chain(season.playoffs.iter())
        .filter(|game| game.played)
    {
        let (Some(user), Some(opponent)) = (game.user_score, game.opponent_score) else {
            bail!("{} is played but has no score", game.label());
        };
        ensure!(user != opponent, "{} ended tied at {user}", game.label());
        ensure!(
            game.is_win() == (user > opponent),
            "{} result disagrees with its score",
            game.label()
        );
    }

    if season.tiebreaker.is_some() {
        ensure!(
            season.district_wins == 3 && season.regular_wins() >= 5,
            "tiebreaker created for district {} with {} wins",
            season.district_wins,
            season.regular_wins()
        );
    }
    if !season.playoffs.is_empty() {
        ensure!(season.made_playoffs, "bracket exists without a playoff berth");
    }
    if season.champion {
        ensure!(season.playoff_wins == 4, "champion without four playoff wins");
    }
    if matches!(season.phase, SeasonPhase::Playoffs) {
        ensure!(season.playoff_losses == 0, "still in playoffs after a loss");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_season_plan_stops_after_first_season() {
        let tester = CareerTester::new(false);
        let run = tester.run(&CareerPlan::new(1), 5).unwrap();
        assert_eq!(run.summary.seasons_completed, 1);
        assert!(run.summary.games_played >= 10);
        assert_eq!(run.summary.digest.len(), 16);
        assert!(run.career.season.as_ref().unwrap().is_done());
    }

    #[test]
    fn restart_plan_records_one_restart() {
        let tester = CareerTester::new(false);
        let plan = CareerPlan::new(1).with_restart_after(3);
        let run = tester.run(&plan, 8).unwrap();
        assert_eq!(run.summary.restarts, 1);
        assert!(
            run.career
                .narration()
                .entries()
                .iter()
                .any(|entry| entry.starts_with("Season 1 restarted."))
        );
    }

    #[test]
    fn determinism_check_passes_for_seeded_runs() {
        let tester = CareerTester::new(false);
        let plan = CareerPlan::new(6)
            .with_side_policy(SidePolicy::Random)
            .with_determinism_check();
        for seed in [1, 2, 3] {
            tester.run(&plan, seed).unwrap();
        }
    }

    #[test]
    fn long_careers_end_in_firing_or_ceiling() {
        let tester = CareerTester::new(false);
        let plan = CareerPlan::new(25);
        for seed in 0..10 {
            let summary = tester.run(&plan, seed).unwrap().summary;
            assert!(summary.fired_after.is_some() || summary.seasons_completed == 25);
            assert!(summary.championships <= summary.playoff_appearances);
        }
    }
}
