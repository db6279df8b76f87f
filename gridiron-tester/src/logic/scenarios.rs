use anyhow::{Result, ensure};
use std::path::Path;

use crate::logic::career_tester::{CareerPlan, CareerRun};

/// Seasons a full career is allowed before the run is cut off.
pub const FULL_CAREER_SEASONS: u32 = 30;

/// Named plan the tester can run across seeds.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: CareerPlan,
}

impl TestScenario {
    #[must_use]
    pub fn new(name: impl Into<String>, plan: CareerPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

const CATALOG: [(&str, &str); 6] = [
    ("smoke", "One season from preseason to final whistle"),
    (
        "full-career",
        "Play until fired or the season ceiling, checking invariants every step",
    ),
    ("determinism", "Replay each seed and compare narration digests"),
    ("persistence", "Save and reload after every season"),
    ("restart", "Restart season 1 mid-flight and finish it"),
    ("side-choice", "Answer every preseason prompt with the configured policy"),
];

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    CATALOG.to_vec()
}

/// Expand `all` into every catalog entry, keeping other names in order.
pub fn expand_scenarios(names: &[String]) -> Vec<String> {
    let mut expanded: Vec<String> = names
        .iter()
        .filter(|name| name.as_str() != "all")
        .cloned()
        .collect();
    if names.iter().any(|name| name == "all") {
        for (key, _) in CATALOG {
            if !expanded.iter().any(|name| name == key) {
                expanded.push(key.to_string());
            }
        }
    }
    expanded
}

fn season_finished(run: &CareerRun) -> Result<()> {
    ensure!(
        run.summary.seasons_completed >= 1,
        "no season was completed"
    );
    ensure!(run.summary.games_played >= 10, "fewer than ten games played");
    Ok(())
}

fn career_concluded(run: &CareerRun) -> Result<()> {
    ensure!(
        run.summary.fired_after.is_some() || run.summary.seasons_completed == FULL_CAREER_SEASONS,
        "career stopped after {} seasons without a firing",
        run.summary.seasons_completed
    );
    ensure!(
        run.summary.championships <= run.summary.playoff_appearances,
        "more titles than playoff trips"
    );
    Ok(())
}

fn saved_every_season(run: &CareerRun) -> Result<()> {
    ensure!(
        run.summary.saves == run.summary.seasons_completed,
        "saved {} of {} seasons",
        run.summary.saves,
        run.summary.seasons_completed
    );
    Ok(())
}

fn restarted_once(run: &CareerRun) -> Result<()> {
    ensure!(run.summary.restarts == 1, "expected one restart");
    Ok(())
}

fn prompts_answered(run: &CareerRun) -> Result<()> {
    let prompts = run
        .career
        .narration()
        .entries()
        .iter()
        .filter(|entry| entry.contains("Choose: OFFENSE or DEFENSE."))
        .count();
    ensure!(
        usize::try_from(run.summary.side_choices)? == prompts,
        "{prompts} prompts but {} choices",
        run.summary.side_choices
    );
    Ok(())
}

/// Build a catalog scenario on top of the CLI-level base plan.
pub fn get_scenario(name: &str, base: &CareerPlan, save_root: &Path) -> Option<TestScenario> {
    let plan = base.clone();
    let plan = match name {
        "smoke" => CareerPlan {
            max_seasons: 1,
            ..plan
        }
        .with_expectation(season_finished),
        "full-career" => CareerPlan {
            max_seasons: FULL_CAREER_SEASONS,
            ..plan
        }
        .with_expectation(career_concluded),
        "determinism" => plan.with_determinism_check(),
        "persistence" => plan
            .with_save_dir(save_root.join("persistence"))
            .with_expectation(saved_every_season),
        "restart" => CareerPlan {
            max_seasons: 1,
            ..plan
        }
        .with_restart_after(3)
        .with_expectation(restarted_once),
        "side-choice" => plan.with_expectation(prompts_answered),
        _ => return None,
    };
    Some(TestScenario::new(name, plan))
}
