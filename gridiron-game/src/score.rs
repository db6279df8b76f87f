//! Team score resolution: one pair roll plus bonus dice becomes a point total.
use serde::{Deserialize, Serialize};

use crate::constants::{
    BASE_POINTS_TABLE, CHECK_DIE_THRESHOLD, SUM_THREE_POINTS, SUM_TWO_POINTS,
};
use crate::dice::{DicePair, DiceSource, ExplodingRoll};

/// Which side of a matchup is being scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    User,
    Opponent,
}

impl Team {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Opponent => "Opponent",
        }
    }
}

/// Modifiers in play for one team's roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreContext {
    pub team: Team,
    /// Offense advantage held by this team. Only the user team can hold one.
    pub offense_advantage: bool,
    /// The other side's defense advantage; suppresses every bonus die.
    pub opponent_defense_advantage: bool,
}

impl ScoreContext {
    #[must_use]
    pub const fn user(offense_advantage: bool) -> Self {
        Self {
            team: Team::User,
            offense_advantage,
            opponent_defense_advantage: false,
        }
    }

    #[must_use]
    pub const fn opponent(user_defense_advantage: bool) -> Self {
        Self {
            team: Team::Opponent,
            offense_advantage: false,
            opponent_defense_advantage: user_defense_advantage,
        }
    }

    const fn has_offense(self) -> bool {
        matches!(self.team, Team::User) && self.offense_advantage
    }
}

/// How a pair sum converts into base points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasePoints {
    /// Sums 2 and 3: a checking die decides between `high` and `low`.
    Check { high: u32, low: u32 },
    /// Sums 4 through 12: fixed table value, eligible for bonus dice.
    Table(u32),
}

/// Base scoring rule for a pair sum.
///
/// Sums outside `2..=12` cannot come from two dice; they clamp to the nearest
/// table entry.
#[must_use]
pub fn base_points(sum: u8) -> BasePoints {
    match sum {
        0..=2 => BasePoints::Check {
            high: SUM_TWO_POINTS.0,
            low: SUM_TWO_POINTS.1,
        },
        3 => BasePoints::Check {
            high: SUM_THREE_POINTS.0,
            low: SUM_THREE_POINTS.1,
        },
        _ => {
            let idx = usize::from(sum.min(12) - 4);
            BasePoints::Table(BASE_POINTS_TABLE[idx])
        }
    }
}

/// Bonus dice a table sum earns before any defense suppression.
#[must_use]
pub fn bonus_die_count(sum: u8, offense_advantage: bool) -> usize {
    let base = if sum == 12 { 2 } else { 1 };
    if offense_advantage { base.max(2) } else { base }
}

/// Resolved score for one team in one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamScore {
    pub team: Team,
    pub pair: DicePair,
    /// Checking die, rolled only for sums 2 and 3.
    pub check_die: Option<u8>,
    pub base: u32,
    pub bonus_rolls: Vec<ExplodingRoll>,
    pub score: u32,
    pub trace: Vec<String>,
}

impl TeamScore {
    /// Points contributed by bonus dice.
    #[must_use]
    pub fn bonus_points(&self) -> u32 {
        self.bonus_rolls.iter().map(ExplodingRoll::total).sum()
    }
}

/// Roll a team's score for one game.
pub fn resolve_team_score<D>(dice: &mut D, ctx: ScoreContext) -> TeamScore
where
    D: DiceSource + ?Sized,
{
    let label = ctx.team.label();
    let mut trace = Vec::new();
    let pair = dice.roll_pair();
    trace.push(format!("{label} 2d6: {pair}"));

    let base = match base_points(pair.sum) {
        BasePoints::Check { high, low } => {
            let check = dice.roll_die();
            trace.push(format!(
                "{label} check die (for sum={}): {check}",
                pair.sum
            ));
            let points = if check >= CHECK_DIE_THRESHOLD { high } else { low };
            trace.push(format!(
                "{label} base points: {points} (no extra dice allowed)"
            ));
            return TeamScore {
                team: ctx.team,
                pair,
                check_die: Some(check),
                base: points,
                bonus_rolls: Vec::new(),
                score: points,
                trace,
            };
        }
        BasePoints::Table(points) => points,
    };
    trace.push(format!("{label} base points: {base}"));

    if ctx.opponent_defense_advantage {
        trace.push(format!(
            "{label} (opponent has DEF advantage): no extra dice allowed."
        ));
        return TeamScore {
            team: ctx.team,
            pair,
            check_die: None,
            base,
            bonus_rolls: Vec::new(),
            score: base,
            trace,
        };
    }

    let count = bonus_die_count(pair.sum, ctx.has_offense());
    trace.push(format!("{label} extra dice count: {count} (6s explode)"));
    let mut bonus_rolls = Vec::with_capacity(count);
    for slot in 1..=count {
        let roll = dice.exploding_roll();
        trace.push(format!("{label} extra die #{slot}: {roll}"));
        bonus_rolls.push(roll);
    }
    let score = base + bonus_rolls.iter().map(ExplodingRoll::total).sum::<u32>();
    trace.push(format!("{label} final score: {score}"));

    TeamScore {
        team: ctx.team,
        pair,
        check_die: None,
        base,
        bonus_rolls,
        score,
        trace,
    }
}
