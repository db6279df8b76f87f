//! Advantage economy: preseason rolls, grants, and end-of-season retention.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{PRESEASON_GOOD_FACE, RETAIN_PLAYOFF_WINS, RETAIN_SEASON_WINS};
use crate::dice::{DicePair, DiceSource};

/// Side of the ball an advantage applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    Offense,
    Defense,
}

impl Side {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Offense => "offense",
            Self::Defense => "defense",
        }
    }

    #[must_use]
    pub const fn shout(self) -> &'static str {
        match self {
            Self::Offense => "OFFENSE",
            Self::Defense => "DEFENSE",
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Offense => Self::Defense,
            Self::Defense => Self::Offense,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offense" | "off" | "o" => Ok(Self::Offense),
            "defense" | "def" | "d" => Ok(Self::Defense),
            _ => Err(()),
        }
    }
}

/// Independent offense and defense flags held by the career.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Advantage {
    #[serde(default)]
    pub offense: bool,
    #[serde(default)]
    pub defense: bool,
}

impl Advantage {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            offense: false,
            defense: false,
        }
    }

    #[must_use]
    pub const fn both() -> Self {
        Self {
            offense: true,
            defense: true,
        }
    }

    #[must_use]
    pub const fn only(side: Side) -> Self {
        match side {
            Side::Offense => Self {
                offense: true,
                defense: false,
            },
            Side::Defense => Self {
                offense: false,
                defense: true,
            },
        }
    }

    #[must_use]
    pub const fn any(self) -> bool {
        self.offense || self.defense
    }

    #[must_use]
    pub const fn has(self, side: Side) -> bool {
        match side {
            Side::Offense => self.offense,
            Side::Defense => self.defense,
        }
    }

    /// Set `side`. Returns `false` when it was already held.
    pub fn grant(&mut self, side: Side) -> bool {
        let slot = match side {
            Side::Offense => &mut self.offense,
            Side::Defense => &mut self.defense,
        };
        let newly = !*slot;
        *slot = true;
        newly
    }

    pub fn clear(&mut self) {
        *self = Self::none();
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match (self.offense, self.defense) {
            (true, true) => "Highly Skilled: OFFENSE + DEFENSE",
            (true, false) => "Highly Skilled: OFFENSE",
            (false, true) => "Highly Skilled: DEFENSE",
            (false, false) => "No Highly Skilled advantage",
        }
    }
}

/// Grant `side` and describe what happened. Re-granting a held side is a no-op.
pub fn grant_with_note(advantage: &mut Advantage, side: Side, note: &str) -> String {
    if advantage.grant(side) {
        format!("{note}: {} advantage granted.", side.shout())
    } else {
        format!("{note}: {} advantage already owned.", side.shout())
    }
}

/// What a preseason roll earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreseasonVerdict {
    NoAdvantage,
    BothSides,
    /// First roll good, second not: the coach picks one side.
    ChooseSide,
}

/// Dice and verdict from the preseason advantage roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreseasonRoll {
    pub first: DicePair,
    pub second: Option<DicePair>,
    pub verdict: PreseasonVerdict,
    pub trace: Vec<String>,
}

/// A pair is good when both dice show at least 5.
#[must_use]
pub const fn is_good_roll(pair: DicePair) -> bool {
    pair.both_at_least(PRESEASON_GOOD_FACE)
}

/// Roll for a Highly Skilled advantage. The caller applies the verdict.
pub fn roll_preseason<D>(dice: &mut D) -> PreseasonRoll
where
    D: DiceSource + ?Sized,
{
    let mut trace = Vec::new();
    let first = dice.roll_pair();
    trace.push(format!("Preseason roll #1: {first}"));
    if !is_good_roll(first) {
        trace.push("Result: No Highly Skilled advantage this season.".to_string());
        return PreseasonRoll {
            first,
            second: None,
            verdict: PreseasonVerdict::NoAdvantage,
            trace,
        };
    }

    trace.push(
        "Result: You earned a Highly Skilled advantage (one side of the ball).".to_string(),
    );
    let second = dice.roll_pair();
    trace.push(format!("Preseason roll #2: {second}"));
    let verdict = if is_good_roll(second) {
        trace.push("Result: Highly Skilled on BOTH offense and defense!".to_string());
        PreseasonVerdict::BothSides
    } else {
        trace.push("Second roll did not repeat. Choose: OFFENSE or DEFENSE.".to_string());
        PreseasonVerdict::ChooseSide
    };
    PreseasonRoll {
        first,
        second: Some(second),
        verdict,
        trace,
    }
}

/// Season facts the retention rules read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionInput {
    /// Advantage the career played the season with.
    pub held: Advantage,
    pub champion: bool,
    pub playoff_wins: u32,
    /// Every win of the season: regular, tiebreaker and bracket games.
    pub season_wins: u32,
}

impl RetentionInput {
    /// Non-title retention requirement: 2+ playoff wins or 8+ season wins.
    #[must_use]
    pub const fn meets_requirement(self) -> bool {
        self.playoff_wins >= RETAIN_PLAYOFF_WINS || self.season_wins >= RETAIN_SEASON_WINS
    }
}

/// Change to apply to the career once the season is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionDecision {
    /// Held advantages carry into next season unchanged.
    Retain,
    /// Held advantages are lost.
    Clear,
    /// No advantage held; one side is granted at next season's start.
    QueueGain(Side),
    /// No advantage held and none earned.
    Unchanged,
}

/// Decide what carries into next season. `default_side` picks queued gains.
#[must_use]
pub fn evaluate_retention(input: RetentionInput, default_side: Side) -> RetentionDecision {
    let held_any = input.held.any();
    if input.champion {
        return if held_any {
            RetentionDecision::Retain
        } else {
            RetentionDecision::QueueGain(default_side)
        };
    }
    match (held_any, input.meets_requirement()) {
        (true, true) => RetentionDecision::Retain,
        (true, false) => RetentionDecision::Clear,
        (false, true) => RetentionDecision::QueueGain(default_side),
        (false, false) => RetentionDecision::Unchanged,
    }
}

impl RetentionDecision {
    /// Narration line for the decision, if any.
    #[must_use]
    pub fn describe(self, champion: bool) -> Option<String> {
        match (self, champion) {
            (Self::Retain, true) => Some(
                "Championship won: advantages automatically retained into next season."
                    .to_string(),
            ),
            (Self::Retain, false) => Some(
                "You retained your advantages into next season (met retention requirement)."
                    .to_string(),
            ),
            (Self::Clear, _) => Some(
                "You FAILED the retention requirement and lose your advantages going into next season."
                    .to_string(),
            ),
            (Self::QueueGain(side), true) => Some(format!(
                "You won the championship with no advantages: you will gain ONE advantage next season ({}).",
                side.shout()
            )),
            (Self::QueueGain(side), false) => Some(format!(
                "No advantages this season, but you met the requirement (8+ wins or 2 playoff wins): you will gain ONE advantage next season ({}) in addition to preseason rolling.",
                side.shout()
            )),
            (Self::Unchanged, _) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;

    fn input(held: Advantage, champion: bool, playoff_wins: u32, season_wins: u32) -> RetentionInput {
        RetentionInput {
            held,
            champion,
            playoff_wins,
            season_wins,
        }
    }

    #[test]
    fn grant_is_idempotent() {
        let mut adv = Advantage::none();
        assert_eq!(
            grant_with_note(&mut adv, Side::Defense, "Preseason choice"),
            "Preseason choice: DEFENSE advantage granted."
        );
        assert_eq!(
            grant_with_note(&mut adv, Side::Defense, "Preseason choice"),
            "Preseason choice: DEFENSE advantage already owned."
        );
        assert_eq!(adv, Advantage::only(Side::Defense));
    }

    #[test]
    fn labels_cover_every_combination() {
        assert_eq!(Advantage::none().label(), "No Highly Skilled advantage");
        assert_eq!(Advantage::only(Side::Offense).label(), "Highly Skilled: OFFENSE");
        assert_eq!(Advantage::both().label(), "Highly Skilled: OFFENSE + DEFENSE");
    }

    #[test]
    fn side_parses_loose_input() {
        assert_eq!("Defense".parse::<Side>(), Ok(Side::Defense));
        assert_eq!(" off ".parse::<Side>(), Ok(Side::Offense));
        assert!("kicker".parse::<Side>().is_err());
        assert_eq!(Side::Offense.other(), Side::Defense);
    }

    #[test]
    fn bad_first_roll_ends_preseason() {
        let mut dice = ScriptedDice::new([5, 4]);
        let roll = roll_preseason(&mut dice);
        assert_eq!(roll.verdict, PreseasonVerdict::NoAdvantage);
        assert!(roll.second.is_none());
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn two_good_rolls_grant_both() {
        let mut dice = ScriptedDice::new([5, 5, 6, 5]);
        let roll = roll_preseason(&mut dice);
        assert_eq!(roll.verdict, PreseasonVerdict::BothSides);
    }

    #[test]
    fn split_rolls_ask_for_a_side() {
        let mut dice = ScriptedDice::new([5, 6, 6, 2]);
        let roll = roll_preseason(&mut dice);
        assert_eq!(roll.verdict, PreseasonVerdict::ChooseSide);
        assert_eq!(roll.first, DicePair::new(5, 6));
        assert_eq!(roll.second, Some(DicePair::new(6, 2)));
        assert_eq!(
            roll.trace.last().unwrap(),
            "Second roll did not repeat. Choose: OFFENSE or DEFENSE."
        );
    }

    #[test]
    fn champions_keep_what_they_hold() {
        let held = Advantage::only(Side::Offense);
        assert_eq!(
            evaluate_retention(input(held, true, 4, 3), Side::Defense),
            RetentionDecision::Retain
        );
        assert_eq!(
            evaluate_retention(input(Advantage::none(), true, 4, 3), Side::Defense),
            RetentionDecision::QueueGain(Side::Defense)
        );
    }

    #[test]
    fn retention_requires_two_playoff_or_eight_season_wins() {
        let held = Advantage::both();
        assert_eq!(
            evaluate_retention(input(held, false, 2, 5), Side::Offense),
            RetentionDecision::Retain
        );
        assert_eq!(
            evaluate_retention(input(held, false, 0, 8), Side::Offense),
            RetentionDecision::Retain
        );
        assert_eq!(
            evaluate_retention(input(held, false, 1, 7), Side::Offense),
            RetentionDecision::Clear
        );
    }

    #[test]
    fn no_advantage_seasons_can_queue_a_gain() {
        assert_eq!(
            evaluate_retention(input(Advantage::none(), false, 0, 9), Side::Offense),
            RetentionDecision::QueueGain(Side::Offense)
        );
        assert_eq!(
            evaluate_retention(input(Advantage::none(), false, 1, 6), Side::Offense),
            RetentionDecision::Unchanged
        );
        assert!(RetentionDecision::Unchanged.describe(false).is_none());
    }
}
