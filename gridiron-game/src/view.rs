//! Read-only snapshot of a career for whatever renders it.
use serde::Serialize;

use crate::career::CareerState;
use crate::constants::{ACTION_NEXT_SEASON, ACTION_PLAY_NEXT, PHASE_LABEL_NO_SEASON};
use crate::season::SeasonPhase;

/// Everything a presentation layer shows after a state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CareerView {
    pub coach: String,
    pub phase: String,
    pub season: String,
    pub record: String,
    pub district: String,
    pub offense: bool,
    pub defense: bool,
    pub advantage: String,
    pub fired: bool,
    pub awaiting_side_choice: bool,
    pub can_advance: bool,
    pub can_restart: bool,
    pub next_action: String,
    pub next_game: Option<String>,
}

impl CareerView {
    #[must_use]
    pub fn from_career(career: &CareerState) -> Self {
        let season = career.season.as_ref();
        let phase = season.map(|season| season.phase);
        let awaiting_side_choice = matches!(phase, Some(SeasonPhase::AwaitingSideChoice { .. }));

        let coach = if career.fired {
            format!("{} (Fired)", career.coach_label())
        } else {
            career.coach_label().to_string()
        };
        let phase_label = season.map_or(PHASE_LABEL_NO_SEASON, |season| {
            season.phase.label(season.champion)
        });
        let (wins, losses, district_wins, district_losses) = season.map_or((0, 0, 0, 0), |s| {
            (s.wins, s.losses, s.district_wins, s.district_losses)
        });
        let next_action = if matches!(phase, Some(SeasonPhase::Done)) {
            ACTION_NEXT_SEASON
        } else {
            ACTION_PLAY_NEXT
        };

        Self {
            coach,
            phase: phase_label.to_string(),
            season: season.map_or_else(|| "-".to_string(), |s| format!("Year {}", s.number)),
            record: format!("{wins}-{losses}"),
            district: format!("District: {district_wins}-{district_losses}"),
            offense: career.advantage.offense,
            defense: career.advantage.defense,
            advantage: career.advantage.label().to_string(),
            fired: career.fired,
            awaiting_side_choice,
            can_advance: season.is_some() && !career.fired && !awaiting_side_choice,
            can_restart: !career.fired && phase.is_some_and(|phase| phase != SeasonPhase::Done),
            next_action: next_action.to_string(),
            next_game: season.and_then(|s| s.next_game()).map(ToString::to_string),
        }
    }
}

impl CareerState {
    #[must_use]
    pub fn view(&self) -> CareerView {
        CareerView::from_career(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advantage::{Advantage, Side};
    use crate::config::CareerConfig;
    use crate::dice::ScriptedDice;

    #[test]
    fn empty_career_has_placeholder_view() {
        let career = CareerState::new(&CareerConfig::default());
        let view = career.view();
        assert_eq!(view.coach, "Coach");
        assert_eq!(view.phase, "No season");
        assert_eq!(view.record, "0-0");
        assert_eq!(view.district, "District: 0-0");
        assert!(!view.can_advance);
        assert!(!view.can_restart);
        assert_eq!(view.next_action, "Play Next Game");
        assert!(view.next_game.is_none());
    }

    #[test]
    fn suspended_choice_blocks_advance() {
        let mut dice = ScriptedDice::new([6, 5, 5, 1]);
        let career = CareerState::start(&CareerConfig::new("Jo", Side::Offense), &mut dice);
        let view = career.view();
        assert_eq!(view.phase, "Awaiting Side Choice");
        assert!(view.awaiting_side_choice);
        assert!(!view.can_advance);
        assert!(view.can_restart);
        assert_eq!(view.season, "Year 1");
    }

    #[test]
    fn fired_coach_is_labelled() {
        let mut dice = ScriptedDice::new([1, 1]);
        let mut career = CareerState::start(&CareerConfig::new("Jo", Side::Offense), &mut dice);
        career.fired = true;
        career.advantage = Advantage::only(Side::Defense);
        let view = career.view();
        assert_eq!(view.coach, "Jo (Fired)");
        assert!(!view.can_advance);
        assert!(view.defense && !view.offense);
        assert_eq!(view.advantage, "Highly Skilled: DEFENSE");
        assert_eq!(view.next_game.as_deref(), Some("REG SEASON Game 1 (District)"));
    }
}
