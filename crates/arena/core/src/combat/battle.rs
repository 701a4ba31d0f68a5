//! Battle state machine between the hero and one monster.

use crate::config::BattleRules;
use crate::entity::Entity;
use crate::rng::Roller;

use super::attack::AttackOutcome;

/// Why a battle ended without a winner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrawReason {
    /// Neither side's attack exceeds the other's defense.
    Stalemate,
    /// The battle reached [`BattleRules::max_rounds`].
    RoundLimit,
    /// The battle was concluded before either side fell, e.g. on shutdown.
    Interrupted,
}

/// Terminal result of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleOutcome {
    HeroWins,
    MonsterWins,
    Draw(DrawReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleState {
    #[default]
    Ongoing,
    Finished(BattleOutcome),
}

impl BattleState {
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }

    pub const fn outcome(&self) -> Option<BattleOutcome> {
        match self {
            Self::Ongoing => None,
            Self::Finished(outcome) => Some(*outcome),
        }
    }
}

/// What happened during one call to [`Battle::play_round`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundReport {
    /// 1-based round number; 0 when the battle ended before any attack.
    pub round: u32,
    pub hero_attack: Option<AttackOutcome>,
    pub monster_attack: Option<AttackOutcome>,
    pub state: BattleState,
}

/// Summary produced once a battle is concluded.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    pub rounds: u32,
    /// Monster as it stood when the battle ended.
    pub monster: Entity,
    /// Health restored to the hero, present only after a win.
    pub healed: Option<i32>,
    pub hero_health: i32,
}

/// One battle. Owns the monster for its whole duration.
#[derive(Clone, Debug)]
pub struct Battle {
    monster: Entity,
    rules: BattleRules,
    rounds: u32,
    state: BattleState,
}

impl Battle {
    pub fn new(monster: Entity, rules: BattleRules) -> Self {
        Self {
            monster,
            rules,
            rounds: 0,
            state: BattleState::Ongoing,
        }
    }

    pub fn monster(&self) -> &Entity {
        &self.monster
    }

    /// Rounds in which at least one attack was made.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Plays one round: hero attacks, then the monster if it survived.
    ///
    /// Before attacking, the stalemate guards in [`BattleRules`] may end the
    /// battle as a draw. Calling this on a finished battle changes nothing.
    pub fn play_round(
        &mut self,
        hero: &mut Entity,
        roller: &mut (impl Roller + ?Sized),
    ) -> RoundReport {
        if let Some(outcome) = self.pre_round_outcome(hero) {
            self.state = BattleState::Finished(outcome);
        }
        if self.is_finished() {
            return self.report(None, None);
        }

        self.rounds += 1;

        let hero_attack = hero.attack(&mut self.monster, roller);
        if !self.monster.is_alive() {
            self.state = BattleState::Finished(BattleOutcome::HeroWins);
            return self.report(Some(hero_attack), None);
        }

        let monster_attack = self.monster.attack(hero, roller);
        if !hero.is_alive() {
            self.state = BattleState::Finished(BattleOutcome::MonsterWins);
        }

        self.report(Some(hero_attack), Some(monster_attack))
    }

    /// Applies the victory heal and produces the report.
    ///
    /// An unfinished battle is concluded as an interrupted draw.
    pub fn conclude(self, hero: &mut Entity) -> BattleReport {
        let outcome = self
            .state
            .outcome()
            .unwrap_or(BattleOutcome::Draw(DrawReason::Interrupted));

        let healed = match outcome {
            BattleOutcome::HeroWins if hero.is_alive() => {
                hero.heal(self.rules.heal_on_victory);
                Some(self.rules.heal_on_victory)
            }
            _ => None,
        };

        BattleReport {
            outcome,
            rounds: self.rounds,
            monster: self.monster,
            healed,
            hero_health: hero.health(),
        }
    }

    fn pre_round_outcome(&self, hero: &Entity) -> Option<BattleOutcome> {
        if self.is_finished() {
            return None;
        }
        if !hero.is_alive() {
            return Some(BattleOutcome::MonsterWins);
        }
        if !self.monster.is_alive() {
            return Some(BattleOutcome::HeroWins);
        }
        if let Some(max_rounds) = self.rules.max_rounds
            && self.rounds >= max_rounds
        {
            return Some(BattleOutcome::Draw(DrawReason::RoundLimit));
        }
        if self.rules.detect_stalemate
            && !hero.can_damage(&self.monster)
            && !self.monster.can_damage(hero)
        {
            return Some(BattleOutcome::Draw(DrawReason::Stalemate));
        }
        None
    }

    fn report(
        &self,
        hero_attack: Option<AttackOutcome>,
        monster_attack: Option<AttackOutcome>,
    ) -> RoundReport {
        let round = if hero_attack.is_some() { self.rounds } else { 0 };
        RoundReport {
            round,
            hero_attack,
            monster_attack,
            state: self.state,
        }
    }
}

/// Runs a battle to completion with no pacing and concludes it.
///
/// With [`BattleRules::unguarded`] and two entities that cannot damage each
/// other this never returns.
pub fn fight(
    hero: &mut Entity,
    monster: Entity,
    rules: BattleRules,
    roller: &mut (impl Roller + ?Sized),
) -> BattleReport {
    let mut battle = Battle::new(monster, rules);
    while !battle.is_finished() {
        battle.play_round(hero, roller);
    }
    battle.conclude(hero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;
    use crate::rng::ScriptedRoller;

    fn hero(health: i32, attack: i32, defense: i32) -> Entity {
        Entity::hero("Hero", health, attack, defense).unwrap()
    }

    fn monster(health: i32, attack: i32, defense: i32) -> Entity {
        Entity::monster(EntityId(1), "Goblin_1", health, attack, defense).unwrap()
    }

    #[test]
    fn hero_wins_in_four_hits_and_heals() {
        let mut hero = hero(100, 20, 10);
        let mut battle = Battle::new(monster(50, 15, 5), BattleRules::default());
        let mut roller = ScriptedRoller::without_bonuses();

        let mut monster_health = Vec::new();
        while !battle.is_finished() {
            battle.play_round(&mut hero, &mut roller);
            monster_health.push(battle.monster().health());
        }

        assert_eq!(monster_health, vec![35, 20, 5, -10]);
        assert_eq!(battle.state(), BattleState::Finished(BattleOutcome::HeroWins));
        // Three monster hits of 5 land before the killing blow.
        assert_eq!(hero.health(), 85);

        let report = battle.conclude(&mut hero);
        assert_eq!(report.rounds, 4);
        assert_eq!(report.healed, Some(20));
        assert_eq!(hero.health(), 105);
        assert_eq!(report.hero_health, 105);
    }

    #[test]
    fn victory_heal_saturates_at_max_health() {
        let mut hero = hero(i32::MAX, 20, 10);
        let report = fight(
            &mut hero,
            monster(50, 15, 5),
            BattleRules::default(),
            &mut ScriptedRoller::without_bonuses(),
        );

        assert_eq!(report.outcome, BattleOutcome::HeroWins);
        assert_eq!(report.healed, Some(20));
        assert_eq!(hero.health(), i32::MAX);
    }

    #[test]
    fn weak_hero_loses_without_heal() {
        let mut hero = hero(20, 5, 10);
        let report = fight(
            &mut hero,
            monster(50, 15, 5),
            BattleRules::default(),
            &mut ScriptedRoller::without_bonuses(),
        );

        assert_eq!(report.outcome, BattleOutcome::MonsterWins);
        assert_eq!(report.healed, None);
        assert_eq!(report.rounds, 4);
        assert_eq!(hero.health(), 0);
        assert_eq!(report.monster.health(), 50);
    }

    #[test]
    fn stalemate_is_a_draw() {
        let mut hero = hero(10, 20, 30);
        let report = fight(
            &mut hero,
            monster(10, 5, 30),
            BattleRules::default(),
            &mut ScriptedRoller::without_bonuses(),
        );

        assert_eq!(report.outcome, BattleOutcome::Draw(DrawReason::Stalemate));
        assert_eq!(report.rounds, 0);
        assert_eq!(report.healed, None);
        assert_eq!(hero.health(), 10);
    }

    #[test]
    fn round_cap_bounds_a_stalemate() {
        let mut hero = hero(10, 20, 30);
        let rules = BattleRules::unguarded().with_max_rounds(Some(7));
        let report = fight(
            &mut hero,
            monster(10, 5, 30),
            rules,
            &mut ScriptedRoller::without_bonuses(),
        );

        assert_eq!(report.outcome, BattleOutcome::Draw(DrawReason::RoundLimit));
        assert_eq!(report.rounds, 7);
    }

    #[test]
    fn round_report_tracks_attacks() {
        let mut hero = hero(100, 20, 10);
        let mut battle = Battle::new(monster(15, 15, 5), BattleRules::default());
        let mut roller = ScriptedRoller::without_bonuses();

        let report = battle.play_round(&mut hero, &mut roller);
        assert_eq!(report.round, 1);
        assert_eq!(
            report.hero_attack,
            Some(AttackOutcome::Hit {
                damage: 15,
                bonus: None
            })
        );
        assert_eq!(report.monster_attack, None);
        assert_eq!(report.state, BattleState::Finished(BattleOutcome::HeroWins));

        let again = battle.play_round(&mut hero, &mut roller);
        assert_eq!(again.round, 0);
        assert_eq!(again.hero_attack, None);
        assert_eq!(battle.rounds(), 1);
    }

    #[test]
    fn unfinished_battle_concludes_interrupted() {
        let mut hero = hero(100, 20, 10);
        let mut battle = Battle::new(monster(50, 15, 5), BattleRules::default());
        battle.play_round(&mut hero, &mut ScriptedRoller::without_bonuses());

        let report = battle.conclude(&mut hero);
        assert_eq!(report.outcome, BattleOutcome::Draw(DrawReason::Interrupted));
        assert_eq!(report.rounds, 1);
        assert_eq!(report.healed, None);
        assert_eq!(hero.health(), 95);
    }

    #[test]
    fn dead_hero_never_fights() {
        let mut hero = hero(0, 20, 10);
        let report = fight(
            &mut hero,
            monster(50, 15, 5),
            BattleRules::default(),
            &mut ScriptedRoller::without_bonuses(),
        );
        assert_eq!(report.outcome, BattleOutcome::MonsterWins);
        assert_eq!(report.rounds, 0);
        assert_eq!(hero.health(), 0);
    }
}
