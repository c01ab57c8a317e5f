//! Perception engine integration tests.
//!
//! Covers true identity, misregistration, observer-restricted modifiers,
//! narrator overrides, and totality of `perceive` over arbitrary effects.

use std::collections::BTreeMap;

use proptest::prelude::*;

use grimoire::changes::StateChanges;
use grimoire::core::{
    Alignment, EffectId, EffectInstance, Game, GameState, PerceptionOverride, Player, PlayerId, RoleId, Team,
};
use grimoire::effects::{EffectDefinition, EffectRegistry};
use grimoire::games::sample::{self, effects, roles};
use grimoire::perception::{
    ambiguous_players, apply_perception_overrides, can_register_as_alignment, can_register_as_team,
    perceive, true_identity, Perception, PerceptionContext, PerceptionModifier, PerceptionQuery,
};
use grimoire::roles::{RoleDefinition, RoleRegistry};
use grimoire::rules::Ruleset;
use grimoire::turn::setup_game;

fn p(id: u32) -> PlayerId {
    PlayerId::new(id)
}

/// Demon, villager, outcast (misregister), martyr.
fn game(ruleset: &Ruleset) -> Game {
    setup_game(
        [roles::DEMON, roles::VILLAGER, roles::OUTCAST, roles::MARTYR]
            .into_iter()
            .enumerate()
            .map(|(i, role)| Player::new(PlayerId::new(i as u32), format!("P{}", i), role)),
        ruleset,
    )
    .unwrap()
}

// =============================================================================
// True Identity
// =============================================================================

#[test]
fn test_true_identity_without_modifiers() {
    let ruleset = sample::ruleset().unwrap();
    let game = game(&ruleset);
    let state = game.state();
    let observer = state.player(p(1)).unwrap();

    let demon = state.player(p(0)).unwrap();
    let seen = perceive(demon, observer, PerceptionContext::Alignment, state, &ruleset);
    assert_eq!(
        seen,
        Perception {
            role: roles::DEMON,
            team: Team::Demon,
            alignment: Alignment::Evil,
        }
    );
}

#[test]
fn test_explicit_alignment_wins_over_team_default() {
    let ruleset = sample::ruleset().unwrap();
    let turncoat = Player::new(p(0), "Turncoat", roles::VILLAGER).with_alignment(Alignment::Evil);

    assert_eq!(true_identity(&turncoat, &ruleset).alignment, Alignment::Evil);
    assert_eq!(true_identity(&turncoat, &ruleset).team, Team::Townsfolk);
}

#[test]
fn test_unknown_role_reads_as_townsfolk() {
    let ruleset = sample::ruleset().unwrap();
    let ghost = Player::new(p(0), "Ghost", RoleId::from_static("removed_role"));

    let identity = true_identity(&ghost, &ruleset);
    assert_eq!(identity.team, Team::Townsfolk);
    assert_eq!(identity.alignment, Alignment::Good);
}

// =============================================================================
// Misregistration
// =============================================================================

#[test]
fn test_misregister_without_override_shows_true_team() {
    let ruleset = sample::ruleset().unwrap();
    let game = game(&ruleset);
    let state = game.state();
    let outcast = state.player(p(2)).unwrap();
    let observer = state.player(p(1)).unwrap();

    let seen = perceive(outcast, observer, PerceptionContext::Team, state, &ruleset);
    assert_eq!(seen.team, Team::Outsider);
}

#[test]
fn test_override_changes_perceived_team() {
    let ruleset = sample::ruleset().unwrap();
    let game = game(&ruleset);

    let overrides = BTreeMap::from([(p(2), PerceptionOverride::new().team(Team::Demon))]);
    let derived = apply_perception_overrides(game.state(), &overrides, ruleset.effects());

    let outcast = derived.player(p(2)).unwrap();
    let observer = derived.player(p(1)).unwrap();
    let seen = perceive(outcast, observer, PerceptionContext::Team, &derived, &ruleset);
    assert_eq!(seen.team, Team::Demon);

    // The source state is untouched.
    let original = game.state().player(p(2)).unwrap();
    assert_eq!(
        perceive(original, observer, PerceptionContext::Team, game.state(), &ruleset).team,
        Team::Outsider
    );
}

#[test]
fn test_override_ignored_for_players_without_capability() {
    let ruleset = sample::ruleset().unwrap();
    let game = game(&ruleset);

    let overrides = BTreeMap::from([(p(3), PerceptionOverride::new().team(Team::Demon))]);
    let derived = apply_perception_overrides(game.state(), &overrides, ruleset.effects());

    assert_eq!(&derived, game.state());
}

#[test]
fn test_misperception_persists_after_death() {
    let ruleset = sample::ruleset().unwrap();
    let overrides = BTreeMap::from([(p(2), PerceptionOverride::new().alignment(Alignment::Evil))]);
    let game = game(&ruleset)
        .apply(StateChanges::new().with_effect(p(2), EffectInstance::new(EffectId::DEAD)));
    let derived = apply_perception_overrides(game.state(), &overrides, ruleset.effects());

    let outcast = derived.player(p(2)).unwrap();
    assert!(!outcast.is_alive());
    let observer = derived.player(p(1)).unwrap();
    let seen = perceive(outcast, observer, PerceptionContext::Alignment, &derived, &ruleset);
    assert_eq!(seen.alignment, Alignment::Evil);
}

#[test]
fn test_register_capability_queries() {
    let ruleset = sample::ruleset().unwrap();
    let game = game(&ruleset);
    let state = game.state();
    let outcast = state.player(p(2)).unwrap();
    let villager = state.player(p(1)).unwrap();

    assert!(can_register_as_team(outcast, Team::Minion, ruleset.effects()));
    assert!(can_register_as_team(outcast, Team::Demon, ruleset.effects()));
    assert!(!can_register_as_team(outcast, Team::Townsfolk, ruleset.effects()));
    assert!(can_register_as_alignment(outcast, Alignment::Evil, ruleset.effects()));
    assert!(!can_register_as_team(villager, Team::Demon, ruleset.effects()));

    let ambiguous = ambiguous_players(state.players(), PerceptionContext::Team, ruleset.effects());
    let ids: Vec<_> = ambiguous.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![p(2)]);
}

// =============================================================================
// Observer Filters and Chaining
// =============================================================================

const DISGUISE: EffectId = EffectId::from_static("disguise");
const VEIL: EffectId = EffectId::from_static("veil");
const SEER: RoleId = RoleId::from_static("seer");

/// Looks like a good townsfolk to the listed observer roles.
struct Disguise(Vec<RoleId>);

impl PerceptionModifier for Disguise {
    fn contexts(&self) -> &[PerceptionContext] {
        &PerceptionContext::ALL
    }

    fn observer_roles(&self) -> Option<&[RoleId]> {
        Some(&self.0)
    }

    fn apply(&self, mut perception: Perception, _query: &PerceptionQuery<'_>) -> Perception {
        perception.team = Team::Townsfolk;
        perception.alignment = Alignment::Good;
        perception
    }
}

/// Flips whatever alignment reached it.
struct Invert;

impl PerceptionModifier for Invert {
    fn contexts(&self) -> &[PerceptionContext] {
        &[PerceptionContext::Alignment]
    }

    fn apply(&self, mut perception: Perception, _query: &PerceptionQuery<'_>) -> Perception {
        perception.alignment = perception.alignment.opposite();
        perception
    }
}

fn custom_ruleset() -> Ruleset {
    let mut effect_registry = EffectRegistry::new();
    effect_registry
        .register(EffectDefinition::new(DISGUISE, "Disguise").with_modifier(Disguise(vec![SEER])))
        .unwrap();
    effect_registry
        .register(EffectDefinition::new(VEIL, "Veil").with_modifier(Invert))
        .unwrap();

    let mut role_registry = RoleRegistry::new();
    role_registry
        .register(RoleDefinition::new(roles::DEMON, "Demon", Team::Demon))
        .unwrap();
    role_registry
        .register(RoleDefinition::new(SEER, "Seer", Team::Townsfolk))
        .unwrap();
    Ruleset::new(effect_registry, role_registry, Default::default()).unwrap()
}

#[test]
fn test_observer_restricted_modifier() {
    let ruleset = custom_ruleset();
    let demon = Player::new(p(0), "D", roles::DEMON).with_effect(EffectInstance::new(DISGUISE));
    let seer = Player::new(p(1), "S", SEER);
    let other = Player::new(p(2), "O", roles::VILLAGER);
    let state = GameState::new([demon.clone(), seer.clone(), other.clone()]).unwrap();

    let to_seer = perceive(&demon, &seer, PerceptionContext::Alignment, &state, &ruleset);
    assert_eq!(to_seer.alignment, Alignment::Good);

    let to_other = perceive(&demon, &other, PerceptionContext::Alignment, &state, &ruleset);
    assert_eq!(to_other.alignment, Alignment::Evil);
}

#[test]
fn test_modifiers_chain_in_effect_order() {
    let ruleset = custom_ruleset();
    let demon = Player::new(p(0), "D", roles::DEMON)
        .with_effect(EffectInstance::new(DISGUISE))
        .with_effect(EffectInstance::new(VEIL));
    let seer = Player::new(p(1), "S", SEER);
    let state = GameState::new([demon.clone(), seer.clone()]).unwrap();

    // Disguise makes it good, then veil flips that to evil.
    let seen = perceive(&demon, &seer, PerceptionContext::Alignment, &state, &ruleset);
    assert_eq!(seen.alignment, Alignment::Evil);

    // Veil does not participate in team queries.
    let seen = perceive(&demon, &seer, PerceptionContext::Team, &state, &ruleset);
    assert_eq!(seen.team, Team::Townsfolk);
}

// =============================================================================
// Property Tests
// =============================================================================

fn any_effect() -> impl Strategy<Value = EffectId> {
    prop_oneof![
        Just(effects::SAFE),
        Just(effects::BOUNCE),
        Just(effects::MARTYRDOM),
        Just(effects::MISREGISTER),
        Just(effects::SUCCESSOR),
        Just(EffectId::DEAD),
        Just(EffectId::from_static("unknown")),
    ]
}

fn any_role() -> impl Strategy<Value = RoleId> {
    prop_oneof![
        Just(roles::VILLAGER),
        Just(roles::MAYOR),
        Just(roles::OUTCAST),
        Just(roles::HEIR),
        Just(roles::DEMON),
        Just(RoleId::from_static("unknown")),
    ]
}

fn any_context() -> impl Strategy<Value = PerceptionContext> {
    prop_oneof![
        Just(PerceptionContext::Alignment),
        Just(PerceptionContext::Team),
        Just(PerceptionContext::Role),
    ]
}

proptest! {
    #[test]
    fn prop_perceive_without_overrides_is_true_identity(
        role in any_role(),
        observer_role in any_role(),
        effect_ids in proptest::collection::vec(any_effect(), 0..6),
        context in any_context(),
    ) {
        let ruleset = sample::ruleset().unwrap();
        let mut target = Player::new(p(0), "T", role);
        for effect in effect_ids {
            target = target.with_effect(EffectInstance::new(effect));
        }
        let observer = Player::new(p(1), "O", observer_role);
        let state = GameState::new([target.clone(), observer.clone()]).unwrap();

        let seen = perceive(&target, &observer, context, &state, &ruleset);
        prop_assert_eq!(seen, true_identity(&target, &ruleset));
    }

    #[test]
    fn prop_override_is_what_observers_see(
        team in prop_oneof![Just(Team::Minion), Just(Team::Demon)],
        context in any_context(),
    ) {
        let ruleset = sample::ruleset().unwrap();
        let game = game(&ruleset);
        let overrides = BTreeMap::from([(p(2), PerceptionOverride::new().team(team))]);
        let derived = apply_perception_overrides(game.state(), &overrides, ruleset.effects());

        let seen = perceive(
            derived.player(p(2)).unwrap(),
            derived.player(p(0)).unwrap(),
            context,
            &derived,
            &ruleset,
        );
        prop_assert_eq!(seen.team, team);
        prop_assert_eq!(seen.role, roles::OUTCAST);
    }
}
